//! Submission payload
//!
//! The payload mirrors the form's named fields one to one. It serializes as a
//! flat JSON object of strings, the body the endpoint receives.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field name to field value, in form order.
///
/// A name seen twice keeps its first position and its last value, the same
/// result as copying `FormData` entries into a plain object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionPayload {
	fields: IndexMap<String, String>,
}

impl SubmissionPayload {
	/// Creates an empty payload.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets a field.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.fields.insert(name.into(), value.into());
	}

	/// Looks up a field.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.fields.get(name).map(String::as_str)
	}

	/// Number of fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether the form had no named fields.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Iterates fields in form order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Whether the honeypot field was filled in.
	///
	/// An absent field or a whitespace-only value counts as empty.
	pub fn honeypot_tripped(&self, honeypot_field: &str) -> bool {
		self.get(honeypot_field).is_some_and(|value| !value.trim().is_empty())
	}

	/// Request body for the endpoint.
	pub fn to_json_body(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}
}

impl<K, V> FromIterator<(K, V)> for SubmissionPayload
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut payload = Self::new();
		for (name, value) in iter {
			payload.insert(name, value);
		}
		payload
	}
}
