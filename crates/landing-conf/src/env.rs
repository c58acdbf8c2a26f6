//! Environment variable handling module
//!
//! Prefixed, typed lookups of environment variables.

use std::env;

/// Environment variable reader with prefix support
#[derive(Debug, Clone, Default)]
pub struct Env {
	/// Optional prefix for environment variables (e.g., "LANDING_")
	pub prefix: Option<String>,
}

impl Env {
	/// Create a new Env instance
	pub fn new() -> Self {
		Self { prefix: None }
	}

	/// Set a prefix for all environment variable lookups
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	/// Get the full key name with prefix
	fn get_key_name(&self, key: &str) -> String {
		match &self.prefix {
			Some(prefix) => format!("{}{}", prefix, key),
			None => key.to_string(),
		}
	}

	/// Read an optional string value; unset variables yield `None`
	pub fn var(&self, key: &str) -> Result<Option<String>, EnvError> {
		let full_key = self.get_key_name(key);
		validate_env_var_name(&full_key)?;

		match env::var(&full_key) {
			Ok(val) => Ok(Some(val)),
			Err(env::VarError::NotPresent) => Ok(None),
			Err(env::VarError::NotUnicode(_)) => Err(EnvError::ParseError {
				key: full_key,
				value_len: 0,
				error: "value is not valid unicode".to_string(),
			}),
		}
	}

	/// Read a string value from environment
	pub fn str(&self, key: &str) -> Result<String, EnvError> {
		self.str_with_default(key, None)
	}

	/// Read a string value with a default
	pub fn str_with_default(&self, key: &str, default: Option<&str>) -> Result<String, EnvError> {
		match self.var(key)? {
			Some(val) => Ok(val),
			None => match default {
				Some(d) => Ok(d.to_string()),
				None => Err(EnvError::MissingVariable(self.get_key_name(key))),
			},
		}
	}

	/// Read an optional unsigned integer value
	pub fn u64(&self, key: &str) -> Result<Option<u64>, EnvError> {
		let Some(val) = self.var(key)? else {
			return Ok(None);
		};
		val.trim()
			.parse::<u64>()
			.map(Some)
			.map_err(|e| EnvError::ParseError {
				key: self.get_key_name(key),
				value_len: val.len(),
				error: e.to_string(),
			})
	}
}

/// Validates an environment variable name.
///
/// Rejects names that are empty, contain control characters, or contain
/// the `=` character (which is used as the key-value separator).
pub fn validate_env_var_name(name: &str) -> Result<(), EnvError> {
	if name.is_empty() {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not be empty".to_string(),
		});
	}

	if let Some(pos) = name.find(|c: char| c.is_control()) {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: format!(
				"environment variable name contains control character at position {}",
				pos
			),
		});
	}

	if name.contains('=') {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not contain '='".to_string(),
		});
	}

	Ok(())
}

/// Environment variable errors
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
	#[error("Missing environment variable: {0}")]
	MissingVariable(String),

	#[error("Failed to parse environment variable '{key}' (value length: {value_len}): {error}")]
	ParseError {
		key: String,
		/// Length of the original value (stored instead of the raw value to prevent secret leakage)
		value_len: usize,
		error: String,
	},

	#[error("Invalid environment variable name '{name}': {reason}")]
	InvalidVariableName { name: String, reason: String },
}
