//! Analytics events and sinks
//!
//! An [`AnalyticsEvent`] is a name plus a flat parameter map. It serializes in
//! the shape tag managers expect on their queue:
//!
//! ```text
//! { "event": "cta_click", "button_id": "hero-cta", "button_text": "資料請求" }
//! ```
//!
//! Sinks are write-only. Recording is best-effort and never fails; a sink
//! that has nowhere to deliver an event drops it.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Emitted on every click of a call-to-action element
pub const CTA_CLICK: &str = "cta_click";

/// Emitted after the endpoint accepted a submission
pub const FORM_SUBMIT: &str = "form_submit";

/// Emitted on every click of the download link
pub const FILE_DOWNLOAD: &str = "file_download";

/// A named analytics event with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEvent {
	/// Event name (`cta_click`, `form_submit`, ...)
	#[serde(rename = "event")]
	pub name: String,

	/// Event parameters, in insertion order
	#[serde(flatten)]
	pub params: IndexMap<String, Value>,
}

impl AnalyticsEvent {
	/// Creates an event without parameters.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			params: IndexMap::new(),
		}
	}

	/// Adds a parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.params.insert(key.into(), value.into());
		self
	}

	/// Looks up a parameter.
	pub fn param(&self, key: &str) -> Option<&Value> {
		self.params.get(key)
	}

	/// Looks up a string parameter.
	pub fn param_str(&self, key: &str) -> Option<&str> {
		self.param(key).and_then(Value::as_str)
	}

	/// Flattened JSON form, as pushed onto a tag manager queue.
	pub fn to_json(&self) -> Value {
		let mut object = serde_json::Map::with_capacity(self.params.len() + 1);
		object.insert("event".to_string(), Value::String(self.name.clone()));
		for (key, value) in &self.params {
			object.insert(key.clone(), value.clone());
		}
		Value::Object(object)
	}
}

/// Destination for analytics events.
pub trait AnalyticsSink {
	/// Records one event.
	fn record(&self, event: AnalyticsEvent);
}

impl<S: AnalyticsSink + ?Sized> AnalyticsSink for Rc<S> {
	fn record(&self, event: AnalyticsEvent) {
		(**self).record(event)
	}
}

impl<S: AnalyticsSink + ?Sized> AnalyticsSink for &S {
	fn record(&self, event: AnalyticsEvent) {
		(**self).record(event)
	}
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl AnalyticsSink for NoopSink {
	fn record(&self, _event: AnalyticsEvent) {}
}

/// Sink that keeps events in memory.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
	events: Rc<RefCell<Vec<AnalyticsEvent>>>,
}

impl MemorySink {
	/// Creates an empty sink.
	pub fn new() -> Self {
		Self::default()
	}

	/// All recorded events, oldest first.
	pub fn events(&self) -> Vec<AnalyticsEvent> {
		self.events.borrow().clone()
	}

	/// Recorded events with the given name.
	pub fn events_named(&self, name: &str) -> Vec<AnalyticsEvent> {
		self.events
			.borrow()
			.iter()
			.filter(|event| event.name == name)
			.cloned()
			.collect()
	}

	/// Number of recorded events.
	pub fn len(&self) -> usize {
		self.events.borrow().len()
	}

	/// Whether nothing has been recorded.
	pub fn is_empty(&self) -> bool {
		self.events.borrow().is_empty()
	}

	/// Drops all recorded events.
	pub fn clear(&self) {
		self.events.borrow_mut().clear();
	}
}

impl AnalyticsSink for MemorySink {
	fn record(&self, event: AnalyticsEvent) {
		self.events.borrow_mut().push(event);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_event_serializes_flat() {
		let event = AnalyticsEvent::new(CTA_CLICK)
			.with_param("button_id", "hero-cta")
			.with_param("button_text", "資料請求");

		assert_eq!(
			serde_json::to_value(&event).unwrap(),
			json!({
				"event": "cta_click",
				"button_id": "hero-cta",
				"button_text": "資料請求",
			})
		);
		assert_eq!(event.to_json(), serde_json::to_value(&event).unwrap());
	}

	#[rstest]
	fn test_event_param_lookup() {
		let event = AnalyticsEvent::new(FILE_DOWNLOAD).with_param("file_name", "sample.pdf");
		assert_eq!(event.param_str("file_name"), Some("sample.pdf"));
		assert_eq!(event.param("missing"), None);
	}

	#[rstest]
	fn test_event_keeps_param_order() {
		let event = AnalyticsEvent::new("ordered")
			.with_param("z", 1)
			.with_param("a", 2);
		let keys: Vec<_> = event.params.keys().cloned().collect();
		assert_eq!(keys, vec!["z".to_string(), "a".to_string()]);
	}

	#[rstest]
	fn test_memory_sink_shares_buffer_between_clones() {
		let sink = MemorySink::new();
		let clone = sink.clone();

		clone.record(AnalyticsEvent::new(FORM_SUBMIT));
		clone.record(AnalyticsEvent::new(CTA_CLICK));

		assert_eq!(sink.len(), 2);
		assert_eq!(sink.events_named(FORM_SUBMIT).len(), 1);

		sink.clear();
		assert!(clone.is_empty());
	}

	#[rstest]
	fn test_noop_sink_accepts_events() {
		let sink = NoopSink;
		sink.record(AnalyticsEvent::new(CTA_CLICK));
	}

	#[rstest]
	fn test_rc_sink_delegates() {
		let sink = Rc::new(MemorySink::new());
		let shared: Rc<dyn AnalyticsSink> = sink.clone();
		shared.record(AnalyticsEvent::new(FILE_DOWNLOAD));
		assert_eq!(sink.len(), 1);
	}
}
