//! Click and conversion tracking
//!
//! [`EventTracker`] turns page interactions into analytics events. It keeps no
//! state of its own; every call emits at most one event and never fails.

use landing_conf::LandingSettings;

use crate::analytics::{AnalyticsEvent, AnalyticsSink, CTA_CLICK, FILE_DOWNLOAD, FORM_SUBMIT};
use crate::info_log;
use crate::view::ClickTarget;

/// Emits `cta_click`, `file_download` and `form_submit` events.
#[derive(Debug, Clone)]
pub struct EventTracker<A> {
	sink: A,
	cta_class: String,
	download_file_name: String,
}

impl<A: AnalyticsSink> EventTracker<A> {
	/// Creates a tracker reading the CTA class and download name from settings.
	pub fn new(settings: &LandingSettings, sink: A) -> Self {
		Self {
			sink,
			cta_class: settings.cta_class.clone(),
			download_file_name: settings.download_file_name.clone(),
		}
	}

	/// The underlying sink.
	pub fn sink(&self) -> &A {
		&self.sink
	}

	/// Class that marks call-to-action elements.
	pub fn cta_class(&self) -> &str {
		&self.cta_class
	}

	/// Click handler for any element.
	///
	/// Emits `cta_click` when the element carries the CTA class and returns
	/// whether it did. The click's default action is never touched.
	pub fn handle_click(&self, target: &ClickTarget) -> bool {
		if !target.has_class(&self.cta_class) {
			return false;
		}
		self.track_cta(target);
		true
	}

	/// Emits `cta_click` for an element already known to be a CTA.
	pub fn track_cta(&self, target: &ClickTarget) {
		self.emit(
			AnalyticsEvent::new(CTA_CLICK)
				.with_param("button_id", target.id.as_str())
				.with_param("button_text", target.text.as_str()),
		);
	}

	/// Emits `file_download` for the configured asset.
	pub fn track_download(&self) {
		self.emit(
			AnalyticsEvent::new(FILE_DOWNLOAD)
				.with_param("file_name", self.download_file_name.as_str()),
		);
	}

	/// Emits `form_submit` for an accepted submission.
	pub fn track_form_submit(&self, form_id: &str) {
		self.emit(AnalyticsEvent::new(FORM_SUBMIT).with_param("form_id", form_id));
	}

	fn emit(&self, event: AnalyticsEvent) {
		info_log!("Event tracked: {} {:?}", event.name, event.params);
		self.sink.record(event);
	}
}
