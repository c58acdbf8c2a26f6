//! Click tracker integration tests
//!
//! Success Criteria:
//! 1. Every CTA click emits exactly one `cta_click` with the element's id and text
//! 2. Non-CTA elements emit nothing
//! 3. Download clicks emit `file_download` with the configured file name
//! 4. Trackers work through the controller and through a shared tracker alike

#![cfg(not(target_arch = "wasm32"))]

use std::rc::Rc;

use landing_conf::LandingSettings;
use landing_pages::testing::{MockPage, MockTransport};
use landing_pages::{AnalyticsSink, ClickTarget, EventTracker, FormController, MemorySink, NoopSink};
use rstest::*;
use serde_json::json;
use url::Url;

#[fixture]
fn sink() -> MemorySink {
	MemorySink::new()
}

#[fixture]
fn tracker(sink: MemorySink) -> EventTracker<MemorySink> {
	EventTracker::new(&LandingSettings::default(), sink)
}

/// Repeated clicks on the same CTA each add one event
#[rstest]
fn test_repeated_cta_clicks(tracker: EventTracker<MemorySink>) {
	let hero = ClickTarget::new("hero-cta", "無料で資料請求").with_class_attr("btn cta-button");

	for _ in 0..3 {
		assert!(tracker.handle_click(&hero));
	}

	let events = tracker.sink().events_named("cta_click");
	assert_eq!(events.len(), 3);
	for event in events {
		assert_eq!(
			event.to_json(),
			json!({
				"event": "cta_click",
				"button_id": "hero-cta",
				"button_text": "無料で資料請求",
			})
		);
	}
}

/// Elements outside the CTA role never emit
#[rstest]
#[case::no_class(ClickTarget::new("logo", "Acme"))]
#[case::other_class(ClickTarget::new("nav", "Pricing").with_class("nav-link"))]
#[case::similar_class(ClickTarget::new("x", "X").with_class("cta-button-ghost"))]
fn test_non_cta_elements(tracker: EventTracker<MemorySink>, #[case] target: ClickTarget) {
	assert!(!tracker.handle_click(&target));
	assert!(tracker.sink().is_empty());
}

/// Elements without an id report an empty button_id
#[rstest]
fn test_cta_without_id(tracker: EventTracker<MemorySink>) {
	tracker.handle_click(&ClickTarget::new("", "Start").with_class("cta-button"));

	let event = &tracker.sink().events()[0];
	assert_eq!(event.param_str("button_id"), Some(""));
	assert_eq!(event.param_str("button_text"), Some("Start"));
}

/// Download clicks report the fixed asset name
#[rstest]
fn test_download_click(tracker: EventTracker<MemorySink>) {
	tracker.track_download();
	tracker.track_download();

	let events = tracker.sink().events();
	assert_eq!(events.len(), 2);
	assert!(events.iter().all(|event| {
		event.to_json() == json!({"event": "file_download", "file_name": "sample.pdf"})
	}));
}

/// A missing analytics collector is not an error
#[rstest]
fn test_noop_sink_tracking() {
	let tracker = EventTracker::new(&LandingSettings::default(), NoopSink);
	assert!(tracker.handle_click(&ClickTarget::new("cta", "Go").with_class("cta-button")));
	tracker.track_download();
	tracker.track_form_submit("contact-form");
}

/// CTA, download and submit events from one page land in one sink, in order
#[rstest]
#[tokio::test]
async fn test_shared_tracker_across_behaviors(sink: MemorySink) {
	let settings =
		LandingSettings::new(Url::parse("https://forms.example.com/submit").unwrap());
	let tracker = Rc::new(EventTracker::new(&settings, sink.clone()));
	let controller = FormController::with_tracker(
		settings,
		MockPage::new("資料をダウンロード"),
		MockTransport::new().with_ok(),
		Rc::clone(&tracker),
	)
	.unwrap();

	tracker.track_cta(&ClickTarget::new("hero-cta", "資料請求"));
	controller.track_download();
	controller.submit([("name", "Taro"), ("company", "")]).await;
	controller.handle_click(&ClickTarget::new("footer-cta", "お問い合わせ").with_class("cta-button"));

	let names: Vec<String> = sink.events().into_iter().map(|event| event.name).collect();
	assert_eq!(
		names,
		vec!["cta_click", "file_download", "form_submit", "cta_click"]
	);
}

/// Trackers accept any sink implementation, including trait objects
#[rstest]
fn test_dyn_sink(sink: MemorySink) {
	let shared: Rc<dyn AnalyticsSink> = Rc::new(sink.clone());
	let tracker = EventTracker::new(&LandingSettings::default(), shared);

	tracker.track_download();

	assert_eq!(sink.len(), 1);
}
