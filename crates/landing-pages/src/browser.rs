//! Browser bindings (WASM only)
//!
//! Connects the controller to the live DOM:
//!
//! - [`BrowserPage`]: [`PageView`] over the submit button and the two sections
//! - [`DataLayerSink`]: pushes events onto `window.dataLayer` (Google Tag Manager)
//! - [`mount`]: binds the CTA buttons, the download link and the contact form
//!
//! Event listener closures live as long as the page and are leaked with
//! `Closure::forget`.

use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use landing_conf::{LandingSettings, SettingsError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
	Document, Element, Event, FormData, HtmlButtonElement, HtmlFormElement, ScrollBehavior,
	ScrollIntoViewOptions, Window,
};

use crate::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::controller::FormController;
use crate::error::SubmitError;
use crate::tracking::EventTracker;
use crate::transport::ReqwestTransport;
use crate::view::{ClickTarget, PageView};
use crate::{debug_log, error_log, warn_log};

/// Controller wired to the live page.
pub type BrowserController = FormController<BrowserPage, ReqwestTransport, Rc<DataLayerSink>>;

/// Errors raised while binding to the page
#[derive(Debug, thiserror::Error)]
pub enum MountError {
	/// No `window` global
	#[error("window is not available")]
	NoWindow,

	/// No document on the window
	#[error("document is not available")]
	NoDocument,

	/// The settings cannot drive a controller
	#[error("Invalid settings: {0}")]
	Settings(#[from] SettingsError),

	/// A DOM call threw
	#[error("JavaScript error: {0}")]
	Js(String),
}

impl From<JsValue> for MountError {
	fn from(value: JsValue) -> Self {
		Self::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
	}
}

/// [`PageView`] over the real DOM.
#[derive(Debug, Clone)]
pub struct BrowserPage {
	window: Window,
	submit_button: HtmlButtonElement,
	form_section: Option<Element>,
	thanks_section: Option<Element>,
	hidden_class: String,
}

impl BrowserPage {
	/// Creates a page over already-resolved elements.
	pub fn new(
		window: Window,
		submit_button: HtmlButtonElement,
		form_section: Option<Element>,
		thanks_section: Option<Element>,
		hidden_class: impl Into<String>,
	) -> Self {
		Self {
			window,
			submit_button,
			form_section,
			thanks_section,
			hidden_class: hidden_class.into(),
		}
	}
}

impl PageView for BrowserPage {
	fn submit_label(&self) -> String {
		self.submit_button.text_content().unwrap_or_default()
	}

	fn set_submit_busy(&self, label: &str) {
		self.submit_button.set_disabled(true);
		self.submit_button.set_text_content(Some(label));
	}

	fn restore_submit(&self, label: &str) {
		self.submit_button.set_disabled(false);
		self.submit_button.set_text_content(Some(label));
	}

	fn show_confirmation(&self) {
		match &self.form_section {
			Some(section) => {
				if let Err(err) = section.class_list().add_1(&self.hidden_class) {
					warn_log!("Failed to hide form section: {:?}", err);
				}
			}
			None => warn_log!("Form section not found; nothing to hide"),
		}

		let Some(thanks) = &self.thanks_section else {
			warn_log!("Thanks section not found; nothing to reveal");
			return;
		};
		if let Err(err) = thanks.class_list().remove_1(&self.hidden_class) {
			warn_log!("Failed to reveal thanks section: {:?}", err);
		}

		let options = ScrollIntoViewOptions::new();
		options.set_behavior(ScrollBehavior::Smooth);
		thanks.scroll_into_view_with_scroll_into_view_options(&options);
	}

	fn notify(&self, message: &str) {
		if let Err(err) = self.window.alert_with_message(message) {
			error_log!("Failed to show notification: {:?}", err);
		}
	}
}

/// Pushes events onto `window.dataLayer`.
///
/// The queue is looked up on every event, so a tag manager loaded after
/// [`mount`] is still picked up. Without a queue events are dropped.
#[derive(Debug, Clone)]
pub struct DataLayerSink {
	window: Window,
}

impl DataLayerSink {
	/// Name of the global queue.
	pub const GLOBAL: &'static str = "dataLayer";

	/// Creates a sink for `window`.
	pub fn new(window: Window) -> Self {
		Self { window }
	}

	fn push(&self, event: &AnalyticsEvent) -> Result<bool, JsValue> {
		let layer = Reflect::get(&self.window, &JsValue::from_str(Self::GLOBAL))?;
		if layer.is_undefined() || layer.is_null() {
			return Ok(false);
		}

		let json = serde_json::to_string(event)
			.map_err(|e| JsValue::from_str(&format!("failed to encode event: {}", e)))?;
		let entry = js_sys::JSON::parse(&json)?;

		// GTM replaces Array.prototype.push on the queue, so call whatever `push` is there
		let push = Reflect::get(&layer, &JsValue::from_str("push"))?;
		match push.dyn_into::<Function>() {
			Ok(push) => {
				push.call1(&layer, &entry)?;
			}
			Err(_) => match layer.dyn_into::<Array>() {
				Ok(array) => {
					array.push(&entry);
				}
				Err(_) => return Ok(false),
			},
		}
		Ok(true)
	}
}

impl AnalyticsSink for DataLayerSink {
	fn record(&self, event: AnalyticsEvent) {
		match self.push(&event) {
			Ok(true) => {}
			Ok(false) => debug_log!("{} is not available; dropped {}", Self::GLOBAL, event.name),
			Err(err) => warn_log!("Failed to push {}: {:?}", event.name, err),
		}
	}
}

/// Binds the landing page behaviors once the document is parsed.
///
/// When the document is still loading, binding waits for `DOMContentLoaded`.
pub fn mount(settings: LandingSettings) -> Result<(), MountError> {
	settings.validate()?;
	let window = web_sys::window().ok_or(MountError::NoWindow)?;
	let document = window.document().ok_or(MountError::NoDocument)?;

	if document.ready_state() != "loading" {
		return bind(&window, &document, settings);
	}
	bind_on_dom_content_loaded(window, &document, settings)
}

fn bind_on_dom_content_loaded(
	window: Window,
	document: &Document,
	settings: LandingSettings,
) -> Result<(), MountError> {
	let closure = Closure::<dyn FnMut(Event)>::once(move |_event: Event| {
		let Some(document) = window.document() else {
			error_log!("Document disappeared before DOMContentLoaded");
			return;
		};
		if let Err(err) = bind(&window, &document, settings) {
			error_log!("Failed to bind landing page: {}", err);
		}
	});
	document
		.add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())?;
	closure.forget();
	Ok(())
}

fn bind(window: &Window, document: &Document, settings: LandingSettings) -> Result<(), MountError> {
	let sink = Rc::new(DataLayerSink::new(window.clone()));
	let tracker = Rc::new(EventTracker::new(&settings, sink));

	bind_cta_buttons(document, &tracker)?;
	bind_download_link(document, &settings, &tracker)?;
	bind_form(window, document, settings, tracker)?;
	Ok(())
}

fn bind_cta_buttons(
	document: &Document,
	tracker: &Rc<EventTracker<Rc<DataLayerSink>>>,
) -> Result<(), MountError> {
	let selector = format!(".{}", tracker.cta_class());
	let buttons = document.query_selector_all(&selector)?;

	for index in 0..buttons.length() {
		let Some(button) = buttons
			.item(index)
			.and_then(|node| node.dyn_into::<Element>().ok())
		else {
			continue;
		};

		let tracker = Rc::clone(tracker);
		let element = button.clone();
		let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
			tracker.track_cta(&click_target(&element));
		});
		button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
		closure.forget();
	}
	Ok(())
}

fn bind_download_link(
	document: &Document,
	settings: &LandingSettings,
	tracker: &Rc<EventTracker<Rc<DataLayerSink>>>,
) -> Result<(), MountError> {
	let Some(link) = document.get_element_by_id(&settings.download_link_id) else {
		return Ok(());
	};

	let tracker = Rc::clone(tracker);
	let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
		tracker.track_download();
	});
	link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
	closure.forget();
	Ok(())
}

fn bind_form(
	window: &Window,
	document: &Document,
	settings: LandingSettings,
	tracker: Rc<EventTracker<Rc<DataLayerSink>>>,
) -> Result<(), MountError> {
	let Some(form) = document
		.get_element_by_id(&settings.form_id)
		.and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
	else {
		return Ok(());
	};

	let Some(submit_button) = form
		.query_selector("button[type=\"submit\"]")?
		.and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
	else {
		warn_log!("Form '{}' has no submit button; submission is not bound", settings.form_id);
		return Ok(());
	};

	let page = BrowserPage::new(
		window.clone(),
		submit_button,
		document.get_element_by_id(&settings.form_section_id),
		document.get_element_by_id(&settings.thanks_section_id),
		settings.hidden_class.clone(),
	);
	let transport = ReqwestTransport::from_settings(&settings);
	let controller: Rc<BrowserController> = Rc::new(FormController::with_tracker(
		settings, page, transport, tracker,
	)?);

	let target = form.clone();
	let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
		event.prevent_default();

		let fields = match form_fields(&target) {
			Ok(fields) => fields,
			Err(err) => {
				controller.reject(SubmitError::UnreadableForm(format!("{:?}", err)));
				return;
			}
		};

		let controller = Rc::clone(&controller);
		spawn_local(async move {
			controller.submit(fields).await;
		});
	});
	form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
	closure.forget();
	Ok(())
}

/// String entries of the form's `FormData`, in document order. File inputs are skipped.
fn form_fields(form: &HtmlFormElement) -> Result<Vec<(String, String)>, JsValue> {
	let data = FormData::new_with_form(form)?;
	let entries = js_sys::try_iter(&data)?
		.ok_or_else(|| JsValue::from_str("FormData is not iterable"))?;

	let mut fields = Vec::new();
	for entry in entries {
		let pair: Array = entry?.dyn_into()?;
		if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
			fields.push((name, value));
		}
	}
	Ok(fields)
}

fn click_target(element: &Element) -> ClickTarget {
	ClickTarget::new(element.id(), element.text_content().unwrap_or_default())
		.with_class_attr(&element.class_name())
}
