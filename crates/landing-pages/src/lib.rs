//! Landing Pages - Form Interaction Controller
//!
//! Client-side behavior of a marketing landing page, written against small
//! traits so the same controller runs in the browser (WASM) and in native tests.
//!
//! ## Behaviors
//!
//! - **Call-to-action tracker**: clicks on `.cta-button` elements emit `cta_click`
//! - **Download tracker**: clicks on the download link emit `file_download`
//! - **Submission pipeline**: the contact form is honeypot-checked, posted as
//!   JSON and, on an `{"status":"ok"}` reply, swapped for the confirmation
//!   section while `form_submit` is emitted
//!
//! ## Architecture
//!
//! - [`controller`]: [`FormController`], the submission state machine
//! - [`tracking`]: [`EventTracker`], CTA/download/submit event emission
//! - [`analytics`]: [`AnalyticsSink`] and its in-process implementations
//! - [`transport`]: [`SubmitTransport`] and the `reqwest` implementation
//! - [`view`]: [`PageView`], the page surface the controller drives
//! - [`payload`]: [`SubmissionPayload`], the posted field map
//! - `browser`: web-sys bindings and `browser::mount` (WASM only)
//! - [`testing`]: in-memory page and transport doubles
//!
//! ## Example
//!
//! ```ignore
//! use landing_conf::LandingSettings;
//!
//! #[wasm_bindgen(start)]
//! pub fn start() -> Result<(), JsValue> {
//!     let settings = LandingSettings::from_toml_str(include_str!("../landing.toml"))
//!         .map_err(|e| JsValue::from_str(&e.to_string()))?;
//!     landing_pages::browser::mount(settings).map_err(|e| JsValue::from_str(&e.to_string()))
//! }
//! ```

#![warn(missing_docs)]

pub mod analytics;
pub mod controller;
pub mod error;
pub mod logging;
pub mod payload;
pub mod tracking;
pub mod transport;
pub mod view;

// Browser bindings (web-sys)
#[cfg(target_arch = "wasm32")]
pub mod browser;

// Testing utilities (in-memory page and transport)
pub mod testing;

pub use analytics::{AnalyticsEvent, AnalyticsSink, MemorySink, NoopSink};
pub use controller::{FormController, SubmitOutcome};
pub use error::SubmitError;
pub use payload::SubmissionPayload;
pub use tracking::EventTracker;
pub use transport::{ReqwestTransport, SubmitResponse, SubmitTransport, TransportResponse};
pub use view::{ClickTarget, PageView, SubmitControlState, ViewState};

// Used by the logging macros
#[doc(hidden)]
pub use tracing as __tracing;
#[cfg(target_arch = "wasm32")]
#[doc(hidden)]
pub use web_sys as __web_sys;
