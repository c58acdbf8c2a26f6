//! Form interaction controller
//!
//! [`FormController`] owns the submission pipeline:
//!
//! ```text
//! submit(fields)
//!   ├─ busy? ───────────────────────────────▶ Ignored
//!   ├─ disable control, "送信中..."
//!   ├─ honeypot filled? ─▶ notify ─▶ restore ─▶ Rejected(HoneypotTripped)
//!   ├─ POST JSON ─▶ 2xx + {"status":"ok"}?
//!   │      └─ no ─▶ log ─▶ notify ─▶ restore ─▶ Rejected(..)
//!   └─ show confirmation ─▶ form_submit ─▶ Submitted (control stays disabled)
//! ```
//!
//! The page is only switched to the confirmation view after the response has
//! been fully validated. Restoring the control on failure is owned by
//! [`SubmitGuard`], so every early exit re-enables it.

use std::cell::Cell;
use std::rc::Rc;

use landing_conf::{LandingSettings, SettingsError};
use url::Url;

use crate::analytics::AnalyticsSink;
use crate::error::SubmitError;
use crate::payload::SubmissionPayload;
use crate::tracking::EventTracker;
use crate::transport::SubmitTransport;
use crate::view::{ClickTarget, PageView, SubmitControlState, ViewState};
use crate::{debug_log, error_log, info_log, warn_log};

/// Result of one call to [`FormController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// The endpoint accepted the submission; the confirmation is shown
	Submitted,
	/// The submission failed and the control was restored
	Rejected(SubmitError),
	/// A submission was already in flight or had already succeeded
	Ignored,
}

impl SubmitOutcome {
	/// Whether the confirmation view was reached.
	pub fn is_submitted(&self) -> bool {
		matches!(self, Self::Submitted)
	}

	/// The failure, if any.
	pub fn error(&self) -> Option<&SubmitError> {
		match self {
			Self::Rejected(err) => Some(err),
			_ => None,
		}
	}
}

/// Submission pipeline and click tracking for one contact form.
pub struct FormController<P, T, A> {
	settings: LandingSettings,
	endpoint: Url,
	page: P,
	transport: T,
	tracker: Rc<EventTracker<A>>,
	view_state: Cell<ViewState>,
	control_state: Cell<SubmitControlState>,
}

impl<P, T, A> FormController<P, T, A>
where
	P: PageView,
	T: SubmitTransport,
	A: AnalyticsSink,
{
	/// Creates a controller with its own tracker around `sink`.
	///
	/// Fails when the settings do not validate (no endpoint, blank ids, ...).
	pub fn new(
		settings: LandingSettings,
		page: P,
		transport: T,
		sink: A,
	) -> Result<Self, SettingsError> {
		let tracker = Rc::new(EventTracker::new(&settings, sink));
		Self::with_tracker(settings, page, transport, tracker)
	}

	/// Creates a controller sharing an existing tracker.
	pub fn with_tracker(
		settings: LandingSettings,
		page: P,
		transport: T,
		tracker: Rc<EventTracker<A>>,
	) -> Result<Self, SettingsError> {
		settings.validate()?;
		let endpoint = settings.endpoint()?.clone();
		Ok(Self {
			settings,
			endpoint,
			page,
			transport,
			tracker,
			view_state: Cell::new(ViewState::FormVisible),
			control_state: Cell::new(SubmitControlState::Idle),
		})
	}

	/// Settings the controller was built with.
	pub fn settings(&self) -> &LandingSettings {
		&self.settings
	}

	/// Page surface.
	pub fn page(&self) -> &P {
		&self.page
	}

	/// Submission transport.
	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Event tracker shared with the click handlers.
	pub fn tracker(&self) -> &Rc<EventTracker<A>> {
		&self.tracker
	}

	/// Which section is shown.
	pub fn view_state(&self) -> ViewState {
		self.view_state.get()
	}

	/// State of the submit control.
	pub fn control_state(&self) -> SubmitControlState {
		self.control_state.get()
	}

	/// Click handler; see [`EventTracker::handle_click`].
	pub fn handle_click(&self, target: &ClickTarget) -> bool {
		self.tracker.handle_click(target)
	}

	/// Download link click handler; see [`EventTracker::track_download`].
	pub fn track_download(&self) {
		self.tracker.track_download();
	}

	/// Runs the submission pipeline for the form's current field values.
	///
	/// The caller has already suppressed the form's default navigation.
	pub async fn submit<I, K, V>(&self, fields: I) -> SubmitOutcome
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		if !self.accepting() {
			debug_log!(
				"Submit ignored in state {:?}/{:?}",
				self.control_state.get(),
				self.view_state.get()
			);
			return SubmitOutcome::Ignored;
		}

		let guard = SubmitGuard::engage(
			&self.page,
			&self.control_state,
			&self.settings.submitting_label,
		);
		let payload: SubmissionPayload = fields.into_iter().collect();

		match self.deliver(&payload).await {
			Ok(()) => {
				self.page.show_confirmation();
				self.view_state.set(ViewState::ConfirmationVisible);
				self.tracker.track_form_submit(&self.settings.form_id);
				guard.commit();
				info_log!("Form '{}' submitted", self.settings.form_id);
				SubmitOutcome::Submitted
			}
			Err(err) => {
				self.report_failure(&err);
				drop(guard);
				SubmitOutcome::Rejected(err)
			}
		}
	}

	/// Fails a submission before it reaches the pipeline.
	///
	/// Used when the form itself cannot be read. The user is notified, no
	/// request is made and the control is left as it was.
	pub fn reject(&self, err: SubmitError) -> SubmitOutcome {
		if !self.accepting() {
			return SubmitOutcome::Ignored;
		}
		self.report_failure(&err);
		SubmitOutcome::Rejected(err)
	}

	/// Honeypot gate, POST and response validation. Touches no UI.
	async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), SubmitError> {
		let honeypot = &self.settings.honeypot_field;
		if payload.honeypot_tripped(honeypot) {
			return Err(SubmitError::HoneypotTripped {
				field: honeypot.clone(),
			});
		}

		let response = self.transport.post_json(&self.endpoint, payload).await?;
		response.into_result()?;
		Ok(())
	}

	fn accepting(&self) -> bool {
		self.control_state.get() == SubmitControlState::Idle
			&& self.view_state.get() == ViewState::FormVisible
	}

	fn report_failure(&self, err: &SubmitError) {
		let message = if err.is_automated() {
			warn_log!("Honeypot detected, possible bot submission: {}", err);
			&self.settings.honeypot_message
		} else {
			error_log!("Error: {}", err);
			&self.settings.failure_message
		};
		self.page.notify(message);
	}
}

impl<P, T, A> std::fmt::Debug for FormController<P, T, A> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FormController")
			.field("form_id", &self.settings.form_id)
			.field("endpoint", &self.endpoint.as_str())
			.field("view_state", &self.view_state.get())
			.field("control_state", &self.control_state.get())
			.finish()
	}
}

/// Holds the submit control in its busy state.
///
/// Dropping the guard restores the original label and re-enables the control.
/// [`SubmitGuard::commit`] instead leaves it disabled for good.
struct SubmitGuard<'a, P: PageView> {
	page: &'a P,
	state: &'a Cell<SubmitControlState>,
	original_label: String,
	committed: bool,
}

impl<'a, P: PageView> SubmitGuard<'a, P> {
	fn engage(page: &'a P, state: &'a Cell<SubmitControlState>, busy_label: &str) -> Self {
		let original_label = page.submit_label();
		page.set_submit_busy(busy_label);
		state.set(SubmitControlState::Submitting);
		Self {
			page,
			state,
			original_label,
			committed: false,
		}
	}

	fn commit(mut self) {
		self.committed = true;
		self.state.set(SubmitControlState::Completed);
	}
}

impl<P: PageView> Drop for SubmitGuard<'_, P> {
	fn drop(&mut self) {
		if !self.committed {
			self.page.restore_submit(&self.original_label);
			self.state.set(SubmitControlState::Idle);
		}
	}
}
