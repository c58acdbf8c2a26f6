//! Page surface
//!
//! [`PageView`] is everything the submission pipeline touches on the page.
//! The browser implementation lives in [`crate::browser`]; tests use
//! [`crate::testing::MockPage`].

use std::rc::Rc;

/// Which section of the page is shown.
///
/// The only transition is `FormVisible -> ConfirmationVisible`, once per page load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewState {
	/// The contact form is shown (initial)
	#[default]
	FormVisible,
	/// The confirmation section is shown (terminal)
	ConfirmationVisible,
}

/// Lifecycle of the submit control.
///
/// ```text
/// Idle ──submit──▶ Submitting ──failure──▶ Idle
///                       │
///                       └──success──▶ Completed (stays disabled)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitControlState {
	/// Enabled with its original label
	#[default]
	Idle,
	/// Disabled with the in-progress label while a request is outstanding
	Submitting,
	/// Disabled for good; the form section is hidden
	Completed,
}

/// Page operations used by the submission pipeline.
pub trait PageView {
	/// Current label of the submit control.
	fn submit_label(&self) -> String;

	/// Disables the submit control and shows `label` on it.
	fn set_submit_busy(&self, label: &str);

	/// Enables the submit control and shows `label` on it.
	fn restore_submit(&self, label: &str);

	/// Hides the form section, reveals the confirmation section and scrolls
	/// it into view.
	fn show_confirmation(&self);

	/// Shows a user-visible notification.
	fn notify(&self, message: &str);
}

impl<P: PageView + ?Sized> PageView for Rc<P> {
	fn submit_label(&self) -> String {
		(**self).submit_label()
	}

	fn set_submit_busy(&self, label: &str) {
		(**self).set_submit_busy(label)
	}

	fn restore_submit(&self, label: &str) {
		(**self).restore_submit(label)
	}

	fn show_confirmation(&self) {
		(**self).show_confirmation()
	}

	fn notify(&self, message: &str) {
		(**self).notify(message)
	}
}

/// The clicked element, as seen by the click trackers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickTarget {
	/// Element `id` (empty when unset)
	pub id: String,
	/// Element text content
	pub text: String,
	/// Element classes
	pub classes: Vec<String>,
}

impl ClickTarget {
	/// Creates a target without classes.
	pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			text: text.into(),
			classes: Vec::new(),
		}
	}

	/// Adds a class.
	pub fn with_class(mut self, class: impl Into<String>) -> Self {
		self.classes.push(class.into());
		self
	}

	/// Builds the class list from a `class` attribute value.
	pub fn with_class_attr(mut self, class_attr: &str) -> Self {
		self.classes.extend(class_attr.split_whitespace().map(str::to_string));
		self
	}

	/// Whether the element carries `class`.
	pub fn has_class(&self, class: &str) -> bool {
		self.classes.iter().any(|c| c == class)
	}
}
