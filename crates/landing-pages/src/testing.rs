//! Testing utilities
//!
//! In-memory stand-ins for the browser collaborators:
//!
//! - [`MockPage`]: a [`PageView`] that records every mutation
//! - [`MockTransport`]: a [`SubmitTransport`] replaying scripted replies
//!
//! Pair them with [`crate::analytics::MemorySink`] to drive a
//! [`crate::FormController`] end to end without a browser.
//!
//! ```ignore
//! let page = MockPage::new("資料をダウンロード");
//! let transport = MockTransport::new().with_ok();
//! let controller = FormController::new(settings, page.clone(), transport.clone(), MemorySink::new())?;
//!
//! controller.submit([("name", "Taro")]).await;
//! assert!(page.snapshot().thanks_visible);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::SubmitError;
use crate::payload::SubmissionPayload;
use crate::transport::{SubmitTransport, TransportResponse};
use crate::view::PageView;

/// Observable state of a [`MockPage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockPageState {
	/// Current submit control label
	pub submit_label: String,
	/// Whether the submit control is disabled
	pub submit_disabled: bool,
	/// Whether the form section is shown
	pub form_visible: bool,
	/// Whether the confirmation section is shown
	pub thanks_visible: bool,
	/// Times the confirmation section was scrolled into view
	pub scroll_count: usize,
	/// Times `show_confirmation` was called
	pub confirmation_count: usize,
	/// Notifications shown, oldest first
	pub notifications: Vec<String>,
}

/// In-memory page. Clones share state.
#[derive(Debug, Clone)]
pub struct MockPage {
	state: Rc<RefCell<MockPageState>>,
}

impl MockPage {
	/// Creates a page showing the form, with an enabled submit control.
	pub fn new(submit_label: impl Into<String>) -> Self {
		Self {
			state: Rc::new(RefCell::new(MockPageState {
				submit_label: submit_label.into(),
				submit_disabled: false,
				form_visible: true,
				thanks_visible: false,
				scroll_count: 0,
				confirmation_count: 0,
				notifications: Vec::new(),
			})),
		}
	}

	/// Copy of the current state.
	pub fn snapshot(&self) -> MockPageState {
		self.state.borrow().clone()
	}
}

impl PageView for MockPage {
	fn submit_label(&self) -> String {
		self.state.borrow().submit_label.clone()
	}

	fn set_submit_busy(&self, label: &str) {
		let mut state = self.state.borrow_mut();
		state.submit_disabled = true;
		state.submit_label = label.to_string();
	}

	fn restore_submit(&self, label: &str) {
		let mut state = self.state.borrow_mut();
		state.submit_disabled = false;
		state.submit_label = label.to_string();
	}

	fn show_confirmation(&self) {
		let mut state = self.state.borrow_mut();
		state.form_visible = false;
		state.thanks_visible = true;
		state.scroll_count += 1;
		state.confirmation_count += 1;
	}

	fn notify(&self, message: &str) {
		self.state.borrow_mut().notifications.push(message.to_string());
	}
}

/// Scripted reply of a [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
	/// The endpoint answers with this status and body
	Response(TransportResponse),
	/// The request fails before any response
	NetworkError(String),
}

/// Request seen by a [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
	/// Target URL
	pub url: Url,
	/// Body as sent, parsed back to JSON
	pub body: Value,
	/// State of the observed page while the request was outstanding
	pub page_during_request: Option<MockPageState>,
}

/// Transport replaying scripted replies in order. Clones share the script
/// and the request log.
///
/// Once the script runs out every request fails with a network error.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
	replies: Rc<RefCell<VecDeque<MockReply>>>,
	requests: Rc<RefCell<Vec<RecordedRequest>>>,
	observed_page: Option<MockPage>,
}

impl MockTransport {
	/// Creates a transport with an empty script.
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues a reply.
	pub fn with_reply(self, reply: MockReply) -> Self {
		self.replies.borrow_mut().push_back(reply);
		self
	}

	/// Queues a raw status/body reply.
	pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
		self.with_reply(MockReply::Response(TransportResponse::new(status, body)))
	}

	/// Queues `200 {"status":"ok"}`.
	pub fn with_ok(self) -> Self {
		self.with_response(200, r#"{"status":"ok"}"#)
	}

	/// Queues a network failure.
	pub fn with_network_error(self, message: impl Into<String>) -> Self {
		self.with_reply(MockReply::NetworkError(message.into()))
	}

	/// Captures `page`'s state at the moment each request is sent.
	pub fn observing(mut self, page: &MockPage) -> Self {
		self.observed_page = Some(page.clone());
		self
	}

	/// Requests seen so far.
	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.borrow().clone()
	}

	/// Replies not yet consumed.
	pub fn pending_replies(&self) -> usize {
		self.replies.borrow().len()
	}
}

#[async_trait(?Send)]
impl SubmitTransport for MockTransport {
	async fn post_json(
		&self,
		url: &Url,
		payload: &SubmissionPayload,
	) -> Result<TransportResponse, SubmitError> {
		let body = payload
			.to_json_body()
			.map_err(|e| SubmitError::network(e.to_string()))?;
		let body: Value =
			serde_json::from_str(&body).map_err(|e| SubmitError::network(e.to_string()))?;

		self.requests.borrow_mut().push(RecordedRequest {
			url: url.clone(),
			body,
			page_during_request: self.observed_page.as_ref().map(MockPage::snapshot),
		});

		let reply = self.replies.borrow_mut().pop_front();
		match reply {
			Some(MockReply::Response(response)) => Ok(response),
			Some(MockReply::NetworkError(message)) => Err(SubmitError::Network(message)),
			None => Err(SubmitError::network("no scripted reply")),
		}
	}
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_mock_page_transitions() {
		let page = MockPage::new("Send");
		page.set_submit_busy("Sending");
		assert!(page.snapshot().submit_disabled);

		page.restore_submit("Send");
		page.show_confirmation();
		page.notify("hello");

		let state = page.snapshot();
		assert!(!state.submit_disabled);
		assert_eq!(state.submit_label, "Send");
		assert!(!state.form_visible);
		assert!(state.thanks_visible);
		assert_eq!(state.notifications, vec!["hello".to_string()]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_mock_transport_replays_in_order() {
		let url = Url::parse("https://forms.example.com/submit").unwrap();
		let transport = MockTransport::new()
			.with_response(502, "bad gateway")
			.with_ok();
		let payload: SubmissionPayload = [("name", "Taro")].into_iter().collect();

		let first = transport.post_json(&url, &payload).await.unwrap();
		let second = transport.post_json(&url, &payload).await.unwrap();
		let third = transport.post_json(&url, &payload).await;

		assert_eq!(first.status, 502);
		assert!(second.is_success());
		assert!(matches!(third, Err(SubmitError::Network(_))));
		assert_eq!(transport.requests().len(), 3);
		assert_eq!(transport.pending_replies(), 0);
		assert_eq!(transport.requests()[0].body, serde_json::json!({"name": "Taro"}));
	}
}
