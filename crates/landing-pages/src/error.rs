//! Submission error types

/// Why a submission did not reach the confirmation view.
///
/// Every variant is recovered locally: the submit control is re-enabled and
/// the user may resubmit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
	/// The form's field values could not be read; no request was made
	#[error("Form fields could not be read: {0}")]
	UnreadableForm(String),

	/// The honeypot field carried a value; no request was made
	#[error("Honeypot field '{field}' was filled in")]
	HoneypotTripped {
		/// Name of the honeypot field
		field: String,
	},

	/// The request could not be completed (connection lost, CORS, timeout, ...)
	#[error("Network error: {0}")]
	Network(String),

	/// The endpoint answered with a non-success HTTP status
	#[error("HTTP {status}")]
	Status {
		/// HTTP status code
		status: u16,
	},

	/// A success status with a body that is not the expected JSON
	#[error("Malformed response: {0}")]
	MalformedResponse(String),

	/// The endpoint answered but did not report `status: "ok"`
	#[error("Submission rejected: {reason}")]
	Rejected {
		/// The endpoint's `reason`, or `submit_failed` when it gave none
		reason: String,
	},
}

/// Reason recorded when the endpoint rejects a submission without saying why.
pub const DEFAULT_REJECT_REASON: &str = "submit_failed";

impl SubmitError {
	/// Create a network error
	pub fn network(msg: impl Into<String>) -> Self {
		Self::Network(msg.into())
	}

	/// Create a rejection, falling back to [`DEFAULT_REJECT_REASON`]
	pub fn rejected(reason: Option<String>) -> Self {
		let reason = reason
			.filter(|r| !r.is_empty())
			.unwrap_or_else(|| DEFAULT_REJECT_REASON.to_string());
		Self::Rejected { reason }
	}

	/// Whether the local anti-automation gate produced this error.
	pub fn is_automated(&self) -> bool {
		matches!(self, Self::HoneypotTripped { .. })
	}
}
