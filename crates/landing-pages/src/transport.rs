//! Submission transport
//!
//! [`SubmitTransport`] posts a payload and hands back the raw status and
//! body. Interpreting the body is left to [`SubmitResponse`], so every
//! transport shares the same success rules.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use url::Url;

use crate::error::SubmitError;
use crate::payload::SubmissionPayload;

/// Status and body of an endpoint reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
	/// HTTP status code
	pub status: u16,
	/// Raw response body
	pub body: String,
}

impl TransportResponse {
	/// Creates a response.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
		}
	}

	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Applies the endpoint contract: a 2xx status whose JSON body reports
	/// `status: "ok"`.
	pub fn into_result(self) -> Result<SubmitResponse, SubmitError> {
		if !self.is_success() {
			return Err(SubmitError::Status {
				status: self.status,
			});
		}
		let response = SubmitResponse::parse(&self.body)?;
		if response.is_ok() {
			Ok(response)
		} else {
			Err(SubmitError::rejected(response.reason))
		}
	}
}

/// JSON body returned by the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
	/// `"ok"` on success; anything else, or absence, is a failure
	#[serde(default)]
	pub status: Option<String>,

	/// Human-readable failure detail
	#[serde(default)]
	pub reason: Option<String>,
}

impl SubmitResponse {
	/// Parses a response body.
	pub fn parse(body: &str) -> Result<Self, SubmitError> {
		serde_json::from_str(body).map_err(|e| SubmitError::MalformedResponse(e.to_string()))
	}

	/// Whether the endpoint accepted the submission.
	pub fn is_ok(&self) -> bool {
		self.status.as_deref() == Some("ok")
	}
}

/// Posts submission payloads to the endpoint.
#[async_trait(?Send)]
pub trait SubmitTransport {
	/// Sends `payload` as a JSON body to `url`.
	///
	/// Only failures to obtain a response are errors here; HTTP error statuses
	/// come back as a [`TransportResponse`].
	async fn post_json(
		&self,
		url: &Url,
		payload: &SubmissionPayload,
	) -> Result<TransportResponse, SubmitError>;
}

#[async_trait(?Send)]
impl<T: SubmitTransport + ?Sized> SubmitTransport for std::rc::Rc<T> {
	async fn post_json(
		&self,
		url: &Url,
		payload: &SubmissionPayload,
	) -> Result<TransportResponse, SubmitError> {
		(**self).post_json(url, payload).await
	}
}

/// `reqwest`-backed transport (`fetch` on WASM).
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
	client: reqwest::Client,
	#[cfg(not(target_arch = "wasm32"))]
	timeout: Option<Duration>,
}

impl ReqwestTransport {
	/// Creates a transport with a default client.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a transport around an existing client.
	pub fn with_client(client: reqwest::Client) -> Self {
		Self {
			client,
			#[cfg(not(target_arch = "wasm32"))]
			timeout: None,
		}
	}

	/// Creates a transport from settings.
	///
	/// `request_timeout_secs` is applied on native targets; in the browser the
	/// request runs until `fetch` settles.
	pub fn from_settings(settings: &landing_conf::LandingSettings) -> Self {
		let transport = Self::new();
		#[cfg(not(target_arch = "wasm32"))]
		let transport = Self {
			timeout: settings.request_timeout_secs.map(Duration::from_secs),
			..transport
		};
		#[cfg(target_arch = "wasm32")]
		let _ = settings;
		transport
	}
}

#[async_trait(?Send)]
impl SubmitTransport for ReqwestTransport {
	async fn post_json(
		&self,
		url: &Url,
		payload: &SubmissionPayload,
	) -> Result<TransportResponse, SubmitError> {
		let body = payload
			.to_json_body()
			.map_err(|e| SubmitError::network(format!("failed to encode payload: {}", e)))?;

		#[allow(unused_mut)]
		let mut request = self
			.client
			.post(url.clone())
			.header(CONTENT_TYPE, "application/json")
			.body(body);
		#[cfg(not(target_arch = "wasm32"))]
		if let Some(timeout) = self.timeout {
			request = request.timeout(timeout);
		}

		let response = request
			.send()
			.await
			.map_err(|e| SubmitError::network(e.to_string()))?;
		let status = response.status().as_u16();
		let body = response
			.text()
			.await
			.map_err(|e| SubmitError::network(e.to_string()))?;

		Ok(TransportResponse { status, body })
	}
}
