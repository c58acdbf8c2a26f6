//! Landing page settings
//!
//! [`LandingSettings`] is the single value injected into the controller at
//! startup. Every field except `endpoint` has a default that matches the stock
//! landing page markup.

use crate::env::{Env, EnvError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

/// Prefix used for environment variable overrides (`LANDING_ENDPOINT`, ...).
pub const ENV_PREFIX: &str = "LANDING_";

/// Settings for the landing page controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingSettings {
	/// Remote submission endpoint. Required; there is no built-in default.
	pub endpoint: Option<Url>,

	/// Request timeout in seconds. `None` waits for the request to settle.
	pub request_timeout_secs: Option<u64>,

	/// Id of the contact form element, also reported as `form_id` on `form_submit`
	pub form_id: String,

	/// Id of the container wrapping the form
	pub form_section_id: String,

	/// Id of the confirmation container revealed after a successful submission
	pub thanks_section_id: String,

	/// Id of the tracked download link
	pub download_link_id: String,

	/// Class marking call-to-action elements
	pub cta_class: String,

	/// Class toggled to hide/reveal the form and confirmation sections
	pub hidden_class: String,

	/// Name of the honeypot field; a non-blank value marks the submission as automated
	pub honeypot_field: String,

	/// Submit control label while a request is in flight
	pub submitting_label: String,

	/// Value reported as `file_name` on `file_download`
	pub download_file_name: String,

	/// Notification shown when the honeypot gate rejects a submission
	pub honeypot_message: String,

	/// Notification shown when the submission fails
	pub failure_message: String,
}

impl Default for LandingSettings {
	fn default() -> Self {
		Self {
			endpoint: None,
			request_timeout_secs: None,
			form_id: "contact-form".to_string(),
			form_section_id: "form-section".to_string(),
			thanks_section_id: "thanks-section".to_string(),
			download_link_id: "download-link".to_string(),
			cta_class: "cta-button".to_string(),
			hidden_class: "hidden".to_string(),
			honeypot_field: "company".to_string(),
			submitting_label: "送信中...".to_string(),
			download_file_name: "sample.pdf".to_string(),
			honeypot_message: "エラーが発生しました。お手数ですが、後ほど再度お試しください。"
				.to_string(),
			failure_message: "送信に失敗しました。お手数ですが時間をおいて再度お試しください。"
				.to_string(),
		}
	}
}

impl LandingSettings {
	/// Creates settings with the default markup ids and the given endpoint.
	pub fn new(endpoint: Url) -> Self {
		Self {
			endpoint: Some(endpoint),
			..Self::default()
		}
	}

	/// Parses settings from a TOML document. Missing keys keep their defaults.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		Ok(settings)
	}

	/// Reads settings from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let source = fs::read_to_string(path)?;
		Self::from_toml_str(&source)
	}

	/// Defaults overridden by `LANDING_*` environment variables.
	pub fn from_env() -> Result<Self, SettingsError> {
		let mut settings = Self::default();
		settings.apply_env(&Env::new().with_prefix(ENV_PREFIX))?;
		Ok(settings)
	}

	/// Full layered load: `.env` file, optional TOML file, then environment
	/// overrides. The result is validated.
	pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
		// A missing .env is not an error
		dotenv::dotenv().ok();

		let mut settings = match config_file {
			Some(path) => Self::from_file(path)?,
			None => Self::default(),
		};
		settings.apply_env(&Env::new().with_prefix(ENV_PREFIX))?;
		settings.validate()?;
		Ok(settings)
	}

	/// Overrides fields from environment variables read through `env`.
	///
	/// Keys are the upper-cased field names (`ENDPOINT`, `FORM_ID`, ...).
	pub fn apply_env(&mut self, env: &Env) -> Result<(), SettingsError> {
		if let Some(raw) = env.var("ENDPOINT")? {
			self.endpoint = Some(parse_endpoint("endpoint", &raw)?);
		}
		if let Some(secs) = env.u64("REQUEST_TIMEOUT_SECS")? {
			self.request_timeout_secs = Some(secs);
		}

		let string_fields: [(&str, &mut String); 11] = [
			("FORM_ID", &mut self.form_id),
			("FORM_SECTION_ID", &mut self.form_section_id),
			("THANKS_SECTION_ID", &mut self.thanks_section_id),
			("DOWNLOAD_LINK_ID", &mut self.download_link_id),
			("CTA_CLASS", &mut self.cta_class),
			("HIDDEN_CLASS", &mut self.hidden_class),
			("HONEYPOT_FIELD", &mut self.honeypot_field),
			("SUBMITTING_LABEL", &mut self.submitting_label),
			("DOWNLOAD_FILE_NAME", &mut self.download_file_name),
			("HONEYPOT_MESSAGE", &mut self.honeypot_message),
			("FAILURE_MESSAGE", &mut self.failure_message),
		];
		for (key, slot) in string_fields {
			if let Some(value) = env.var(key)? {
				*slot = value;
			}
		}
		Ok(())
	}

	/// Sets the submission endpoint.
	pub fn with_endpoint(mut self, endpoint: Url) -> Self {
		self.endpoint = Some(endpoint);
		self
	}

	/// Sets the request timeout.
	pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
		self.request_timeout_secs = Some(secs);
		self
	}

	/// Sets the contact form id.
	pub fn with_form_id(mut self, form_id: impl Into<String>) -> Self {
		self.form_id = form_id.into();
		self
	}

	/// Sets the honeypot field name.
	pub fn with_honeypot_field(mut self, field: impl Into<String>) -> Self {
		self.honeypot_field = field.into();
		self
	}

	/// Sets the call-to-action class.
	pub fn with_cta_class(mut self, class: impl Into<String>) -> Self {
		self.cta_class = class.into();
		self
	}

	/// Sets the tracked download's file name.
	pub fn with_download_file_name(mut self, name: impl Into<String>) -> Self {
		self.download_file_name = name.into();
		self
	}

	/// Returns the endpoint, or an error when none was configured.
	pub fn endpoint(&self) -> Result<&Url, SettingsError> {
		self.endpoint
			.as_ref()
			.ok_or_else(|| SettingsError::MissingValue("endpoint".to_string()))
	}

	/// Checks that the settings can drive a controller.
	pub fn validate(&self) -> Result<(), SettingsError> {
		let endpoint = self.endpoint()?;
		check_scheme("endpoint", endpoint)?;

		let required = [
			("form_id", &self.form_id),
			("form_section_id", &self.form_section_id),
			("thanks_section_id", &self.thanks_section_id),
			("download_link_id", &self.download_link_id),
			("cta_class", &self.cta_class),
			("hidden_class", &self.hidden_class),
			("honeypot_field", &self.honeypot_field),
			("submitting_label", &self.submitting_label),
			("download_file_name", &self.download_file_name),
		];
		for (key, value) in required {
			if value.trim().is_empty() {
				return Err(SettingsError::InvalidValue {
					key: key.to_string(),
					reason: "must not be empty".to_string(),
				});
			}
		}

		if self.request_timeout_secs == Some(0) {
			return Err(SettingsError::InvalidValue {
				key: "request_timeout_secs".to_string(),
				reason: "must be greater than zero".to_string(),
			});
		}

		Ok(())
	}
}

fn parse_endpoint(key: &str, raw: &str) -> Result<Url, SettingsError> {
	let url = Url::parse(raw.trim()).map_err(|e| SettingsError::InvalidUrl {
		key: key.to_string(),
		error: e.to_string(),
	})?;
	check_scheme(key, &url)?;
	Ok(url)
}

fn check_scheme(key: &str, url: &Url) -> Result<(), SettingsError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		other => Err(SettingsError::InvalidUrl {
			key: key.to_string(),
			error: format!("unsupported scheme '{}'", other),
		}),
	}
}

/// Errors raised while loading or validating settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Environment error: {0}")]
	Env(#[from] EnvError),

	#[error("Invalid URL for '{key}': {error}")]
	InvalidUrl { key: String, error: String },

	#[error("Missing required setting: {0}")]
	MissingValue(String),

	#[error("Invalid setting '{key}': {reason}")]
	InvalidValue { key: String, reason: String },
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;
	use std::io::Write;

	fn endpoint() -> Url {
		Url::parse("https://forms.example.com/submit").unwrap()
	}

	#[rstest]
	fn test_defaults_match_stock_markup() {
		let settings = LandingSettings::default();
		assert_eq!(settings.form_id, "contact-form");
		assert_eq!(settings.form_section_id, "form-section");
		assert_eq!(settings.thanks_section_id, "thanks-section");
		assert_eq!(settings.download_link_id, "download-link");
		assert_eq!(settings.cta_class, "cta-button");
		assert_eq!(settings.honeypot_field, "company");
		assert_eq!(settings.download_file_name, "sample.pdf");
		assert_eq!(settings.submitting_label, "送信中...");
		assert!(settings.endpoint.is_none());
	}

	#[rstest]
	fn test_validate_requires_endpoint() {
		let err = LandingSettings::default().validate().unwrap_err();
		assert!(matches!(err, SettingsError::MissingValue(ref key) if key == "endpoint"));
	}

	#[rstest]
	fn test_validate_accepts_new() {
		assert!(LandingSettings::new(endpoint()).validate().is_ok());
	}

	#[rstest]
	fn test_validate_rejects_non_http_scheme() {
		let settings = LandingSettings::new(Url::parse("ftp://files.example.com/").unwrap());
		assert!(matches!(
			settings.validate(),
			Err(SettingsError::InvalidUrl { .. })
		));
	}

	#[rstest]
	#[case::blank_form_id(LandingSettings::new(endpoint()).with_form_id("  "), "form_id")]
	#[case::blank_honeypot(LandingSettings::new(endpoint()).with_honeypot_field(""), "honeypot_field")]
	#[case::blank_cta(LandingSettings::new(endpoint()).with_cta_class(""), "cta_class")]
	fn test_validate_rejects_blank(#[case] settings: LandingSettings, #[case] expected_key: &str) {
		match settings.validate() {
			Err(SettingsError::InvalidValue { key, .. }) => assert_eq!(key, expected_key),
			other => panic!("expected InvalidValue, got {:?}", other),
		}
	}

	#[rstest]
	fn test_validate_rejects_zero_timeout() {
		let settings = LandingSettings::new(endpoint()).with_request_timeout_secs(0);
		assert!(matches!(
			settings.validate(),
			Err(SettingsError::InvalidValue { ref key, .. }) if key == "request_timeout_secs"
		));
	}

	#[rstest]
	fn test_from_toml_str_keeps_defaults_for_missing_keys() {
		let settings = LandingSettings::from_toml_str(
			r#"
			endpoint = "https://forms.example.com/submit"
			honeypot_field = "website"
			request_timeout_secs = 10
			"#,
		)
		.unwrap();

		assert_eq!(settings.endpoint, Some(endpoint()));
		assert_eq!(settings.honeypot_field, "website");
		assert_eq!(settings.request_timeout_secs, Some(10));
		assert_eq!(settings.form_id, "contact-form");
	}

	#[rstest]
	fn test_from_toml_str_rejects_bad_url() {
		let err = LandingSettings::from_toml_str(r#"endpoint = "not a url""#).unwrap_err();
		assert!(matches!(err, SettingsError::Toml(_)));
	}

	#[rstest]
	fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, r#"endpoint = "https://forms.example.com/submit""#).unwrap();
		writeln!(file, r#"download_file_name = "whitepaper.pdf""#).unwrap();

		let settings = LandingSettings::from_file(file.path()).unwrap();
		assert_eq!(settings.download_file_name, "whitepaper.pdf");
		assert!(settings.validate().is_ok());
	}

	#[rstest]
	fn test_from_file_missing() {
		let err = LandingSettings::from_file("/nonexistent/landing.toml").unwrap_err();
		assert!(matches!(err, SettingsError::Io(_)));
	}

	#[rstest]
	#[serial(landing_env)]
	fn test_apply_env_overrides() {
		// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			std::env::set_var("LANDING_ENDPOINT", "https://staging.example.com/submit");
			std::env::set_var("LANDING_FORM_ID", "signup-form");
			std::env::set_var("LANDING_REQUEST_TIMEOUT_SECS", "20");
		}

		let settings = LandingSettings::from_env().unwrap();
		assert_eq!(
			settings.endpoint().unwrap().as_str(),
			"https://staging.example.com/submit"
		);
		assert_eq!(settings.form_id, "signup-form");
		assert_eq!(settings.request_timeout_secs, Some(20));
		assert_eq!(settings.cta_class, "cta-button");

		// SAFETY: Removing environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			std::env::remove_var("LANDING_ENDPOINT");
			std::env::remove_var("LANDING_FORM_ID");
			std::env::remove_var("LANDING_REQUEST_TIMEOUT_SECS");
		}
	}

	#[rstest]
	#[serial(landing_env)]
	fn test_apply_env_rejects_bad_endpoint() {
		// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			std::env::set_var("LANDING_ENDPOINT", "mailto:someone@example.com");
		}

		let result = LandingSettings::from_env();

		// SAFETY: Removing environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			std::env::remove_var("LANDING_ENDPOINT");
		}
		assert!(matches!(result, Err(SettingsError::InvalidUrl { .. })));
	}

	#[rstest]
	#[serial(landing_env)]
	fn test_load_env_overrides_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, r#"endpoint = "https://forms.example.com/submit""#).unwrap();
		writeln!(file, r#"form_id = "signup-form""#).unwrap();

		// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			std::env::set_var("LANDING_ENDPOINT", "https://staging.example.com/submit");
		}

		let result = LandingSettings::load(Some(file.path()));

		// SAFETY: Removing environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			std::env::remove_var("LANDING_ENDPOINT");
		}

		let settings = result.unwrap();
		assert_eq!(
			settings.endpoint().unwrap().as_str(),
			"https://staging.example.com/submit"
		);
		// Keys the environment leaves alone keep the file's value
		assert_eq!(settings.form_id, "signup-form");
		assert_eq!(settings.cta_class, "cta-button");
	}

	#[rstest]
	#[serial(landing_env)]
	fn test_load_without_endpoint_fails_validation() {
		// SAFETY: Removing environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			std::env::remove_var("LANDING_ENDPOINT");
		}

		let err = LandingSettings::load(None).unwrap_err();

		assert!(matches!(err, SettingsError::MissingValue(ref key) if key == "endpoint"));
	}

	#[rstest]
	#[serial(landing_env)]
	fn test_load_missing_file() {
		let err = LandingSettings::load(Some(Path::new("/nonexistent/landing.toml"))).unwrap_err();
		assert!(matches!(err, SettingsError::Io(_)));
	}
}
