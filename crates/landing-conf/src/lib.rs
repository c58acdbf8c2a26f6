//! # Landing Settings
//!
//! Settings for the landing page controller.
//!
//! Nothing about a deployment is compiled into the controller: the submission
//! endpoint, the ids of the page elements it binds to and the labels it shows
//! are all carried by [`LandingSettings`].
//!
//! ## Sources
//!
//! Settings are layered in priority order (environment variables > config file > defaults):
//!
//! - **Defaults**: match the stock landing page markup (`contact-form`, `.cta-button`, ...)
//! - **TOML**: [`LandingSettings::from_toml_str`] / [`LandingSettings::from_file`]
//! - **Environment**: `LANDING_*` variables through [`Env`]
//!
//! ## Example
//!
//! ```rust
//! use landing_conf::LandingSettings;
//!
//! let settings = LandingSettings::from_toml_str(
//!     r#"
//!     endpoint = "https://forms.example.com/submit"
//!     form_id = "contact-form"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(settings.endpoint().unwrap().host_str(), Some("forms.example.com"));
//! ```

pub mod env;
pub mod settings;

pub use env::{Env, EnvError};
pub use settings::{ENV_PREFIX, LandingSettings, SettingsError};
