//! # Landing
//!
//! Interaction controller for a marketing landing page.
//!
//! The page carries a contact form, a set of call-to-action buttons and a
//! download link. This crate wires them up:
//!
//! - the contact form is submitted as JSON to a remote endpoint, behind a
//!   honeypot gate that turns away naive form-filling bots
//! - a successful submission swaps the form for a confirmation section
//! - CTA clicks, downloads and submissions are pushed to an analytics sink
//!
//! ## Feature Flags
//!
//! - `conf` - Settings loading ([`conf`])
//! - `pages` - The controller and its browser bindings ([`pages`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use landing::conf::LandingSettings;
//!
//! // In the WASM entry point of the landing page
//! let settings = LandingSettings::from_toml_str(include_str!("../landing.toml"))?;
//! landing::pages::browser::mount(settings)?;
//! ```

#[cfg(feature = "conf")]
pub use landing_conf as conf;

#[cfg(feature = "pages")]
pub use landing_pages as pages;
