//! Logging abstraction layer for landing-pages
//!
//! This module provides logging macros that work across WASM and native targets.
//!
//! ## Macro Overview
//!
//! | Macro | Condition | WASM | Non-WASM |
//! |-------|-----------|------|----------|
//! | `debug_log!` | `debug-hooks` feature + `debug_assertions` | `console.debug` | `tracing::debug!` |
//! | `info_log!` | always | `console.info` | `tracing::info!` |
//! | `warn_log!` | always | `console.warn` | `tracing::warn!` |
//! | `error_log!` | always | `console.error` | `tracing::error!` |
//!
//! On native targets the output goes wherever the installed `tracing`
//! subscriber sends it; with no subscriber the macros are silent.
//!
//! ## Example
//!
//! ```ignore
//! use landing_pages::{error_log, info_log, warn_log};
//!
//! info_log!("Event tracked: {}", event.name);
//! warn_log!("Honeypot tripped on field '{}'", field);
//! error_log!("Submit failed: {}", err);
//! ```

/// Logs a debug message (requires `debug-hooks` feature + `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-hooks", target_arch = "wasm32"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__web_sys::console::debug_1(&format!($($arg)*).into());
	}};
}

/// Logs a debug message (requires `debug-hooks` feature + `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-hooks", not(target_arch = "wasm32")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__tracing::debug!("{}", format!($($arg)*));
	}};
}

/// No-op debug_log when conditions are not met
#[macro_export]
#[cfg(not(all(debug_assertions, feature = "debug-hooks")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__web_sys::console::info_1(&format!($($arg)*).into());
	}};
}

/// Logs an info message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__tracing::info!("{}", format!($($arg)*));
	}};
}

/// Logs a warning message
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__web_sys::console::warn_1(&format!($($arg)*).into());
	}};
}

/// Logs a warning message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__tracing::warn!("{}", format!($($arg)*));
	}};
}

/// Logs an error message
///
/// Failure details such as the endpoint's `reason` go here; they are not
/// shown to the user verbatim.
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__web_sys::console::error_1(&format!($($arg)*).into());
	}};
}

/// Logs an error message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__tracing::error!("{}", format!($($arg)*));
	}};
}
