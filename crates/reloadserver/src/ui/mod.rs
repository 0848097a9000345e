//! Terminal UI utilities for status lines.
//!
//! Human-facing messages (startup banner, hints) go through here so
//! they stay readable regardless of the tracing filter in use. Anything a
//! user might want to grep or silence belongs in `tracing` instead.
//!
//! # Examples
//!
//! ```no_run
//! use reloadserver::ui;
//!
//! ui::init_colors(false);
//! ui::success("Serving HTTP on 0.0.0.0 port 8000");
//! ui::warning("Built-in ignores disabled");
//! ```

mod messages;

pub use messages::{info, success, warning};

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR environment variables, falls back to
/// terminal capability detection.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Initialize color support based on environment.
///
/// Should be called early in `main`. `--no-color` turns colors off for the
/// rest of the process.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && should_use_color();
    owo_colors::set_override(enabled);
}
