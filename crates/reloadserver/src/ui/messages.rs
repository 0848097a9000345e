//! Status message functions for terminal output.

use owo_colors::{OwoColorize, Stream::Stderr};

/// Print a success message to stderr.
///
/// # Examples
///
/// ```no_run
/// use reloadserver::ui::success;
///
/// success("Serving HTTP on :: port 8000");
/// ```
pub fn success(message: &str) {
    eprintln!(
        "{} {}",
        "✓".if_supports_color(Stderr, |t| t.green().bold().to_string()),
        message
    );
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    eprintln!(
        "{} {}",
        "ℹ".if_supports_color(Stderr, |t| t.blue().bold().to_string()),
        message
    );
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    eprintln!(
        "{} {}",
        "⚠".if_supports_color(Stderr, |t| t.yellow().bold().to_string()),
        message.if_supports_color(Stderr, |t| t.yellow())
    );
}
