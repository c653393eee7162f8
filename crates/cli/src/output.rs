//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use apkplan_core::error::Error;
use apkplan_core::validation::ValidationError;
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a step message (for multi-step operations)
    pub fn step(step: usize, total: usize, message: &str) {
        println!("{} {}", format!("[{step}/{total}]").dimmed(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Print a coded error with its context and suggestion
pub fn print_error(error: &Error) {
    eprintln!(
        "{} {} {}",
        "✗".red(),
        format!("[{}]", error.code).dimmed(),
        error.message
    );
    if let Some(context) = &error.context {
        eprintln!("  {} {}", "context:".dimmed(), context);
    }
    if let Some(suggestion) = &error.suggestion {
        eprintln!("  {} {}", "hint:".cyan(), suggestion);
    }
}

/// Format one validation finding as `[rule] field: message`
pub fn format_finding(finding: &ValidationError) -> String {
    format!("[{}] {}", finding.code, finding)
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 0.001 {
        format!("{}µs", duration.as_micros())
    } else if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{secs:.1}s")
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_duration_micros() {
        assert_eq!(format_duration(Duration::from_micros(250)), "250µs");
    }

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }

    #[test]
    fn test_format_duration_secs() {
        assert_eq!(format_duration(Duration::from_secs_f32(5.5)), "5.5s");
    }

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "directive", "directives"), "1 directive");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(0, "warning", "warnings"), "0 warnings");
        assert_eq!(format_count(13, "directive", "directives"), "13 directives");
    }

    #[test]
    fn test_format_finding() {
        let finding = ValidationError {
            field: "minSdk".to_string(),
            message: "desugaring requires minSdk>=21".to_string(),
            code: "desugaring-min-sdk".to_string(),
            expected: None,
            actual: None,
        };
        assert_eq!(
            format_finding(&finding),
            "[desugaring-min-sdk] minSdk: desugaring requires minSdk>=21"
        );
    }
}
