//! Telemetry for apkplan
//!
//! - Structured logging with tracing
//! - Session correlation ids
//! - Stage timing for the load, validate and emit pipeline

use once_cell::sync::Lazy;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize logging
///
/// `RUST_LOG` takes precedence over `config.log_level`.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(config.show_target)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(config.show_target)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Map a `-v` count onto a log filter
///
/// `quiet` wins over any verbosity.
pub fn level_for_verbosity(base: &str, verbose: u8, quiet: bool) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose {
        0 => base.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub json: bool,
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json: false,
            show_target: false,
        }
    }
}

/// Timer for measuring a pipeline stage
pub struct Timer {
    name: &'static str,
    start: Instant,
    stopped: bool,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
            stopped: false,
        }
    }

    /// Stop the timer and log the duration
    pub fn stop(mut self) -> Duration {
        self.stopped = true;
        let duration = self.start.elapsed();
        tracing::debug!(
            stage = self.name,
            duration_us = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
            "Stage completed"
        );
        duration
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if !self.stopped {
            tracing::debug!(
                stage = self.name,
                elapsed_us = u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX),
                "Stage abandoned"
            );
        }
    }
}

/// Enter a span and time it until the end of the enclosing scope
#[macro_export]
macro_rules! timed_span {
    ($name:expr) => {
        let _timer = $crate::Timer::start($name);
        let _span = tracing::info_span!($name).entered();
    };
    ($name:expr, $($field:tt)*) => {
        let _timer = $crate::Timer::start($name);
        let _span = tracing::info_span!($name, $($field)*).entered();
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let timer = Timer::start("test_operation");
        std::thread::sleep(Duration::from_millis(10));
        let duration = timer.stop();
        assert!(duration.as_millis() >= 10);
    }

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity("warn", 0, false), "warn");
        assert_eq!(level_for_verbosity("warn", 1, false), "info");
        assert_eq!(level_for_verbosity("warn", 2, false), "debug");
        assert_eq!(level_for_verbosity("warn", 5, false), "trace");
        assert_eq!(level_for_verbosity("debug", 3, true), "error");
    }

    #[test]
    fn test_session_id() {
        let id = session_id();
        assert!(!id.is_empty());
        // Should be a valid UUID
        assert!(Uuid::parse_str(id).is_ok());
        assert_eq!(id, session_id());
    }
}
