//! Android build configuration for Flutter app shells
//!
//! This crate turns declarative build input into a build plan:
//! - Schema of recognized keys and their types
//! - Strict loader from flat key/value input
//! - Cross-field validation in a fixed order
//! - Signing profile registry
//! - Plan emission and Gradle Kotlin DSL rendering
//!
//! ```rust
//! use apkplan_android::{plan, RawEntries, SigningRegistry};
//! use apkplan_core::config::DefaultsConfig;
//!
//! let mut entries = RawEntries::new();
//! entries.insert("applicationId".into(), "com.example.app".into());
//! entries.insert("desugaringEnabled".into(), "true".into());
//!
//! let plan = plan(&entries, &DefaultsConfig::default(), &SigningRegistry::default()).unwrap();
//! assert!(plan.desugaring_artifact().is_some());
//! ```

pub mod build_config;
pub mod emitter;
pub mod error;
pub mod gradle;
pub mod loader;
pub mod schema;
pub mod signing;
pub mod source;
pub mod validator;

pub use build_config::{BuildConfig, JavaVersion};
pub use emitter::{emit, BuildPlan, Directive};
pub use error::{BuildConfigError, Result};
pub use loader::{apply_override, load, RawEntries};
pub use signing::{SigningProfile, SigningRegistry};
pub use validator::{check, validate};

use apkplan_core::config::DefaultsConfig;

/// Load, validate and emit in one pass
///
/// Fails with the first error of whichever stage stops the pipeline.
pub fn plan(
    entries: &RawEntries,
    defaults: &DefaultsConfig,
    registry: &SigningRegistry,
) -> Result<BuildPlan> {
    let config = load(entries, defaults)?;
    validate(&config, registry)?;
    emit(&config, registry)
}

