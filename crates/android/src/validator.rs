//! Cross-field rules for a loaded [`BuildConfig`]
//!
//! Rules run in a fixed order and [`validate`] reports the first failure:
//!
//! 1. [`rules::SDK_ORDER`]: `minSdk <= targetSdk <= compileSdk`
//! 2. [`rules::DESUGARING_MIN_SDK`]: desugaring needs `minSdk >= 21`
//! 3. [`rules::JAVA_COMPATIBILITY`]: source, target and JVM target agree
//! 4. the signing reference resolves in the registry

use crate::build_config::BuildConfig;
use crate::error::{BuildConfigError, Result};
use crate::signing::SigningRegistry;
use apkplan_core::validation::{ValidationError, ValidationResult, Validator};

/// Rule names reported in [`BuildConfigError::InvariantViolation`]
pub mod rules {
    pub const SDK_ORDER: &str = "sdk-order";
    pub const DESUGARING_MIN_SDK: &str = "desugaring-min-sdk";
    pub const JAVA_COMPATIBILITY: &str = "java-compatibility";
    pub const SIGNING_REFERENCE: &str = "signing-reference";
}

/// Lowest API level core library desugaring supports
pub const DESUGARING_MIN_SDK: u32 = 21;

/// API level from which multidex is native (ART)
pub const NATIVE_MULTIDEX_SDK: u32 = 21;

/// Check all rules, stopping at the first violation
pub fn validate<'a>(config: &'a BuildConfig, registry: &SigningRegistry) -> Result<&'a BuildConfig> {
    let invariants = invariant_checks(config);
    if let Some(error) = invariants.first_error() {
        tracing::debug!(rule = %error.code, "Build configuration rejected");
        return Err(BuildConfigError::InvariantViolation {
            rule: error.code.clone(),
            message: error.message.clone(),
        });
    }

    registry.resolve(config.signing_config_ref())?;

    tracing::debug!(application_id = config.application_id(), "Build configuration valid");
    Ok(config)
}

/// Check all rules and collect every violation plus advisory warnings
///
/// Errors keep the same order [`validate`] uses, so the first error here is
/// the one [`validate`] would report.
pub fn check(config: &BuildConfig, registry: &SigningRegistry) -> ValidationResult {
    let mut result = invariant_checks(config);

    if let Err(err) = registry.resolve(config.signing_config_ref()) {
        result.add_error(ValidationError {
            field: "signingConfigRef".to_string(),
            message: err.to_string(),
            code: rules::SIGNING_REFERENCE.to_string(),
            expected: Some(registry.names().join(", ")),
            actual: Some(config.signing_config_ref().to_string()),
        });
    }

    result.merge(advisories(config, registry));
    result
}

fn invariant_checks(config: &BuildConfig) -> ValidationResult {
    Validator::new()
        .ordered(
            rules::SDK_ORDER,
            ("minSdk", config.min_sdk()),
            ("targetSdk", config.target_sdk()),
        )
        .ordered(
            rules::SDK_ORDER,
            ("targetSdk", config.target_sdk()),
            ("compileSdk", config.compile_sdk()),
        )
        .rule("minSdk", rules::DESUGARING_MIN_SDK, || {
            (config.desugaring_enabled() && config.min_sdk() < DESUGARING_MIN_SDK).then(|| {
                format!(
                    "desugaring requires minSdk>={DESUGARING_MIN_SDK} (found {})",
                    config.min_sdk()
                )
            })
        })
        .rule("targetCompatibility", rules::JAVA_COMPATIBILITY, || {
            (config.source_compatibility() != config.target_compatibility()).then(|| {
                format!(
                    "sourceCompatibility ({}) must match targetCompatibility ({})",
                    config.source_compatibility(),
                    config.target_compatibility()
                )
            })
        })
        .rule("jvmTarget", rules::JAVA_COMPATIBILITY, || {
            (config.jvm_target() != config.target_compatibility()).then(|| {
                format!(
                    "jvmTarget ({}) must match targetCompatibility ({})",
                    config.jvm_target(),
                    config.target_compatibility()
                )
            })
        })
        .validate()
}

fn advisories(config: &BuildConfig, registry: &SigningRegistry) -> ValidationResult {
    let release_uses_debug_key = registry
        .resolve(config.signing_config_ref())
        .is_ok_and(|profile| profile.is_debug());

    Validator::new()
        .warn_if(
            "multiDexEnabled",
            config.multi_dex_enabled() && config.min_sdk() >= NATIVE_MULTIDEX_SDK,
            "multidex is native from API 21; multiDexEnabled has no effect",
        )
        .warn_if(
            "signingConfigRef",
            release_uses_debug_key,
            "release variant is signed with the debug key and cannot be published",
        )
        .validate()
}
