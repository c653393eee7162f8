//! Configuration schema definitions
//!
//! Tool-level settings read from `.apkplan.toml`. These are not build
//! inputs themselves: they supply the values a Flutter project inherits
//! from the Flutter Gradle plugin (`flutter.compileSdkVersion` and friends)
//! and the signing profiles build inputs may reference.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigSchema {
    /// Logging and output settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Values for build keys the input leaves unset
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Extra signing profiles on top of `debug` and `release`
    #[serde(default)]
    pub signing: SigningConfig,
}

/// General tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Defaults applied to build keys missing from the input
///
/// Mirrors the values the Flutter Gradle plugin exposes as `flutter.*`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// `compileSdk` when unset
    #[serde(default = "default_compile_sdk")]
    pub compile_sdk: u32,

    /// `targetSdk` when unset
    #[serde(default = "default_target_sdk")]
    pub target_sdk: u32,

    /// `minSdk` when unset
    #[serde(default = "default_min_sdk")]
    pub min_sdk: u32,

    /// Java language level for source, target and JVM target
    #[serde(default = "default_java_version")]
    pub java_version: String,

    /// Version of `com.android.tools:desugar_jdk_libs`
    #[serde(default = "default_desugar_library_version")]
    pub desugar_library_version: String,

    /// `versionCode` when unset
    #[serde(default = "default_version_code")]
    pub version_code: u32,

    /// `versionName` when unset
    #[serde(default = "default_version_name")]
    pub version_name: String,

    /// NDK version when unset; omitted from the plan if `None`
    #[serde(default)]
    pub ndk_version: Option<String>,

    /// Path from the app module to the Flutter project root
    #[serde(default = "default_flutter_source")]
    pub flutter_source: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            compile_sdk: default_compile_sdk(),
            target_sdk: default_target_sdk(),
            min_sdk: default_min_sdk(),
            java_version: default_java_version(),
            desugar_library_version: default_desugar_library_version(),
            version_code: default_version_code(),
            version_name: default_version_name(),
            ndk_version: None,
            flutter_source: default_flutter_source(),
        }
    }
}

fn default_compile_sdk() -> u32 {
    35
}

fn default_target_sdk() -> u32 {
    35
}

fn default_min_sdk() -> u32 {
    21
}

fn default_java_version() -> String {
    "17".to_string()
}

fn default_desugar_library_version() -> String {
    "2.1.4".to_string()
}

fn default_version_code() -> u32 {
    1
}

fn default_version_name() -> String {
    "1.0.0".to_string()
}

fn default_flutter_source() -> String {
    "../..".to_string()
}

/// Signing profile configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SigningConfig {
    /// Named profiles, keyed by the name build inputs reference
    #[serde(default)]
    pub profiles: BTreeMap<String, SigningProfileConfig>,
}

/// One named signing profile
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SigningProfileConfig {
    /// Keystore path, relative to the Android project
    #[serde(default)]
    pub store_file: Option<String>,

    /// Key alias inside the keystore
    #[serde(default)]
    pub key_alias: Option<String>,
}
