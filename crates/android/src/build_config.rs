//! The validated-once, read-only build description

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Java language level accepted by the Android Gradle plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum JavaVersion {
    #[serde(rename = "1.8")]
    V1_8,
    #[serde(rename = "11")]
    V11,
    #[serde(rename = "17")]
    V17,
    #[serde(rename = "21")]
    V21,
}

impl JavaVersion {
    /// Values accepted by [`FromStr`], for error messages
    pub const EXPECTED: &'static str = "one of 1.8, 11, 17, 21";

    /// Name of the `JavaVersion` constant in the Gradle DSL
    pub fn gradle_constant(self) -> &'static str {
        match self {
            Self::V1_8 => "VERSION_1_8",
            Self::V11 => "VERSION_11",
            Self::V17 => "VERSION_17",
            Self::V21 => "VERSION_21",
        }
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = match self {
            Self::V1_8 => "1.8",
            Self::V11 => "11",
            Self::V17 => "17",
            Self::V21 => "21",
        };
        f.write_str(version)
    }
}

impl FromStr for JavaVersion {
    type Err = ();

    /// Accepts `17`, `1.8`, `8`, `VERSION_17`, `JavaVersion.VERSION_17` and
    /// `JavaVersion.VERSION_17.toString()`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_suffix(".toString()").unwrap_or(s);
        let s = s.strip_prefix("JavaVersion.").unwrap_or(s);
        let s = s.strip_prefix("VERSION_").unwrap_or(s);
        match s.replace('_', ".").as_str() {
            "1.8" | "8" => Ok(Self::V1_8),
            "11" => Ok(Self::V11),
            "17" => Ok(Self::V17),
            "21" => Ok(Self::V21),
            _ => Err(()),
        }
    }
}

/// Android build configuration for a Flutter app module
///
/// Built by [`crate::loader::load`]; fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    pub(crate) application_id: String,
    pub(crate) namespace: String,
    pub(crate) compile_sdk: u32,
    pub(crate) target_sdk: u32,
    pub(crate) min_sdk: u32,
    pub(crate) ndk_version: Option<String>,
    pub(crate) version_code: u32,
    pub(crate) version_name: String,
    pub(crate) desugaring_enabled: bool,
    pub(crate) desugar_library_version: String,
    pub(crate) multi_dex_enabled: bool,
    pub(crate) signing_config_ref: String,
    pub(crate) source_compatibility: JavaVersion,
    pub(crate) target_compatibility: JavaVersion,
    pub(crate) jvm_target: JavaVersion,
    pub(crate) flutter_source: String,
}

impl BuildConfig {
    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn compile_sdk(&self) -> u32 {
        self.compile_sdk
    }

    pub fn target_sdk(&self) -> u32 {
        self.target_sdk
    }

    pub fn min_sdk(&self) -> u32 {
        self.min_sdk
    }

    pub fn ndk_version(&self) -> Option<&str> {
        self.ndk_version.as_deref()
    }

    pub fn version_code(&self) -> u32 {
        self.version_code
    }

    pub fn version_name(&self) -> &str {
        &self.version_name
    }

    pub fn desugaring_enabled(&self) -> bool {
        self.desugaring_enabled
    }

    pub fn desugar_library_version(&self) -> &str {
        &self.desugar_library_version
    }

    pub fn multi_dex_enabled(&self) -> bool {
        self.multi_dex_enabled
    }

    pub fn signing_config_ref(&self) -> &str {
        &self.signing_config_ref
    }

    pub fn source_compatibility(&self) -> JavaVersion {
        self.source_compatibility
    }

    pub fn target_compatibility(&self) -> JavaVersion {
        self.target_compatibility
    }

    pub fn jvm_target(&self) -> JavaVersion {
        self.jvm_target
    }

    /// The single Java level, if source, target and JVM target agree
    pub fn java_language_version(&self) -> Option<JavaVersion> {
        (self.source_compatibility == self.target_compatibility
            && self.target_compatibility == self.jvm_target)
            .then_some(self.target_compatibility)
    }

    pub fn flutter_source(&self) -> &str {
        &self.flutter_source
    }
}
