//! Flat key/value input to [`BuildConfig`]
//!
//! The loader is strict: unknown keys, malformed values and two spellings of
//! the same field are all errors. Keys are visited in sorted order, so the
//! same input always reports the same error.

use crate::build_config::{BuildConfig, JavaVersion};
use crate::error::{BuildConfigError, Result};
use crate::schema::{self, Field};
use crate::signing::DEFAULT_SIGNING_PROFILE;
use apkplan_core::config::DefaultsConfig;
use apkplan_core::validation::{ValidationResult, Validator};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Raw input: key to string value, as read from the build-tool boundary
pub type RawEntries = BTreeMap<String, String>;

/// Highest `versionCode` Google Play accepts
pub const MAX_VERSION_CODE: u32 = 2_100_000_000;

static PACKAGE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$").unwrap());

static DOTTED_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)*$").unwrap());

static PROFILE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").unwrap());

const PACKAGE_NAME_FORMAT: &str = "reverse-domain name (e.g. com.example.app)";
const VERSION_FORMAT: &str = "dotted version number (e.g. 2.1.4)";
const PROFILE_NAME_FORMAT: &str = "profile name (letters, digits, '_' or '-')";

/// Fields as they are read, before defaults
#[derive(Default)]
struct Draft {
    application_id: Option<String>,
    namespace: Option<String>,
    compile_sdk: Option<u32>,
    target_sdk: Option<u32>,
    min_sdk: Option<u32>,
    ndk_version: Option<String>,
    version_code: Option<u32>,
    version_name: Option<String>,
    desugaring_enabled: Option<bool>,
    desugar_library_version: Option<String>,
    multi_dex_enabled: Option<bool>,
    signing_config_ref: Option<String>,
    java_language_version: Option<JavaVersion>,
    source_compatibility: Option<JavaVersion>,
    target_compatibility: Option<JavaVersion>,
    jvm_target: Option<JavaVersion>,
    flutter_source: Option<String>,
}

/// Build a [`BuildConfig`] from raw entries, filling gaps from `defaults`
///
/// Only field-level checks happen here; cross-field rules belong to
/// [`crate::validator`].
pub fn load(entries: &RawEntries, defaults: &DefaultsConfig) -> Result<BuildConfig> {
    tracing::debug!(keys = entries.len(), "Loading build configuration");

    let mut seen: BTreeMap<Field, &str> = BTreeMap::new();
    let mut resolved = Vec::with_capacity(entries.len());

    // Every key is resolved before any value is parsed
    for (key, value) in entries {
        let spec = schema::resolve(key)?;
        if let Some(previous) = seen.insert(spec.field, key) {
            return Err(BuildConfigError::DuplicateField {
                key: key.clone(),
                previous: previous.to_string(),
            });
        }
        resolved.push((spec.field, key.as_str(), value.as_str()));
    }

    if let Some(shorthand) = seen.get(&Field::JavaLanguageVersion) {
        for field in [Field::SourceCompatibility, Field::TargetCompatibility] {
            if let Some(key) = seen.get(&field) {
                return Err(BuildConfigError::DuplicateField {
                    key: (*key).to_string(),
                    previous: (*shorthand).to_string(),
                });
            }
        }
    }

    let mut draft = Draft::default();
    for (field, key, value) in resolved {
        read_field(&mut draft, field, key, value)?;
    }

    let config = finish(draft, defaults)?;
    tracing::debug!(
        application_id = %config.application_id,
        min_sdk = config.min_sdk,
        target_sdk = config.target_sdk,
        compile_sdk = config.compile_sdk,
        "Build configuration loaded"
    );
    Ok(config)
}

/// Set `key` to `value`, replacing every entry that names the same field
///
/// Overriding `javaLanguageVersion` also replaces explicit source and target
/// levels. Overriding one explicit level replaces the shorthand, which keeps
/// supplying the other level.
pub fn apply_override(entries: &mut RawEntries, key: &str, value: &str) {
    if let Some(spec) = schema::lookup(key) {
        remove_field(entries, spec.field);
        match spec.field {
            Field::JavaLanguageVersion => {
                remove_field(entries, Field::SourceCompatibility);
                remove_field(entries, Field::TargetCompatibility);
            }
            Field::SourceCompatibility | Field::TargetCompatibility => {
                if let Some(shorthand) = remove_field(entries, Field::JavaLanguageVersion) {
                    let other = if spec.field == Field::SourceCompatibility {
                        Field::TargetCompatibility
                    } else {
                        Field::SourceCompatibility
                    };
                    entries
                        .entry(schema::spec_of(other).key.to_string())
                        .or_insert(shorthand);
                }
            }
            _ => {}
        }
    }
    tracing::debug!(key, "Applying override");
    entries.insert(key.to_string(), value.to_string());
}

/// Remove every spelling of `field`, returning the last value removed
fn remove_field(entries: &mut RawEntries, field: Field) -> Option<String> {
    let keys: Vec<String> = entries
        .keys()
        .filter(|key| schema::lookup(key).is_some_and(|spec| spec.field == field))
        .cloned()
        .collect();
    keys.into_iter().filter_map(|key| entries.remove(&key)).last()
}

fn read_field(draft: &mut Draft, field: Field, key: &str, value: &str) -> Result<()> {
    match field {
        Field::ApplicationId => {
            draft.application_id = Some(parse_text(key, value, Some(package_format()))?);
        }
        Field::Namespace => {
            draft.namespace = Some(parse_text(key, value, Some(package_format()))?);
        }
        Field::CompileSdk => draft.compile_sdk = Some(parse_positive(key, value)?),
        Field::TargetSdk => draft.target_sdk = Some(parse_positive(key, value)?),
        Field::MinSdk => draft.min_sdk = Some(parse_positive(key, value)?),
        Field::NdkVersion => {
            draft.ndk_version = Some(parse_text(key, value, Some(version_format()))?);
        }
        Field::VersionCode => draft.version_code = Some(parse_version_code(key, value)?),
        Field::VersionName => draft.version_name = Some(parse_text(key, value, None)?),
        Field::DesugaringEnabled => draft.desugaring_enabled = Some(parse_bool(key, value)?),
        Field::DesugarLibraryVersion => {
            draft.desugar_library_version = Some(parse_text(key, value, Some(version_format()))?);
        }
        Field::MultiDexEnabled => draft.multi_dex_enabled = Some(parse_bool(key, value)?),
        Field::SigningConfigRef => {
            draft.signing_config_ref =
                Some(parse_text(key, value, Some((&*PROFILE_NAME, PROFILE_NAME_FORMAT)))?);
        }
        Field::JavaLanguageVersion => draft.java_language_version = Some(parse_java(key, value)?),
        Field::SourceCompatibility => draft.source_compatibility = Some(parse_java(key, value)?),
        Field::TargetCompatibility => draft.target_compatibility = Some(parse_java(key, value)?),
        Field::JvmTarget => draft.jvm_target = Some(parse_java(key, value)?),
        Field::FlutterSource => draft.flutter_source = Some(parse_text(key, value, None)?),
    }
    Ok(())
}

fn finish(draft: Draft, defaults: &DefaultsConfig) -> Result<BuildConfig> {
    let application_id = draft
        .application_id
        .ok_or_else(|| BuildConfigError::MissingField {
            key: schema::spec_of(Field::ApplicationId).key.to_string(),
        })?;

    let default_java = parse_java("defaults.java_version", &defaults.java_version)?;
    let source_compatibility = draft
        .source_compatibility
        .or(draft.java_language_version)
        .unwrap_or(default_java);
    let target_compatibility = draft
        .target_compatibility
        .or(draft.java_language_version)
        .unwrap_or(default_java);

    let desugar_library_version = match draft.desugar_library_version {
        Some(version) => version,
        None => parse_text(
            "defaults.desugar_library_version",
            &defaults.desugar_library_version,
            Some(version_format()),
        )?,
    };

    let ndk_version = match draft.ndk_version {
        Some(version) => Some(version),
        None => defaults
            .ndk_version
            .as_deref()
            .map(|v| parse_text("defaults.ndk_version", v, Some(version_format())))
            .transpose()?,
    };

    Ok(BuildConfig {
        namespace: draft.namespace.unwrap_or_else(|| application_id.clone()),
        application_id,
        compile_sdk: default_positive(draft.compile_sdk, "defaults.compile_sdk", defaults.compile_sdk)?,
        target_sdk: default_positive(draft.target_sdk, "defaults.target_sdk", defaults.target_sdk)?,
        min_sdk: default_positive(draft.min_sdk, "defaults.min_sdk", defaults.min_sdk)?,
        ndk_version,
        version_code: match draft.version_code {
            Some(code) => code,
            None => parse_version_code("defaults.version_code", &defaults.version_code.to_string())?,
        },
        version_name: match draft.version_name {
            Some(name) => name,
            None => parse_text("defaults.version_name", &defaults.version_name, None)?,
        },
        desugaring_enabled: draft.desugaring_enabled.unwrap_or(false),
        desugar_library_version,
        multi_dex_enabled: draft.multi_dex_enabled.unwrap_or(false),
        signing_config_ref: draft
            .signing_config_ref
            .unwrap_or_else(|| DEFAULT_SIGNING_PROFILE.to_string()),
        source_compatibility,
        target_compatibility,
        jvm_target: draft.jvm_target.unwrap_or(target_compatibility),
        flutter_source: match draft.flutter_source {
            Some(source) => source,
            None => parse_text("defaults.flutter_source", &defaults.flutter_source, None)?,
        },
    })
}

fn package_format() -> (&'static Regex, &'static str) {
    (&*PACKAGE_NAME, PACKAGE_NAME_FORMAT)
}

fn version_format() -> (&'static Regex, &'static str) {
    (&*DOTTED_VERSION, VERSION_FORMAT)
}

/// Trimmed, non-empty text, optionally matching a format
fn parse_text(key: &str, value: &str, format: Option<(&Regex, &str)>) -> Result<String> {
    let value = value.trim();
    let mut validator = Validator::new().required(key, value);
    if let Some((pattern, description)) = format {
        if !value.is_empty() {
            validator = validator.pattern(key, value, pattern, description);
        }
    }
    first_as_parse_error(&validator.validate(), value)?;
    Ok(value.to_string())
}

/// Decimal digits only, no sign, greater than zero
fn parse_positive(key: &str, value: &str) -> Result<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BuildConfigError::parse(key, "positive integer", value));
    }
    match trimmed.parse::<u32>() {
        Ok(0) | Err(_) => Err(BuildConfigError::parse(key, "positive integer", value)),
        Ok(n) => Ok(n),
    }
}

fn parse_version_code(key: &str, value: &str) -> Result<u32> {
    let code = parse_positive(key, value)?;
    let result = Validator::new()
        .range(key, code, 1, MAX_VERSION_CODE)
        .validate();
    first_as_parse_error(&result, value)?;
    Ok(code)
}

fn default_positive(read: Option<u32>, key: &str, default: u32) -> Result<u32> {
    match read {
        Some(n) => Ok(n),
        None => parse_positive(key, &default.to_string()),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(BuildConfigError::parse(key, "boolean (true or false)", value))
    }
}

fn parse_java(key: &str, value: &str) -> Result<JavaVersion> {
    value
        .parse()
        .map_err(|()| BuildConfigError::parse(key, JavaVersion::EXPECTED, value))
}

fn first_as_parse_error(result: &ValidationResult, found: &str) -> Result<()> {
    match result.first_error() {
        Some(error) => Err(BuildConfigError::Parse {
            key: error.field.clone(),
            expected: error.expected.clone().unwrap_or_else(|| error.message.clone()),
            found: found.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> RawEntries {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn load_pairs(pairs: &[(&str, &str)]) -> Result<BuildConfig> {
        load(&entries(pairs), &DefaultsConfig::default())
    }

    #[test]
    fn test_load_with_defaults() {
        let config = load_pairs(&[("applicationId", "com.agendaapp.agenda_app")]).unwrap();

        assert_eq!(config.application_id(), "com.agendaapp.agenda_app");
        assert_eq!(config.namespace(), "com.agendaapp.agenda_app");
        assert_eq!(config.compile_sdk(), 35);
        assert_eq!(config.target_sdk(), 35);
        assert_eq!(config.min_sdk(), 21);
        assert_eq!(config.version_code(), 1);
        assert_eq!(config.version_name(), "1.0.0");
        assert!(!config.desugaring_enabled());
        assert!(!config.multi_dex_enabled());
        assert_eq!(config.desugar_library_version(), "2.1.4");
        assert_eq!(config.signing_config_ref(), "debug");
        assert_eq!(config.java_language_version(), Some(JavaVersion::V17));
        assert_eq!(config.flutter_source(), "../..");
        assert!(config.ndk_version().is_none());
    }

    #[test]
    fn test_load_full_input_with_aliases() {
        let config = load_pairs(&[
            ("applicationId", "com.agendaapp.agenda_app"),
            ("namespace", "com.agendaapp.core"),
            ("minSdk", "21"),
            ("targetSdk", "34"),
            ("compileSdk", "34"),
            ("ndkVersion", "27.0.12077973"),
            ("versionCode", "42"),
            ("versionName", "2.3.1+42"),
            ("coreLibraryDesugaringEnabled", "TRUE"),
            ("desugarLibraryVersion", "2.0.3"),
            ("multiDexEnabled", "true"),
            ("signingConfig", "release"),
            ("sourceCompatibility", "JavaVersion.VERSION_11"),
            ("targetCompatibility", "VERSION_11"),
            ("jvmTarget", "11"),
        ])
        .unwrap();

        assert_eq!(config.namespace(), "com.agendaapp.core");
        assert_eq!(config.compile_sdk(), 34);
        assert_eq!(config.ndk_version(), Some("27.0.12077973"));
        assert_eq!(config.version_code(), 42);
        assert_eq!(config.version_name(), "2.3.1+42");
        assert!(config.desugaring_enabled());
        assert_eq!(config.desugar_library_version(), "2.0.3");
        assert!(config.multi_dex_enabled());
        assert_eq!(config.signing_config_ref(), "release");
        assert_eq!(config.java_language_version(), Some(JavaVersion::V11));
    }

    #[test]
    fn test_java_shorthand_sets_both_and_jvm_target() {
        let config = load_pairs(&[
            ("applicationId", "com.example.app"),
            ("javaLanguageVersion", "21"),
        ])
        .unwrap();
        assert_eq!(config.source_compatibility(), JavaVersion::V21);
        assert_eq!(config.target_compatibility(), JavaVersion::V21);
        assert_eq!(config.jvm_target(), JavaVersion::V21);
    }

    #[test]
    fn test_unknown_key_fails() {
        let err = load_pairs(&[("applicationId", "com.example.app"), ("minSdkk", "21")])
            .unwrap_err();
        assert!(matches!(err, BuildConfigError::UnknownField { ref key, .. } if key == "minSdkk"));
    }

    #[test]
    fn test_unknown_key_reported_before_malformed_value() {
        let err = load_pairs(&[
            ("applicationId", "com.example.app"),
            ("minSdk", "abc"),
            ("zzzUnknown", "1"),
        ])
        .unwrap_err();
        assert!(
            matches!(err, BuildConfigError::UnknownField { ref key, .. } if key == "zzzUnknown")
        );
    }

    #[test]
    fn test_duplicate_reported_before_malformed_value() {
        let err = load_pairs(&[
            ("applicationId", "com.example.app"),
            ("compileSdk", "abc"),
            ("minSdk", "21"),
            ("minSdkVersion", "23"),
        ])
        .unwrap_err();
        assert!(matches!(err, BuildConfigError::DuplicateField { .. }));
    }

    #[test]
    fn test_override_replaces_alias_spelling() {
        let mut input = entries(&[("applicationId", "com.example.app"), ("minSdk", "21")]);
        apply_override(&mut input, "minSdkVersion", "24");

        assert!(!input.contains_key("minSdk"));
        let config = load(&input, &DefaultsConfig::default()).unwrap();
        assert_eq!(config.min_sdk(), 24);
    }

    #[test]
    fn test_java_shorthand_override_replaces_explicit_levels() {
        let mut input = entries(&[
            ("applicationId", "com.example.app"),
            ("sourceCompatibility", "17"),
            ("targetCompatibility", "17"),
        ]);
        apply_override(&mut input, "javaLanguageVersion", "11");

        let config = load(&input, &DefaultsConfig::default()).unwrap();
        assert_eq!(config.source_compatibility(), JavaVersion::V11);
        assert_eq!(config.target_compatibility(), JavaVersion::V11);
        assert_eq!(config.jvm_target(), JavaVersion::V11);
    }

    #[test]
    fn test_explicit_level_override_keeps_shorthand_for_other_level() {
        let mut input = entries(&[
            ("applicationId", "com.example.app"),
            ("javaLanguageVersion", "17"),
        ]);
        apply_override(&mut input, "sourceCompatibility", "11");

        assert!(!input.contains_key("javaLanguageVersion"));
        let config = load(&input, &DefaultsConfig::default()).unwrap();
        assert_eq!(config.source_compatibility(), JavaVersion::V11);
        assert_eq!(config.target_compatibility(), JavaVersion::V17);
    }

    #[test]
    fn test_override_with_unknown_key_is_kept_for_the_loader() {
        let mut input = entries(&[("applicationId", "com.example.app")]);
        apply_override(&mut input, "minSdkk", "21");
        let err = load(&input, &DefaultsConfig::default()).unwrap_err();
        assert!(matches!(err, BuildConfigError::UnknownField { .. }));
    }

    #[test]
    fn test_missing_application_id() {
        let err = load_pairs(&[("minSdk", "21")]).unwrap_err();
        assert!(
            matches!(err, BuildConfigError::MissingField { ref key } if key == "applicationId")
        );
    }

    #[test]
    fn test_duplicate_alias_fails() {
        let err = load_pairs(&[
            ("applicationId", "com.example.app"),
            ("minSdk", "21"),
            ("minSdkVersion", "23"),
        ])
        .unwrap_err();
        match err {
            BuildConfigError::DuplicateField { key, previous } => {
                assert_eq!(key, "minSdkVersion");
                assert_eq!(previous, "minSdk");
            }
            other => panic!("expected DuplicateField, got {other:?}"),
        }
    }

    #[test]
    fn test_java_shorthand_conflicts_with_explicit_level() {
        let err = load_pairs(&[
            ("applicationId", "com.example.app"),
            ("javaLanguageVersion", "17"),
            ("sourceCompatibility", "17"),
        ])
        .unwrap_err();
        assert!(matches!(err, BuildConfigError::DuplicateField { .. }));
    }

    #[test]
    fn test_parse_errors_name_key_and_type() {
        let cases = [
            ("minSdk", "twenty-one", "positive integer"),
            ("minSdk", "-21", "positive integer"),
            ("minSdk", "0", "positive integer"),
            ("minSdk", "99999999999", "positive integer"),
            ("multiDexEnabled", "yes", "boolean (true or false)"),
            ("javaLanguageVersion", "16", JavaVersion::EXPECTED),
            ("ndkVersion", "r27", VERSION_FORMAT),
            ("signingConfigRef", "my profile", PROFILE_NAME_FORMAT),
        ];

        for (key, value, expected_type) in cases {
            let err = load_pairs(&[("applicationId", "com.example.app"), (key, value)])
                .unwrap_err();
            match err {
                BuildConfigError::Parse {
                    key: k,
                    expected,
                    found,
                } => {
                    assert_eq!(k, key);
                    assert_eq!(expected, expected_type, "{key}={value}");
                    assert_eq!(found, value);
                }
                other => panic!("{key}={value}: expected Parse, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_application_id_format() {
        for bad in ["agenda", "com..agenda", "1com.agenda", "com.agenda-app", ""] {
            let err = load_pairs(&[("applicationId", bad)]).unwrap_err();
            assert!(matches!(err, BuildConfigError::Parse { .. }), "{bad:?}");
        }
    }

    #[test]
    fn test_version_code_upper_bound() {
        let err = load_pairs(&[
            ("applicationId", "com.example.app"),
            ("versionCode", "2100000001"),
        ])
        .unwrap_err();
        match err {
            BuildConfigError::Parse { key, expected, .. } => {
                assert_eq!(key, "versionCode");
                assert_eq!(expected, "1 - 2100000000");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_default_is_reported_with_defaults_key() {
        let defaults = DefaultsConfig {
            java_version: "16".to_string(),
            ..DefaultsConfig::default()
        };
        let err = load(&entries(&[("applicationId", "com.example.app")]), &defaults).unwrap_err();
        assert!(
            matches!(err, BuildConfigError::Parse { ref key, .. } if key == "defaults.java_version")
        );
    }

    #[test]
    fn test_first_error_in_sorted_key_order() {
        // "compileSdk" sorts before "minSdk"; both are malformed.
        let err = load_pairs(&[
            ("minSdk", "x"),
            ("compileSdk", "y"),
            ("applicationId", "com.example.app"),
        ])
        .unwrap_err();
        assert!(matches!(err, BuildConfigError::Parse { ref key, .. } if key == "compileSdk"));
    }
}
