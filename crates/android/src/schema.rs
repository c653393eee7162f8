//! Recognized build configuration keys
//!
//! Every key accepted by the loader is listed in [`FIELDS`], either as the
//! canonical key or as one of its aliases. The aliases are the spellings the
//! Gradle Kotlin DSL uses (`minSdk`, `compileSdk`, ...), so values copied out
//! of a `build.gradle.kts` file load unchanged.

use crate::error::{BuildConfigError, Result};
use serde::Serialize;

/// Primitive type of a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text, possibly pattern-checked
    String,
    /// Positive decimal integer
    Integer,
    /// `true` or `false`
    Boolean,
    /// One of a fixed set of values
    Enum,
    /// Name resolved against a registry at validation time
    Reference,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::Reference => "reference",
        };
        f.write_str(name)
    }
}

/// A `BuildConfig` field addressable from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ApplicationId,
    Namespace,
    CompileSdk,
    TargetSdk,
    MinSdk,
    NdkVersion,
    VersionCode,
    VersionName,
    DesugaringEnabled,
    DesugarLibraryVersion,
    MultiDexEnabled,
    SigningConfigRef,
    JavaLanguageVersion,
    SourceCompatibility,
    TargetCompatibility,
    JvmTarget,
    FlutterSource,
}

/// Schema entry for one field
#[derive(Debug, Serialize)]
pub struct FieldSpec {
    pub field: Field,
    pub key: &'static str,
    pub aliases: &'static [&'static str],
    #[serde(rename = "type")]
    pub ty: FieldType,
    pub required: bool,
    pub description: &'static str,
}

impl FieldSpec {
    /// Canonical key followed by aliases
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.key).chain(self.aliases.iter().copied())
    }
}

/// All recognized fields
pub static FIELDS: &[FieldSpec] = &[
    FieldSpec {
        field: Field::ApplicationId,
        key: "applicationId",
        aliases: &[],
        ty: FieldType::String,
        required: true,
        description: "Reverse-domain package id of the installed app",
    },
    FieldSpec {
        field: Field::Namespace,
        key: "namespace",
        aliases: &[],
        ty: FieldType::String,
        required: false,
        description: "Package of the generated R and BuildConfig classes; defaults to applicationId",
    },
    FieldSpec {
        field: Field::CompileSdk,
        key: "compileSdkVersion",
        aliases: &["compileSdk"],
        ty: FieldType::Integer,
        required: false,
        description: "API level the app is compiled against",
    },
    FieldSpec {
        field: Field::TargetSdk,
        key: "targetSdkVersion",
        aliases: &["targetSdk"],
        ty: FieldType::Integer,
        required: false,
        description: "API level the app is tested against",
    },
    FieldSpec {
        field: Field::MinSdk,
        key: "minSdkVersion",
        aliases: &["minSdk"],
        ty: FieldType::Integer,
        required: false,
        description: "Lowest API level the app installs on",
    },
    FieldSpec {
        field: Field::NdkVersion,
        key: "ndkVersion",
        aliases: &[],
        ty: FieldType::String,
        required: false,
        description: "Side-by-side NDK version",
    },
    FieldSpec {
        field: Field::VersionCode,
        key: "versionCode",
        aliases: &[],
        ty: FieldType::Integer,
        required: false,
        description: "Monotonic release number",
    },
    FieldSpec {
        field: Field::VersionName,
        key: "versionName",
        aliases: &[],
        ty: FieldType::String,
        required: false,
        description: "User-visible version string",
    },
    FieldSpec {
        field: Field::DesugaringEnabled,
        key: "desugaringEnabled",
        aliases: &["coreLibraryDesugaringEnabled"],
        ty: FieldType::Boolean,
        required: false,
        description: "Enable core library desugaring",
    },
    FieldSpec {
        field: Field::DesugarLibraryVersion,
        key: "desugarLibraryVersion",
        aliases: &[],
        ty: FieldType::String,
        required: false,
        description: "Version of com.android.tools:desugar_jdk_libs",
    },
    FieldSpec {
        field: Field::MultiDexEnabled,
        key: "multiDexEnabled",
        aliases: &[],
        ty: FieldType::Boolean,
        required: false,
        description: "Enable legacy multidex",
    },
    FieldSpec {
        field: Field::SigningConfigRef,
        key: "signingConfigRef",
        aliases: &["signingConfig"],
        ty: FieldType::Reference,
        required: false,
        description: "Signing profile bound to the release variant",
    },
    FieldSpec {
        field: Field::JavaLanguageVersion,
        key: "javaLanguageVersion",
        aliases: &[],
        ty: FieldType::Enum,
        required: false,
        description: "Shorthand for sourceCompatibility and targetCompatibility",
    },
    FieldSpec {
        field: Field::SourceCompatibility,
        key: "sourceCompatibility",
        aliases: &[],
        ty: FieldType::Enum,
        required: false,
        description: "Java source level",
    },
    FieldSpec {
        field: Field::TargetCompatibility,
        key: "targetCompatibility",
        aliases: &[],
        ty: FieldType::Enum,
        required: false,
        description: "Java bytecode level",
    },
    FieldSpec {
        field: Field::JvmTarget,
        key: "jvmTarget",
        aliases: &[],
        ty: FieldType::Enum,
        required: false,
        description: "Kotlin JVM target; defaults to targetCompatibility",
    },
    FieldSpec {
        field: Field::FlutterSource,
        key: "flutterSource",
        aliases: &[],
        ty: FieldType::String,
        required: false,
        description: "Path from the app module to the Flutter project",
    },
];

/// All recognized fields, in schema order
pub fn fields() -> &'static [FieldSpec] {
    FIELDS
}

/// Look up a key or alias
pub fn lookup(key: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.names().any(|name| name == key))
}

/// Schema entry for a field
pub fn spec_of(field: Field) -> &'static FieldSpec {
    FIELDS
        .iter()
        .find(|spec| spec.field == field)
        .unwrap_or_else(|| unreachable!("every Field has a FieldSpec"))
}

/// Resolve a key to its schema entry, failing on unknown keys
pub fn resolve(key: &str) -> Result<&'static FieldSpec> {
    lookup(key).ok_or_else(|| BuildConfigError::UnknownField {
        key: key.to_string(),
        suggestion: closest_key(key).map(str::to_string),
    })
}

/// Primitive type of a key
pub fn field_type(key: &str) -> Result<FieldType> {
    resolve(key).map(|spec| spec.ty)
}

const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Closest recognized name for a misspelled key
fn closest_key(key: &str) -> Option<&'static str> {
    let needle = key.to_ascii_lowercase();
    FIELDS
        .iter()
        .flat_map(FieldSpec::names)
        .map(|name| (levenshtein_distance(&needle, &name.to_ascii_lowercase()), name))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name)
}

/// Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
