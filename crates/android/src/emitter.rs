//! Build plan emission
//!
//! Projects a validated [`BuildConfig`] onto the ordered directives an
//! external build tool applies. Emission is a pure function of the config and
//! the registry: the same inputs always produce the same plan.

use crate::build_config::{BuildConfig, JavaVersion};
use crate::error::Result;
use crate::signing::{SigningProfile, SigningRegistry};
use serde::Serialize;
use std::fmt;

/// Maven coordinates of the core library desugaring artifact, minus version
pub const DESUGAR_LIBRARY: &str = "com.android.tools:desugar_jdk_libs";

/// Build variant the signing profile is bound to
pub const RELEASE_VARIANT: &str = "release";

/// One instruction for the build tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum Directive {
    SetNamespace {
        namespace: String,
    },
    SetCompileSdk {
        api_level: u32,
    },
    SetNdkVersion {
        version: String,
    },
    SetJavaCompatibility {
        source: JavaVersion,
        target: JavaVersion,
    },
    SetJvmTarget {
        target: JavaVersion,
    },
    EnableLibraryDesugaring {
        artifact: String,
    },
    SetApplicationId {
        application_id: String,
    },
    SetMinSdk {
        api_level: u32,
    },
    SetTargetSdk {
        api_level: u32,
    },
    SetVersion {
        code: u32,
        name: String,
    },
    EnableMultiDex,
    BindSigningProfile {
        profile: SigningProfile,
        variant: String,
    },
    SetFlutterSource {
        path: String,
    },
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetNamespace { namespace } => write!(f, "set namespace {namespace}"),
            Self::SetCompileSdk { api_level } => write!(f, "set compile target API {api_level}"),
            Self::SetNdkVersion { version } => write!(f, "use NDK {version}"),
            Self::SetJavaCompatibility { source, target } => {
                write!(f, "set Java source {source}, target {target}")
            }
            Self::SetJvmTarget { target } => write!(f, "set Kotlin JVM target {target}"),
            Self::EnableLibraryDesugaring { artifact } => {
                write!(f, "enable library desugaring with {artifact}")
            }
            Self::SetApplicationId { application_id } => {
                write!(f, "set application id {application_id}")
            }
            Self::SetMinSdk { api_level } => write!(f, "set minimum API {api_level}"),
            Self::SetTargetSdk { api_level } => write!(f, "set target API {api_level}"),
            Self::SetVersion { code, name } => write!(f, "set version {name} ({code})"),
            Self::EnableMultiDex => write!(f, "enable multidex"),
            Self::BindSigningProfile { profile, variant } => {
                write!(f, "bind signing profile {} to {variant} variant", profile.name)
            }
            Self::SetFlutterSource { path } => write!(f, "set Flutter source {path}"),
        }
    }
}

/// Ordered directives for one build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    directives: Vec<Directive>,
}

impl BuildPlan {
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Desugaring artifact, when the plan enables desugaring
    pub fn desugaring_artifact(&self) -> Option<&str> {
        self.directives.iter().find_map(|d| match d {
            Directive::EnableLibraryDesugaring { artifact } => Some(artifact.as_str()),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a BuildPlan {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}

/// Emit the plan for a config that already passed [`crate::validator::validate`]
///
/// The signing reference is resolved again here, so a registry that differs
/// from the one used for validation still fails with
/// [`crate::BuildConfigError::UnresolvedReference`].
pub fn emit(config: &BuildConfig, registry: &SigningRegistry) -> Result<BuildPlan> {
    let profile = registry.resolve(config.signing_config_ref())?.clone();

    let mut directives = vec![
        Directive::SetNamespace {
            namespace: config.namespace().to_string(),
        },
        Directive::SetCompileSdk {
            api_level: config.compile_sdk(),
        },
    ];

    if let Some(version) = config.ndk_version() {
        directives.push(Directive::SetNdkVersion {
            version: version.to_string(),
        });
    }

    directives.push(Directive::SetJavaCompatibility {
        source: config.source_compatibility(),
        target: config.target_compatibility(),
    });
    directives.push(Directive::SetJvmTarget {
        target: config.jvm_target(),
    });

    if config.desugaring_enabled() {
        directives.push(Directive::EnableLibraryDesugaring {
            artifact: format!("{DESUGAR_LIBRARY}:{}", config.desugar_library_version()),
        });
    }

    directives.extend([
        Directive::SetApplicationId {
            application_id: config.application_id().to_string(),
        },
        Directive::SetMinSdk {
            api_level: config.min_sdk(),
        },
        Directive::SetTargetSdk {
            api_level: config.target_sdk(),
        },
        Directive::SetVersion {
            code: config.version_code(),
            name: config.version_name().to_string(),
        },
    ]);

    if config.multi_dex_enabled() {
        directives.push(Directive::EnableMultiDex);
    }

    directives.push(Directive::BindSigningProfile {
        profile,
        variant: RELEASE_VARIANT.to_string(),
    });
    directives.push(Directive::SetFlutterSource {
        path: config.flutter_source().to_string(),
    });

    tracing::debug!(directives = directives.len(), "Build plan emitted");
    Ok(BuildPlan { directives })
}
