//! Signing profile registry
//!
//! Build inputs name a signing profile; the registry is the only place those
//! names are resolved. It is passed explicitly to the validator and emitter.

use crate::error::{BuildConfigError, Result};
use apkplan_core::config::SigningConfig;
use serde::Serialize;
use std::collections::BTreeMap;

/// Profile bound to the release variant when the input names none
pub const DEFAULT_SIGNING_PROFILE: &str = "debug";

/// A named signing credential configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,
}

impl SigningProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store_file: None,
            key_alias: None,
        }
    }

    /// Profile backed by the Android debug keystore
    pub fn is_debug(&self) -> bool {
        self.name == DEFAULT_SIGNING_PROFILE
    }
}

/// Known signing profiles, keyed by name
#[derive(Debug, Clone)]
pub struct SigningRegistry {
    profiles: BTreeMap<String, SigningProfile>,
}

impl Default for SigningRegistry {
    /// `debug` and `release`, the two profiles every Android project has
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(SigningProfile::named(DEFAULT_SIGNING_PROFILE));
        registry.register(SigningProfile::named("release"));
        registry
    }
}

impl SigningRegistry {
    pub fn empty() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    /// Default profiles plus those declared in `[signing.profiles]`
    ///
    /// A declared `debug` or `release` profile replaces the built-in one.
    pub fn from_config(config: &SigningConfig) -> Self {
        let mut registry = Self::default();
        for (name, profile) in &config.profiles {
            registry.register(SigningProfile {
                name: name.clone(),
                store_file: profile.store_file.clone(),
                key_alias: profile.key_alias.clone(),
            });
        }
        registry
    }

    /// Add or replace a profile
    pub fn register(&mut self, profile: SigningProfile) {
        tracing::trace!(profile = %profile.name, "Registering signing profile");
        self.profiles.insert(profile.name.clone(), profile);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    pub fn resolve(&self, name: &str) -> Result<&SigningProfile> {
        self.profiles
            .get(name)
            .ok_or_else(|| BuildConfigError::UnresolvedReference {
                name: name.to_string(),
                known: self.names(),
            })
    }
}
