//! Build configuration errors

use apkplan_core::error::{Error, ErrorCode};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuildConfigError>;

/// Everything that can stop the load, validate, emit pipeline
#[derive(Error, Debug)]
pub enum BuildConfigError {
    #[error("Unknown configuration key: {key}")]
    UnknownField {
        key: String,
        suggestion: Option<String>,
    },

    #[error("Invalid value for {key}: expected {expected}, found '{found}'")]
    Parse {
        key: String,
        expected: String,
        found: String,
    },

    #[error("Missing required key: {key}")]
    MissingField { key: String },

    #[error("Key {key} sets the same field as {previous}")]
    DuplicateField { key: String, previous: String },

    #[error("Invariant '{rule}' violated: {message}")]
    InvariantViolation { rule: String, message: String },

    #[error("Signing profile '{name}' is not registered (known: {})", .known.join(", "))]
    UnresolvedReference { name: String, known: Vec<String> },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildConfigError {
    pub(crate) fn parse(key: &str, expected: &str, found: &str) -> Self {
        Self::Parse {
            key: key.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Name of the violated rule, for invariant violations
    pub fn rule(&self) -> Option<&str> {
        match self {
            Self::InvariantViolation { rule, .. } => Some(rule),
            _ => None,
        }
    }

    /// Error code used when reporting through [`apkplan_core::Error`]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownField { .. } => ErrorCode::UnknownField,
            Self::Parse { .. } => ErrorCode::InvalidConfigValue,
            Self::MissingField { .. } => ErrorCode::MissingField,
            Self::DuplicateField { .. } => ErrorCode::DuplicateField,
            Self::InvariantViolation { .. } => ErrorCode::ConstraintViolation,
            Self::UnresolvedReference { .. } => ErrorCode::UnresolvedReference,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ErrorCode::FileNotFound
            }
            Self::Io { .. } => ErrorCode::IoError,
        }
    }
}

impl From<BuildConfigError> for Error {
    fn from(err: BuildConfigError) -> Self {
        if let BuildConfigError::Io { path, source } = &err {
            if source.kind() == std::io::ErrorKind::NotFound {
                return Error::file_not_found(path).with_source(err);
            }
        }

        let code = err.code();
        let suggestion = match &err {
            BuildConfigError::UnknownField {
                suggestion: Some(s),
                ..
            } => Some(format!("Did you mean '{s}'?")),
            BuildConfigError::UnknownField { .. } => {
                Some("Run `apkplan schema` to list recognized keys".to_string())
            }
            BuildConfigError::MissingField { key } => {
                Some(format!("Add `{key}=...` to the build input or pass --set {key}=..."))
            }
            BuildConfigError::DuplicateField { .. } => {
                Some("Keep only one spelling of the key".to_string())
            }
            BuildConfigError::UnresolvedReference { .. } => Some(
                "Declare the profile under [signing.profiles.<name>] in .apkplan.toml"
                    .to_string(),
            ),
            _ => None,
        };

        let mut error = Error::new(code, err.to_string());
        if let Some(suggestion) = suggestion {
            error = error.with_suggestion(suggestion);
        }
        error.with_source(err)
    }
}
