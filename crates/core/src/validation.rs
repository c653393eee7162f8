//! Field and rule validation
//!
//! Provides a fluent validator for:
//! - Required values
//! - Patterns and formats
//! - Numeric bounds
//! - Named cross-field rules
//!
//! Errors are recorded in the order checks are chained, so the first error
//! of a result is always the first failing check.
//!
//! # Example
//!
//! ```rust
//! use apkplan_core::validation::Validator;
//!
//! let min_sdk = 16;
//! let result = Validator::new()
//!     .required("applicationId", "com.example.app")
//!     .rule("minSdk", "desugaring-min-sdk", || {
//!         (min_sdk < 21).then(|| "desugaring requires minSdk>=21".to_string())
//!     })
//!     .validate();
//!
//! assert_eq!(result.first_error().unwrap().code, "desugaring-min-sdk");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code, or the rule name for [`Validator::rule`]
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get the first error in check order
    pub fn first_error(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Validate that a field is not empty
    #[must_use]
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Field is required".to_string(),
                code: "REQUIRED".to_string(),
                expected: Some("non-empty value".to_string()),
                actual: Some("empty".to_string()),
            });
        }
        self
    }

    /// Validate against a compiled pattern
    #[must_use]
    pub fn pattern(mut self, field: &str, value: &str, pattern: &Regex, description: &str) -> Self {
        if !pattern.is_match(value) {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must match {description}"),
                code: "PATTERN".to_string(),
                expected: Some(description.to_string()),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Validate a numeric range
    #[must_use]
    pub fn range<T: PartialOrd + std::fmt::Display>(
        mut self,
        field: &str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        if value < min || value > max {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must be between {min} and {max}"),
                code: "RANGE".to_string(),
                expected: Some(format!("{min} - {max}")),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Validate that `lower <= upper` for two related fields
    #[must_use]
    pub fn ordered<T: PartialOrd + std::fmt::Display>(
        mut self,
        rule: &str,
        (lower_field, lower): (&str, T),
        (upper_field, upper): (&str, T),
    ) -> Self {
        if lower > upper {
            self.result.add_error(ValidationError {
                field: lower_field.to_string(),
                message: format!(
                    "{lower_field} ({lower}) must not exceed {upper_field} ({upper})"
                ),
                code: rule.to_string(),
                expected: Some(format!("<= {upper}")),
                actual: Some(lower.to_string()),
            });
        }
        self
    }

    /// Check a named rule; the closure returns a message when it is violated
    #[must_use]
    pub fn rule<F>(mut self, field: &str, rule: &str, f: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        if let Some(message) = f() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message,
                code: rule.to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Add a warning (non-blocking)
    #[must_use]
    pub fn warn_if(mut self, field: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result.add_warning(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: "WARNING".to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}
