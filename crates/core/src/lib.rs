//! Core utilities for apkplan
//!
//! This crate provides the functionality shared by the Android planner and the CLI:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based tool configuration (`.apkplan.toml`)
//! - **Validation**: Fluent field and rule validation with ordered reporting
//!
//! # Example
//!
//! ```rust,no_run
//! use apkplan_core::{config::Config, validation::Validator};
//!
//! let config = Config::load(None).expect("Invalid .apkplan.toml");
//!
//! let result = Validator::new()
//!     .rule("sdk-order", "sdk-order", || {
//!         (config.schema.defaults.min_sdk > config.schema.defaults.target_sdk)
//!             .then(|| "minSdk exceeds targetSdk".to_string())
//!     })
//!     .validate();
//!
//! if !result.is_valid() {
//!     eprintln!("Default SDK levels are inconsistent");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};
