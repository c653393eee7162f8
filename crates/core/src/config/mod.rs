//! Configuration loading and schema definitions
//!
//! Tool configuration shared by every apkplan command.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
