//! Readers that turn build input files into [`RawEntries`]
//!
//! Two formats are accepted: Java-style property files (`key=value`, the
//! format of `local.properties` and `gradle.properties`) and flat TOML tables.

use crate::error::{BuildConfigError, Result};
use crate::loader::RawEntries;
use std::path::Path;

/// Parse `key=value` / `key: value` lines
///
/// `#` and `!` start comment lines. A repeated key is an error, as is a line
/// without a separator.
pub fn parse_properties(text: &str) -> Result<RawEntries> {
    let mut entries = RawEntries::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let Some(split) = line.find(['=', ':']) else {
            return Err(BuildConfigError::parse(
                &format!("line {}", index + 1),
                "key=value",
                line,
            ));
        };
        let key = line[..split].trim();
        let value = line[split + 1..].trim();

        if key.is_empty() {
            return Err(BuildConfigError::parse(
                &format!("line {}", index + 1),
                "key=value",
                line,
            ));
        }
        if entries.insert(key.to_string(), value.to_string()).is_some() {
            return Err(BuildConfigError::DuplicateField {
                key: key.to_string(),
                previous: key.to_string(),
            });
        }
    }

    Ok(entries)
}

/// Parse a flat TOML table of scalars
///
/// Strings, integers and booleans are converted to their string form;
/// anything else is rejected.
pub fn parse_toml(text: &str) -> Result<RawEntries> {
    let table: toml::Table = toml::from_str(text).map_err(|e| {
        BuildConfigError::parse("<document>", "flat TOML table", e.message())
    })?;

    table
        .into_iter()
        .map(|(key, value)| {
            let raw = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(n) => n.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                other => {
                    return Err(BuildConfigError::parse(
                        &key,
                        "string, integer or boolean",
                        other.type_str(),
                    ))
                }
            };
            Ok((key, raw))
        })
        .collect()
}

/// Read a build input file, choosing the reader by extension
pub fn read_file(path: &Path) -> Result<RawEntries> {
    let text = std::fs::read_to_string(path).map_err(|source| BuildConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    tracing::debug!(path = %path.display(), toml = is_toml, "Reading build input");
    if is_toml {
        parse_toml(&text)
    } else {
        parse_properties(&text)
    }
}
