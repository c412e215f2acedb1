//! Configuration handling for charm generation.
//! The caller supplies an arbitrary mapping that must contain at least
//! `metadata.package`; every key in it is visible to templates as a binding.

use crate::error::{Error, Result};
use log::debug;
use serde::Serialize;
use std::path::Path;

/// The caller-supplied configuration mapping.
pub type Config = serde_json::Value;

/// Identifiers derived from the package name and exposed to templates.
///
/// These are pure functions of `metadata.package`, computed once per run,
/// so generated identifiers are deterministic regardless of caller casing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedNames {
    /// Library module file stem, `lib_<package>` with hyphens as underscores
    pub libfile: String,
    /// Helper class name, capitalized package without hyphens plus `Helper`
    pub libclass: String,
    /// Test fixture name, the package without hyphens
    pub fixture: String,
}

/// Loads the configuration mapping from a JSON or YAML file.
///
/// JSON parsing is attempted first, then YAML.
///
/// # Errors
/// * `Error::ConfigError` if the file cannot be read or parsed in either format
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from '{}'", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!("cannot read '{}': {}", path.display(), e))
    })?;

    match serde_json::from_str(&content) {
        Ok(value) => Ok(value),
        Err(_) => serde_yaml::from_str(&content).map_err(|e| {
            Error::ConfigError(format!("invalid configuration format: {}", e))
        }),
    }
}

/// Returns the lower-cased `metadata.package` value.
///
/// The package name is always lower-cased before any derivation so the
/// generated identifiers do not depend on how the caller spelled it.
///
/// # Errors
/// * `Error::ConfigError` if `metadata.package` is missing or not a string
pub fn package_name(config: &Config) -> Result<String> {
    config
        .get("metadata")
        .and_then(|metadata| metadata.get("package"))
        .and_then(|package| package.as_str())
        .map(|package| package.to_lowercase())
        .ok_or_else(|| {
            Error::ConfigError("configuration is missing 'metadata.package'".to_string())
        })
}

/// Computes the template identifiers for a lower-cased package name.
pub fn derive_names(package: &str) -> DerivedNames {
    let package = package.to_lowercase();

    DerivedNames {
        libfile: format!("lib_{}", package.replace('-', "_")),
        libclass: format!("{}Helper", capitalize(&package.replace('-', ""))),
        fixture: package.replace('-', ""),
    }
}

/// Builds the template bindings for a run: the caller configuration with
/// `metadata.package` normalized and the derived identifiers merged in at
/// the top level. The input configuration itself is never mutated.
pub fn template_context(config: &Config, names: &DerivedNames) -> Result<serde_json::Value> {
    let package = package_name(config)?;

    let mut context = config.clone();
    let root = context.as_object_mut().ok_or_else(|| {
        Error::ConfigError("configuration must be a mapping".to_string())
    })?;

    if let Some(metadata) = root.get_mut("metadata").and_then(|m| m.as_object_mut()) {
        metadata.insert("package".to_string(), serde_json::Value::String(package));
    }

    root.insert("libfile".to_string(), serde_json::json!(names.libfile));
    root.insert("libclass".to_string(), serde_json::json!(names.libclass));
    root.insert("fixture".to_string(), serde_json::json!(names.fixture));

    Ok(context)
}

/// Upper-cases exactly the first character, leaving the rest untouched.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
