//! # formkit-cli - Form Engine Command-Line Interface
//!
//! ## Subcommands
//!
//! - `validate` - build a session over a data file, submit it, print the
//!   localized errors grouped by field
//! - `render` - print the text outline of a form
//!
//! Schema, presentation, data and configuration files are JSON or YAML,
//! chosen by extension.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in the `*Args` structs; handlers return exit
//!   codes and leave printing of failures to `main`.
//! - Handlers delegate to `formkit-schema` and `formkit-form`. No form
//!   logic here.

pub mod render;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use formkit_form::FormConfig;
use formkit_schema::{load_document, FormSchema, Locale};

/// Load and interpret a schema file.
pub fn load_schema(path: &Path) -> Result<FormSchema> {
    let raw = load_document(path)
        .with_context(|| format!("failed to load schema {}", path.display()))?;
    FormSchema::from_value(raw).with_context(|| format!("invalid schema {}", path.display()))
}

/// Load an optional document; `Value::Null` when no path is given.
pub fn load_optional(path: Option<&Path>, what: &str) -> Result<Value> {
    match path {
        Some(p) => load_document(p)
            .with_context(|| format!("failed to load {what} {}", p.display())),
        None => Ok(Value::Null),
    }
}

/// Build the session configuration from an optional file, then apply
/// flag overrides.
pub fn load_config(path: Option<&Path>, locale: Option<Locale>) -> Result<FormConfig> {
    let mut config = match path {
        Some(p) => {
            let raw = load_document(p)
                .with_context(|| format!("failed to load config {}", p.display()))?;
            FormConfig::from_value(&raw)
                .with_context(|| format!("invalid config {}", p.display()))?
        }
        None => FormConfig::default(),
    };
    if let Some(locale) = locale {
        config.locale = locale;
    }
    tracing::debug!(?config, "resolved form configuration");
    Ok(config)
}
