//! # Document Loading
//!
//! Loads schema, presentation and form-data documents from disk. The
//! format is chosen from the file extension: `.yaml`/`.yml` for YAML,
//! anything else for JSON. YAML is deserialized straight into a
//! `serde_json::Value` so the rest of formkit sees one value model; scalar
//! mapping keys (`1:`, `true:`) arrive as their string form.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Error loading a document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        /// Path of the document.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid for its format.
    #[error("cannot parse '{path}': {reason}")]
    Parse {
        /// Path (or label) of the document.
        path: String,
        /// Reason reported by the parser.
        reason: String,
    },
}

/// Source format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON.
    Json,
    /// YAML (JSON-compatible subset).
    Yaml,
}

impl DocumentFormat {
    /// Choose a format from a path's extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Load a JSON or YAML document from disk.
///
/// # Errors
///
/// Returns [`DocumentError::Io`] if the file cannot be read and
/// [`DocumentError::Parse`] if it is not valid JSON/YAML.
pub fn load_document(path: &Path) -> Result<Value, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|e| DocumentError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let value = parse_document(&content, DocumentFormat::from_path(path), &path.display().to_string())?;
    tracing::debug!(path = %path.display(), "loaded document");
    Ok(value)
}

/// Parse document text in the given format. `label` names the document
/// in error messages.
pub fn parse_document(content: &str, format: DocumentFormat, label: &str) -> Result<Value, DocumentError> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| DocumentError::Parse {
            path: label.to_string(),
            reason: format!("invalid JSON: {e}"),
        }),
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| DocumentError::Parse {
            path: label.to_string(),
            reason: format!("invalid YAML: {e}"),
        }),
    }
}
