//! Session configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use formkit_schema::Locale;

/// Settings fixed for the lifetime of a session.
///
/// Every field has a default, so a partial JSON/YAML document (or none at
/// all) deserializes into a usable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Message table used by the error localizer.
    pub locale: Locale,
    /// Whether the flat error list is rendered above the submit control.
    pub show_error_list: bool,
    /// Disable every input and the submit control.
    pub disabled: bool,
    /// Make every input read-only.
    pub readonly: bool,
    /// Prefix of generated element ids.
    pub id_prefix: String,
    /// Label of the submit control.
    pub submit_label: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            locale: Locale::It,
            show_error_list: false,
            disabled: false,
            readonly: false,
            id_prefix: "root".to_string(),
            submit_label: "Salva".to_string(),
        }
    }
}

impl FormConfig {
    /// Deserialize from an already-parsed document.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = FormConfig::default();
        assert_eq!(config.locale, Locale::It);
        assert_eq!(config.id_prefix, "root");
        assert_eq!(config.submit_label, "Salva");
        assert!(!config.show_error_list);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = FormConfig::from_value(&json!({"locale": "en", "show_error_list": true})).unwrap();
        assert_eq!(config.locale, Locale::En);
        assert!(config.show_error_list);
        assert_eq!(config.submit_label, "Salva");
    }

    #[test]
    fn test_unknown_locale_is_rejected() {
        assert!(FormConfig::from_value(&json!({"locale": "de"})).is_err());
    }
}
