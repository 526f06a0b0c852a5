//! # Error Localizer
//!
//! Pure transform from [`RawViolation`]s to user-facing [`LocalizedError`]s.
//!
//! The output is one-to-one with the input and keeps its order. Each
//! message is looked up by keyword in the table of the selected
//! [`Locale`]; templates name params in braces (`{missingProperty}`).
//! A keyword without a template, or a template whose params are missing
//! from the violation, falls back to the validator-native message. No
//! violation is ever dropped.
//!
//! This is the only localization boundary in formkit.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validate::RawViolation;

/// Message table selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Italian.
    #[default]
    It,
    /// English.
    En,
}

impl Locale {
    /// Message template for `keyword`, if this locale has one.
    pub fn template(&self, keyword: &str) -> Option<&'static str> {
        match self {
            Self::It => italian(keyword),
            Self::En => english(keyword),
        }
    }

    /// The locale code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::It => "it",
            Self::En => "en",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "it" | "it-it" => Ok(Self::It),
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            other => Err(format!("unsupported locale '{other}' (expected 'it' or 'en')")),
        }
    }
}

fn italian(keyword: &str) -> Option<&'static str> {
    Some(match keyword {
        "required" => "{missingProperty} è obbligatorio",
        "type" => "deve essere di tipo {type}",
        "minLength" => "non deve essere più breve di {limit} caratteri",
        "maxLength" => "non deve essere più lungo di {limit} caratteri",
        "minimum" => "deve essere >= {limit}",
        "maximum" => "deve essere <= {limit}",
        "exclusiveMinimum" => "deve essere > {limit}",
        "exclusiveMaximum" => "deve essere < {limit}",
        "minItems" => "non deve avere meno di {limit} elementi",
        "maxItems" => "non deve avere più di {limit} elementi",
        "minProperties" => "non deve avere meno di {limit} proprietà",
        "maxProperties" => "non deve avere più di {limit} proprietà",
        "pattern" => "deve corrispondere al formato \"{pattern}\"",
        "format" => "deve corrispondere al formato \"{format}\"",
        "enum" => "deve essere uguale a uno dei valori predefiniti",
        "const" => "deve essere uguale alla costante",
        "multipleOf" => "deve essere un multiplo di {multipleOf}",
        "uniqueItems" => "non deve avere elementi duplicati",
        "additionalProperties" => "non deve avere proprietà aggiuntive",
        _ => return None,
    })
}

fn english(keyword: &str) -> Option<&'static str> {
    Some(match keyword {
        "required" => "{missingProperty} is required",
        "type" => "must be {type}",
        "minLength" => "must NOT have fewer than {limit} characters",
        "maxLength" => "must NOT have more than {limit} characters",
        "minimum" => "must be >= {limit}",
        "maximum" => "must be <= {limit}",
        "exclusiveMinimum" => "must be > {limit}",
        "exclusiveMaximum" => "must be < {limit}",
        "minItems" => "must NOT have fewer than {limit} items",
        "maxItems" => "must NOT have more than {limit} items",
        "minProperties" => "must NOT have fewer than {limit} properties",
        "maxProperties" => "must NOT have more than {limit} properties",
        "pattern" => "must match pattern \"{pattern}\"",
        "format" => "must match format \"{format}\"",
        "enum" => "must be equal to one of the allowed values",
        "const" => "must be equal to constant",
        "multipleOf" => "must be multiple of {multipleOf}",
        "uniqueItems" => "must NOT have duplicate items",
        "additionalProperties" => "must NOT have additional properties",
        _ => return None,
    })
}

/// A user-facing, locale-specific error for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedError {
    /// JSON Pointer of the field the error belongs to.
    pub path: String,
    /// The localized message.
    pub message: String,
}

impl std::fmt::Display for LocalizedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Localize `violations` one-to-one, preserving order.
pub fn localize(violations: &[RawViolation], locale: Locale) -> Vec<LocalizedError> {
    violations
        .iter()
        .map(|v| LocalizedError {
            path: v.field_pointer(),
            message: locale
                .template(&v.keyword)
                .and_then(|t| render_template(t, &v.params))
                .unwrap_or_else(|| v.message.clone()),
        })
        .collect()
}

/// Substitute `{name}` placeholders with params. `None` if any is missing.
fn render_template(template: &str, params: &Value) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}')?;
        let name = &after[..end];
        match params.get(name)? {
            Value::String(s) => out.push_str(s),
            other => out.push_str(&other.to_string()),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn required(instance_path: &str, property: &str) -> RawViolation {
        RawViolation {
            instance_path: instance_path.to_string(),
            keyword: "required".to_string(),
            message: format!("\"{property}\" is a required property"),
            params: json!({ "missingProperty": property }),
        }
    }

    #[test]
    fn test_required_italian() {
        let errors = localize(&[required("/aggiudicatario/0", "CIG")], Locale::It);
        assert_eq!(
            errors,
            vec![LocalizedError {
                path: "/aggiudicatario/0/CIG".to_string(),
                message: "CIG è obbligatorio".to_string(),
            }]
        );
    }

    #[test]
    fn test_required_english() {
        let errors = localize(&[required("", "title")], Locale::En);
        assert_eq!(errors[0].message, "title is required");
        assert_eq!(errors[0].path, "/title");
    }

    #[test]
    fn test_numeric_params_substituted() {
        let v = RawViolation {
            instance_path: "/CIG".to_string(),
            keyword: "minLength".to_string(),
            message: "\"abc\" is shorter than 10 characters".to_string(),
            params: json!({"limit": 10}),
        };
        let errors = localize(&[v], Locale::It);
        assert_eq!(errors[0].message, "non deve essere più breve di 10 caratteri");
    }

    #[test]
    fn test_unknown_keyword_keeps_native_message() {
        let v = RawViolation {
            instance_path: "/x".to_string(),
            keyword: "contains".to_string(),
            message: "None of [] are valid under the given schema".to_string(),
            params: json!({}),
        };
        let errors = localize(&[v.clone()], Locale::It);
        assert_eq!(errors[0].message, v.message);
    }

    #[test]
    fn test_missing_param_keeps_native_message() {
        let v = RawViolation {
            instance_path: "/x".to_string(),
            keyword: "minLength".to_string(),
            message: "native".to_string(),
            params: json!({}),
        };
        assert_eq!(localize(&[v], Locale::En)[0].message, "native");
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("IT".parse::<Locale>().unwrap(), Locale::It);
        assert_eq!("en-GB".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    fn arb_violation() -> impl Strategy<Value = RawViolation> {
        let keywords = prop::sample::select(vec![
            "required", "type", "minLength", "pattern", "enum", "contains", "custom",
        ]);
        ("[a-z]{0,8}", keywords, "[a-zA-Z ]{0,16}", 0u32..50).prop_map(
            |(path, keyword, message, limit)| RawViolation {
                instance_path: if path.is_empty() { path } else { format!("/{path}") },
                keyword: keyword.to_string(),
                message,
                params: json!({"missingProperty": "campo", "limit": limit, "type": "string"}),
            },
        )
    }

    proptest! {
        #[test]
        fn localize_is_one_to_one_and_idempotent(
            violations in prop::collection::vec(arb_violation(), 0..12),
            italian in any::<bool>(),
        ) {
            let locale = if italian { Locale::It } else { Locale::En };
            let first = localize(&violations, locale);
            let second = localize(&violations, locale);
            prop_assert_eq!(first.len(), violations.len());
            prop_assert_eq!(&first, &second);
            for (error, violation) in first.iter().zip(&violations) {
                prop_assert_eq!(&error.path, &violation.field_pointer());
            }
        }
    }
}
