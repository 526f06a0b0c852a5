//! # Validator Adapter
//!
//! Runs a JSON Schema validator against a candidate form value and reports
//! every failure as a [`RawViolation`]. The adapter never mutates the value
//! or the schema and can be invoked any number of times.
//!
//! ## Keyword and params
//!
//! The keyword is the last step of the failing schema location
//! (`/properties/CIG/minLength` → `minLength`). Params follow the usual
//! JSON Schema error vocabulary: `missingProperty` for `required`, `limit`
//! for length/count/range keywords, `type`, `pattern`, `format`,
//! `allowedValues`, `allowedValue`, `multipleOf`. They are read from the
//! keyword's argument in the raw schema.
//!
//! ## Ordering
//!
//! Violations come out in whatever order the validator produces them.
//! Consumers group them by path and must not rely on the sequence.

use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde_json::{json, Value};

use formkit_core::SchemaError;

use crate::model::FormSchema;

/// One failure reported by the validator, before localization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawViolation {
    /// JSON Pointer of the instance location the validator reported.
    pub instance_path: String,
    /// The failing schema keyword, e.g. `required`, `type`, `minLength`.
    pub keyword: String,
    /// Validator-native message, not localized.
    pub message: String,
    /// Keyword-specific data, e.g. `{"missingProperty": "CIG"}`.
    pub params: Value,
}

impl RawViolation {
    /// The pointer of the field this violation belongs to.
    ///
    /// A `required` failure is reported on the parent object but concerns
    /// the missing child, so it is addressed to the child's path.
    pub fn field_pointer(&self) -> String {
        if self.keyword == "required" {
            if let Some(name) = self.params.get("missingProperty").and_then(Value::as_str) {
                let token = name.replace('~', "~0").replace('/', "~1");
                return format!("{}/{token}", self.instance_path);
            }
        }
        self.instance_path.clone()
    }
}

impl fmt::Display for RawViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root) [{}]: {}", self.keyword, self.message)
        } else {
            write!(f, "{} [{}]: {}", self.instance_path, self.keyword, self.message)
        }
    }
}

/// The validation capability the form session depends on.
pub trait ValidatorAdapter: Send + Sync {
    /// Validate `value`, returning every violation found. An empty result
    /// means the value is valid.
    fn validate(&self, value: &Value) -> Vec<RawViolation>;
}

/// A [`ValidatorAdapter`] backed by the `jsonschema` crate.
///
/// The schema is compiled once at construction. Draft 7 is used, matching
/// what browser-side form validators default to.
pub struct JsonSchemaValidator {
    raw: Value,
    validator: Validator,
}

impl fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaValidator")
            .field("title", &self.raw.get("title"))
            .finish()
    }
}

impl JsonSchemaValidator {
    /// Compile a validator for `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] if the raw schema is rejected by the
    /// validator (e.g. an invalid `pattern` regex).
    pub fn new(schema: &FormSchema) -> Result<Self, SchemaError> {
        Self::from_raw(schema.raw().clone())
    }

    /// Compile a validator directly from a raw schema document.
    pub fn from_raw(raw: Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft7)
            .build(&raw)
            .map_err(|e| SchemaError::Compile {
                reason: e.to_string(),
            })?;
        Ok(Self { raw, validator })
    }
}

impl ValidatorAdapter for JsonSchemaValidator {
    fn validate(&self, value: &Value) -> Vec<RawViolation> {
        let violations: Vec<RawViolation> = self
            .validator
            .iter_errors(value)
            .map(|e| {
                let schema_path = e.schema_path.to_string();
                let keyword = schema_path
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string();
                let argument = self.raw.pointer(&schema_path);
                let params = match &e.kind {
                    ValidationErrorKind::Required { property } => json!({
                        "missingProperty": property.as_str().map(str::to_string)
                            .unwrap_or_else(|| property.to_string()),
                    }),
                    _ => keyword_params(&keyword, argument),
                };
                RawViolation {
                    instance_path: e.instance_path.to_string(),
                    keyword,
                    message: e.to_string(),
                    params,
                }
            })
            .collect();
        tracing::debug!(count = violations.len(), "schema validation finished");
        violations
    }
}

/// Validate `value` against `schema` in one call.
///
/// Compiles a fresh validator each time; sessions keep a compiled
/// [`JsonSchemaValidator`] instead.
pub fn validate(schema: &FormSchema, value: &Value) -> Result<Vec<RawViolation>, SchemaError> {
    Ok(JsonSchemaValidator::new(schema)?.validate(value))
}

fn keyword_params(keyword: &str, argument: Option<&Value>) -> Value {
    let Some(arg) = argument else {
        return json!({});
    };
    match keyword {
        "minLength" | "maxLength" | "minItems" | "maxItems" | "minProperties"
        | "maxProperties" | "minimum" | "maximum" | "exclusiveMinimum" | "exclusiveMaximum" => {
            json!({ "limit": arg })
        }
        "type" => json!({ "type": type_name(arg) }),
        "pattern" => json!({ "pattern": arg }),
        "format" => json!({ "format": arg }),
        "enum" => json!({ "allowedValues": arg }),
        "const" => json!({ "allowedValue": arg }),
        "multipleOf" => json!({ "multipleOf": arg }),
        _ => json!({}),
    }
}

fn type_name(arg: &Value) -> Value {
    match arg {
        Value::Array(names) => Value::String(
            names
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lotto_schema() -> FormSchema {
        FormSchema::from_value(json!({
            "type": "object",
            "required": ["CIG", "numero_lotto"],
            "properties": {
                "CIG": {"type": "string", "minLength": 10},
                "numero_lotto": {"type": "string"},
                "importo": {"type": "number", "minimum": 0}
            }
        }))
        .unwrap()
    }

    fn by_keyword<'a>(violations: &'a [RawViolation], keyword: &str) -> Vec<&'a RawViolation> {
        violations.iter().filter(|v| v.keyword == keyword).collect()
    }

    #[test]
    fn test_valid_value_has_no_violations() {
        let validator = JsonSchemaValidator::new(&lotto_schema()).unwrap();
        let violations = validator.validate(&json!({"CIG": "ZA12345678", "numero_lotto": "X"}));
        assert!(violations.is_empty(), "unexpected: {violations:?}");
    }

    #[test]
    fn test_required_reports_missing_property() {
        let validator = JsonSchemaValidator::new(&lotto_schema()).unwrap();
        let violations = validator.validate(&json!({}));
        let required = by_keyword(&violations, "required");
        assert_eq!(required.len(), 2);
        let mut missing: Vec<&str> = required
            .iter()
            .map(|v| v.params["missingProperty"].as_str().unwrap())
            .collect();
        missing.sort();
        assert_eq!(missing, vec!["CIG", "numero_lotto"]);
        assert!(required.iter().all(|v| v.instance_path.is_empty()));
    }

    #[test]
    fn test_required_field_pointer_targets_child() {
        let v = RawViolation {
            instance_path: "/aggiudicatario/0".to_string(),
            keyword: "required".to_string(),
            message: "\"CIG\" is a required property".to_string(),
            params: json!({"missingProperty": "CIG"}),
        };
        assert_eq!(v.field_pointer(), "/aggiudicatario/0/CIG");
    }

    #[test]
    fn test_min_length_params_carry_limit() {
        let validator = JsonSchemaValidator::new(&lotto_schema()).unwrap();
        let violations = validator.validate(&json!({"CIG": "short", "numero_lotto": "1"}));
        let min_length = by_keyword(&violations, "minLength");
        assert_eq!(min_length.len(), 1);
        assert_eq!(min_length[0].instance_path, "/CIG");
        assert_eq!(min_length[0].params["limit"], 10);
    }

    #[test]
    fn test_type_params_name_expected_type() {
        let validator = JsonSchemaValidator::new(&lotto_schema()).unwrap();
        let violations = validator.validate(&json!({
            "CIG": "ZA12345678", "numero_lotto": "1", "importo": "molto"
        }));
        let type_errors = by_keyword(&violations, "type");
        assert_eq!(type_errors.len(), 1);
        assert_eq!(type_errors[0].params["type"], "number");
    }

    #[test]
    fn test_validation_does_not_mutate_and_is_repeatable() {
        let validator = JsonSchemaValidator::new(&lotto_schema()).unwrap();
        let value = json!({"CIG": "short"});
        let first = validator.validate(&value);
        let second = validator.validate(&value);
        assert_eq!(first, second);
        assert_eq!(value, json!({"CIG": "short"}));
    }

    #[test]
    fn test_invalid_pattern_fails_to_compile() {
        let err = JsonSchemaValidator::from_raw(json!({
            "type": "string",
            "pattern": "(["
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::Compile { .. }));
    }

    #[test]
    fn test_violation_display_root() {
        let v = RawViolation {
            instance_path: String::new(),
            keyword: "required".to_string(),
            message: "\"CIG\" is a required property".to_string(),
            params: json!({"missingProperty": "CIG"}),
        };
        assert!(v.to_string().starts_with("(root) [required]"));
    }
}
