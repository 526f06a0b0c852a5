//! # Presentation Hints
//!
//! A [`UiSchema`] is the sparse presentation overlay for one schema node.
//! It is parsed from a JSON object keyed like the data schema: property
//! names address child hints, `items` addresses the hint shared by every
//! item of an array, and `ui:`-prefixed keys are directives for the node
//! itself.
//!
//! Parsing is lenient. Unknown keys, unknown property names and
//! directives of the wrong JSON type are ignored so that hints written
//! for a newer schema keep working with an older one.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use formkit_schema::Property;

/// `ui:options` directives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiOptions {
    /// Whether array items may be removed. Defaults to `true`.
    pub removable: Option<bool>,
    /// Whether array items may be added. Defaults to `true`.
    pub addable: Option<bool>,
    /// Whether the field template shows a label. Defaults to `true`.
    pub label: Option<bool>,
    /// Value written when a text input is cleared.
    pub empty_value: Option<Value>,
}

/// Presentation hints for one schema node and, recursively, its children.
#[derive(Debug, Clone, Default)]
pub struct UiSchema {
    /// `ui:classNames`.
    pub class_names: Option<String>,
    /// `ui:widget`.
    pub widget: Option<String>,
    /// `ui:title`.
    pub title: Option<String>,
    /// `ui:description`.
    pub description: Option<String>,
    /// `ui:help`.
    pub help: Option<String>,
    /// `ui:placeholder`.
    pub placeholder: Option<String>,
    /// `ui:disabled`.
    pub disabled: bool,
    /// `ui:readonly`.
    pub readonly: bool,
    /// `ui:hidden`, or `ui:widget: "hidden"`.
    pub hidden: bool,
    /// `ui:autofocus`.
    pub autofocus: bool,
    /// `ui:order`.
    pub order: Option<Vec<String>>,
    /// `ui:options`, plus a bare `removable` key.
    pub options: UiOptions,
    properties: HashMap<String, Arc<UiSchema>>,
    items: Option<Arc<UiSchema>>,
}

impl UiSchema {
    /// Parse a presentation overlay. Anything but an object yields an
    /// empty overlay.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let mut hint = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "ui:classNames" => hint.class_names = string(value),
                "ui:widget" => match value.as_str() {
                    Some("hidden") => hint.hidden = true,
                    Some(name) => hint.widget = Some(name.to_string()),
                    None => {}
                },
                "ui:title" => hint.title = string(value),
                "ui:description" => hint.description = string(value),
                "ui:help" => hint.help = string(value),
                "ui:placeholder" => hint.placeholder = string(value),
                "ui:disabled" => hint.disabled = value.as_bool().unwrap_or(false),
                "ui:readonly" => hint.readonly = value.as_bool().unwrap_or(false),
                "ui:hidden" => hint.hidden = value.as_bool().unwrap_or(false),
                "ui:autofocus" => hint.autofocus = value.as_bool().unwrap_or(false),
                "ui:order" => {
                    hint.order = value.as_array().map(|names| {
                        names
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                }
                "ui:options" => {
                    if let Some(opts) = value.as_object() {
                        hint.apply_options(opts);
                    }
                }
                "removable" => {
                    if let Some(b) = value.as_bool() {
                        hint.options.removable = Some(b);
                    }
                }
                "items" => {
                    if let Some(items) = value.as_object() {
                        hint.items = Some(Arc::new(Self::from_map(items)));
                    }
                }
                name if name.starts_with("ui:") => {
                    tracing::debug!(directive = name, "ignoring unknown presentation directive");
                }
                name => {
                    if let Some(child) = value.as_object() {
                        hint.properties
                            .insert(name.to_string(), Arc::new(Self::from_map(child)));
                    }
                }
            }
        }
        hint
    }

    fn apply_options(&mut self, opts: &Map<String, Value>) {
        for (key, value) in opts {
            match key.as_str() {
                "removable" => self.options.removable = value.as_bool(),
                "addable" => self.options.addable = value.as_bool(),
                "label" => self.options.label = value.as_bool(),
                "emptyValue" => self.options.empty_value = Some(value.clone()),
                "classNames" if self.class_names.is_none() => self.class_names = string(value),
                "placeholder" if self.placeholder.is_none() => self.placeholder = string(value),
                _ => {}
            }
        }
    }

    /// Hints for the named child property; empty when none were given.
    pub fn child(&self, name: &str) -> Arc<UiSchema> {
        self.properties.get(name).cloned().unwrap_or_default()
    }

    /// Hints shared by every item of this array; empty when none were given.
    pub fn items(&self) -> Arc<UiSchema> {
        self.items.clone().unwrap_or_default()
    }

    /// Whether items of this array may be removed.
    pub fn removable(&self) -> bool {
        self.options.removable.unwrap_or(true)
    }

    /// Whether items may be added to this array.
    pub fn addable(&self) -> bool {
        self.options.addable.unwrap_or(true)
    }

    /// Arrange `properties` by `ui:order`.
    ///
    /// Listed names come first in list order; `"*"` stands for every
    /// unlisted property in declaration order. Without `"*"`, unlisted
    /// properties follow the listed ones. Names that match no property
    /// are ignored.
    pub fn order_properties<'p>(&self, properties: &'p [Property]) -> Vec<&'p Property> {
        let Some(order) = &self.order else {
            return properties.iter().collect();
        };

        let listed = |name: &str| order.iter().any(|o| o == name);
        let rest: Vec<&Property> = properties.iter().filter(|p| !listed(&p.name)).collect();

        let mut out = Vec::with_capacity(properties.len());
        let mut rest_placed = false;
        for name in order {
            if name == "*" {
                if !rest_placed {
                    out.extend(rest.iter().copied());
                    rest_placed = true;
                }
            } else if let Some(prop) = properties.iter().find(|p| &p.name == name) {
                if !out.iter().any(|p: &&Property| p.name == prop.name) {
                    out.push(prop);
                }
            }
        }
        if !rest_placed {
            out.extend(rest);
        }
        out
    }
}

fn string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use formkit_schema::SchemaNode;
    use serde_json::json;

    fn names(props: Vec<&Property>) -> Vec<&str> {
        props.iter().map(|p| p.name.as_str()).collect()
    }

    fn four_fields() -> SchemaNode {
        SchemaNode::parse(&json!({
            "type": "object",
            "properties": {
                "CIG": {"type": "string"},
                "aggiudicatario": {"type": "string"},
                "aggiudicazione_cns": {"type": "boolean"},
                "numero_lotto": {"type": "string"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_directives() {
        let ui = UiSchema::from_value(&json!({
            "aggiudicatario": {
                "ui:classNames": "aggiudicatario-item-class",
                "removable": false,
                "ui:options": {"addable": false},
                "items": {
                    "CIG": {"ui:placeholder": "ZA..."}
                }
            }
        }));
        let array = ui.child("aggiudicatario");
        assert_eq!(array.class_names.as_deref(), Some("aggiudicatario-item-class"));
        assert!(!array.removable());
        assert!(!array.addable());
        assert_eq!(array.items().child("CIG").placeholder.as_deref(), Some("ZA..."));
    }

    #[test]
    fn test_unknown_paths_are_ignored() {
        let ui = UiSchema::from_value(&json!({
            "ui:futureDirective": true,
            "not_in_schema": {"ui:widget": "text"},
            "scalar": 3
        }));
        assert!(ui.child("CIG").widget.is_none());
        assert!(ui.removable());
    }

    #[test]
    fn test_hidden_widget() {
        let ui = UiSchema::from_value(&json!({"ui:widget": "hidden"}));
        assert!(ui.hidden);
        assert!(ui.widget.is_none());
    }

    #[test]
    fn test_empty_value_option() {
        let ui = UiSchema::from_value(&json!({"ui:options": {"emptyValue": ""}}));
        assert_eq!(ui.options.empty_value, Some(json!("")));
    }

    #[test]
    fn test_order_with_wildcard() {
        let schema = four_fields();
        let ui = UiSchema::from_value(&json!({"ui:order": ["numero_lotto", "*", "CIG"]}));
        assert_eq!(
            names(ui.order_properties(schema.properties())),
            vec!["numero_lotto", "aggiudicatario", "aggiudicazione_cns", "CIG"]
        );
    }

    #[test]
    fn test_order_without_wildcard_appends_rest() {
        let schema = four_fields();
        let ui = UiSchema::from_value(&json!({"ui:order": ["aggiudicazione_cns", "ghost"]}));
        assert_eq!(
            names(ui.order_properties(schema.properties())),
            vec!["aggiudicazione_cns", "CIG", "aggiudicatario", "numero_lotto"]
        );
    }

    #[test]
    fn test_no_order_keeps_declaration_order() {
        let schema = four_fields();
        let ui = UiSchema::default();
        assert_eq!(
            names(ui.order_properties(schema.properties())),
            vec!["CIG", "aggiudicatario", "aggiudicazione_cns", "numero_lotto"]
        );
    }
}
