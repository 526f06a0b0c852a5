//! # Schema Model
//!
//! Immutable interpretation of a JSON Schema document as a tree of
//! [`SchemaNode`]s. Only the keywords the form engine needs to lay out and
//! seed a form are interpreted: `type`, `title`, `description`, `default`,
//! `enum`, `properties`, `required`, `items`, `minItems`, `maxItems`.
//! Every other keyword (lengths, patterns, formats, ...) is left to the
//! validator, which works on the raw document kept alongside the tree.
//!
//! ## Kind inference
//!
//! A node without `type` is an object if it declares `properties`, an
//! array if it declares `items`, and unsupported otherwise.
//!
//! Property order is the order of declaration in the document, which
//! relies on `serde_json`'s `preserve_order` feature.

use std::sync::Arc;

use serde_json::{Map, Value};

use formkit_core::SchemaError;

/// The data kind of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// A JSON object with named properties.
    Object,
    /// A homogeneous JSON array.
    Array,
    /// A string.
    String,
    /// `true` / `false`.
    Boolean,
    /// Any JSON number.
    Number,
    /// An integral JSON number.
    Integer,
}

impl SchemaKind {
    /// Parse a JSON Schema `type` name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            _ => None,
        }
    }

    /// The JSON Schema `type` name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Integer => "integer",
        }
    }

    /// Whether this kind is rendered by a leaf widget.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Self::Object | Self::Array)
    }
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named property of an object node.
#[derive(Debug, Clone)]
pub struct Property {
    /// The property name.
    pub name: String,
    /// The property's schema.
    pub schema: Arc<SchemaNode>,
}

/// One node of the schema tree.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    kind: SchemaKind,
    title: Option<String>,
    description: Option<String>,
    default: Option<Value>,
    enum_values: Option<Vec<Value>>,
    properties: Vec<Property>,
    required: Vec<String>,
    items: Option<Arc<SchemaNode>>,
    min_items: Option<usize>,
    max_items: Option<usize>,
}

impl SchemaNode {
    /// Interpret a schema document node.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] for unsupported kinds, `required` names with
    /// no matching property, arrays without `items`, and keywords whose
    /// JSON shape is wrong.
    pub fn parse(value: &Value) -> Result<Self, SchemaError> {
        Self::parse_at(value, "")
    }

    fn parse_at(value: &Value, pointer: &str) -> Result<Self, SchemaError> {
        let obj = value.as_object().ok_or_else(|| SchemaError::Malformed {
            pointer: display_pointer(pointer),
            keyword: "schema".to_string(),
            reason: "schema node must be a JSON object".to_string(),
        })?;

        let kind = parse_kind(obj, pointer)?;
        let title = optional_string(obj, "title", pointer)?;
        let description = optional_string(obj, "description", pointer)?;
        let default = obj.get("default").cloned();
        let enum_values = match obj.get("enum") {
            None => None,
            Some(Value::Array(values)) => Some(values.clone()),
            Some(_) => return Err(malformed(pointer, "enum", "must be an array")),
        };

        let mut node = Self {
            kind,
            title,
            description,
            default,
            enum_values,
            properties: Vec::new(),
            required: Vec::new(),
            items: None,
            min_items: None,
            max_items: None,
        };

        match kind {
            SchemaKind::Object => node.parse_object(obj, pointer)?,
            SchemaKind::Array => node.parse_array(obj, pointer)?,
            _ => {}
        }

        Ok(node)
    }

    fn parse_object(&mut self, obj: &Map<String, Value>, pointer: &str) -> Result<(), SchemaError> {
        match obj.get("properties") {
            None => {}
            Some(Value::Object(props)) => {
                for (name, sub) in props {
                    let sub_pointer = format!("{pointer}/properties/{}", escape_token(name));
                    self.properties.push(Property {
                        name: name.clone(),
                        schema: Arc::new(Self::parse_at(sub, &sub_pointer)?),
                    });
                }
            }
            Some(_) => return Err(malformed(pointer, "properties", "must be an object")),
        }

        match obj.get("required") {
            None => {}
            Some(Value::Array(names)) => {
                for name in names {
                    let name = name
                        .as_str()
                        .ok_or_else(|| malformed(pointer, "required", "entries must be strings"))?;
                    if !self.properties.iter().any(|p| p.name == name) {
                        return Err(SchemaError::UnknownRequired {
                            pointer: display_pointer(pointer),
                            name: name.to_string(),
                        });
                    }
                    self.required.push(name.to_string());
                }
            }
            Some(_) => return Err(malformed(pointer, "required", "must be an array")),
        }
        Ok(())
    }

    fn parse_array(&mut self, obj: &Map<String, Value>, pointer: &str) -> Result<(), SchemaError> {
        match obj.get("items") {
            None => {
                return Err(SchemaError::MissingItems {
                    pointer: display_pointer(pointer),
                })
            }
            Some(items @ Value::Object(_)) => {
                let items_pointer = format!("{pointer}/items");
                self.items = Some(Arc::new(Self::parse_at(items, &items_pointer)?));
            }
            Some(_) => {
                return Err(malformed(
                    pointer,
                    "items",
                    "only a single items schema is supported",
                ))
            }
        }
        self.min_items = optional_count(obj, "minItems", pointer)?;
        self.max_items = optional_count(obj, "maxItems", pointer)?;
        Ok(())
    }

    /// The node's kind.
    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// The `title` keyword.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The `description` keyword.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The `default` keyword.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The `enum` keyword.
    pub fn enum_values(&self) -> Option<&[Value]> {
        self.enum_values.as_deref()
    }

    /// Declared properties, in declaration order. Empty for non-objects.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Look up a declared property by name.
    pub fn property(&self, name: &str) -> Option<&Arc<SchemaNode>> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.schema)
    }

    /// Required property names, in declaration order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Whether `name` is a required property of this object.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// The `items` schema of an array node.
    pub fn items(&self) -> Option<&Arc<SchemaNode>> {
        self.items.as_ref()
    }

    /// The `minItems` keyword.
    pub fn min_items(&self) -> Option<usize> {
        self.min_items
    }

    /// The `maxItems` keyword.
    pub fn max_items(&self) -> Option<usize> {
        self.max_items
    }

    /// The value a freshly created field of this schema starts with.
    ///
    /// Primitives start with their `default`, or absent. Objects start as
    /// an object holding the defaults of their properties. Arrays start
    /// with their `default`, or `minItems` empty items. Nothing is ever
    /// invented to satisfy `required`.
    pub fn empty_value(&self) -> Option<Value> {
        match self.kind {
            SchemaKind::Object => {
                let mut map = match &self.default {
                    Some(Value::Object(map)) => map.clone(),
                    _ => Map::new(),
                };
                for prop in &self.properties {
                    if map.contains_key(&prop.name) {
                        continue;
                    }
                    if let Some(v) = prop.schema.empty_value() {
                        if prop.schema.kind.is_primitive() || self.is_required(&prop.name) {
                            map.insert(prop.name.clone(), v);
                        }
                    }
                }
                Some(Value::Object(map))
            }
            SchemaKind::Array => {
                if let Some(Value::Array(items)) = &self.default {
                    return Some(Value::Array(items.clone()));
                }
                let count = self.min_items.unwrap_or(0);
                let item = self.empty_item_value();
                Some(Value::Array(vec![item; count]))
            }
            _ => self.default.clone(),
        }
    }

    /// The value appended when a new item is added to this array.
    pub fn empty_item_value(&self) -> Value {
        self.items
            .as_ref()
            .and_then(|items| items.empty_value())
            .unwrap_or(Value::Null)
    }
}

/// A parsed schema: the node tree plus the raw document for the validator.
#[derive(Debug, Clone)]
pub struct FormSchema {
    root: Arc<SchemaNode>,
    raw: Value,
}

impl FormSchema {
    /// Interpret a schema document.
    ///
    /// # Errors
    ///
    /// See [`SchemaNode::parse`].
    pub fn from_value(raw: Value) -> Result<Self, SchemaError> {
        let root = Arc::new(SchemaNode::parse(&raw)?);
        Ok(Self { root, raw })
    }

    /// The root node.
    pub fn root(&self) -> &Arc<SchemaNode> {
        &self.root
    }

    /// The raw schema document.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

fn parse_kind(obj: &Map<String, Value>, pointer: &str) -> Result<SchemaKind, SchemaError> {
    match obj.get("type") {
        Some(Value::String(name)) => {
            SchemaKind::parse(name).ok_or_else(|| SchemaError::UnsupportedKind {
                pointer: display_pointer(pointer),
                kind: name.clone(),
            })
        }
        Some(other) => Err(SchemaError::UnsupportedKind {
            pointer: display_pointer(pointer),
            kind: other.to_string(),
        }),
        None if obj.contains_key("properties") => Ok(SchemaKind::Object),
        None if obj.contains_key("items") => Ok(SchemaKind::Array),
        None => Err(SchemaError::UnsupportedKind {
            pointer: display_pointer(pointer),
            kind: "(none)".to_string(),
        }),
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    keyword: &str,
    pointer: &str,
) -> Result<Option<String>, SchemaError> {
    match obj.get(keyword) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(malformed(pointer, keyword, "must be a string")),
    }
}

fn optional_count(
    obj: &Map<String, Value>,
    keyword: &str,
    pointer: &str,
) -> Result<Option<usize>, SchemaError> {
    match obj.get(keyword) {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| malformed(pointer, keyword, "must be a non-negative integer")),
    }
}

fn malformed(pointer: &str, keyword: &str, reason: &str) -> SchemaError {
    SchemaError::Malformed {
        pointer: display_pointer(pointer),
        keyword: keyword.to_string(),
        reason: reason.to_string(),
    }
}

fn display_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "(root)".to_string()
    } else {
        pointer.to_string()
    }
}

fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
