use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::SchemaError;

/// JSON Schema dialect used for every root schema.
pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// An object schema: `required`, `properties`, `additionalProperties`.
///
/// Properties are kept as JSON values so authored fragments (`$ref` arrays,
/// `patternProperties`) and generated nested schemas can live side by side.
/// Keys stay in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// `$schema` dialect, only set on root schemas
    pub dialect: Option<String>,
    /// Optional `title`
    pub title: Option<String>,
    /// Optional `description`
    pub description: Option<String>,
    /// Optional `version`
    pub version: Option<String>,
    /// Fully qualified name of the class the schema was derived from
    pub tag: String,
    /// Field names that must be present
    pub required: Vec<String>,
    /// Field name to property schema
    pub properties: Map<String, Value>,
    /// Whether keys outside `properties` are accepted
    pub additional_properties: bool,
    /// Any other keyword (`patternProperties`, `minProperties`, ...)
    pub keywords: Map<String, Value>,
}

impl SchemaNode {
    /// An empty object schema carrying `tag`.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            dialect: None,
            title: None,
            description: None,
            version: None,
            tag: tag.into(),
            required: Vec::new(),
            properties: Map::new(),
            additional_properties: false,
            keywords: Map::new(),
        }
    }

    /// Insert (or replace) a property.
    pub fn insert_property(&mut self, name: impl Into<String>, property: impl Into<Value>) {
        self.properties.insert(name.into(), property.into());
    }

    /// Mark a field as required. Duplicates are ignored.
    pub fn require(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name);
        }
    }

    /// Set an extra keyword such as `minProperties`.
    pub fn set_keyword(&mut self, keyword: impl Into<String>, value: impl Into<Value>) {
        self.keywords.insert(keyword.into(), value.into());
    }

    /// Check that every required field has a property.
    pub fn check_invariants(&self) -> Result<(), SchemaError> {
        match self.required.iter().find(|f| !self.properties.contains_key(*f)) {
            Some(field) => Err(SchemaError::DanglingRequired {
                tag: self.tag.clone(),
                field: field.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Render as a JSON object.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(dialect) = &self.dialect {
            map.insert("$schema".into(), Value::from(dialect.as_str()));
        }
        if let Some(title) = &self.title {
            map.insert("title".into(), Value::from(title.as_str()));
        }
        if let Some(description) = &self.description {
            map.insert("description".into(), Value::from(description.as_str()));
        }
        if let Some(version) = &self.version {
            map.insert("version".into(), Value::from(version.as_str()));
        }
        map.insert("type".into(), Value::from("object"));
        map.insert("tag".into(), Value::from(self.tag.as_str()));
        map.insert(
            "required".into(),
            Value::Array(self.required.iter().map(|r| Value::from(r.as_str())).collect()),
        );
        map.insert("properties".into(), Value::Object(self.properties.clone()));
        map.insert(
            "additionalProperties".into(),
            Value::Bool(self.additional_properties),
        );
        for (keyword, value) in &self.keywords {
            map.insert(keyword.clone(), value.clone());
        }
        Value::Object(map)
    }
}

impl From<SchemaNode> for Value {
    fn from(node: SchemaNode) -> Self {
        node.to_value()
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Empty object schema with an optional tag.
pub fn get_base_schema(tag: Option<&str>) -> SchemaNode {
    SchemaNode::new(tag.unwrap_or(""))
}

/// Base schema declaring the Draft-07 dialect.
pub fn get_root_schema() -> SchemaNode {
    let mut schema = get_base_schema(None);
    schema.dialect = Some(DRAFT_07.to_string());
    schema
}

/// Root schema for source data and conversion options.
pub fn get_input_schema() -> SchemaNode {
    let mut schema = get_root_schema();
    schema.title = Some("Source data and conversion options".to_string());
    schema.description = Some("Schema for the source data and conversion options".to_string());
    schema.version = Some("0.1.0".to_string());
    schema
}

/// Strip root-level keywords so a root schema can be embedded as a subsection.
pub fn unroot_schema(schema: &Value) -> Value {
    const TERMS: [&str; 6] = [
        "required",
        "properties",
        "type",
        "additionalProperties",
        "title",
        "description",
    ];
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| TERMS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Copy values from `defaults` into the `default` keyword of matching properties.
///
/// Object-typed properties recurse. Existing defaults are only replaced when
/// `overwrite` is set.
pub fn fill_defaults(schema: &mut Value, defaults: &Value, overwrite: bool) {
    let Some(properties) = schema.get_mut("properties").and_then(Value::as_object_mut) else {
        return;
    };
    for (key, property) in properties.iter_mut() {
        let Some(default) = defaults.get(key) else {
            continue;
        };
        if property.get("type").and_then(Value::as_str) == Some("object") {
            fill_defaults(property, default, overwrite);
        } else if let Some(property) = property.as_object_mut() {
            if overwrite || !property.contains_key("default") {
                property.insert("default".into(), default.clone());
            }
        }
    }
}
