use log::debug;
use serde_json::{json, Map, Value};

use super::builder::schema_for_class;
use super::classes::{LINKABLE_CLASSES, SKIPPED_CLASS};
use super::descriptor::{Annotation, ParameterDefault, ParameterDescriptor, TypeKind};
use super::SchemaError;

/// Result of mapping a single parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyMapping {
    /// The property schema to place under `properties`
    Property(Value),
    /// The parameter has no schema representation and is left out
    Skip,
}

/// Map one docval-style parameter to its property schema.
///
/// Rules are tried in order: number, string, date-time string, link to a
/// linkable object, always-skipped type, nested NWB object (as a singleton
/// array), anything else is skipped. A non-null default is attached under
/// `default`.
pub fn map_parameter(descriptor: &ParameterDescriptor) -> Result<PropertyMapping, SchemaError> {
    map_parameter_in(&mut Vec::new(), descriptor)
}

pub(super) fn map_parameter_in(
    stack: &mut Vec<String>,
    descriptor: &ParameterDescriptor,
) -> Result<PropertyMapping, SchemaError> {
    let declared = &descriptor.declared;
    let classes = move || declared.members().iter().filter_map(TypeKind::class);

    let mut property = Map::new();
    if declared.any(|k| matches!(k, TypeKind::Float)) {
        property.insert("type".into(), json!("number"));
        property.insert("description".into(), json!(descriptor.doc));
    } else if declared.any(|k| matches!(k, TypeKind::Str)) {
        property.insert("type".into(), json!("string"));
        property.insert("description".into(), json!(descriptor.doc));
    } else if declared.any(|k| matches!(k, TypeKind::DateTime)) {
        property.insert("type".into(), json!("string"));
        property.insert("description".into(), json!(descriptor.doc));
        property.insert("format".into(), json!("date-time"));
    } else if let Some(target) = classes().find(|c| LINKABLE_CLASSES.contains(c)) {
        property.insert("type".into(), json!("string"));
        property.insert("description".into(), json!(descriptor.doc));
        property.insert("target".into(), json!(target.qualified_name()));
    } else if classes().any(|c| c == SKIPPED_CLASS) {
        return Ok(PropertyMapping::Skip);
    } else if let Some(nested) = classes().find(|c| c.is_nwb_object()) {
        let item = schema_for_class(stack, nested)?;
        // Exactly one nested instance, expressed as a singleton array.
        property.insert("type".into(), json!("array"));
        property.insert("description".into(), json!(descriptor.doc));
        property.insert("items".into(), Value::Array(vec![item.to_value()]));
        property.insert("minItems".into(), json!(1));
        property.insert("maxItems".into(), json!(1));
    } else {
        debug!(
            "No schema mapping for parameter '{}' ({:?}), omitting it",
            descriptor.name, declared
        );
        return Ok(PropertyMapping::Skip);
    }

    if let ParameterDefault::Value(default) = descriptor.default {
        property.insert("default".into(), default.to_json());
    }
    Ok(PropertyMapping::Property(Value::Object(property)))
}

/// Map a plain type annotation to a property schema; `None` means omit.
pub fn map_annotation(annotation: &Annotation) -> Option<Map<String, Value>> {
    let mut property = Map::new();
    match annotation {
        Annotation::Bool => {
            property.insert("type".into(), json!("boolean"));
        }
        Annotation::Str | Annotation::Unannotated => {
            property.insert("type".into(), json!("string"));
        }
        Annotation::Int | Annotation::Float => {
            property.insert("type".into(), json!("number"));
        }
        Annotation::Dict => {
            property.insert("type".into(), json!("object"));
        }
        Annotation::List => {
            property.insert("type".into(), json!("array"));
        }
        Annotation::FilePath => {
            property.insert("type".into(), json!("string"));
            property.insert("format".into(), json!("file"));
        }
        Annotation::FolderPath => {
            property.insert("type".into(), json!("string"));
            property.insert("format".into(), json!("directory"));
        }
        Annotation::Optional(inner) => return map_annotation(inner),
        Annotation::Other(_) => return None,
    }
    Some(property)
}
