use log::debug;

use super::descriptor::{
    ClassSpec, MethodSignature, ParameterDefault, ParameterDescriptor, ParameterKind,
};
use super::mapper::{map_annotation, map_parameter_in, PropertyMapping};
use super::node::{get_base_schema, SchemaNode};
use super::SchemaError;

/// Build an object schema from a constructor's parameter table.
///
/// `allow_extra` becomes `additionalProperties`. Parameters without a
/// default are required unless the Type Mapper drops them.
pub fn build_schema(
    params: &[ParameterDescriptor],
    allow_extra: bool,
) -> Result<SchemaNode, SchemaError> {
    build_schema_in(&mut Vec::new(), params, allow_extra)
}

fn build_schema_in(
    stack: &mut Vec<String>,
    params: &[ParameterDescriptor],
    allow_extra: bool,
) -> Result<SchemaNode, SchemaError> {
    let mut schema = get_base_schema(None);
    for param in params {
        match map_parameter_in(stack, param)? {
            PropertyMapping::Skip => continue,
            PropertyMapping::Property(property) => {
                if matches!(param.default, ParameterDefault::Required) {
                    schema.require(param.name);
                }
                schema.insert_property(param.name, property);
            }
        }
    }
    schema.additional_properties = allow_extra;
    Ok(schema)
}

/// Schema for a docval-style class, tagged with its qualified name.
pub fn get_schema_from_hdmf_class(class: &ClassSpec) -> Result<SchemaNode, SchemaError> {
    schema_for_class(&mut Vec::new(), class)
}

pub(super) fn schema_for_class(
    stack: &mut Vec<String>,
    class: &ClassSpec,
) -> Result<SchemaNode, SchemaError> {
    let qualified = class.qualified_name();
    if stack.contains(&qualified) {
        let mut chain = stack.clone();
        chain.push(qualified);
        return Err(SchemaError::CyclicReference(chain.join(" -> ")));
    }

    stack.push(qualified.clone());
    let built = build_schema_in(stack, class.params, class.allow_extra.unwrap_or(false));
    stack.pop();

    let mut schema = built?;
    schema.tag = qualified;
    Ok(schema)
}

/// Schema for a plain method signature, e.g. an interface constructor.
///
/// The receiver and any names in `exclude` are ignored. A `**kwargs`
/// parameter turns on `additionalProperties`; `*args` cannot be expressed
/// and fails.
pub fn get_schema_from_method_signature(
    signature: &MethodSignature,
    exclude: &[&str],
) -> Result<SchemaNode, SchemaError> {
    let mut schema = get_base_schema(None);
    for param in signature.params {
        match param.kind {
            ParameterKind::Receiver | ParameterKind::VarKeyword => continue,
            ParameterKind::VarPositional => {
                return Err(SchemaError::UnsupportedParameterKind {
                    owner: signature.owner.to_string(),
                    parameter: param.name.to_string(),
                    kind: "variadic positional",
                });
            }
            ParameterKind::PositionalOrKeyword | ParameterKind::KeywordOnly => {}
        }
        if exclude.contains(&param.name) {
            continue;
        }

        let Some(mut property) = map_annotation(&param.annotation) else {
            debug!(
                "{}: annotation of '{}' has no schema mapping, omitting it",
                signature.owner, param.name
            );
            continue;
        };
        match param.default {
            ParameterDefault::Required => schema.require(param.name),
            ParameterDefault::Null => {}
            ParameterDefault::Value(default) => {
                property.insert("default".into(), default.to_json());
            }
        }
        schema.insert_property(param.name, property);
    }
    schema.additional_properties = signature.accepts_var_keyword();
    Ok(schema)
}
