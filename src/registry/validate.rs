//! Draft-07 validation with exhaustive, path-tagged error collection.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, Validator};
use serde::Serialize;
use serde_json::Value;

use super::MetadataError;

/// Machine-readable category of a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationFailure {
    /// A required key is absent
    MissingRequired {
        /// Name of the missing key
        property: String,
    },
    /// Keys that neither `properties` nor `patternProperties` allow
    UnexpectedProperties {
        /// The offending keys
        keys: Vec<String>,
    },
    /// An object with fewer keys than `minProperties`
    TooFewProperties {
        /// Minimum number of keys
        limit: u64,
    },
    /// Any other keyword violation (type, format, items, ...)
    Other,
}

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataValidationError {
    /// JSON path of the failing instance, e.g. `$.Ophys.Fluorescence`
    pub path: String,
    /// Human-readable message
    pub message: String,
    /// Failure category
    #[serde(flatten)]
    pub kind: ValidationFailure,
}

fn compile(schema: &Value) -> Result<Validator, MetadataError> {
    jsonschema::options()
        .with_draft(Draft::Draft7)
        .should_validate_formats(false)
        .build(schema)
        .map_err(|err| MetadataError::InvalidSchema(err.to_string()))
}

/// Check that `schema` is itself a valid Draft-07 schema document.
pub fn check_schema(schema: &Value) -> Result<(), MetadataError> {
    compile(schema).map(|_| ())
}

/// Validate `document` against `schema` and return every violation.
///
/// Validation never stops at the first error. Errors are ordered by path and
/// then message so the output is stable.
pub fn validate(
    document: &Value,
    schema: &Value,
) -> Result<Vec<MetadataValidationError>, MetadataError> {
    let validator = compile(schema)?;
    let mut errors: Vec<MetadataValidationError> = validator
        .iter_errors(document)
        .map(|error| {
            let kind = match &error.kind {
                ValidationErrorKind::Required { property } => ValidationFailure::MissingRequired {
                    property: property
                        .as_str()
                        .map_or_else(|| property.to_string(), str::to_string),
                },
                ValidationErrorKind::AdditionalProperties { unexpected } => {
                    ValidationFailure::UnexpectedProperties {
                        keys: unexpected.clone(),
                    }
                }
                ValidationErrorKind::MinProperties { limit } => {
                    ValidationFailure::TooFewProperties { limit: *limit }
                }
                _ => ValidationFailure::Other,
            };
            MetadataValidationError {
                path: json_path(document, &error.instance_path.to_string()),
                message: error.to_string(),
                kind,
            }
        })
        .collect();
    errors.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.message.cmp(&b.message)));
    Ok(errors)
}

/// Strict form of [`validate`]: any violation is an error.
pub fn validate_metadata(document: &Value, schema: &Value) -> Result<(), MetadataError> {
    let errors = validate(document, schema)?;
    if errors.is_empty() {
        Ok(())
    } else {
        Err(MetadataError::Invalid(errors))
    }
}

/// Convert a JSON pointer into `$.a.b[0]` notation.
///
/// Array indices are told apart from numeric object keys by walking
/// `document` along the pointer.
pub fn json_path(document: &Value, pointer: &str) -> String {
    let mut path = String::from("$");
    let mut current = Some(document);
    for token in pointer.split('/').skip(1) {
        let token = token.replace("~1", "/").replace("~0", "~");
        match current {
            Some(Value::Array(items)) => {
                let index = token.parse::<usize>().ok();
                path.push_str(&format!("[{token}]"));
                current = index.and_then(|i| items.get(i));
            }
            Some(Value::Object(map)) => {
                path.push('.');
                path.push_str(&token);
                current = map.get(&token);
            }
            _ => {
                path.push('.');
                path.push_str(&token);
                current = None;
            }
        }
    }
    path
}
