//! Deep-merge and list helpers for metadata documents.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use super::MetadataError;

/// Merge `overrides` on top of `base`, returning a new document.
///
/// Objects merge key by key. Everything else, arrays included, is replaced
/// wholesale by the override.
pub fn deep_merge(base: &Value, overrides: &Value) -> Value {
    let mut merged = base.clone();
    dict_deep_update(&mut merged, overrides);
    merged
}

/// In-place form of [`deep_merge`].
pub fn dict_deep_update(target: &mut Value, overrides: &Value) {
    match (target, overrides) {
        (Value::Object(target), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match target.get_mut(key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        dict_deep_update(existing, value);
                        continue;
                    }
                    _ => {}
                }
                target.insert(key.clone(), value.clone());
            }
        }
        (target, overrides) => *target = overrides.clone(),
    }
}

/// Whether `list` already contains an element equal to `d`.
pub fn exist_dict_in_list(d: &Value, list: &[Value]) -> bool {
    list.iter().any(|item| item == d)
}

/// Replace the element of `list` whose `key` equals `d[key]`, else append `d`.
///
/// The replaced element is deep-updated with `d`, so keys only present in the
/// existing element survive.
pub fn append_replace_dict_in_list(list: &mut Vec<Value>, d: Value, key: &str) {
    let position = d
        .get(key)
        .and_then(|wanted| list.iter().position(|item| item.get(key) == Some(wanted)));
    match position {
        Some(index) => dict_deep_update(&mut list[index], &d),
        None => list.push(d),
    }
}

/// Load a metadata document from a `.json`, `.yaml` or `.yml` file.
pub fn load_dict_from_file(path: &Path) -> Result<Value, MetadataError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?),
        Some("yaml") | Some("yml") => {
            Ok(serde_yaml::from_reader(BufReader::new(File::open(path)?))?)
        }
        _ => Err(MetadataError::UnsupportedFileType(path.display().to_string())),
    }
}
