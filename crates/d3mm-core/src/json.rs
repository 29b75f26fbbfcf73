//! Property-extraction helpers for hand-walked JSON parsing.
//!
//! Catalog documents are parsed off `serde_json::Value` trees rather than
//! derived structs so that every schema violation can be reported with the
//! offending property path, and unknown properties can warn instead of
//! failing. Serializers only emit populated fields; parsers treat a missing
//! optional as `None` and a present-but-mistyped value as a hard error.

use crate::error::CatalogError;
use serde_json::{Map, Value};

/// Borrow `value` as an object, or fail naming `path`.
pub(crate) fn as_object<'v>(
    value: &'v Value,
    path: &str,
) -> Result<&'v Map<String, Value>, CatalogError> {
    value
        .as_object()
        .ok_or_else(|| CatalogError::schema(path, "expected an object"))
}

/// Borrow `value` as an array, or fail naming `path`.
pub(crate) fn as_array<'v>(value: &'v Value, path: &str) -> Result<&'v Vec<Value>, CatalogError> {
    value
        .as_array()
        .ok_or_else(|| CatalogError::schema(path, "expected an array"))
}

/// Fetch a required string property.
pub(crate) fn require_string(
    object: &Map<String, Value>,
    name: &str,
    path: &str,
) -> Result<String, CatalogError> {
    match object.get(name) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(CatalogError::schema(
            format!("{path}.{name}"),
            "expected a string",
        )),
        None => Err(CatalogError::schema(
            format!("{path}.{name}"),
            "missing required property",
        )),
    }
}

/// Fetch a required non-empty string property.
pub(crate) fn require_non_empty_string(
    object: &Map<String, Value>,
    name: &str,
    path: &str,
) -> Result<String, CatalogError> {
    let value = require_string(object, name, path)?;

    if value.trim().is_empty() {
        return Err(CatalogError::schema(
            format!("{path}.{name}"),
            "property must not be empty",
        ));
    }

    Ok(value)
}

/// Fetch an optional string property; absent yields `None`, a wrong type is
/// an error.
pub(crate) fn optional_string(
    object: &Map<String, Value>,
    name: &str,
    path: &str,
) -> Result<Option<String>, CatalogError> {
    match object.get(name) {
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(CatalogError::schema(
            format!("{path}.{name}"),
            "expected a string",
        )),
        None => Ok(None),
    }
}

/// Fetch an optional boolean property.
pub(crate) fn optional_bool(
    object: &Map<String, Value>,
    name: &str,
    path: &str,
) -> Result<Option<bool>, CatalogError> {
    match object.get(name) {
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(CatalogError::schema(
            format!("{path}.{name}"),
            "expected a boolean",
        )),
        None => Ok(None),
    }
}

/// Fetch a required unsigned integer property.
pub(crate) fn require_u64(
    object: &Map<String, Value>,
    name: &str,
    path: &str,
) -> Result<u64, CatalogError> {
    match object.get(name) {
        Some(value) => value.as_u64().ok_or_else(|| {
            CatalogError::schema(format!("{path}.{name}"), "expected an unsigned integer")
        }),
        None => Err(CatalogError::schema(
            format!("{path}.{name}"),
            "missing required property",
        )),
    }
}

/// Fetch an optional unsigned integer property.
pub(crate) fn optional_u64(
    object: &Map<String, Value>,
    name: &str,
    path: &str,
) -> Result<Option<u64>, CatalogError> {
    match object.get(name) {
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| {
                CatalogError::schema(format!("{path}.{name}"), "expected an unsigned integer")
            }),
        None => Ok(None),
    }
}

/// Fetch an optional string-array property.
pub(crate) fn optional_string_array(
    object: &Map<String, Value>,
    name: &str,
    path: &str,
) -> Result<Vec<String>, CatalogError> {
    let Some(value) = object.get(name) else {
        return Ok(Vec::new());
    };

    let items = as_array(value, &format!("{path}.{name}"))?;
    let mut strings = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        match item {
            Value::String(item) => strings.push(item.clone()),
            _ => {
                return Err(CatalogError::schema(
                    format!("{path}.{name}[{index}]"),
                    "expected a string",
                ));
            }
        }
    }

    Ok(strings)
}

/// Warn (never fail) about properties outside the known set.
pub(crate) fn warn_unknown_properties(
    object: &Map<String, Value>,
    known: &[&str],
    path: &str,
) {
    for name in object.keys() {
        if !known.iter().any(|known| known == name) {
            tracing::warn!("'{path}' has unexpected property '{name}'");
        }
    }
}

/// Insert `name: value` only when the string is non-empty.
pub(crate) fn put_non_empty(object: &mut Map<String, Value>, name: &str, value: &str) {
    if !value.is_empty() {
        object.insert(name.to_string(), Value::String(value.to_string()));
    }
}

/// Insert `name: value` only when the optional is populated.
pub(crate) fn put_optional(object: &mut Map<String, Value>, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        object.insert(name.to_string(), Value::String(value.to_string()));
    }
}

/// Insert `name: value` only when the optional boolean is populated.
pub(crate) fn put_optional_bool(object: &mut Map<String, Value>, name: &str, value: Option<bool>) {
    if let Some(value) = value {
        object.insert(name.to_string(), Value::Bool(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_string_errors_name_the_property() {
        let object = json!({ "name": 7 });
        let object = object.as_object().unwrap();

        let error = require_string(object, "name", "mod").unwrap_err();
        assert!(error.to_string().contains("mod.name"), "{error}");

        let error = require_string(object, "id", "mod").unwrap_err();
        assert!(error.to_string().contains("mod.id"), "{error}");
        assert!(error.to_string().contains("missing"), "{error}");
    }

    #[test]
    fn optional_values_distinguish_absent_from_mistyped() {
        let object = json!({ "shared": "yes" });
        let object = object.as_object().unwrap();

        assert!(optional_bool(object, "shared", "file").is_err());
        assert_eq!(optional_bool(object, "missing", "file").unwrap(), None);
    }

    #[test]
    fn string_arrays_report_the_offending_index() {
        let object = json!({ "notes": ["fine", 3] });
        let object = object.as_object().unwrap();

        let error = optional_string_array(object, "notes", "mod").unwrap_err();
        assert!(error.to_string().contains("mod.notes[1]"), "{error}");
    }

    #[test]
    fn serializers_skip_empty_and_absent() {
        let mut object = Map::new();
        put_non_empty(&mut object, "a", "");
        put_optional(&mut object, "b", None);
        put_optional_bool(&mut object, "c", None);
        put_non_empty(&mut object, "d", "x");

        assert_eq!(object.len(), 1);
        assert_eq!(object.get("d"), Some(&Value::String("x".into())));
    }
}
