//! Patch documents for partial updates.
//!
//! # Purpose
//! Implements a JSON Patch style document (`add`, `remove`, `replace`,
//! `move`, `copy`, `test`) applied to a flat update shape. Partial updates
//! load the current record, map it to its update shape, apply the document,
//! and write the result back.
//!
//! # Key invariants
//! - Paths address top-level fields only (`/name`); names match
//!   case-insensitively against the shape's wire names.
//! - Every operation must leave the shape deserializable; a value that does
//!   not fit the field is rejected and the field keeps its previous value.
//! - `remove` resets a field to its default: `null` when the field accepts it,
//!   otherwise the zero value of its JSON type.
//! - Failures are collected per path; the patched shape is returned only when
//!   every operation succeeded.
use crate::validation::ValidationErrors;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add {
        path: String,
        #[schema(value_type = Object)]
        value: Value,
    },
    Remove {
        path: String,
    },
    Replace {
        path: String,
        #[schema(value_type = Object)]
        value: Value,
    },
    Move {
        from: String,
        path: String,
    },
    Copy {
        from: String,
        path: String,
    },
    Test {
        path: String,
        #[schema(value_type = Object)]
        value: Value,
    },
}

impl PatchOperation {
    pub fn path(&self) -> &str {
        match self {
            PatchOperation::Add { path, .. }
            | PatchOperation::Remove { path }
            | PatchOperation::Replace { path, .. }
            | PatchOperation::Move { path, .. }
            | PatchOperation::Copy { path, .. }
            | PatchOperation::Test { path, .. } => path,
        }
    }
}

pub type PatchDocument = Vec<PatchOperation>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error("the path '{0}' is not a valid field path")]
    InvalidPath(String),
    #[error("the target location '{0}' was not found")]
    UnknownField(String),
    #[error("the field '{0}' cannot be changed")]
    ReadOnly(String),
    #[error("the current value at '{0}' does not match the test value")]
    TestFailed(String),
    #[error("the value at '{path}' is invalid: {message}")]
    InvalidValue { path: String, message: String },
    #[error("the target could not be represented as an object")]
    NotAnObject,
}

/// Apply `document` to `target`, returning the patched copy.
///
/// `read_only` lists wire names that the document may not modify.
///
/// # Errors
/// Returns every failed operation keyed by its path.
pub fn apply_patch<T>(
    target: &T,
    document: &[PatchOperation],
    read_only: &[&str],
) -> Result<T, ValidationErrors>
where
    T: Serialize + DeserializeOwned,
{
    let mut fields = match serde_json::to_value(target) {
        Ok(Value::Object(fields)) => fields,
        _ => return Err(ValidationErrors::single("", PatchError::NotAnObject.to_string())),
    };

    let mut errors = ValidationErrors::new();
    for operation in document {
        if let Err(err) = apply_operation::<T>(&mut fields, operation, read_only) {
            errors.add(operation.path(), err.to_string());
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value(Value::Object(fields))
        .map_err(|err| ValidationErrors::single("", err.to_string()))
}

fn apply_operation<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    operation: &PatchOperation,
    read_only: &[&str],
) -> Result<(), PatchError> {
    match operation {
        PatchOperation::Add { path, value } | PatchOperation::Replace { path, value } => {
            let key = writable_field(fields, path, read_only)?;
            set_field::<T>(fields, &key, path, value.clone())
        }
        PatchOperation::Remove { path } => {
            let key = writable_field(fields, path, read_only)?;
            reset_field::<T>(fields, &key, path)
        }
        PatchOperation::Copy { from, path } => {
            let source = resolve_field(fields, from)?;
            let key = writable_field(fields, path, read_only)?;
            let value = fields.get(&source).cloned().unwrap_or(Value::Null);
            set_field::<T>(fields, &key, path, value)
        }
        PatchOperation::Move { from, path } => {
            let source = writable_field(fields, from, read_only)?;
            let key = writable_field(fields, path, read_only)?;
            if source == key {
                return Ok(());
            }
            let value = fields.get(&source).cloned().unwrap_or(Value::Null);
            let snapshot = fields.clone();
            if let Err(err) = set_field::<T>(fields, &key, path, value) {
                *fields = snapshot;
                return Err(err);
            }
            if let Err(err) = reset_field::<T>(fields, &source, from) {
                *fields = snapshot;
                return Err(err);
            }
            Ok(())
        }
        PatchOperation::Test { path, value } => {
            let key = resolve_field(fields, path)?;
            if fields.get(&key).is_some_and(|current| values_equal(current, value)) {
                Ok(())
            } else {
                Err(PatchError::TestFailed(path.clone()))
            }
        }
    }
}

/// Resolve a `/field` pointer to the matching wire name.
fn resolve_field(fields: &Map<String, Value>, path: &str) -> Result<String, PatchError> {
    let Some(raw) = path.strip_prefix('/') else {
        return Err(PatchError::InvalidPath(path.to_string()));
    };
    if raw.is_empty() || raw.contains('/') {
        return Err(PatchError::InvalidPath(path.to_string()));
    }
    let segment = raw.replace("~1", "/").replace("~0", "~");
    fields
        .keys()
        .find(|key| key.eq_ignore_ascii_case(&segment))
        .cloned()
        .ok_or_else(|| PatchError::UnknownField(path.to_string()))
}

fn writable_field(
    fields: &Map<String, Value>,
    path: &str,
    read_only: &[&str],
) -> Result<String, PatchError> {
    let key = resolve_field(fields, path)?;
    if read_only.iter().any(|name| name.eq_ignore_ascii_case(&key)) {
        return Err(PatchError::ReadOnly(path.to_string()));
    }
    Ok(key)
}

fn set_field<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    key: &str,
    path: &str,
    value: Value,
) -> Result<(), PatchError> {
    let previous = fields.insert(key.to_string(), value);
    if let Err(err) = serde_json::from_value::<T>(Value::Object(fields.clone())) {
        restore(fields, key, previous);
        return Err(PatchError::InvalidValue {
            path: path.to_string(),
            message: err.to_string(),
        });
    }
    Ok(())
}

fn reset_field<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<(), PatchError> {
    let previous = fields.get(key).cloned().unwrap_or(Value::Null);
    if set_field::<T>(fields, key, path, Value::Null).is_ok() {
        return Ok(());
    }
    set_field::<T>(fields, key, path, zero_value(&previous))
}

fn restore(fields: &mut Map<String, Value>, key: &str, previous: Option<Value>) {
    match previous {
        Some(value) => {
            fields.insert(key.to_string(), value);
        }
        None => {
            fields.remove(key);
        }
    }
}

/// JSON equality where numbers compare by value, so `150` matches `150.0`.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64() == b.as_f64(),
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| values_equal(a, b)))
        }
        _ => left == right,
    }
}

fn zero_value(like: &Value) -> Value {
    match like {
        Value::Bool(_) => Value::Bool(false),
        Value::Number(number) if number.is_f64() => serde_json::json!(0.0),
        Value::Number(_) => serde_json::json!(0),
        Value::String(_) => Value::String(String::new()),
        Value::Array(_) => Value::Array(Vec::new()),
        Value::Object(_) => Value::Object(Map::new()),
        Value::Null => Value::Null,
    }
}
