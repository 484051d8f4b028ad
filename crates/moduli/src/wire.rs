//! Shared wire helpers: lenient deserialisers and schema-level checks.

use crate::{ModuliError, ModuliResult};
use cartella_types::{NonEmptyText, TextError};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialise a single-select value.
///
/// Stored documents may carry numeric or boolean option identifiers; these are coerced to their
/// string form so they compare equal to the rendered option identifiers. `null`, a missing key and
/// the empty string all mean "nothing selected".
pub(crate) fn choice<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected an option identifier, found {other}"
        ))),
    }
}

/// Deserialise a multi-select value.
///
/// Anything that is not an array selects nothing; non-string array items are dropped.
pub(crate) fn option_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

fn invalid(path: &str, reason: impl Into<String>) -> ModuliError {
    ModuliError::InvalidValue {
        path: path.to_string(),
        reason: reason.into(),
    }
}

pub(crate) fn check_choice(
    path: &str,
    value: &Option<String>,
    vocabulary: &[&str],
) -> ModuliResult<()> {
    match value {
        Some(v) if !vocabulary.contains(&v.as_str()) => {
            Err(invalid(path, format!("'{v}' is not one of {vocabulary:?}")))
        }
        _ => Ok(()),
    }
}

pub(crate) fn check_options(path: &str, values: &[String], vocabulary: &[&str]) -> ModuliResult<()> {
    for v in values {
        if !vocabulary.contains(&v.as_str()) {
            return Err(invalid(path, format!("'{v}' is not one of {vocabulary:?}")));
        }
    }
    Ok(())
}

pub(crate) fn check_int(path: &str, value: Option<i64>, min: i64, max: Option<i64>) -> ModuliResult<()> {
    let Some(v) = value else {
        return Ok(());
    };
    if v < min {
        return Err(invalid(path, format!("{v} is below the minimum of {min}")));
    }
    if let Some(max) = max {
        if v > max {
            return Err(invalid(path, format!("{v} is above the maximum of {max}")));
        }
    }
    Ok(())
}

pub(crate) fn check_float(path: &str, value: Option<f64>, min: f64, max: Option<f64>) -> ModuliResult<()> {
    let Some(v) = value else {
        return Ok(());
    };
    if !v.is_finite() {
        return Err(invalid(path, "must be a finite number"));
    }
    if v < min {
        return Err(invalid(path, format!("{v} is below the minimum of {min}")));
    }
    if let Some(max) = max {
        if v > max {
            return Err(invalid(path, format!("{v} is above the maximum of {max}")));
        }
    }
    Ok(())
}

/// Length check on trimmed text; blank text passes.
pub(crate) fn check_len(path: &str, value: &Option<String>, max: usize) -> ModuliResult<()> {
    let Some(v) = value else {
        return Ok(());
    };
    match NonEmptyText::bounded(v, max) {
        Err(e @ TextError::TooLong { .. }) => Err(invalid(path, e.to_string())),
        Ok(_) | Err(TextError::Empty) => Ok(()),
    }
}

/// Strictly deserialise `T`, reporting the path of the first mismatching field.
pub(crate) fn from_value_with_path<T>(label: &str, value: Value) -> ModuliResult<T>
where
    T: serde::de::DeserializeOwned,
{
    match serde_path_to_error::deserialize(value) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>"
            } else {
                path.as_str()
            };
            Err(ModuliError::Translation(format!(
                "{label} schema mismatch at {path}: {source}"
            )))
        }
    }
}
