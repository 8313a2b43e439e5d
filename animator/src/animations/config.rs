//! Shared plumbing for turning the raw key/value configuration an animation
//! is started with into its typed config struct.
//!
//! Every config derives `Deserialize` with `#[serde(default, deny_unknown_fields)]`
//! and checks its numeric ranges in a separate `validate` step. Missing keys and
//! explicit `null`s resolve to the default. Whole-number floats such as `3.0`
//! are accepted wherever an integer is expected.

use std::fmt::Debug;
use std::ops::RangeBounds;

use lightfx::Color;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for `{field}`: {reason}")]
pub struct ConfigError {
    pub field: String,
    pub reason: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Deserializes `value` into `T`, naming the offending field or unknown key
/// on failure. A top level value that is not a map is reported as `config`.
pub fn deserialize<T: DeserializeOwned>(value: &Value) -> Result<T, ConfigError> {
    let value = match value {
        Value::Null => Value::Object(Map::new()),
        value => normalized(value),
    };

    serde_path_to_error::deserialize(value).map_err(|e| {
        let field = match e.path().to_string() {
            path if path == "." => "config".to_owned(),
            path => path,
        };
        ConfigError::new(field, e.into_inner().to_string())
    })
}

pub fn check_range<T, R>(field: impl Into<String>, value: T, range: R) -> Result<(), ConfigError>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::new(
            field,
            format!("{value:?} is outside of {range:?}"),
        ))
    }
}

/// Colours are written as `[r, g, b]` lists.
pub fn rgb<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
    <[u8; 3]>::deserialize(deserializer).map(Color::from)
}

fn normalized(value: &Value) -> Value {
    match value {
        Value::Object(values) => values
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), normalized(value)))
            .collect::<Map<_, _>>()
            .into(),
        Value::Array(items) => items.iter().map(normalized).collect(),
        Value::Number(number) => whole_number(number).unwrap_or_else(|| value.clone()),
        value => value.clone(),
    }
}

fn whole_number(number: &Number) -> Option<Value> {
    let float = number.as_f64().filter(|_| number.is_f64())?;
    if float.fract() != 0.0 {
        None
    } else if (0.0..=u64::MAX as f64).contains(&float) {
        Some((float as u64).into())
    } else if (i64::MIN as f64..0.0).contains(&float) {
        Some((float as i64).into())
    } else {
        None
    }
}
