// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::{Map, Value};

use crate::modules::common::{date, list_value};
use crate::modules::error::{code::ErrorCode, SmaBridgeResult};
use crate::raise_error;

/// Typed access to the loosely-typed parameter object an action is invoked with.
///
/// The host may send any JSON scalar for a parameter; strings are trimmed and a
/// blank string counts as "not supplied", the same as `null` or a missing key.
#[derive(Clone, Debug, Default)]
pub struct ActionParams(Map<String, Value>);

impl ActionParams {
    pub fn from_value(value: Value) -> SmaBridgeResult<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self(map)),
            other => Err(raise_error!(
                format!(
                    "Action parameters must be a JSON object, got: {}",
                    json_kind(&other)
                ),
                ErrorCode::InvalidParameter
            )),
        }
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.0.get(name).and_then(scalar_text)
    }

    pub fn is_present(&self, name: &str) -> bool {
        match self.0.get(name) {
            Some(Value::Array(items)) => items.iter().any(|item| scalar_text(item).is_some()),
            Some(value) => scalar_text(value).is_some(),
            None => false,
        }
    }

    pub fn required(&self, name: &str) -> SmaBridgeResult<String> {
        self.text(name).ok_or_else(|| missing(name))
    }

    /// Multi-value parameter: a comma-separated string or a JSON array.
    pub fn list(&self, name: &str) -> Vec<String> {
        match self.0.get(name) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(value) => scalar_text(value)
                .map(|raw| list_value::split(&raw))
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    pub fn unsigned(&self, name: &str) -> SmaBridgeResult<Option<u64>> {
        let Some(value) = self.0.get(name) else {
            return Ok(None);
        };
        let invalid = || {
            raise_error!(
                format!(
                    "Invalid parameter '{}': expected a non-negative integer, got {}",
                    name, value
                ),
                ErrorCode::InvalidParameter
            )
        };
        match value {
            Value::Null => Ok(None),
            Value::Number(number) => {
                if let Some(n) = number.as_u64() {
                    return Ok(Some(n));
                }
                match number.as_f64() {
                    Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                        Ok(Some(f as u64))
                    }
                    _ => Err(invalid()),
                }
            }
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => s.trim().parse::<u64>().map(Some).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    pub fn date(&self, name: &str) -> SmaBridgeResult<Option<String>> {
        self.text(name)
            .map(|raw| date::normalize_field(name, &raw))
            .transpose()
    }
}

impl From<Map<String, Value>> for ActionParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

pub fn missing(name: &str) -> crate::modules::error::SmaBridgeError {
    raise_error!(
        format!("Parameter '{}' is required", name),
        ErrorCode::MissingParameter
    )
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            (!parts.is_empty()).then(|| list_value::join(&parts))
        }
        Value::Null | Value::Object(_) => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
