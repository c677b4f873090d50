// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

//! Response normalization.
//!
//! Each appliance endpoint answers with its own JSON layout. The functions in the
//! submodules map one layout each into [`NormalizedResult`], whose summary counters
//! are always derived the same way:
//!
//! * `<noun>_returned` is the number of records produced here, never a backend figure.
//! * `total_<noun>` is `meta.totalCount` when the appliance reports it, otherwise equal
//!   to the returned count. It is never smaller than the returned count.

use serde_json::{Map, Value};
use tracing::warn;

use crate::modules::error::{code::ErrorCode, SmaBridgeResult};
use crate::raise_error;

pub mod list;
pub mod quarantine;
pub mod report;
pub mod tracking;

#[cfg(test)]
mod tests;

pub type Record = Map<String, Value>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedResult {
    pub data: Vec<Record>,
    pub summary: Map<String, Value>,
    /// Entries of a multi-record payload that were not JSON objects.
    pub skipped: usize,
}

impl NormalizedResult {
    pub fn single(record: Record) -> Self {
        Self {
            data: vec![record],
            ..Default::default()
        }
    }

    pub fn with_summary(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.summary.insert(key.to_string(), value.into());
        self
    }
}

/// Top-level `data` member of an appliance response.
pub(crate) fn data(raw: &Value) -> &Value {
    raw.get("data").unwrap_or(&Value::Null)
}

pub(crate) fn meta<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    raw.get("meta").and_then(|meta| meta.get(key))
}

/// Counts may arrive as numbers or numeric strings.
pub(crate) fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Nested objects become dotted keys; arrays and scalars are kept as they are.
pub fn flatten(object: &Map<String, Value>) -> Record {
    let mut record = Record::new();
    flatten_into(&mut record, None, object);
    record
}

fn flatten_into(record: &mut Record, prefix: Option<&str>, object: &Map<String, Value>) {
    for (key, value) in object {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => {
                flatten_into(record, Some(&path), nested)
            }
            other => {
                record.insert(path, other.clone());
            }
        }
    }
}

/// Splits a multi-record payload into records, counting entries that are not objects.
/// A lone object is one record; `null` is none.
pub(crate) fn collect_records(value: &Value, flat: bool) -> SmaBridgeResult<(Vec<Record>, usize)> {
    let convert = |object: &Map<String, Value>| {
        if flat {
            flatten(object)
        } else {
            object.clone()
        }
    };
    match value {
        Value::Null => Ok((Vec::new(), 0)),
        Value::Object(object) => Ok((vec![convert(object)], 0)),
        Value::Array(items) => {
            let mut records = Vec::with_capacity(items.len());
            let mut skipped = 0;
            for item in items {
                match item {
                    Value::Object(object) => records.push(convert(object)),
                    _ => skipped += 1,
                }
            }
            if skipped > 0 {
                warn!(skipped, "Ignoring non-object entries in appliance response");
            }
            Ok((records, skipped))
        }
        other => Err(unexpected(&format!(
            "expected a list of records, got {}",
            other
        ))),
    }
}

/// Builds the `total_<noun>`/`<noun>_returned` pair for a search result.
pub(crate) fn search_result(
    raw: &Value,
    records: Vec<Record>,
    skipped: usize,
    noun: &str,
) -> NormalizedResult {
    let returned = records.len() as u64;
    let reported = meta(raw, "totalCount").and_then(as_count);
    let total = match reported {
        Some(total) if total < returned => {
            warn!(
                reported = total,
                returned, "Appliance reported fewer {} than it returned", noun
            );
            returned
        }
        Some(total) => total,
        None => returned,
    };
    NormalizedResult {
        data: records,
        summary: Map::new(),
        skipped,
    }
    .with_summary(&format!("total_{}", noun), total)
    .with_summary(&format!("{}_returned", noun), returned)
}

pub(crate) fn unexpected(detail: &str) -> crate::modules::error::SmaBridgeError {
    raise_error!(
        format!("Unexpected appliance response: {}", detail),
        ErrorCode::UnexpectedResponse
    )
}

/// Detail payloads are kept whole.
pub(crate) fn object<'a>(value: &'a Value, what: &str) -> SmaBridgeResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| unexpected(&format!("{} is not an object", what)))
}
