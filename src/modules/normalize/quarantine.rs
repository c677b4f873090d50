// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::{json, Value};

use crate::modules::error::SmaBridgeResult;

use super::{collect_records, data, object, search_result, NormalizedResult};

/// Spam and general quarantine searches share one layout. Multi-quarantine results
/// arrive already merged; `inQuarantines` and `quarantineDetails` stay as arrays.
pub fn search(raw: &Value) -> SmaBridgeResult<NormalizedResult> {
    let (records, skipped) = collect_records(data(raw), true)?;
    Ok(search_result(raw, records, skipped, "messages"))
}

pub fn details(raw: &Value) -> SmaBridgeResult<NormalizedResult> {
    let message = object(data(raw), "message details")?;
    let subject = message
        .get("attributes")
        .and_then(|attributes| attributes.get("subject"))
        .cloned()
        .unwrap_or(Value::Null);
    Ok(NormalizedResult::single(message.clone()).with_summary("subject", subject))
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mutation {
    Release,
    Delete,
}

impl Mutation {
    fn verb(&self) -> &'static str {
        match self {
            Mutation::Release => "release",
            Mutation::Delete => "delete",
        }
    }

    fn summary_key(&self) -> &'static str {
        match self {
            Mutation::Release => "total_released",
            Mutation::Delete => "total_deleted",
        }
    }
}

/// Zero affected messages is a successful no-op: the ids no longer matched anything.
pub fn mutation(raw: &Value, mutation: Mutation) -> SmaBridgeResult<NormalizedResult> {
    let mut record = match data(raw) {
        Value::Null => Default::default(),
        value => object(value, "release/delete outcome")?.clone(),
    };
    let total = record
        .get("totalCount")
        .and_then(super::as_count)
        .unwrap_or(0);
    record.insert("totalCount".into(), json!(total));
    let action = match record.get("action") {
        Some(Value::String(action)) => action.clone(),
        _ => mutation.verb().to_string(),
    };
    record.insert("action".into(), json!(action));

    Ok(NormalizedResult::single(record)
        .with_summary(mutation.summary_key(), total)
        .with_summary("action", action))
}
