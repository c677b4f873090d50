// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::{json, Value};

use crate::modules::error::SmaBridgeResult;

use super::{collect_records, data, meta, object, search_result, NormalizedResult};

/// `bad_records` is what the appliance itself could not classify; it is passed on
/// untouched and has no bearing on the other counters.
pub fn search(raw: &Value) -> SmaBridgeResult<NormalizedResult> {
    let (records, skipped) = collect_records(data(raw), true)?;
    let bad_records = meta(raw, "num_bad_records").cloned().unwrap_or(json!(0));
    Ok(search_result(raw, records, skipped, "messages").with_summary("bad_records", bad_records))
}

pub fn details(raw: &Value) -> SmaBridgeResult<NormalizedResult> {
    let messages = data(raw).get("messages").unwrap_or(&Value::Null);
    let message = object(messages, "tracking details")?;
    let field = |key: &str| message.get(key).cloned().unwrap_or(Value::Null);
    let (subject, status, direction) = (
        field("subject"),
        field("messageStatus"),
        field("direction"),
    );
    Ok(NormalizedResult::single(message.clone())
        .with_summary("subject", subject)
        .with_summary("status", status)
        .with_summary("direction", direction))
}
