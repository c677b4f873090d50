// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::Value;

use crate::modules::error::SmaBridgeResult;
use crate::modules::list_entry::{ListEntry, ListOperation, ListType, ViewBy};

use super::{as_count, collect_records, data, search_result, NormalizedResult};

pub fn search(raw: &Value, list_type: ListType, view_by: ViewBy) -> SmaBridgeResult<NormalizedResult> {
    let (records, skipped) = collect_records(data(raw), false)?;
    Ok(search_result(raw, records, skipped, "entries")
        .with_summary("list_type", list_type.as_str())
        .with_summary("view_by", view_by.as_str()))
}

pub fn entry(raw: &Value, entry: &ListEntry) -> SmaBridgeResult<NormalizedResult> {
    let echo = data(raw);
    let mut result = NormalizedResult::single(entry.record(echo))
        .with_summary("list_type", entry.list_type.as_str())
        .with_summary("view_by", entry.view_by.as_str());
    if entry.operation == ListOperation::Delete {
        let deleted = echo.get("totalCount").and_then(as_count).unwrap_or(0);
        result = result.with_summary("total_deleted", deleted);
    }
    Ok(result.with_summary("status", "success"))
}
