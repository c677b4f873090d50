// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::Value;

use crate::modules::error::SmaBridgeResult;

use super::{collect_records, data, search_result, NormalizedResult};

/// Rows live under `data.resultSet`; a report without rows yields no records.
pub fn statistics(raw: &Value, report_type: &str) -> SmaBridgeResult<NormalizedResult> {
    let rows = data(raw).get("resultSet").unwrap_or(&Value::Null);
    let (records, skipped) = collect_records(rows, true)?;
    Ok(search_result(raw, records, skipped, "records").with_summary("report_type", report_type))
}
