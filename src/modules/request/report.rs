// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::LazyLock;

use regex::Regex;

use crate::modules::catalog::{self, SearchDomain};
use crate::modules::common::params::ActionParams;
use crate::modules::error::{code::ErrorCode, SmaBridgeResult};
use crate::raise_error;

use super::{apply_paging, positive, table, time_window, SmaRequest};

// Report names become a path segment.
static REPORT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-]+$").expect("static regex"));

pub fn statistics(params: &ActionParams) -> SmaBridgeResult<(String, SmaRequest)> {
    let table = &table::GET_STATISTICS_REPORT;
    table.check_required(params)?;
    let report_type = params.required("report_type")?;
    if !REPORT_NAME.is_match(&report_type) {
        return Err(raise_error!(
            format!(
                "Invalid parameter 'report_type': '{}' (letters, digits, '_' and '-' only)",
                report_type
            ),
            ErrorCode::InvalidParameter
        ));
    }
    let (start, end) = time_window(params, "start_date", "end_date")?;

    let mut request = SmaRequest::get(format!("/reporting/{}", report_type));
    request.push_query("startDate", start);
    request.push_query("endDate", end);
    if let Some(device) = params.text("device_type") {
        request.push_query(
            "device_type",
            catalog::check_choice("device_type", &device, catalog::REPORT_DEVICE_TYPES)?,
        );
    }
    table.apply_filters(SearchDomain::Statistics, params, &mut request)?;
    if let Some(order_by) = params.text("order_by") {
        request.push_query("orderBy", order_by);
    }
    if let Some(direction) = params.text("order_direction") {
        request.push_query(
            "orderDir",
            catalog::check_choice("order_direction", &direction, catalog::ORDER_DIRECTIONS)?,
        );
    }
    apply_paging(params, &mut request)?;
    if let Some(top) = positive(params, "top")? {
        request.push_query("top", top.to_string());
    }
    Ok((report_type, request))
}
