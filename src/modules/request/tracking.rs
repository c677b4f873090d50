// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::catalog::SearchDomain;
use crate::modules::common::{list_value, params::ActionParams};
use crate::modules::error::{code::ErrorCode, SmaBridgeResult};
use crate::raise_error;

use super::{apply_paging, table, time_window, SmaRequest};

pub const MESSAGES_PATH: &str = "/message-tracking/messages";
pub const DETAILS_PATH: &str = "/message-tracking/details";
pub const DEFAULT_CISCO_HOST: &str = "All_Hosts";

/// Pass-through parameters: (caller name, query key).
const PASS_THROUGH: &[(&str, &str)] = &[
    ("sender", "sender"),
    ("recipient", "recipient"),
    ("subject", "subject"),
    ("message_id", "mid"),
    ("status", "status"),
    ("sender_ip", "senderIp"),
];

pub fn search(params: &ActionParams) -> SmaBridgeResult<SmaRequest> {
    let table = &table::SEARCH_TRACKING_MESSAGES;
    table.check_required(params)?;
    let (start, end) = time_window(params, "start_date", "end_date")?;

    let mut request = SmaRequest::get(MESSAGES_PATH);
    request.push_query("startDate", start);
    request.push_query("endDate", end);
    request.push_query("searchOption", "messages");
    request.push_query(
        "ciscoHost",
        params
            .text("cisco_host")
            .unwrap_or_else(|| DEFAULT_CISCO_HOST.to_string()),
    );
    table.apply_filters(SearchDomain::Tracking, params, &mut request)?;
    for (param, key) in PASS_THROUGH {
        request.push_query_opt(key, params.text(param));
    }
    let attachments = params.list("attachment_name");
    if !attachments.is_empty() {
        request.push_query("attachmentNameValue", list_value::join(&attachments));
    }
    apply_paging(params, &mut request)?;
    Ok(request)
}

pub fn details(params: &ActionParams) -> SmaBridgeResult<SmaRequest> {
    let table = &table::GET_TRACKING_DETAILS;
    table.check_required(params)?;

    let mut request = SmaRequest::get(DETAILS_PATH);
    request.push_query("mid", params.required("mid")?);
    request.push_query_opt("icid", params.text("icid"));
    request.push_query_opt("serialNumber", params.text("serial_number"));

    // The window is optional here, but a half window or a reversed one is still rejected.
    match (params.is_present("start_date"), params.is_present("end_date")) {
        (true, true) => {
            let (start, end) = time_window(params, "start_date", "end_date")?;
            request.push_query("startDate", start);
            request.push_query("endDate", end);
        }
        (false, false) => {}
        (has_start, _) => {
            let (given, absent) = if has_start {
                ("start_date", "end_date")
            } else {
                ("end_date", "start_date")
            };
            return Err(raise_error!(
                format!("Parameter '{}' requires '{}'", given, absent),
                ErrorCode::MissingParameter
            ));
        }
    }
    Ok(request)
}
