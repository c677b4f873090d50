// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::{json, Map, Value};

use crate::modules::catalog::{self, SearchDomain};
use crate::modules::common::list_value;
use crate::modules::common::params::{missing, ActionParams};
use crate::modules::error::SmaBridgeResult;

use super::table::{self, ParamTable};
use super::{
    apply_ordering, apply_paging, message_ids, single_message_id, single_quarantine, time_window,
    QuarantineKind, SmaRequest,
};

pub const MESSAGES_PATH: &str = "/quarantine/messages";
pub const DETAILS_PATH: &str = "/quarantine/messages/details";

pub fn search_spam(params: &ActionParams) -> SmaBridgeResult<SmaRequest> {
    let table = &table::SEARCH_SPAM_QUARANTINE;
    table.check_required(params)?;
    let (start, end) = time_window(params, "start_date", "end_date")?;

    let mut request = SmaRequest::get(MESSAGES_PATH);
    request.push_query("startDate", start);
    request.push_query("endDate", end);
    request.push_query("quarantineType", QuarantineKind::Spam.wire_name());
    table.apply_filters(SearchDomain::SpamQuarantine, params, &mut request)?;
    apply_ordering(params, &mut request, catalog::SPAM_ORDER_BY)?;
    apply_paging(params, &mut request)?;
    Ok(request)
}

/// Searches one or more named quarantines in a single call; the appliance merges
/// the result set and tags each message with the quarantines holding it.
pub fn search_general(params: &ActionParams) -> SmaBridgeResult<SmaRequest> {
    let table = &table::SEARCH_QUARANTINE;
    table.check_required(params)?;
    let quarantines = params.list("quarantines");
    if quarantines.is_empty() {
        return Err(missing("quarantines"));
    }
    let (start, end) = time_window(params, "start_date", "end_date")?;

    let mut request = SmaRequest::get(MESSAGES_PATH);
    request.push_query("startDate", start);
    request.push_query("endDate", end);
    request.push_query("quarantineType", QuarantineKind::General.wire_name());
    request.push_query("quarantines", list_value::join(&quarantines));
    table.apply_filters(SearchDomain::GeneralQuarantine, params, &mut request)?;
    apply_ordering(params, &mut request, catalog::GENERAL_ORDER_BY)?;
    apply_paging(params, &mut request)?;
    Ok(request)
}

pub fn details(params: &ActionParams, kind: QuarantineKind) -> SmaBridgeResult<SmaRequest> {
    let table = match kind {
        QuarantineKind::Spam => &table::GET_SPAM_MESSAGE,
        QuarantineKind::General => &table::GET_QUARANTINE_MESSAGE,
    };
    table.check_required(params)?;
    let mid = single_message_id(params, "message_id")?;

    let mut request = SmaRequest::get(DETAILS_PATH);
    request.push_query("mid", mid.to_string());
    if kind == QuarantineKind::General {
        request.push_query("quarantineName", single_quarantine(params, "quarantine_name")?);
    }
    request.push_query("quarantineType", kind.wire_name());
    Ok(request)
}

pub fn release(params: &ActionParams, kind: QuarantineKind) -> SmaBridgeResult<SmaRequest> {
    let table = match kind {
        QuarantineKind::Spam => &table::RELEASE_SPAM_MESSAGE,
        QuarantineKind::General => &table::RELEASE_QUARANTINE_MESSAGE,
    };
    let mut body = mutation_body(table, params, kind)?;
    body.insert("action".into(), json!("release"));
    Ok(SmaRequest::post(MESSAGES_PATH, Value::Object(body)))
}

pub fn delete(params: &ActionParams, kind: QuarantineKind) -> SmaBridgeResult<SmaRequest> {
    let table = match kind {
        QuarantineKind::Spam => &table::DELETE_SPAM_MESSAGE,
        QuarantineKind::General => &table::DELETE_QUARANTINE_MESSAGE,
    };
    let body = mutation_body(table, params, kind)?;
    Ok(SmaRequest::delete(MESSAGES_PATH, Value::Object(body)))
}

fn mutation_body(
    table: &ParamTable,
    params: &ActionParams,
    kind: QuarantineKind,
) -> SmaBridgeResult<Map<String, Value>> {
    table.check_required(params)?;
    let mids = message_ids(params, "message_id")?;

    let mut body = Map::new();
    body.insert("quarantineType".into(), json!(kind.wire_name()));
    body.insert("mids".into(), json!(mids));
    if kind == QuarantineKind::General {
        body.insert(
            "quarantineName".into(),
            json!(single_quarantine(params, "quarantine_name")?),
        );
    }
    Ok(body)
}
