// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::catalog::{self, Operator, SearchDomain};
use crate::modules::common::params::ActionParams;
use crate::modules::error::{code::ErrorCode, SmaBridgeResult};
use crate::modules::list_entry::{ListEntry, ListOperation, ListType, ViewBy};
use crate::raise_error;

use super::{apply_paging, table, FilterClause, SmaRequest};

/// Search-list request plus the resolved vocabulary the summary reports back.
#[derive(Clone, Debug, PartialEq)]
pub struct ListSearch {
    pub request: SmaRequest,
    pub list_type: ListType,
    pub view_by: ViewBy,
    pub search: Option<FilterClause>,
}

pub fn search(params: &ActionParams) -> SmaBridgeResult<ListSearch> {
    table::SEARCH_LIST.check_required(params)?;
    let list_type = ListType::from_params(params)?;
    let view_by = match params.text("view_by") {
        Some(raw) => ViewBy::parse(&raw)?,
        None => ViewBy::Recipient,
    };
    let order_by = match params.text("order_by") {
        Some(raw) => catalog::check_choice("order_by", &raw, catalog::LIST_ORDER_BY)?,
        None => "recipient",
    };
    let order_dir = match params.text("order_direction") {
        Some(raw) => catalog::check_choice("order_direction", &raw, catalog::ORDER_DIRECTIONS)?,
        None => "desc",
    };

    let mut request = SmaRequest::get(list_type.path());
    request.push_query("action", "view");
    request.push_query("quarantineType", "spam");
    request.push_query("viewBy", view_by.as_str());
    request.push_query("orderBy", order_by);
    request.push_query("orderDir", order_dir);
    apply_paging(params, &mut request)?;

    let search = match params.text("search") {
        Some(term) => {
            // The appliance only searches the column the listing is ordered by, and
            // only recipients are searchable.
            let operator = catalog::check_operator(
                SearchDomain::List,
                order_by,
                Operator::Contains.as_str(),
            )
            .map_err(|_| {
                raise_error!(
                    format!(
                        "Parameter 'search' is only supported when order_by is 'recipient' (got '{}')",
                        order_by
                    ),
                    ErrorCode::InvalidFilter
                )
            })?;
            request.push_query("search", term.clone());
            Some(FilterClause::Match {
                field: "recipient",
                operator,
                value: term,
            })
        }
        None => None,
    };

    Ok(ListSearch {
        request,
        list_type,
        view_by,
        search,
    })
}

/// Add and edit are POSTs carrying `action`; delete is a DELETE without it.
pub fn entry(params: &ActionParams, operation: ListOperation) -> SmaBridgeResult<(ListEntry, SmaRequest)> {
    let entry = ListEntry::from_params(params, operation)?;
    let path = entry.list_type.path();
    let request = match operation {
        ListOperation::Delete => SmaRequest::delete(path, entry.body()),
        ListOperation::Add | ListOperation::Edit => SmaRequest::post(path, entry.body()),
    };
    Ok((entry, request))
}
