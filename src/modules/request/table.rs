// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

//! Declarative parameter tables, one per action.
//!
//! A table lists the parameters an action cannot run without, in the order they are
//! reported when missing, and the filter groups whose halves must be supplied together.

use crate::modules::catalog::{self, Operator, SearchDomain};
use crate::modules::common::params::{missing, ActionParams};
use crate::modules::error::{code::ErrorCode, SmaBridgeResult};
use crate::raise_error;

use super::{FilterClause, SmaRequest};

/// A group of caller parameters that together describe one filter condition, and
/// the query keys it is sent as.
#[derive(Debug)]
pub enum FilterGroup {
    /// Fixed field; operator and value supplied by the caller.
    Match {
        field: &'static str,
        operator_param: &'static str,
        value_param: &'static str,
        operator_key: &'static str,
        value_key: &'static str,
    },
    /// The caller also picks the field.
    Selectable {
        field_param: &'static str,
        operator_param: &'static str,
        value_param: &'static str,
        field_key: &'static str,
        operator_key: &'static str,
        value_key: &'static str,
    },
    /// Numeric bounds instead of a single value.
    Range {
        field: &'static str,
        operator_param: &'static str,
        from_param: &'static str,
        to_param: &'static str,
        operator_key: &'static str,
        from_key: &'static str,
        to_key: &'static str,
    },
}

impl FilterGroup {
    fn params(&self) -> Vec<&'static str> {
        match self {
            FilterGroup::Match {
                operator_param,
                value_param,
                ..
            } => vec![*operator_param, *value_param],
            FilterGroup::Selectable {
                field_param,
                operator_param,
                value_param,
                ..
            } => vec![*field_param, *operator_param, *value_param],
            FilterGroup::Range {
                operator_param,
                from_param,
                to_param,
                ..
            } => vec![*operator_param, *from_param, *to_param],
        }
    }

    /// Jointly present or jointly absent. `None` means the group was not used.
    fn check_complete(&self, params: &ActionParams) -> SmaBridgeResult<Option<()>> {
        let names = self.params();
        let supplied: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| params.is_present(name))
            .collect();
        if supplied.is_empty() {
            return Ok(None);
        }
        let absent: Vec<&str> = match self {
            // One bound is enough for a range.
            FilterGroup::Range {
                operator_param,
                from_param,
                to_param,
                ..
            } => {
                let mut absent = Vec::new();
                if !params.is_present(operator_param) {
                    absent.push(*operator_param);
                }
                if !params.is_present(from_param) && !params.is_present(to_param) {
                    absent.push(*from_param);
                    absent.push(*to_param);
                }
                absent
            }
            _ => names
                .iter()
                .copied()
                .filter(|name| !params.is_present(name))
                .collect(),
        };
        if absent.is_empty() {
            Ok(Some(()))
        } else {
            Err(raise_error!(
                format!(
                    "Incomplete filter: '{}' supplied without '{}'",
                    supplied.join("', '"),
                    absent.join("' / '")
                ),
                ErrorCode::IncompleteFilter
            ))
        }
    }

    fn clause(&self, domain: SearchDomain, params: &ActionParams) -> SmaBridgeResult<FilterClause> {
        match self {
            FilterGroup::Match {
                field,
                operator_param,
                value_param,
                ..
            } => Ok(FilterClause::Match {
                field: *field,
                operator: catalog::check_operator(domain, field, &text(params, operator_param)?)?,
                value: text(params, value_param)?,
            }),
            FilterGroup::Selectable {
                field_param,
                operator_param,
                value_param,
                ..
            } => {
                let requested = text(params, field_param)?.to_ascii_lowercase();
                let field = catalog::fields(domain)
                    .iter()
                    .map(|(name, _)| *name)
                    .find(|name| *name == requested)
                    .ok_or_else(|| {
                        raise_error!(
                            format!(
                                "Unknown filter field '{}' for {} search",
                                requested, domain
                            ),
                            ErrorCode::InvalidFilter
                        )
                    })?;
                Ok(FilterClause::Match {
                    field,
                    operator: catalog::check_operator(
                        domain,
                        field,
                        &text(params, operator_param)?,
                    )?,
                    value: text(params, value_param)?,
                })
            }
            FilterGroup::Range {
                field,
                operator_param,
                from_param,
                to_param,
                ..
            } => {
                let operator =
                    catalog::check_operator(domain, field, &text(params, operator_param)?)?;
                let from = params.unsigned(from_param)?;
                let to = params.unsigned(to_param)?;
                range_clause(*field, operator, from, to, from_param, to_param)
            }
        }
    }

    fn encode(&self, clause: &FilterClause, request: &mut SmaRequest) {
        match (self, clause) {
            (
                FilterGroup::Match {
                    operator_key,
                    value_key,
                    ..
                },
                FilterClause::Match {
                    operator, value, ..
                },
            ) => {
                request.push_query(operator_key, operator.as_str());
                request.push_query(value_key, value.clone());
            }
            (
                FilterGroup::Selectable {
                    field_key,
                    operator_key,
                    value_key,
                    ..
                },
                FilterClause::Match {
                    field,
                    operator,
                    value,
                },
            ) => {
                request.push_query(field_key, *field);
                request.push_query(operator_key, operator.as_str());
                request.push_query(value_key, value.clone());
            }
            (
                FilterGroup::Range {
                    operator_key,
                    from_key,
                    to_key,
                    ..
                },
                FilterClause::Range {
                    operator, from, to, ..
                },
            ) => {
                request.push_query(operator_key, operator.as_str());
                request.push_query_opt(from_key, from.map(|v| v.to_string()));
                request.push_query_opt(to_key, to.map(|v| v.to_string()));
            }
            _ => {}
        }
    }
}

/// Direction-specific bound rules: `more_than` needs a lower bound, `less_than` an
/// upper bound, `range` at least one of the two.
fn range_clause(
    field: &'static str,
    operator: Operator,
    from: Option<u64>,
    to: Option<u64>,
    from_param: &str,
    to_param: &str,
) -> SmaBridgeResult<FilterClause> {
    let incomplete = |needed: &str| {
        raise_error!(
            format!(
                "Incomplete filter: operator '{}' on '{}' requires '{}'",
                operator, field, needed
            ),
            ErrorCode::IncompleteFilter
        )
    };
    match operator {
        Operator::MoreThan if from.is_none() => return Err(incomplete(from_param)),
        Operator::LessThan if to.is_none() => return Err(incomplete(to_param)),
        Operator::Range if from.is_none() && to.is_none() => {
            return Err(incomplete(&format!("{}' or '{}", from_param, to_param)))
        }
        _ => {}
    }
    let (from, to) = match operator {
        Operator::MoreThan => (from, None),
        Operator::LessThan => (None, to),
        _ => (from, to),
    };
    if let (Some(low), Some(high)) = (from, to) {
        if low > high {
            return Err(raise_error!(
                format!(
                    "Invalid parameter '{}': {} is greater than '{}' ({})",
                    from_param, low, to_param, high
                ),
                ErrorCode::InvalidParameter
            ));
        }
    }
    Ok(FilterClause::Range {
        field,
        operator,
        from,
        to,
    })
}

fn text(params: &ActionParams, name: &str) -> SmaBridgeResult<String> {
    params.text(name).ok_or_else(|| missing(name))
}

#[derive(Debug)]
pub struct ParamTable {
    pub required: &'static [&'static str],
    pub filters: &'static [FilterGroup],
}

impl ParamTable {
    /// Fails on the first absent required parameter, in declaration order.
    pub fn check_required(&self, params: &ActionParams) -> SmaBridgeResult<()> {
        match self
            .required
            .iter()
            .find(|name| !params.is_present(name))
        {
            Some(name) => Err(missing(name)),
            None => Ok(()),
        }
    }

    /// All groups are checked for completeness before any operator is validated.
    pub fn filter_clauses(
        &self,
        domain: SearchDomain,
        params: &ActionParams,
    ) -> SmaBridgeResult<Vec<(&'static FilterGroup, FilterClause)>> {
        let mut used = Vec::new();
        for group in self.filters {
            if group.check_complete(params)?.is_some() {
                used.push(group);
            }
        }
        used.into_iter()
            .map(|group| Ok((group, group.clause(domain, params)?)))
            .collect()
    }

    pub fn apply_filters(
        &self,
        domain: SearchDomain,
        params: &ActionParams,
        request: &mut SmaRequest,
    ) -> SmaBridgeResult<Vec<FilterClause>> {
        let clauses = self.filter_clauses(domain, params)?;
        for (group, clause) in &clauses {
            group.encode(clause, request);
        }
        Ok(clauses.into_iter().map(|(_, clause)| clause).collect())
    }
}

const ENVELOPE_RECIPIENT: FilterGroup = FilterGroup::Match {
    field: "envelope_recipient",
    operator_param: "envelope_recipient_filter_operator",
    value_param: "envelope_recipient_filter_value",
    operator_key: "envelopeRecipientFilterOperator",
    value_key: "envelopeRecipientFilterValue",
};

pub static SEARCH_SPAM_QUARANTINE: ParamTable = ParamTable {
    required: &["start_date", "end_date"],
    filters: &[
        ENVELOPE_RECIPIENT,
        FilterGroup::Match {
            field: "filter",
            operator_param: "filter_operator",
            value_param: "filter_value",
            operator_key: "filterOperator",
            value_key: "filterValue",
        },
    ],
};

pub static SEARCH_QUARANTINE: ParamTable = ParamTable {
    required: &["start_date", "end_date", "quarantines"],
    filters: &[
        ENVELOPE_RECIPIENT,
        FilterGroup::Match {
            field: "envelope_sender",
            operator_param: "envelope_sender_filter_operator",
            value_param: "envelope_sender_filter_value",
            operator_key: "envelopeSenderFilterOperator",
            value_key: "envelopeSenderFilterValue",
        },
        FilterGroup::Match {
            field: "subject",
            operator_param: "subject_filter_by",
            value_param: "subject_filter_value",
            operator_key: "subjectFilterBy",
            value_key: "subjectFilterValue",
        },
        FilterGroup::Range {
            field: "attachment_size",
            operator_param: "attachment_size_filter_by",
            from_param: "attachment_size_from",
            to_param: "attachment_size_to",
            operator_key: "attachmentSizeFilterBy",
            from_key: "attachmentSizeFromValue",
            to_key: "attachmentSizeToValue",
        },
    ],
};

pub static GET_SPAM_MESSAGE: ParamTable = ParamTable {
    required: &["message_id"],
    filters: &[],
};

pub static GET_QUARANTINE_MESSAGE: ParamTable = ParamTable {
    required: &["message_id", "quarantine_name"],
    filters: &[],
};

pub static RELEASE_SPAM_MESSAGE: ParamTable = ParamTable {
    required: &["message_id"],
    filters: &[],
};

pub static RELEASE_QUARANTINE_MESSAGE: ParamTable = ParamTable {
    required: &["message_id", "quarantine_name"],
    filters: &[],
};

pub static DELETE_SPAM_MESSAGE: ParamTable = ParamTable {
    required: &["message_id"],
    filters: &[],
};

pub static DELETE_QUARANTINE_MESSAGE: ParamTable = ParamTable {
    required: &["message_id", "quarantine_name"],
    filters: &[],
};

pub static SEARCH_TRACKING_MESSAGES: ParamTable = ParamTable {
    required: &["start_date", "end_date"],
    filters: &[
        FilterGroup::Match {
            field: "envelope_sender",
            operator_param: "envelope_sender_filter_operator",
            value_param: "envelope_sender_filter_value",
            operator_key: "envelopeSenderfilterOperator",
            value_key: "envelopeSenderfilterValue",
        },
        FilterGroup::Match {
            field: "envelope_recipient",
            operator_param: "envelope_recipient_filter_operator",
            value_param: "envelope_recipient_filter_value",
            operator_key: "envelopeRecipientfilterOperator",
            value_key: "envelopeRecipientfilterValue",
        },
        FilterGroup::Match {
            field: "subject",
            operator_param: "subject_filter_operator",
            value_param: "subject_filter_value",
            operator_key: "subjectfilterOperator",
            value_key: "subjectfilterValue",
        },
    ],
};

pub static GET_TRACKING_DETAILS: ParamTable = ParamTable {
    required: &["mid"],
    filters: &[],
};

pub static SEARCH_LIST: ParamTable = ParamTable {
    required: &[],
    filters: &[],
};

pub static GET_STATISTICS_REPORT: ParamTable = ParamTable {
    required: &["report_type", "start_date", "end_date"],
    filters: &[FilterGroup::Selectable {
        field_param: "filter_by",
        operator_param: "filter_operator",
        value_param: "filter_value",
        field_key: "filterBy",
        operator_key: "filterOperator",
        value_key: "filterValue",
    }],
};

pub static DOWNLOAD_ATTACHMENT: ParamTable = ParamTable {
    required: &["message_id", "attachment_id"],
    filters: &[],
};
