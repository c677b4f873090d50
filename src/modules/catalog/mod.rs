// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

//! Static vocabulary of the appliance's search grammar.
//!
//! Every search domain has its own table of filterable fields and the comparison
//! operators the appliance accepts for each of them. The tables are consulted while a
//! request is built and never mutated, so concurrent actions can share them freely.

use std::fmt;
use std::str::FromStr;

use crate::modules::error::{code::ErrorCode, SmaBridgeResult};
use crate::raise_error;


/// The search namespaces exposed by the appliance.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SearchDomain {
    SpamQuarantine,
    GeneralQuarantine,
    Tracking,
    Statistics,
    List,
}

impl SearchDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDomain::SpamQuarantine => "spam quarantine",
            SearchDomain::GeneralQuarantine => "general quarantine",
            SearchDomain::Tracking => "message tracking",
            SearchDomain::Statistics => "statistics",
            SearchDomain::List => "safelist/blocklist",
        }
    }
}

impl fmt::Display for SearchDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Operator {
    Is,
    Contains,
    DoesNotContain,
    BeginsWith,
    EndsWith,
    Range,
    LessThan,
    MoreThan,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Is,
        Operator::Contains,
        Operator::DoesNotContain,
        Operator::BeginsWith,
        Operator::EndsWith,
        Operator::Range,
        Operator::LessThan,
        Operator::MoreThan,
    ];

    /// The spelling the appliance expects on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Is => "is",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "does_not_contain",
            Operator::BeginsWith => "begins_with",
            Operator::EndsWith => "ends_with",
            Operator::Range => "range",
            Operator::LessThan => "less_than",
            Operator::MoreThan => "more_than",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == normalized)
            .ok_or(())
    }
}

const TEXT_OPERATORS: &[Operator] = &[
    Operator::Is,
    Operator::Contains,
    Operator::DoesNotContain,
    Operator::BeginsWith,
    Operator::EndsWith,
];

const SIZE_OPERATORS: &[Operator] = &[Operator::Range, Operator::LessThan, Operator::MoreThan];

const TRACKING_ADDRESS_OPERATORS: &[Operator] =
    &[Operator::Is, Operator::BeginsWith, Operator::Contains];

const TRACKING_SUBJECT_OPERATORS: &[Operator] = &[
    Operator::Is,
    Operator::BeginsWith,
    Operator::Contains,
    Operator::DoesNotContain,
];

const REPORT_OPERATORS: &[Operator] = &[Operator::Is, Operator::BeginsWith];

type FieldTable = &'static [(&'static str, &'static [Operator])];

const SPAM_FIELDS: FieldTable = &[
    ("envelope_recipient", TEXT_OPERATORS),
    ("filter", TEXT_OPERATORS),
];

const GENERAL_FIELDS: FieldTable = &[
    ("envelope_recipient", TEXT_OPERATORS),
    ("envelope_sender", TEXT_OPERATORS),
    ("subject", TEXT_OPERATORS),
    ("attachment_size", SIZE_OPERATORS),
];

const TRACKING_FIELDS: FieldTable = &[
    ("envelope_sender", TRACKING_ADDRESS_OPERATORS),
    ("envelope_recipient", TRACKING_ADDRESS_OPERATORS),
    ("subject", TRACKING_SUBJECT_OPERATORS),
];

const STATISTICS_FIELDS: FieldTable = &[
    ("domain_name", REPORT_OPERATORS),
    ("ip_address", REPORT_OPERATORS),
    ("sender", REPORT_OPERATORS),
    ("recipient", REPORT_OPERATORS),
];

// The list search term is matched against recipients only.
const LIST_FIELDS: FieldTable = &[("recipient", &[Operator::Contains])];

pub fn fields(domain: SearchDomain) -> FieldTable {
    match domain {
        SearchDomain::SpamQuarantine => SPAM_FIELDS,
        SearchDomain::GeneralQuarantine => GENERAL_FIELDS,
        SearchDomain::Tracking => TRACKING_FIELDS,
        SearchDomain::Statistics => STATISTICS_FIELDS,
        SearchDomain::List => LIST_FIELDS,
    }
}

/// Operators the appliance accepts for `field` in `domain`.
pub fn allowed_operators(
    domain: SearchDomain,
    field: &str,
) -> SmaBridgeResult<&'static [Operator]> {
    fields(domain)
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, operators)| *operators)
        .ok_or_else(|| {
            raise_error!(
                format!("Unknown filter field '{}' for {} search", field, domain),
                ErrorCode::InvalidFilter
            )
        })
}

/// Resolves a caller-supplied operator name for `field`, rejecting anything the
/// appliance would refuse.
pub fn check_operator(
    domain: SearchDomain,
    field: &str,
    operator: &str,
) -> SmaBridgeResult<Operator> {
    let allowed = allowed_operators(domain, field)?;
    let invalid = || {
        let names: Vec<&str> = allowed.iter().map(Operator::as_str).collect();
        raise_error!(
            format!(
                "Invalid operator '{}' for '{}' in {} search; expected one of: {}",
                operator,
                field,
                domain,
                names.join(", ")
            ),
            ErrorCode::InvalidFilter
        )
    };
    let parsed = operator.parse::<Operator>().map_err(|_| invalid())?;
    if allowed.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(invalid())
    }
}

pub const SPAM_ORDER_BY: &[&str] = &["from_address", "to_address", "subject"];
pub const GENERAL_ORDER_BY: &[&str] = &["received", "sender", "subject", "size"];
pub const LIST_ORDER_BY: &[&str] = &["recipient", "sender"];
pub const ORDER_DIRECTIONS: &[&str] = &["asc", "desc"];
pub const LIST_TYPES: &[&str] = &["safelist", "blocklist"];
pub const VIEW_BY: &[&str] = &["recipient", "sender"];
pub const REPORT_DEVICE_TYPES: &[&str] = &["esa", "sma"];

/// Validates a closed-vocabulary parameter, returning the canonical spelling.
pub fn check_choice(
    param: &str,
    value: &str,
    choices: &'static [&'static str],
) -> SmaBridgeResult<&'static str> {
    let normalized = value.trim().to_ascii_lowercase();
    choices
        .iter()
        .find(|choice| choice.to_ascii_lowercase() == normalized)
        .copied()
        .ok_or_else(|| {
            raise_error!(
                format!(
                    "Invalid parameter '{}': '{}' (expected one of: {})",
                    param,
                    value,
                    choices.join(", ")
                ),
                ErrorCode::InvalidParameter
            )
        })
}
