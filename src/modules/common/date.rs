// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

//! Canonicalizes the loosely formatted dates callers hand us into the single
//! `YYYY-MM-DDThh:mm:ss.sssZ` form the appliance accepts.
//!
//! Inputs without a zone are read as UTC. Inputs that could be read more than one way
//! (`01/02/2024`) or that carry precision the canonical form cannot hold are rejected
//! rather than guessed at or truncated.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use regex::Regex;

use crate::modules::error::{code::ErrorCode, SmaBridgeResult};
use crate::raise_error;

pub const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const ZONED_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

static NUMERIC_DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}").expect("static regex")
});

/// Normalizes `raw` to the canonical UTC timestamp.
pub fn normalize(raw: &str) -> SmaBridgeResult<String> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(raise_error!(
            "Date value is empty".into(),
            ErrorCode::InvalidDate
        ));
    }
    if NUMERIC_DAY_FIRST.is_match(input) {
        return Err(raise_error!(
            format!(
                "Ambiguous date '{}': use year-first form such as 2024-01-31T00:00:00Z",
                input
            ),
            ErrorCode::InvalidDate
        ));
    }

    let parsed = parse_utc(input).ok_or_else(|| {
        raise_error!(
            format!("Unrecognized date '{}'", input),
            ErrorCode::InvalidDate
        )
    })?;

    if parsed.nanosecond() % 1_000_000 != 0 {
        return Err(raise_error!(
            format!(
                "Date '{}' is more precise than milliseconds and cannot be represented",
                input
            ),
            ErrorCode::InvalidDate
        ));
    }
    Ok(parsed.format(CANONICAL_FORMAT).to_string())
}

/// Same as [`normalize`], with the offending parameter named in the error.
pub fn normalize_field(field: &str, raw: &str) -> SmaBridgeResult<String> {
    normalize(raw).map_err(|e| {
        raise_error!(
            format!("Invalid date for '{}': {}", field, e),
            ErrorCode::InvalidDate
        )
    })
}

fn parse_utc(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}
