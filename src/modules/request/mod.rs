// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

//! Translation of action parameters into appliance requests.
//!
//! Every builder in this module is pure: it either returns a complete [`SmaRequest`]
//! or fails with a validation error, and nothing is sent to the appliance in the
//! failure case.

use http::Method;
use serde_json::Value;

use crate::modules::catalog::{self, Operator};
use crate::modules::common::params::ActionParams;
use crate::modules::error::{code::ErrorCode, SmaBridgeResult};
use crate::raise_error;

pub mod attachment;
pub mod list;
pub mod quarantine;
pub mod report;
pub mod table;
pub mod tracking;


pub const API_BASE: &str = "/sma/api/v2.0";
pub const LOGIN_PATH: &str = "/login";

/// A fully validated call against the appliance REST API. `path` is relative to
/// [`API_BASE`]; query pairs keep insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct SmaRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl SmaRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn push_query(&mut self, key: &str, value: impl Into<String>) {
        self.query.push((key.to_string(), value.into()));
    }

    pub fn push_query_opt(&mut self, key: &str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.push_query(key, value);
        }
    }

    /// First value for `key`, mostly useful in tests and logs.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn full_path(&self) -> String {
        format!("{}{}", API_BASE, self.path)
    }
}

/// One validated filter condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterClause {
    Match {
        field: &'static str,
        operator: Operator,
        value: String,
    },
    Range {
        field: &'static str,
        operator: Operator,
        from: Option<u64>,
        to: Option<u64>,
    },
}

/// The quarantine namespace a message id belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuarantineKind {
    Spam,
    General,
}

impl QuarantineKind {
    pub fn wire_name(&self) -> &'static str {
        match self {
            QuarantineKind::Spam => "spam",
            QuarantineKind::General => "pvo",
        }
    }

    pub fn parse(param: &str, value: &str) -> SmaBridgeResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "spam" => Ok(QuarantineKind::Spam),
            "pvo" | "general" => Ok(QuarantineKind::General),
            _ => Err(raise_error!(
                format!(
                    "Invalid parameter '{}': '{}' (expected one of: spam, pvo)",
                    param, value
                ),
                ErrorCode::InvalidParameter
            )),
        }
    }
}

/// Both ends of a search window, canonicalized, with `end` not before `start`.
pub(crate) fn time_window(
    params: &ActionParams,
    start: &str,
    end: &str,
) -> SmaBridgeResult<(String, String)> {
    let from = params
        .date(start)?
        .ok_or_else(|| crate::modules::common::params::missing(start))?;
    let to = params
        .date(end)?
        .ok_or_else(|| crate::modules::common::params::missing(end))?;
    // Canonical timestamps share one fixed-width layout, so string order is time order.
    if to < from {
        return Err(raise_error!(
            format!(
                "Invalid date for '{}': {} is earlier than '{}' ({})",
                end, to, start, from
            ),
            ErrorCode::InvalidDate
        ));
    }
    Ok((from, to))
}

/// `offset`/`limit` are sent only when supplied; `limit` must be positive.
pub(crate) fn apply_paging(params: &ActionParams, request: &mut SmaRequest) -> SmaBridgeResult<()> {
    if let Some(offset) = params.unsigned("offset")? {
        request.push_query("offset", offset.to_string());
    }
    if let Some(limit) = positive(params, "limit")? {
        request.push_query("limit", limit.to_string());
    }
    Ok(())
}

pub(crate) fn positive(params: &ActionParams, name: &str) -> SmaBridgeResult<Option<u64>> {
    match params.unsigned(name)? {
        Some(0) => Err(raise_error!(
            format!("Invalid parameter '{}': must be greater than 0", name),
            ErrorCode::InvalidParameter
        )),
        other => Ok(other),
    }
}

pub(crate) fn apply_ordering(
    params: &ActionParams,
    request: &mut SmaRequest,
    order_by: &'static [&'static str],
) -> SmaBridgeResult<()> {
    if let Some(field) = params.text("order_by") {
        request.push_query("orderBy", catalog::check_choice("order_by", &field, order_by)?);
    }
    if let Some(direction) = params.text("order_direction") {
        request.push_query(
            "orderDir",
            catalog::check_choice("order_direction", &direction, catalog::ORDER_DIRECTIONS)?,
        );
    }
    Ok(())
}

/// Parses one or more comma-separated numeric message ids.
pub(crate) fn message_ids(params: &ActionParams, name: &str) -> SmaBridgeResult<Vec<u64>> {
    let raw = params.list(name);
    if raw.is_empty() {
        return Err(crate::modules::common::params::missing(name));
    }
    raw.iter()
        .map(|id| {
            id.parse::<u64>().map_err(|_| {
                raise_error!(
                    format!(
                        "Invalid parameter '{}': '{}' is not a numeric message id",
                        name, id
                    ),
                    ErrorCode::InvalidParameter
                )
            })
        })
        .collect()
}

pub(crate) fn single_message_id(params: &ActionParams, name: &str) -> SmaBridgeResult<u64> {
    let mut ids = message_ids(params, name)?;
    if ids.len() != 1 {
        return Err(raise_error!(
            format!(
                "Invalid parameter '{}': exactly one message id expected, got {}",
                name,
                ids.len()
            ),
            ErrorCode::InvalidParameter
        ));
    }
    Ok(ids.remove(0))
}

/// Release, delete, detail and download address one named quarantine at a time.
pub(crate) fn single_quarantine(params: &ActionParams, name: &str) -> SmaBridgeResult<String> {
    let mut names = params.list(name);
    match names.len() {
        0 => Err(crate::modules::common::params::missing(name)),
        1 => Ok(names.remove(0)),
        n => Err(raise_error!(
            format!(
                "Invalid parameter '{}': exactly one quarantine expected, got {}",
                name, n
            ),
            ErrorCode::InvalidParameter
        )),
    }
}
