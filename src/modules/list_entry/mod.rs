// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

//! Safelist/blocklist entries.
//!
//! An entry is keyed either by recipient or by sender, and the key decides which
//! pair of address lists the appliance expects:
//!
//! | view_by   | add / edit                              | delete           |
//! |-----------|-----------------------------------------|------------------|
//! | recipient | `recipient_addresses` + `sender_list`   | `recipient_list` |
//! | sender    | `sender_addresses` + `recipient_list`   | `sender_list`    |

use std::fmt;

use serde_json::{json, Map, Value};

use crate::modules::catalog::{self, LIST_TYPES, VIEW_BY};
use crate::modules::common::{list_value, params::ActionParams};
use crate::modules::error::{code::ErrorCode, SmaBridgeResult};
use crate::raise_error;


#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ListType {
    Safelist,
    Blocklist,
}

impl ListType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Safelist => "safelist",
            ListType::Blocklist => "blocklist",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            ListType::Safelist => "/quarantine/safelist",
            ListType::Blocklist => "/quarantine/blocklist",
        }
    }

    /// `list_type` defaults to the safelist.
    pub fn from_params(params: &ActionParams) -> SmaBridgeResult<Self> {
        match params.text("list_type") {
            None => Ok(ListType::Safelist),
            Some(raw) => match catalog::check_choice("list_type", &raw, LIST_TYPES)? {
                "blocklist" => Ok(ListType::Blocklist),
                _ => Ok(ListType::Safelist),
            },
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ViewBy {
    Recipient,
    Sender,
}

impl ViewBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewBy::Recipient => "recipient",
            ViewBy::Sender => "sender",
        }
    }

    pub fn parse(raw: &str) -> SmaBridgeResult<Self> {
        match catalog::check_choice("view_by", raw, VIEW_BY)? {
            "sender" => Ok(ViewBy::Sender),
            _ => Ok(ViewBy::Recipient),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ListOperation {
    Add,
    Edit,
    Delete,
}

impl ListOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListOperation::Add => "add",
            ListOperation::Edit => "edit",
            ListOperation::Delete => "delete",
        }
    }
}

/// A caller parameter and the body key it is sent as.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ListField {
    pub param: &'static str,
    pub key: &'static str,
}

const RECIPIENT_ADDRESSES: ListField = ListField {
    param: "recipient_addresses",
    key: "recipientAddresses",
};
const SENDER_ADDRESSES: ListField = ListField {
    param: "sender_addresses",
    key: "senderAddresses",
};
const SENDER_LIST: ListField = ListField {
    param: "sender_list",
    key: "senderList",
};
const RECIPIENT_LIST: ListField = ListField {
    param: "recipient_list",
    key: "recipientList",
};

/// Every list key the appliance may echo back.
pub const ALL_FIELDS: [ListField; 4] =
    [RECIPIENT_ADDRESSES, SENDER_ADDRESSES, SENDER_LIST, RECIPIENT_LIST];

/// The lists `operation` requires when keyed by `view_by`.
pub fn required_fields(view_by: ViewBy, operation: ListOperation) -> &'static [ListField] {
    match (view_by, operation) {
        (ViewBy::Recipient, ListOperation::Delete) => &[RECIPIENT_LIST],
        (ViewBy::Sender, ListOperation::Delete) => &[SENDER_LIST],
        (ViewBy::Recipient, _) => &[RECIPIENT_ADDRESSES, SENDER_LIST],
        (ViewBy::Sender, _) => &[SENDER_ADDRESSES, RECIPIENT_LIST],
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListEntry {
    pub list_type: ListType,
    pub view_by: ViewBy,
    pub operation: ListOperation,
    pub lists: Vec<(ListField, Vec<String>)>,
}

impl ListEntry {
    /// An incomplete pairing is reported before any other parameter is validated.
    pub fn from_params(params: &ActionParams, operation: ListOperation) -> SmaBridgeResult<Self> {
        let view_by = match params.text("view_by") {
            Some(raw) => ViewBy::parse(&raw)?,
            None => infer_view_by(params, operation)?,
        };

        let mut lists = Vec::new();
        for field in required_fields(view_by, operation) {
            let values = params.list(field.param);
            if values.is_empty() {
                return Err(raise_error!(
                    format!(
                        "Parameter '{}' is required when view_by is '{}'",
                        field.param,
                        view_by.as_str()
                    ),
                    ErrorCode::IncompleteListEntry
                ));
            }
            lists.push((*field, values));
        }
        let list_type = ListType::from_params(params)?;

        Ok(Self {
            list_type,
            view_by,
            operation,
            lists,
        })
    }

    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert("quarantineType".into(), json!("spam"));
        body.insert("viewBy".into(), json!(self.view_by.as_str()));
        if self.operation != ListOperation::Delete {
            body.insert("action".into(), json!(self.operation.as_str()));
        }
        for (field, values) in &self.lists {
            body.insert(field.key.into(), json!(values));
        }
        Value::Object(body)
    }

    /// The entry as sent, overlaid with whatever the appliance echoed back. List
    /// keys that come back as comma-joined strings are split into arrays.
    pub fn record(&self, backend: &Value) -> Map<String, Value> {
        let mut record = Map::new();
        for (field, values) in &self.lists {
            record.insert(field.key.into(), json!(values));
        }
        if let Value::Object(echo) = backend {
            for (key, value) in echo {
                let is_list_key = ALL_FIELDS.iter().any(|field| field.key == key.as_str());
                let value = match value {
                    Value::String(raw) if is_list_key => json!(list_value::split(raw)),
                    other => other.clone(),
                };
                record.insert(key.clone(), value);
            }
        }
        record
    }
}

fn infer_view_by(params: &ActionParams, operation: ListOperation) -> SmaBridgeResult<ViewBy> {
    let populated = |view_by: ViewBy| {
        required_fields(view_by, operation)
            .iter()
            .any(|field| !params.list(field.param).is_empty())
    };
    match (populated(ViewBy::Recipient), populated(ViewBy::Sender)) {
        (true, false) => Ok(ViewBy::Recipient),
        (false, true) => Ok(ViewBy::Sender),
        (true, true) => Err(raise_error!(
            format!(
                "Cannot infer view_by: both recipient-keyed ({}) and sender-keyed ({}) lists were supplied",
                param_names(ViewBy::Recipient, operation),
                param_names(ViewBy::Sender, operation)
            ),
            ErrorCode::AmbiguousListEntry
        )),
        (false, false) => Err(raise_error!(
            format!(
                "No list entry supplied: provide view_by with {} or {}",
                param_names(ViewBy::Recipient, operation),
                param_names(ViewBy::Sender, operation)
            ),
            ErrorCode::IncompleteListEntry
        )),
    }
}

fn param_names(view_by: ViewBy, operation: ListOperation) -> String {
    required_fields(view_by, operation)
        .iter()
        .map(|field| format!("'{}'", field.param))
        .collect::<Vec<_>>()
        .join(" + ")
}
