// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::http::StatusCode;
use poem_openapi::Enum;

#[derive(Copy, Clone, Debug, Enum, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCode {
    // Parameter validation errors, raised before any appliance call (10000–10999)
    InvalidParameter = 10000,
    MissingParameter = 10010,
    InvalidDate = 10020,
    IncompleteFilter = 10030,
    InvalidFilter = 10040,
    IncompleteListEntry = 10050,
    AmbiguousListEntry = 10060,
    MissingConfiguration = 10070,
    RequestTimeout = 10080,
    MethodNotAllowed = 10090,

    // Authentication and authorization errors (20000–20999)
    PermissionDenied = 20000,
    AuthenticationFailed = 20010,

    // Appliance resource errors (30000–30999)
    NotFound = 30000,
    TooLarge = 30010,

    // Network and appliance response errors (40000–40999)
    TransportError = 40000,
    UnexpectedResponse = 40010,

    // Internal system errors (70000–70999)
    InternalError = 70000,
    UnhandledPoemError = 70010,
    VaultError = 70020,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidParameter
            | ErrorCode::MissingParameter
            | ErrorCode::InvalidDate
            | ErrorCode::IncompleteFilter
            | ErrorCode::InvalidFilter
            | ErrorCode::IncompleteListEntry
            | ErrorCode::AmbiguousListEntry => StatusCode::BAD_REQUEST,
            ErrorCode::PermissionDenied => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::AuthenticationFailed
            | ErrorCode::TransportError
            | ErrorCode::UnexpectedResponse => StatusCode::BAD_GATEWAY,
            ErrorCode::MissingConfiguration
            | ErrorCode::InternalError
            | ErrorCode::UnhandledPoemError
            | ErrorCode::VaultError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Errors detected from the action parameters alone, before the appliance is contacted.
    pub fn is_local_validation(&self) -> bool {
        matches!(
            self,
            ErrorCode::InvalidParameter
                | ErrorCode::MissingParameter
                | ErrorCode::InvalidDate
                | ErrorCode::IncompleteFilter
                | ErrorCode::InvalidFilter
                | ErrorCode::IncompleteListEntry
                | ErrorCode::AmbiguousListEntry
        )
    }
}
