// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use super::error::code::ErrorCode;
use super::error::SmaBridgeError;
use poem::error::ResponseError;
use poem::Body;
use poem::{http::StatusCode, Error, Response};
use tracing::error;

pub mod auth;
pub mod date;
pub mod error;
pub mod list_value;
pub mod log;
pub mod params;
pub mod timeout;

#[inline]
fn create_bridge_error(message: &str, code: ErrorCode) -> SmaBridgeError {
    SmaBridgeError::Generic {
        message: message.into(),
        location: snafu::Location::default(),
        code,
    }
}

#[inline]
pub fn create_api_error_response(message: &str, code: ErrorCode) -> Error {
    create_bridge_error(message, code).into()
}

impl ResponseError for SmaBridgeError {
    fn status(&self) -> StatusCode {
        self.code().status()
    }

    fn as_response(&self) -> Response
    where
        Self: std::error::Error + Send + Sync + 'static,
    {
        match self {
            SmaBridgeError::Generic {
                message,
                location,
                code,
            } => {
                error!(
                    error_code = *code as u32,
                    error_message = %message,
                    error_location = ?location
                );

                let body = Body::from_json(serde_json::json!({
                    "code": *code as u32,
                    "message": message.to_string(),
                }))
                .unwrap_or_else(|_| Body::from_string(message.to_string()));

                Response::builder().status(self.status()).body(body)
            }
        }
    }
}
