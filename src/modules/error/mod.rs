// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Formatter;

use code::ErrorCode;
use poem::http::StatusCode;
use poem::IntoResponse;
use poem_openapi::{payload::Json, ApiResponse, Object};
use snafu::{Location, Snafu};

pub mod code;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SmaBridgeError {
    #[snafu(display("{message}"))]
    Generic {
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: ErrorCode,
    },
}

pub type SmaBridgeResult<T, E = SmaBridgeError> = std::result::Result<T, E>;

impl SmaBridgeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SmaBridgeError::Generic { code, .. } => *code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SmaBridgeError::Generic { message, .. } => message,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ApiError {
    pub message: String,
    pub code: u32,
}

impl From<SmaBridgeError> for ApiErrorResponse {
    fn from(error: SmaBridgeError) -> Self {
        match error {
            SmaBridgeError::Generic {
                message,
                location,
                code,
            } => {
                if code.is_local_validation() {
                    tracing::warn!("Action rejected: [{:?}] {}", code, message);
                } else {
                    tracing::error!(
                        "API error occurred: [{:#?}] {} at {:?}",
                        code,
                        message,
                        location
                    );
                }
                let api_error = ApiError {
                    message,
                    code: code as u32,
                };
                ApiErrorResponse::Generic(code.status(), Json(api_error))
            }
        }
    }
}

impl ApiError {
    pub fn new(message: String, code: u32) -> Self {
        Self { message, code }
    }

}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error({}): {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, ApiResponse)]
pub enum ApiErrorResponse {
    Generic(StatusCode, Json<ApiError>),
}

/// Crate code for an error raised by poem itself rather than by an action.
fn framework_code(error: &poem::Error) -> Option<ErrorCode> {
    use poem::error::{MethodNotAllowedError, NotFoundError, ParseJsonError, ParsePathError, ParseQueryError};
    use poem_openapi::error::{
        AuthorizationError, ContentTypeError, ParseParamError, ParseRequestPayloadError,
    };

    if error.is::<NotFoundError>() {
        Some(ErrorCode::NotFound)
    } else if error.is::<MethodNotAllowedError>() {
        Some(ErrorCode::MethodNotAllowed)
    } else if error.is::<AuthorizationError>() {
        Some(ErrorCode::PermissionDenied)
    } else if error.is::<ParseJsonError>()
        || error.is::<ParseRequestPayloadError>()
        || error.is::<ContentTypeError>()
        || error.is::<ParseParamError>()
        || error.is::<ParsePathError>()
        || error.is::<ParseQueryError>()
    {
        Some(ErrorCode::InvalidParameter)
    } else if error.has_source() {
        Some(ErrorCode::UnhandledPoemError)
    } else {
        None
    }
}

/// Renders every error that reaches the host as an [`ApiError`] body. The HTTP
/// status poem chose for its own errors is kept.
pub async fn error_handler(error: poem::Error) -> poem::Response {
    if error.is::<SmaBridgeError>() {
        return error.into_response();
    }
    match framework_code(&error) {
        Some(code) => {
            let body = ApiError::new(error.to_string(), code as u32);
            let mut response = ApiErrorResponse::Generic(code.status(), Json(body)).into_response();
            response.set_status(error.status());
            response
        }
        None => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::raise_error;

    async fn body_of(response: poem::Response) -> Value {
        let bytes = response.into_body().into_vec().await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn framework_errors_carry_crate_codes() {
        let response = error_handler(poem::Error::from(poem::error::NotFoundError)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await["code"], ErrorCode::NotFound as u32);

        let response = error_handler(poem::Error::from(poem::error::MethodNotAllowedError)).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body_of(response).await["code"],
            ErrorCode::MethodNotAllowed as u32
        );
    }

    #[tokio::test]
    async fn action_errors_keep_their_own_status() {
        let error = raise_error!(
            "Parameter 'start_date' is required".into(),
            ErrorCode::MissingParameter
        );
        let response = error_handler(poem::Error::from(error)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_of(response).await;
        assert_eq!(body["code"], ErrorCode::MissingParameter as u32);
        assert_eq!(body["message"], "Parameter 'start_date' is required");
    }
}
