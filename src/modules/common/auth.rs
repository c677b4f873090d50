// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::{
    web::headers::{authorization::Bearer, Authorization, HeaderMapExt},
    Endpoint, Middleware, Request, Result,
};
use serde::Deserialize;

use crate::modules::{error::code::ErrorCode, settings::cli::SETTINGS};

use super::create_api_error_response;

/// Requires the host to present `smabridge_api_token` when one is configured.
pub struct ApiGuard;

pub struct ApiGuardEndpoint<E> {
    ep: E,
}

impl<E: Endpoint> Middleware<E> for ApiGuard {
    type Output = ApiGuardEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        ApiGuardEndpoint { ep }
    }
}

#[derive(Deserialize)]
struct Param {
    access_token: String,
}

impl<E: Endpoint> Endpoint for ApiGuardEndpoint<E> {
    type Output = E::Output;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        if let Some(expected) = SETTINGS.smabridge_api_token.as_deref() {
            authorize(&req, expected)?;
        }
        self.ep.call(req).await
    }
}

fn authorize(req: &Request, expected: &str) -> Result<()> {
    let presented = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.0.token().to_string())
        .or_else(|| req.params::<Param>().ok().map(|param| param.access_token));

    match presented {
        Some(token) if constant_time_eq(token.as_bytes(), expected.as_bytes()) => Ok(()),
        Some(_) => Err(create_api_error_response(
            "Invalid access token",
            ErrorCode::PermissionDenied,
        )),
        None => Err(create_api_error_response(
            "Valid access token not found",
            ErrorCode::PermissionDenied,
        )),
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use poem::http::StatusCode;

    #[test]
    fn bearer_header_is_accepted() {
        let req = Request::builder()
            .header("Authorization", "Bearer s3cret")
            .finish();
        assert!(authorize(&req, "s3cret").is_ok());
    }

    #[test]
    fn query_token_is_accepted() {
        let req = Request::builder()
            .uri(poem::http::Uri::from_static("/api/v1/test-connectivity?access_token=s3cret"))
            .finish();
        assert!(authorize(&req, "s3cret").is_ok());
    }

    #[test]
    fn wrong_or_missing_token_is_rejected() {
        let wrong = Request::builder()
            .header("Authorization", "Bearer nope")
            .finish();
        let err = authorize(&wrong, "s3cret").unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let missing = Request::builder().finish();
        assert!(authorize(&missing, "s3cret").is_err());
    }
}
