// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::{Endpoint, Middleware, Request, Result};
use std::time::Duration;
use tracing::error;

use crate::modules::error::code::ErrorCode;
use crate::modules::settings::cli::SETTINGS;

use super::create_api_error_response;

pub const TIMEOUT_HEADER: &str = "X-SmaBridge-Timeout-Seconds";
const MAX_TIMEOUT_SECS: u64 = 600;

pub struct Timeout;

impl<E: Endpoint> Middleware<E> for Timeout {
    type Output = TimeoutEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        TimeoutEndpoint { ep }
    }
}

pub struct TimeoutEndpoint<E> {
    ep: E,
}

#[inline]
fn extract_timeout(req: &Request) -> Option<u64> {
    req.header(TIMEOUT_HEADER)
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Default budget for one host call: the appliance timeout plus headroom for a
/// re-login and the vault write.
#[inline]
fn default_timeout() -> u64 {
    SETTINGS.smabridge_sma_timeout_secs.saturating_mul(2) + 5
}

impl<E: Endpoint> Endpoint for TimeoutEndpoint<E> {
    type Output = E::Output;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let seconds = extract_timeout(&req)
            .unwrap_or_else(default_timeout)
            .min(MAX_TIMEOUT_SECS);
        match tokio::time::timeout(Duration::from_secs(seconds), self.ep.call(req)).await {
            Ok(result) => result,
            Err(_) => {
                error!("Request timed out after {} seconds", seconds);
                Err(create_api_error_response(
                    &format!(
                        "Request timed out after {} seconds (timeout set via {} header, max allowed: {} seconds)",
                        seconds, TIMEOUT_HEADER, MAX_TIMEOUT_SECS
                    ),
                    ErrorCode::RequestTimeout,
                ))
            }
        }
    }
}
