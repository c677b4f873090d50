// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use reqwest::{header, StatusCode};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::modules::error::{code::ErrorCode, SmaBridgeError, SmaBridgeResult};
use crate::modules::request::{SmaRequest, LOGIN_PATH};
use crate::modules::settings::cli::ApplianceConfig;
use crate::{base64_encode, raise_error, smabridge_version};

#[cfg(test)]
pub mod fake;
#[cfg(test)]
mod tests;

/// An attachment body as the appliance serves it.
pub struct DownloadStream {
    pub filename: Option<String>,
    pub declared_size: Option<u64>,
    pub body: BoxStream<'static, SmaBridgeResult<Bytes>>,
}

impl std::fmt::Debug for DownloadStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadStream")
            .field("filename", &self.filename)
            .field("declared_size", &self.declared_size)
            .finish_non_exhaustive()
    }
}

/// Executes validated requests against the appliance.
pub trait SmaTransport: Send + Sync {
    fn execute(&self, request: &SmaRequest)
        -> impl Future<Output = SmaBridgeResult<Value>> + Send;

    fn download(
        &self,
        request: &SmaRequest,
    ) -> impl Future<Output = SmaBridgeResult<DownloadStream>> + Send;

    /// Performs a fresh login.
    fn authenticate(&self) -> impl Future<Output = SmaBridgeResult<()>> + Send;
}

pub struct SmaClient {
    http: reqwest::Client,
    config: ApplianceConfig,
    token: RwLock<Option<String>>,
}

impl SmaClient {
    pub fn new(config: ApplianceConfig) -> SmaBridgeResult<Self> {
        let http = reqwest::ClientBuilder::new()
            .user_agent(format!("smabridge/{}", smabridge_version!()))
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_cert)
            .build()
            .map_err(|e| {
                raise_error!(
                    format!("Failed to build HTTP client: {:#?}", e),
                    ErrorCode::InternalError
                )
            })?;
        if !config.verify_cert {
            warn!(
                host = %config.base_url,
                "TLS certificate verification is disabled for the appliance"
            );
        }
        Ok(Self {
            http,
            config,
            token: RwLock::new(None),
        })
    }

    fn url(&self, request: &SmaRequest) -> String {
        format!("{}{}", self.config.base_url, request.full_path())
    }

    async fn login(&self) -> SmaBridgeResult<String> {
        let response = self
            .http
            .post(self.url(&SmaRequest::post(LOGIN_PATH, Value::Null)))
            .json(&login_body(&self.config.username, &self.config.password))
            .send()
            .await
            .map_err(|e| transport_error(&e, self.config.timeout_secs))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(&e, self.config.timeout_secs))?;
        if !status.is_success() {
            let error = status_error(status, &text);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => raise_error!(
                    format!("Login to appliance failed: {}", error.message()),
                    ErrorCode::AuthenticationFailed
                ),
                _ => error,
            });
        }
        let token = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| {
                body.pointer("/data/jwtToken")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .ok_or_else(|| {
                raise_error!(
                    "JWT token not found in response".into(),
                    ErrorCode::AuthenticationFailed
                )
            })?;
        info!(host = %self.config.base_url, "Obtained appliance session token");
        Ok(token)
    }

    async fn refresh_token(&self) -> SmaBridgeResult<String> {
        let token = self.login().await?;
        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    async fn current_token(&self) -> SmaBridgeResult<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }
        self.refresh_token().await
    }

    async fn send_once(&self, request: &SmaRequest, token: &str) -> SmaBridgeResult<reqwest::Response> {
        let mut builder = self
            .http
            .request(request.method.clone(), self.url(request))
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(&e, self.config.timeout_secs))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        Err(status_error(status, &text))
    }

    /// Sends with the cached token; an expired token earns exactly one re-login.
    async fn send(&self, request: &SmaRequest) -> SmaBridgeResult<reqwest::Response> {
        let token = self.current_token().await?;
        debug!(method = %request.method, path = %request.path, "calling appliance");
        match self.send_once(request, &token).await {
            Err(error) if is_token_rejection(&error) => {
                warn!(
                    path = %request.path,
                    "Appliance rejected session token ({}), logging in again",
                    error.message()
                );
                let token = self.refresh_token().await?;
                self.send_once(request, &token).await
            }
            other => other,
        }
    }
}

impl SmaTransport for SmaClient {
    async fn execute(&self, request: &SmaRequest) -> SmaBridgeResult<Value> {
        let response = self.send(request).await?;
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(&e, self.config.timeout_secs))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| {
            raise_error!(
                format!("Appliance returned invalid JSON: {}", e),
                ErrorCode::UnexpectedResponse
            )
        })
    }

    async fn download(&self, request: &SmaRequest) -> SmaBridgeResult<DownloadStream> {
        let response = self.send(request).await?;
        let filename = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(content_disposition_filename);
        let declared_size = response.content_length();
        let timeout_secs = self.config.timeout_secs;
        let body = response
            .bytes_stream()
            .map_err(move |e| transport_error(&e, timeout_secs))
            .boxed();
        Ok(DownloadStream {
            filename,
            declared_size,
            body,
        })
    }

    async fn authenticate(&self) -> SmaBridgeResult<()> {
        self.refresh_token().await.map(|_| ())
    }
}

/// Credentials travel base64-encoded inside a `data` envelope.
pub fn login_body(username: &str, password: &str) -> Value {
    json!({
        "data": {
            "userName": base64_encode!(username.as_bytes()),
            "passphrase": base64_encode!(password.as_bytes()),
        }
    })
}

fn transport_error(error: &reqwest::Error, timeout_secs: u64) -> SmaBridgeError {
    if error.is_timeout() {
        raise_error!(
            format!("Appliance did not answer within {} seconds", timeout_secs),
            ErrorCode::TransportError
        )
    } else {
        raise_error!(
            format!("Failed to reach appliance: {}", error),
            ErrorCode::TransportError
        )
    }
}

/// Maps a non-success status to an error carrying the appliance's own message.
pub fn status_error(status: StatusCode, body: &str) -> SmaBridgeError {
    let message = backend_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    let code = match status {
        StatusCode::UNAUTHORIZED => ErrorCode::AuthenticationFailed,
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::PAYLOAD_TOO_LARGE => ErrorCode::TooLarge,
        _ => ErrorCode::TransportError,
    };
    raise_error!(
        format!("Appliance returned {}: {}", status.as_u16(), message),
        code
    )
}

/// Pulls a human-readable message out of an error body; falls back to the raw text.
fn backend_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Some(body.to_string());
    };
    ["/error/message", "/message", "/error", "/data/message"]
        .iter()
        .find_map(|pointer| value.pointer(pointer).and_then(Value::as_str))
        .map(str::to_string)
        .or_else(|| Some(value.to_string()))
}

pub fn is_token_rejection(error: &SmaBridgeError) -> bool {
    error.code() == ErrorCode::AuthenticationFailed
        || error.message().to_ascii_lowercase().contains("token")
}

/// Extracts the filename from a `Content-Disposition` header, preferring the
/// RFC 5987 `filename*` form.
pub fn content_disposition_filename(header: &str) -> Option<String> {
    let mut plain = None;
    for part in header.split(';').map(str::trim) {
        let Some((name, value)) = part.split_once('=') else {
            continue;
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let encoded = value.trim().rsplit("''").next().unwrap_or_default();
                if let Ok(decoded) = urlencoding::decode(encoded) {
                    if !decoded.is_empty() {
                        return Some(decoded.into_owned());
                    }
                }
            }
            "filename" => {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() {
                    plain = Some(value.to_string());
                }
            }
            _ => {}
        }
    }
    plain
}
