// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use poem::listener::{Acceptor, Listener, TcpListener};
use poem::web::{Data, Json};
use poem::{get, handler, http::HeaderMap, post, EndpointExt, IntoResponse, Response, Route, Server};
use serde_json::json;

use super::*;
use crate::base64_decode;

#[test]
fn login_body_encodes_credentials() {
    let body = login_body("admin", "ironport");
    assert_eq!(body["data"]["userName"], json!("YWRtaW4="));
    assert_eq!(body["data"]["passphrase"], json!("aXJvbnBvcnQ="));
    let decoded = base64_decode!(body["data"]["passphrase"].as_str().unwrap()).unwrap();
    assert_eq!(decoded, b"ironport");
}

#[test]
fn status_errors_keep_the_backend_message() {
    let err = status_error(
        StatusCode::NOT_FOUND,
        r#"{"error": {"message": "No message found for mid 42"}}"#,
    );
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(err.message().contains("No message found for mid 42"));

    let err = status_error(StatusCode::PAYLOAD_TOO_LARGE, "");
    assert_eq!(err.code(), ErrorCode::TooLarge);

    let err = status_error(StatusCode::BAD_GATEWAY, "upstream exploded");
    assert_eq!(err.code(), ErrorCode::TransportError);
    assert!(err.message().ends_with("upstream exploded"));

    let err = status_error(StatusCode::UNAUTHORIZED, r#"{"message": "Token expired"}"#);
    assert_eq!(err.code(), ErrorCode::AuthenticationFailed);
    assert!(is_token_rejection(&err));

    let err = status_error(StatusCode::BAD_REQUEST, r#"{"error": "Invalid JWT token"}"#);
    assert!(is_token_rejection(&err));
    let err = status_error(StatusCode::BAD_REQUEST, r#"{"error": "Invalid date"}"#);
    assert!(!is_token_rejection(&err));
}

#[test]
fn content_disposition_variants() {
    assert_eq!(
        content_disposition_filename(r#"attachment; filename="report.pdf""#).as_deref(),
        Some("report.pdf")
    );
    assert_eq!(
        content_disposition_filename("attachment; filename=plain.txt").as_deref(),
        Some("plain.txt")
    );
    assert_eq!(
        content_disposition_filename(
            r#"attachment; filename="fallback.pdf"; filename*=UTF-8''Q3%20r%C3%A9sum%C3%A9.pdf"#
        )
        .as_deref(),
        Some("Q3 résumé.pdf")
    );
    assert_eq!(content_disposition_filename("inline"), None);
}

#[handler]
fn fake_login(Data(logins): Data<&Arc<AtomicUsize>>) -> Json<serde_json::Value> {
    let n = logins.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({"data": {"jwtToken": format!("tok-{}", n)}}))
}

// Only the second token is accepted, so the first call must re-login once.
fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer tok-2")
}

#[handler]
fn fake_messages(headers: &HeaderMap) -> Response {
    if !authorized(headers) {
        return Json(json!({"error": {"message": "Token expired"}}))
            .with_status(StatusCode::UNAUTHORIZED)
            .into_response();
    }
    Json(json!({"meta": {"totalCount": 1}, "data": [{"mid": 7}]})).into_response()
}

#[handler]
fn fake_attachment(headers: &HeaderMap) -> Response {
    if !authorized(headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Response::builder()
        .header("Content-Disposition", r#"attachment; filename="invoice.pdf""#)
        .body(b"0123456789".to_vec())
}

#[handler]
fn fake_missing() -> Response {
    Json(json!({"error": {"message": "Message not found"}}))
        .with_status(StatusCode::NOT_FOUND)
        .into_response()
}

async fn spawn_appliance() -> (String, Arc<AtomicUsize>) {
    let logins = Arc::new(AtomicUsize::new(0));
    let app = Route::new()
        .at("/sma/api/v2.0/login", post(fake_login))
        .at("/sma/api/v2.0/quarantine/messages", get(fake_messages))
        .at("/sma/api/v2.0/quarantine/messages/attachment", get(fake_attachment))
        .at("/sma/api/v2.0/quarantine/messages/details", get(fake_missing))
        .data(logins.clone());
    let acceptor = TcpListener::bind("127.0.0.1:0")
        .into_acceptor()
        .await
        .unwrap();
    let addr = acceptor
        .local_addr()
        .remove(0)
        .as_socket_addr()
        .cloned()
        .unwrap();
    tokio::spawn(Server::new_with_acceptor(acceptor).run(app));
    (format!("http://{}", addr), logins)
}

fn client(base_url: String) -> SmaClient {
    SmaClient::new(ApplianceConfig {
        base_url,
        username: "admin".into(),
        password: "ironport".into(),
        verify_cert: true,
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn expired_token_triggers_one_relogin() {
    let (base_url, logins) = spawn_appliance().await;
    let client = client(base_url);

    let value = client
        .execute(&SmaRequest::get("/quarantine/messages"))
        .await
        .unwrap();
    assert_eq!(value["data"][0]["mid"], json!(7));
    assert_eq!(logins.load(Ordering::SeqCst), 2);

    // The refreshed token is reused.
    client
        .execute(&SmaRequest::get("/quarantine/messages"))
        .await
        .unwrap();
    assert_eq!(logins.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn not_found_is_reported_with_backend_text() {
    let (base_url, _) = spawn_appliance().await;
    let client = client(base_url);
    let err = client
        .execute(&SmaRequest::get("/quarantine/messages/details"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(err.message().contains("Message not found"));
}

#[tokio::test]
async fn download_streams_the_body() {
    let (base_url, _) = spawn_appliance().await;
    let client = client(base_url);
    let download = client
        .download(&SmaRequest::get("/quarantine/messages/attachment"))
        .await
        .unwrap();
    assert_eq!(download.filename.as_deref(), Some("invoice.pdf"));
    assert_eq!(download.declared_size, Some(10));
    let chunks: Vec<Bytes> = download
        .body
        .map(|chunk| chunk.unwrap())
        .collect()
        .await;
    assert_eq!(chunks.concat(), b"0123456789");
}

#[tokio::test]
async fn unreachable_appliance_is_a_transport_error() {
    let client = client("http://127.0.0.1:9".into());
    let err = client.authenticate().await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::TransportError);
}
