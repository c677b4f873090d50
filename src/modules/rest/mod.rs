// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;
use std::time::Duration;

use crate::modules::actions::SmaBridge;
use crate::modules::common::auth::ApiGuard;
use crate::modules::common::error::ErrorCapture;
use crate::modules::common::log::Tracing;
use crate::modules::common::timeout::{Timeout, TIMEOUT_HEADER};
use crate::modules::error::code::ErrorCode;
use crate::modules::error::error_handler;
use crate::modules::error::SmaBridgeResult;
use crate::modules::{settings::cli::SETTINGS, utils::shutdown::shutdown_signal};
use crate::raise_error;

use super::error::ApiErrorResponse;
use api::create_openapi_service;
use poem::listener::TcpListener;
use poem::middleware::{CatchPanic, Compression, Cors};
use poem::{EndpointExt, Route, Server};

pub mod api;

pub type ApiResult<T, E = ApiErrorResponse> = std::result::Result<T, E>;

const DESCRIPTION: &str = r#"
    SmaBridge translates flat action parameters into Cisco Secure Email and Web Manager
    REST queries and returns every answer in one normalized shape.

    - Quarantine search, details, release and delete for spam and policy quarantines.
    - Message tracking search and details.
    - Safelist and blocklist management.
    - Reporting statistics and attachment download into a local vault.
"#;

pub async fn start_http_server(bridge: Arc<SmaBridge>) -> SmaBridgeResult<()> {
    let listener = TcpListener::bind((SETTINGS.smabridge_bind_ip.clone(), SETTINGS.smabridge_http_port));

    let api_service = create_openapi_service(bridge)
        .description(DESCRIPTION)
        .summary("Query translation and response normalization for Cisco SMA");

    let swagger = api_service.swagger_ui();
    let redoc = api_service.redoc();
    let spec_json = api_service.spec_endpoint();
    let spec_yaml = api_service.spec_endpoint_yaml();
    let openapi_explorer = api_service.openapi_explorer();

    let open_api_route = Route::new()
        .nest_no_strip("/api/v1", api_service)
        .with(ApiGuard)
        .with(ErrorCapture)
        .with(Timeout)
        .with(Tracing);

    let cors = Cors::new()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["Content-Type", "Authorization", TIMEOUT_HEADER])
        .expose_headers(vec!["Accept"]);

    let route = Route::new()
        .nest("/api-docs/swagger", swagger)
        .nest("/api-docs/redoc", redoc)
        .nest("/api-docs/explorer", openapi_explorer)
        .nest("/api-docs/spec.json", spec_json)
        .nest("/api-docs/spec.yaml", spec_yaml)
        .nest_no_strip("/api/v1", open_api_route)
        .with(cors)
        .with(Compression::new())
        .with(CatchPanic::new());

    let server = Server::new(listener)
        .name("SmaBridge API Service")
        .idle_timeout(Duration::from_secs(60))
        .run_with_graceful_shutdown(
            route.catch_all_error(error_handler),
            shutdown_signal(),
            Some(Duration::from_secs(5)),
        );
    tracing::info!(
        "SmaBridge API Service is now running on {}:{}.",
        SETTINGS.smabridge_bind_ip,
        SETTINGS.smabridge_http_port
    );
    server
        .await
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))
}
