use std::sync::Arc;

use mimalloc::MiMalloc;
use modules::{
    actions::Bridge,
    client::SmaClient,
    context::Initialize,
    error::{code::ErrorCode, SmaBridgeResult},
    logger,
    rest::start_http_server,
    settings::{cli::SETTINGS, dir::DataDirManager},
    vault::DiskVault,
};
use tracing::{info, warn};

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> SmaBridgeResult<()> {
    if let Err(message) = logger::initialize_logging() {
        eprintln!("{}", message);
        return Err(raise_error!(message, ErrorCode::MissingConfiguration));
    }
    info!("Starting smabridge");
    info!("Version:  {}", smabridge_version!());
    info!("Git:      [{}]", env!("GIT_HASH"));

    if let Err(error) = DataDirManager::initialize().await {
        eprintln!("{:?}", error);
        return Err(error);
    }

    let config = SETTINGS.appliance()?;
    info!(
        "Appliance: {} (certificate verification {})",
        config.base_url,
        if config.verify_cert { "on" } else { "off" }
    );
    if SETTINGS.smabridge_api_token.is_none() {
        warn!("No smabridge_api_token configured; the API accepts unauthenticated calls");
    }

    let bridge = Bridge::new(
        SmaClient::new(config)?,
        DiskVault::open(),
        SETTINGS.smabridge_max_attachment_size,
    );
    start_http_server(Arc::new(bridge)).await
}
