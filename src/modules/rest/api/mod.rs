// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use action::ActionApi;
use poem_openapi::{OpenApiService, Tags};
use system::SystemApi;

use crate::modules::actions::SmaBridge;
use crate::smabridge_version;

pub mod action;
pub mod system;

#[derive(Tags)]
pub enum ApiTags {
    /// Spam and policy/virus/outbreak quarantine messages.
    Quarantine,
    /// Message tracking.
    Tracking,
    /// Spam quarantine safelist and blocklist.
    List,
    /// Reporting statistics.
    Report,
    /// Attachment retrieval.
    Attachment,
    System,
}

type SmaBridgeOpenApi = (ActionApi, SystemApi);

pub fn create_openapi_service(bridge: Arc<SmaBridge>) -> OpenApiService<SmaBridgeOpenApi, ()> {
    OpenApiService::new(
        (
            ActionApi {
                bridge: bridge.clone(),
            },
            SystemApi { bridge },
        ),
        "SmaBridgeApi",
        smabridge_version!(),
    )
}
