// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use poem_openapi::payload::Json;
use poem_openapi::OpenApi;

use crate::modules::actions::{ActionOutcome, SmaBridge};
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;

pub struct SystemApi {
    pub bridge: Arc<SmaBridge>,
}

#[OpenApi(prefix_path = "/api/v1", tag = "ApiTags::System")]
impl SystemApi {
    /// Logs in to the configured appliance with the stored credentials.
    ///
    /// Succeeds only when the appliance accepts the login and returns a JWT.
    #[oai(
        method = "get",
        path = "/test-connectivity",
        operation_id = "test_connectivity"
    )]
    async fn test_connectivity(&self) -> ApiResult<Json<ActionOutcome>> {
        Ok(Json(self.bridge.test_connectivity().await?))
    }
}
