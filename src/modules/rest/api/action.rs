// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use poem_openapi::payload::Json;
use poem_openapi::OpenApi;
use serde_json::Value;

use crate::modules::actions::{Action, ActionOutcome, SmaBridge};
use crate::modules::rest::api::ApiTags;
use crate::modules::rest::ApiResult;

/// Every action takes a flat JSON object of named parameters.
pub struct ActionApi {
    pub bridge: Arc<SmaBridge>,
}

impl ActionApi {
    async fn run(&self, action: Action, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        Ok(Json(self.bridge.dispatch(action, params.0).await?))
    }
}

#[OpenApi(prefix_path = "/api/v1/actions")]
impl ActionApi {
    /// Search the spam quarantine within a time window.
    ///
    /// Requires `start_date` and `end_date`. Filters on envelope recipient and on the
    /// generic filter field are applied only when operator and value are both given.
    #[oai(
        method = "post",
        path = "/search-spam-quarantine",
        operation_id = "search_spam_quarantine",
        tag = "ApiTags::Quarantine"
    )]
    async fn search_spam_quarantine(&self, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::SearchSpamQuarantine, params).await
    }

    /// Search one or more policy, virus or outbreak quarantines.
    ///
    /// `quarantines` is a comma-separated list of quarantine names.
    #[oai(
        method = "post",
        path = "/search-quarantine",
        operation_id = "search_quarantine",
        tag = "ApiTags::Quarantine"
    )]
    async fn search_quarantine(&self, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::SearchQuarantine, params).await
    }

    /// Get the details of one spam-quarantined message.
    #[oai(
        method = "post",
        path = "/get-spam-message",
        operation_id = "get_spam_message",
        tag = "ApiTags::Quarantine"
    )]
    async fn get_spam_message(&self, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::GetSpamMessage, params).await
    }

    /// Get the details of one message held in a named quarantine.
    #[oai(
        method = "post",
        path = "/get-quarantine-message",
        operation_id = "get_quarantine_message",
        tag = "ApiTags::Quarantine"
    )]
    async fn get_quarantine_message(&self, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::GetQuarantineMessage, params).await
    }

    /// Release spam-quarantined messages by id.
    #[oai(
        method = "post",
        path = "/release-spam-message",
        operation_id = "release_spam_message",
        tag = "ApiTags::Quarantine"
    )]
    async fn release_spam_message(&self, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::ReleaseSpamMessage, params).await
    }

    /// Release messages from a named quarantine.
    #[oai(
        method = "post",
        path = "/release-quarantine-message",
        operation_id = "release_quarantine_message",
        tag = "ApiTags::Quarantine"
    )]
    async fn release_quarantine_message(
        &self,
        params: Json<Value>,
    ) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::ReleaseQuarantineMessage, params).await
    }

    /// Delete spam-quarantined messages by id.
    #[oai(
        method = "post",
        path = "/delete-spam-message",
        operation_id = "delete_spam_message",
        tag = "ApiTags::Quarantine"
    )]
    async fn delete_spam_message(&self, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::DeleteSpamMessage, params).await
    }

    /// Delete messages from a named quarantine.
    #[oai(
        method = "post",
        path = "/delete-quarantine-message",
        operation_id = "delete_quarantine_message",
        tag = "ApiTags::Quarantine"
    )]
    async fn delete_quarantine_message(
        &self,
        params: Json<Value>,
    ) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::DeleteQuarantineMessage, params).await
    }

    /// Search message tracking within a time window.
    ///
    /// The summary carries `bad_records`, the number of rows the appliance could not parse.
    #[oai(
        method = "post",
        path = "/search-tracking-messages",
        operation_id = "search_tracking_messages",
        tag = "ApiTags::Tracking"
    )]
    async fn search_tracking_messages(&self, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::SearchTrackingMessages, params).await
    }

    /// Get the full tracking history of one message.
    #[oai(
        method = "post",
        path = "/get-tracking-details",
        operation_id = "get_tracking_details",
        tag = "ApiTags::Tracking"
    )]
    async fn get_tracking_details(&self, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::GetTrackingDetails, params).await
    }

    /// List safelist or blocklist entries.
    #[oai(
        method = "post",
        path = "/search-list",
        operation_id = "search_list",
        tag = "ApiTags::List"
    )]
    async fn search_list(&self, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::SearchList, params).await
    }

    /// Add a safelist or blocklist entry.
    ///
    /// With `view_by=recipient` supply `recipient_addresses` and `sender_list`; with
    /// `view_by=sender` supply `sender_addresses` and `recipient_list`.
    #[oai(
        method = "post",
        path = "/add-list-entry",
        operation_id = "add_list_entry",
        tag = "ApiTags::List"
    )]
    async fn add_list_entry(&self, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::AddListEntry, params).await
    }

    /// Replace the lists of an existing safelist or blocklist entry.
    #[oai(
        method = "post",
        path = "/edit-list-entry",
        operation_id = "edit_list_entry",
        tag = "ApiTags::List"
    )]
    async fn edit_list_entry(&self, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::EditListEntry, params).await
    }

    /// Delete safelist or blocklist entries.
    #[oai(
        method = "post",
        path = "/delete-list-entry",
        operation_id = "delete_list_entry",
        tag = "ApiTags::List"
    )]
    async fn delete_list_entry(&self, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::DeleteListEntry, params).await
    }

    /// Run a reporting query.
    #[oai(
        method = "post",
        path = "/get-statistics-report",
        operation_id = "get_statistics_report",
        tag = "ApiTags::Report"
    )]
    async fn get_statistics_report(&self, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::GetStatisticsReport, params).await
    }

    /// Download a quarantined message attachment into the vault.
    ///
    /// The summary returns the `vault_id` under which the content was stored.
    #[oai(
        method = "post",
        path = "/download-attachment",
        operation_id = "download_attachment",
        tag = "ApiTags::Attachment"
    )]
    async fn download_attachment(&self, params: Json<Value>) -> ApiResult<Json<ActionOutcome>> {
        self.run(Action::DownloadAttachment, params).await
    }
}
