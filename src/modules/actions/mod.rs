// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use poem_openapi::Object;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::modules::attachment;
use crate::modules::client::{SmaClient, SmaTransport};
use crate::modules::common::params::ActionParams;
use crate::modules::error::SmaBridgeResult;
use crate::modules::list_entry::ListOperation;
use crate::modules::normalize::{self, quarantine::Mutation, NormalizedResult};
use crate::modules::request::{self, QuarantineKind};
use crate::modules::vault::{ContentStore, DiskVault};

#[cfg(test)]
mod tests;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    SearchSpamQuarantine,
    SearchQuarantine,
    GetSpamMessage,
    GetQuarantineMessage,
    ReleaseSpamMessage,
    ReleaseQuarantineMessage,
    DeleteSpamMessage,
    DeleteQuarantineMessage,
    SearchTrackingMessages,
    GetTrackingDetails,
    SearchList,
    AddListEntry,
    EditListEntry,
    DeleteListEntry,
    GetStatisticsReport,
    DownloadAttachment,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SearchSpamQuarantine => "search-spam-quarantine",
            Action::SearchQuarantine => "search-quarantine",
            Action::GetSpamMessage => "get-spam-message",
            Action::GetQuarantineMessage => "get-quarantine-message",
            Action::ReleaseSpamMessage => "release-spam-message",
            Action::ReleaseQuarantineMessage => "release-quarantine-message",
            Action::DeleteSpamMessage => "delete-spam-message",
            Action::DeleteQuarantineMessage => "delete-quarantine-message",
            Action::SearchTrackingMessages => "search-tracking-messages",
            Action::GetTrackingDetails => "get-tracking-details",
            Action::SearchList => "search-list",
            Action::AddListEntry => "add-list-entry",
            Action::EditListEntry => "edit-list-entry",
            Action::DeleteListEntry => "delete-list-entry",
            Action::GetStatisticsReport => "get-statistics-report",
            Action::DownloadAttachment => "download-attachment",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the host receives for every successful action.
#[derive(Clone, Debug, Object)]
pub struct ActionOutcome {
    pub action: String,
    /// Always `success`; failures are reported as errors.
    pub status: String,
    pub message: String,
    pub data: Vec<Value>,
    pub summary: Value,
    /// Entries the appliance returned that were not records.
    pub skipped: u64,
}

impl ActionOutcome {
    pub fn new(action: &str, message: String, result: NormalizedResult) -> Self {
        Self {
            action: action.to_string(),
            status: "success".into(),
            message,
            data: result.data.into_iter().map(Value::Object).collect(),
            summary: Value::Object(result.summary),
            skipped: result.skipped as u64,
        }
    }
}

pub type SmaBridge = Bridge<SmaClient, DiskVault>;

/// Appliance transport plus the store attachments are written to.
pub struct Bridge<T, S> {
    pub transport: T,
    pub store: S,
    pub max_attachment_size: u64,
}

impl<T: SmaTransport, S: ContentStore> Bridge<T, S> {
    pub fn new(transport: T, store: S, max_attachment_size: u64) -> Self {
        Self {
            transport,
            store,
            max_attachment_size,
        }
    }

    pub async fn dispatch(&self, action: Action, params: Value) -> SmaBridgeResult<ActionOutcome> {
        let params = ActionParams::from_value(params)?;
        let outcome = match action {
            Action::SearchSpamQuarantine => self.search_spam_quarantine(&params).await,
            Action::SearchQuarantine => self.search_quarantine(&params).await,
            Action::GetSpamMessage => self.get_message(&params, QuarantineKind::Spam).await,
            Action::GetQuarantineMessage => {
                self.get_message(&params, QuarantineKind::General).await
            }
            Action::ReleaseSpamMessage => {
                self.mutate(&params, QuarantineKind::Spam, Mutation::Release).await
            }
            Action::ReleaseQuarantineMessage => {
                self.mutate(&params, QuarantineKind::General, Mutation::Release)
                    .await
            }
            Action::DeleteSpamMessage => {
                self.mutate(&params, QuarantineKind::Spam, Mutation::Delete).await
            }
            Action::DeleteQuarantineMessage => {
                self.mutate(&params, QuarantineKind::General, Mutation::Delete)
                    .await
            }
            Action::SearchTrackingMessages => self.search_tracking_messages(&params).await,
            Action::GetTrackingDetails => self.get_tracking_details(&params).await,
            Action::SearchList => self.search_list(&params).await,
            Action::AddListEntry => self.list_entry(&params, ListOperation::Add).await,
            Action::EditListEntry => self.list_entry(&params, ListOperation::Edit).await,
            Action::DeleteListEntry => self.list_entry(&params, ListOperation::Delete).await,
            Action::GetStatisticsReport => self.get_statistics_report(&params).await,
            Action::DownloadAttachment => self.download_attachment(&params).await,
        }?;
        info!(
            action = %action,
            records = outcome.data.len(),
            skipped = outcome.skipped,
            "{}",
            outcome.message
        );
        Ok(outcome)
    }

    pub async fn test_connectivity(&self) -> SmaBridgeResult<ActionOutcome> {
        self.transport.authenticate().await?;
        Ok(ActionOutcome::new(
            "test-connectivity",
            "Test Connectivity Passed".into(),
            NormalizedResult::default(),
        ))
    }

    async fn search_spam_quarantine(&self, params: &ActionParams) -> SmaBridgeResult<ActionOutcome> {
        let request = request::quarantine::search_spam(params)?;
        let raw = self.transport.execute(&request).await?;
        let result = normalize::quarantine::search(&raw)?;
        let message = format!("Successfully retrieved {} messages", result.data.len());
        Ok(ActionOutcome::new(Action::SearchSpamQuarantine.name(), message, result))
    }

    async fn search_quarantine(&self, params: &ActionParams) -> SmaBridgeResult<ActionOutcome> {
        let request = request::quarantine::search_general(params)?;
        let raw = self.transport.execute(&request).await?;
        let result = normalize::quarantine::search(&raw)?;
        let message = format!(
            "Successfully retrieved {} messages from {}",
            result.data.len(),
            request.query_value("quarantines").unwrap_or_default()
        );
        Ok(ActionOutcome::new(Action::SearchQuarantine.name(), message, result))
    }

    async fn get_message(
        &self,
        params: &ActionParams,
        kind: QuarantineKind,
    ) -> SmaBridgeResult<ActionOutcome> {
        let request = request::quarantine::details(params, kind)?;
        let raw = self.transport.execute(&request).await?;
        let result = normalize::quarantine::details(&raw)?;
        let action = match kind {
            QuarantineKind::Spam => Action::GetSpamMessage,
            QuarantineKind::General => Action::GetQuarantineMessage,
        };
        Ok(ActionOutcome::new(
            action.name(),
            "Successfully retrieved message details".into(),
            result,
        ))
    }

    async fn mutate(
        &self,
        params: &ActionParams,
        kind: QuarantineKind,
        mutation: Mutation,
    ) -> SmaBridgeResult<ActionOutcome> {
        let request = match mutation {
            Mutation::Release => request::quarantine::release(params, kind)?,
            Mutation::Delete => request::quarantine::delete(params, kind)?,
        };
        let raw = self.transport.execute(&request).await?;
        let result = normalize::quarantine::mutation(&raw, mutation)?;
        let affected = result
            .data
            .first()
            .and_then(|record| record.get("totalCount"))
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let (action, verb) = match (kind, mutation) {
            (QuarantineKind::Spam, Mutation::Release) => (Action::ReleaseSpamMessage, "released"),
            (QuarantineKind::General, Mutation::Release) => {
                (Action::ReleaseQuarantineMessage, "released")
            }
            (QuarantineKind::Spam, Mutation::Delete) => (Action::DeleteSpamMessage, "deleted"),
            (QuarantineKind::General, Mutation::Delete) => {
                (Action::DeleteQuarantineMessage, "deleted")
            }
        };
        let message = if affected == 0 {
            format!("No matching messages; 0 {}", verb)
        } else {
            format!("Successfully {} {} message(s)", verb, affected)
        };
        Ok(ActionOutcome::new(action.name(), message, result))
    }

    async fn search_tracking_messages(&self, params: &ActionParams) -> SmaBridgeResult<ActionOutcome> {
        let request = request::tracking::search(params)?;
        let raw = self.transport.execute(&request).await?;
        let result = normalize::tracking::search(&raw)?;
        let message = format!(
            "Successfully retrieved {} tracking messages",
            result.data.len()
        );
        Ok(ActionOutcome::new(Action::SearchTrackingMessages.name(), message, result))
    }

    async fn get_tracking_details(&self, params: &ActionParams) -> SmaBridgeResult<ActionOutcome> {
        let request = request::tracking::details(params)?;
        let raw = self.transport.execute(&request).await?;
        let result = normalize::tracking::details(&raw)?;
        Ok(ActionOutcome::new(
            Action::GetTrackingDetails.name(),
            "Successfully retrieved message tracking details".into(),
            result,
        ))
    }

    async fn search_list(&self, params: &ActionParams) -> SmaBridgeResult<ActionOutcome> {
        let search = request::list::search(params)?;
        let raw = self.transport.execute(&search.request).await?;
        let result = normalize::list::search(&raw, search.list_type, search.view_by)?;
        let message = format!(
            "Successfully retrieved {} {} entries",
            result.data.len(),
            search.list_type
        );
        Ok(ActionOutcome::new(Action::SearchList.name(), message, result))
    }

    async fn list_entry(
        &self,
        params: &ActionParams,
        operation: ListOperation,
    ) -> SmaBridgeResult<ActionOutcome> {
        let (entry, request) = request::list::entry(params, operation)?;
        let raw = self.transport.execute(&request).await?;
        let result = normalize::list::entry(&raw, &entry)?;
        let (action, message) = match operation {
            ListOperation::Add => (
                Action::AddListEntry,
                format!("Successfully added entry in {}", entry.list_type),
            ),
            ListOperation::Edit => (
                Action::EditListEntry,
                format!("Successfully edited entry in {}", entry.list_type),
            ),
            ListOperation::Delete => (
                Action::DeleteListEntry,
                format!("Successfully deleted entries from {}", entry.list_type),
            ),
        };
        Ok(ActionOutcome::new(action.name(), message, result))
    }

    async fn get_statistics_report(&self, params: &ActionParams) -> SmaBridgeResult<ActionOutcome> {
        let (report_type, request) = request::report::statistics(params)?;
        let raw = self.transport.execute(&request).await?;
        let result = normalize::report::statistics(&raw, &report_type)?;
        let message = format!(
            "Successfully retrieved {} rows of {}",
            result.data.len(),
            report_type
        );
        Ok(ActionOutcome::new(Action::GetStatisticsReport.name(), message, result))
    }

    async fn download_attachment(&self, params: &ActionParams) -> SmaBridgeResult<ActionOutcome> {
        let request = request::attachment::download(params)?;
        let mid = request.query_value("mid").unwrap_or_default().to_string();
        let attachment_id = request
            .query_value("attachmentId")
            .unwrap_or_default()
            .to_string();
        let fallback = format!("attachment-{}-{}", mid, attachment_id);
        let handle = attachment::resolve(
            &self.transport,
            &self.store,
            &request,
            &fallback,
            self.max_attachment_size,
        )
        .await?;

        let mut record = Map::new();
        record.insert("vault_id".into(), json!(handle.vault_id));
        record.insert("file_name".into(), json!(handle.filename));
        record.insert("size".into(), json!(handle.size));
        record.insert("bytes_written".into(), json!(handle.bytes_written));
        record.insert("message_id".into(), json!(mid));
        record.insert("attachment_id".into(), json!(attachment_id));
        let result = NormalizedResult::single(record)
            .with_summary("vault_id", handle.vault_id.clone())
            .with_summary("file_name", handle.filename.clone())
            .with_summary("size", handle.size);
        Ok(ActionOutcome::new(
            Action::DownloadAttachment.name(),
            format!("Successfully stored attachment '{}'", handle.filename),
            result,
        ))
    }
}
