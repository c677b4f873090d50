// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::modules::error::{code::ErrorCode, SmaBridgeResult};
use crate::modules::settings::dir::DATA_DIR_MANAGER;
use crate::raise_error;

/// Where a stored body ended up, and how many bytes were written.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoredContent {
    pub vault_id: String,
    pub size: u64,
}

pub trait ContentStore: Send + Sync {
    /// Consumes `body` chunk by chunk. Nothing is kept when the stream fails.
    fn store(
        &self,
        filename: &str,
        body: BoxStream<'static, SmaBridgeResult<Bytes>>,
    ) -> impl Future<Output = SmaBridgeResult<StoredContent>> + Send;
}

/// Content-addressed store in the data directory, backed by cacache.
#[derive(Clone, Debug)]
pub struct DiskVault {
    dir: PathBuf,
}

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

impl DiskVault {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn open() -> Self {
        Self::new(DATA_DIR_MANAGER.vault_dir.clone())
    }

    fn dir_str(&self) -> SmaBridgeResult<&str> {
        self.dir.to_str().ok_or_else(|| {
            raise_error!(
                "Failed to convert vault_dir to str".into(),
                ErrorCode::VaultError
            )
        })
    }

    fn next_key(filename: &str) -> String {
        format!(
            "attachment/{}-{}/{}",
            chrono::Utc::now().timestamp_millis(),
            SEQUENCE.fetch_add(1, Ordering::Relaxed),
            filename
        )
    }

    #[cfg(test)]
    pub async fn read(&self, vault_id: &str) -> SmaBridgeResult<Vec<u8>> {
        cacache::read(self.dir_str()?, vault_id)
            .await
            .map_err(|e| match e {
                cacache::Error::EntryNotFound(..) => raise_error!(
                    format!("Vault entry '{}' not found", vault_id),
                    ErrorCode::NotFound
                ),
                other => raise_error!(format!("{:#?}", other), ErrorCode::VaultError),
            })
    }
}

impl ContentStore for DiskVault {
    async fn store(
        &self,
        filename: &str,
        mut body: BoxStream<'static, SmaBridgeResult<Bytes>>,
    ) -> SmaBridgeResult<StoredContent> {
        let key = Self::next_key(filename);
        let mut writer = cacache::Writer::create(self.dir_str()?, &key)
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::VaultError))?;

        let mut size = 0u64;
        while let Some(chunk) = body.next().await {
            // Dropping an uncommitted writer discards the partial content.
            let chunk = chunk?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::VaultError))?;
            size += chunk.len() as u64;
            debug!(key = %key, written = size, "vault chunk written");
        }
        writer
            .commit()
            .await
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::VaultError))?;

        info!(key = %key, size, "Stored attachment in vault");
        Ok(StoredContent {
            vault_id: key,
            size,
        })
    }
}
