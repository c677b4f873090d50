// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use futures::StreamExt;
use tracing::{info, warn};

use crate::modules::client::SmaTransport;
use crate::modules::error::{code::ErrorCode, SmaBridgeResult};
use crate::modules::request::SmaRequest;
use crate::modules::vault::ContentStore;
use crate::raise_error;


#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttachmentHandle {
    pub vault_id: String,
    pub filename: String,
    /// The appliance's declared size; bytes written only when it declared none.
    pub size: u64,
    pub bytes_written: u64,
}

fn too_large(size: u64, max_size: u64) -> crate::modules::error::SmaBridgeError {
    raise_error!(
        format!(
            "Attachment is {} bytes, larger than the configured maximum of {} bytes",
            size, max_size
        ),
        ErrorCode::TooLarge
    )
}

/// Downloads an attachment into `store`.
///
/// A declared size above `max_size` is refused before the body is read; bodies
/// without a declared size are cut off once they pass the limit.
pub async fn resolve<T, S>(
    transport: &T,
    store: &S,
    request: &SmaRequest,
    fallback_name: &str,
    max_size: u64,
) -> SmaBridgeResult<AttachmentHandle>
where
    T: SmaTransport,
    S: ContentStore,
{
    let download = transport.download(request).await?;
    if let Some(declared) = download.declared_size {
        if declared > max_size {
            return Err(too_large(declared, max_size));
        }
    }

    let filename = download
        .filename
        .clone()
        .unwrap_or_else(|| fallback_name.to_string());
    let mut seen = 0u64;
    let body = download
        .body
        .map(move |chunk| {
            let chunk = chunk?;
            seen += chunk.len() as u64;
            if seen > max_size {
                return Err(too_large(seen, max_size));
            }
            Ok(chunk)
        })
        .boxed();

    let stored = store.store(&filename, body).await?;
    let size = match download.declared_size {
        Some(declared) => {
            if declared != stored.size {
                warn!(
                    declared,
                    written = stored.size,
                    "Attachment size differs from the size the appliance declared"
                );
            }
            declared
        }
        None => stored.size,
    };
    info!(vault_id = %stored.vault_id, filename = %filename, size, "Attachment stored");
    Ok(AttachmentHandle {
        vault_id: stored.vault_id,
        filename,
        size,
        bytes_written: stored.size,
    })
}
