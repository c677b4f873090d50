// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::common::params::ActionParams;
use crate::modules::error::SmaBridgeResult;

use super::{single_message_id, single_quarantine, table, QuarantineKind, SmaRequest};

pub const ATTACHMENT_PATH: &str = "/quarantine/messages/attachment";

/// A general-quarantine attachment also needs the quarantine holding the message.
pub fn download(params: &ActionParams) -> SmaBridgeResult<SmaRequest> {
    table::DOWNLOAD_ATTACHMENT.check_required(params)?;
    let mid = single_message_id(params, "message_id")?;
    let attachment_id = params.required("attachment_id")?;
    let kind = params
        .text("quarantine_type")
        .map(|raw| QuarantineKind::parse("quarantine_type", &raw))
        .transpose()?;

    let mut request = SmaRequest::get(ATTACHMENT_PATH);
    request.push_query("mid", mid.to_string());
    request.push_query("attachmentId", attachment_id);
    if let Some(kind) = kind {
        request.push_query("quarantineType", kind.wire_name());
        if kind == QuarantineKind::General {
            request.push_query("quarantineName", single_quarantine(params, "quarantine_name")?);
        }
    }
    Ok(request)
}
