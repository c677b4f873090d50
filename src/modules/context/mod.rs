// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::SmaBridgeResult;

pub trait Initialize {
    async fn initialize() -> SmaBridgeResult<()>;
}
