use crate::modules::context::Initialize;
use crate::modules::settings::cli::SETTINGS;
use crate::{
    modules::error::{code::ErrorCode, SmaBridgeResult},
    raise_error,
};
use std::path::PathBuf;
use std::sync::LazyLock;

const VAULT_DIR: &str = "vault";
const LOG_DIR: &str = "logs";

pub static DATA_DIR_MANAGER: LazyLock<DataDirManager> =
    LazyLock::new(|| DataDirManager::new(PathBuf::from(&SETTINGS.smabridge_root_dir)));

#[derive(Debug)]
pub struct DataDirManager {
    pub root_dir: PathBuf,
    pub vault_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Initialize for DataDirManager {
    async fn initialize() -> SmaBridgeResult<()> {
        for dir in [
            &DATA_DIR_MANAGER.root_dir,
            &DATA_DIR_MANAGER.vault_dir,
            &DATA_DIR_MANAGER.log_dir,
        ] {
            std::fs::create_dir_all(dir).map_err(|e| {
                raise_error!(
                    format!("Failed to create data directory {:?}: {:#?}", dir, e),
                    ErrorCode::InternalError
                )
            })?;
        }
        Ok(())
    }
}

impl DataDirManager {
    pub fn new(root_dir: PathBuf) -> Self {
        Self {
            vault_dir: root_dir.join(VAULT_DIR),
            log_dir: root_dir.join(LOG_DIR),
            root_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn layout_is_derived_from_root() {
        let temp_dir = tempdir().unwrap();
        let manager = DataDirManager::new(temp_dir.path().to_path_buf());
        assert_eq!(manager.vault_dir, temp_dir.path().join("vault"));
        assert_eq!(manager.log_dir, temp_dir.path().join("logs"));
    }
}
