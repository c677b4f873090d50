// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use clap::{builder::ValueParser, Parser};
use std::sync::LazyLock;
use url::Url;

use crate::modules::error::{code::ErrorCode, SmaBridgeResult};
use crate::raise_error;

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::new_for_test);

#[derive(Debug, Parser)]
#[clap(
    name = "smabridge",
    about = "Exposes Cisco Secure Email and Web Manager quarantine, tracking, list and reporting
    operations as normalized actions for a security-orchestration platform.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// smabridge log level (default: "info")
    #[clap(
        long,
        default_value = "info",
        env,
        help = "Set the log level for smabridge"
    )]
    pub smabridge_log_level: String,

    /// Enable ANSI logs (default: true)
    #[clap(long, default_value = "true", env, help = "Enable ANSI formatted logs")]
    pub smabridge_ansi_logs: bool,

    /// If false, logs will be printed to stdout
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Write logs to rolling files under <root_dir>/logs instead of stdout"
    )]
    pub smabridge_log_to_file: bool,

    #[clap(
        long,
        default_value = "5",
        env,
        help = "Maximum number of daily server log files to keep"
    )]
    pub smabridge_max_server_log_files: usize,

    /// Data directory holding the attachment vault and log files
    #[clap(
        long,
        env,
        default_value = "/var/lib/smabridge",
        help = "Set the root directory for smabridge data (vault and logs)"
    )]
    pub smabridge_root_dir: String,

    /// smabridge HTTP port (default: 15830)
    #[clap(
        long,
        default_value = "15830",
        env,
        help = "Set the HTTP port the orchestration platform calls"
    )]
    pub smabridge_http_port: u16,

    #[clap(
        long,
        env,
        default_value = "0.0.0.0",
        help = "The IPv4 address the HTTP service binds to",
        value_parser = ValueParser::new(|s: &str| {
            if s.parse::<std::net::Ipv4Addr>().is_err() {
                return Err("The bind IP address must be a valid IPv4 address.".to_string());
            }
            Ok(s.to_string())
        })
    )]
    pub smabridge_bind_ip: String,

    /// Bearer token the orchestration platform must present. Disabled when unset.
    #[clap(long, env, help = "Require this bearer token on every /api/v1 call")]
    pub smabridge_api_token: Option<String>,

    /// Base URL of the appliance, e.g. https://sma.example.com:6443
    #[clap(
        long,
        env,
        help = "Base URL of the Cisco SMA appliance (scheme, host and optional port)",
        value_parser = ValueParser::new(|s: &str| -> Result<String, String> {
            Url::parse(s).map_err(|_| format!("Invalid URL for smabridge_sma_host: {}", s))?;
            Ok(s.trim_end_matches('/').to_string())
        })
    )]
    pub smabridge_sma_host: Option<String>,

    #[clap(long, env, help = "Appliance API user name")]
    pub smabridge_sma_username: Option<String>,

    #[clap(long, env, help = "Appliance API passphrase")]
    pub smabridge_sma_password: Option<String>,

    #[clap(
        long,
        default_value = "false",
        env,
        help = "Verify the appliance TLS certificate"
    )]
    pub smabridge_sma_verify_cert: bool,

    #[clap(
        long,
        default_value = "30",
        env,
        help = "Timeout in seconds for a single appliance call",
        value_parser = clap::value_parser!(u64).range(1..=600)
    )]
    pub smabridge_sma_timeout_secs: u64,

    #[clap(
        long,
        default_value = "52428800", // 50MB
        env,
        help = "Largest attachment (in bytes) download-attachment will store in the vault"
    )]
    pub smabridge_max_attachment_size: u64,
}

/// Connection settings for the appliance, resolved once all three values are known.
#[derive(Clone, Debug)]
pub struct ApplianceConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub verify_cert: bool,
    pub timeout_secs: u64,
}

impl Settings {
    pub fn appliance(&self) -> SmaBridgeResult<ApplianceConfig> {
        let missing = |name: &str| {
            raise_error!(
                format!("Appliance setting '{}' is not configured", name),
                ErrorCode::MissingConfiguration
            )
        };
        Ok(ApplianceConfig {
            base_url: self
                .smabridge_sma_host
                .clone()
                .ok_or_else(|| missing("smabridge_sma_host"))?,
            username: self
                .smabridge_sma_username
                .clone()
                .ok_or_else(|| missing("smabridge_sma_username"))?,
            password: self
                .smabridge_sma_password
                .clone()
                .ok_or_else(|| missing("smabridge_sma_password"))?,
            verify_cert: self.smabridge_sma_verify_cert,
            timeout_secs: self.smabridge_sma_timeout_secs,
        })
    }

    #[cfg(test)]
    fn new_for_test() -> Self {
        Self {
            smabridge_log_level: "info".to_string(),
            smabridge_ansi_logs: false,
            smabridge_log_to_file: false,
            smabridge_max_server_log_files: 5,
            smabridge_root_dir: std::env::temp_dir()
                .join("smabridge_test_data")
                .to_string_lossy()
                .into_owned(),
            smabridge_http_port: 15830,
            smabridge_bind_ip: "127.0.0.1".into(),
            smabridge_api_token: None,
            smabridge_sma_host: Some("https://sma.example.test".into()),
            smabridge_sma_username: Some("admin".into()),
            smabridge_sma_password: Some("ironport".into()),
            smabridge_sma_verify_cert: false,
            smabridge_sma_timeout_secs: 30,
            smabridge_max_attachment_size: 1024,
        }
    }
}
