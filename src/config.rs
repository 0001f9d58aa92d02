use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";
pub const DEFAULT_TOOL_TIMEOUT_MS: u64 = 30_000;

/// MCP server exposing Google Sheets and Drive operations over stdio.
#[derive(Debug, Parser)]
#[command(name = "gsheets-mcp", version, about)]
pub struct CliArgs {
    /// Drive folder that scopes listing and creation of spreadsheets.
    #[arg(long, env = "DRIVE_FOLDER_ID")]
    pub drive_folder_id: Option<String>,

    /// Pre-issued OAuth access token; skips the refresh flow entirely.
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Base64-encoded authorized-user credentials JSON.
    #[arg(long, env = "CREDENTIALS_CONFIG", hide_env_values = true)]
    pub credentials_config: Option<String>,

    /// Path to an authorized-user credentials file.
    #[arg(long, env = "CREDENTIALS_PATH", default_value = DEFAULT_CREDENTIALS_PATH)]
    pub credentials_path: PathBuf,

    /// Per-tool deadline in milliseconds; 0 disables the deadline.
    #[arg(long, env = "TOOL_TIMEOUT_MS", default_value_t = DEFAULT_TOOL_TIMEOUT_MS)]
    pub tool_timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub drive_folder_id: Option<String>,
    pub access_token: Option<String>,
    pub credentials_config: Option<String>,
    pub credentials_path: PathBuf,
    pub tool_timeout_ms: u64,
}

impl ServerConfig {
    pub fn from_args(args: CliArgs) -> Self {
        Self {
            drive_folder_id: args.drive_folder_id.filter(|s| !s.is_empty()),
            access_token: args.access_token.filter(|s| !s.is_empty()),
            credentials_config: args.credentials_config.filter(|s| !s.is_empty()),
            credentials_path: args.credentials_path,
            tool_timeout_ms: args.tool_timeout_ms,
        }
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        (self.tool_timeout_ms > 0).then(|| Duration::from_millis(self.tool_timeout_ms))
    }
}
