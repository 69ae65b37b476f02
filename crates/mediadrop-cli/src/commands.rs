//! Subcommand definitions.

use clap::{Args, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

use mediadrop_axum::ServerConfig;
use mediadrop_core::{DEFAULT_MAX_COMPLETED_JOBS, FailurePolicy};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server
    Serve(ServeArgs),

    /// Check that yt-dlp and the downloads directory are usable
    Check(PathArgs),
}

/// Locations shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Directory artifacts are written to and served from [default: ./downloads]
    #[arg(long, env = "MEDIADROP_DOWNLOADS_DIR")]
    pub downloads_dir: Option<PathBuf>,

    /// Path to the yt-dlp executable [default: ./yt-dlp]
    #[arg(long = "yt-dlp", env = "MEDIADROP_YT_DLP")]
    pub yt_dlp: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, env = "MEDIADROP_PORT", default_value_t = mediadrop_axum::bootstrap::DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "MEDIADROP_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    #[command(flatten)]
    pub paths: PathArgs,

    /// Directory holding index.html and its assets [default: ./public]
    #[arg(long, env = "MEDIADROP_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Serve API endpoints only (no page at `/`)
    #[arg(long)]
    pub api_only: bool,

    /// What happens to a failed job's record: `remove` or `retain`
    #[arg(long, env = "MEDIADROP_FAILURE_POLICY", default_value_t = FailurePolicy::Remove)]
    pub failure_policy: FailurePolicy,

    /// Finished jobs kept for status polling (0 = unlimited)
    #[arg(long, env = "MEDIADROP_MAX_COMPLETED_JOBS", default_value_t = DEFAULT_MAX_COMPLETED_JOBS)]
    pub max_completed_jobs: usize,

    /// Restrict CORS to these origins (comma-separated); all origins otherwise
    #[arg(long = "allowed-origin", env = "MEDIADROP_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,
}

impl PathArgs {
    /// Apply explicit paths over `config`'s defaults.
    pub fn apply(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(dir) = &self.downloads_dir {
            config = config.with_downloads_dir(dir);
        }
        if let Some(tool) = &self.yt_dlp {
            config = config.with_yt_dlp_path(tool);
        }
        config
    }
}

impl ServeArgs {
    /// Build the server configuration, filling gaps with the defaults.
    pub fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = self
            .paths
            .apply(ServerConfig::with_defaults()?)
            .with_port(self.port)
            .with_bind_address(self.bind)
            .with_failure_policy(self.failure_policy)
            .with_max_completed_jobs(self.max_completed_jobs);

        if self.api_only {
            config = config.without_static_dir();
        } else if let Some(dir) = self.static_dir {
            config = config.with_static_dir(dir);
        }

        if !self.allowed_origins.is_empty() {
            config = config.with_allowed_origins(self.allowed_origins);
        }

        Ok(config)
    }
}
