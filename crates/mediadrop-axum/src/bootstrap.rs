//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum web adapter. All concrete implementations are instantiated here.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use mediadrop_core::paths::{
    DirectoryCreationStrategy, default_downloads_dir, prepare_downloads_dir,
};
use mediadrop_core::{
    DEFAULT_MAX_COMPLETED_JOBS, DownloaderPort, FailurePolicy, JobTracker, TrackerConfig,
};
use mediadrop_runtime::{YtDlpRunner, default_tool_path, validate_tool};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Port the server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 3000;

/// Directory holding the bundled page, relative to the working directory.
pub const DEFAULT_STATIC_DIR: &str = "public";

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Interface to bind.
    pub bind_address: IpAddr,
    /// Where artifacts are written and served from.
    pub downloads_dir: PathBuf,
    /// Path to the yt-dlp binary.
    pub yt_dlp_path: PathBuf,
    /// Optional path to static assets; `GET /` serves its `index.html`.
    pub static_dir: Option<PathBuf>,
    /// What to do with a failed job's record.
    pub failure_policy: FailurePolicy,
    /// Finished jobs kept for status polling (0 = unlimited).
    pub max_completed_jobs: usize,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Create config with default paths, all relative to the working directory.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self {
            port: DEFAULT_PORT,
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            downloads_dir: default_downloads_dir()?,
            yt_dlp_path: default_tool_path()?,
            static_dir: Some(PathBuf::from(DEFAULT_STATIC_DIR)),
            failure_policy: FailurePolicy::default(),
            max_completed_jobs: DEFAULT_MAX_COMPLETED_JOBS,
            cors: CorsConfig::default(),
        })
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub const fn with_bind_address(mut self, addr: IpAddr) -> Self {
        self.bind_address = addr;
        self
    }

    #[must_use]
    pub fn with_downloads_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.downloads_dir = path.into();
        self
    }

    #[must_use]
    pub fn with_yt_dlp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.yt_dlp_path = path.into();
        self
    }

    /// Set the static directory for page serving.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Serve the API only.
    #[must_use]
    pub fn without_static_dir(mut self) -> Self {
        self.static_dir = None;
        self
    }

    #[must_use]
    pub const fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    #[must_use]
    pub const fn with_max_completed_jobs(mut self, max: usize) -> Self {
        self.max_completed_jobs = max;
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    fn tracker_config(&self, downloads_dir: PathBuf) -> TrackerConfig {
        TrackerConfig::new(downloads_dir)
            .with_failure_policy(self.failure_policy)
            .with_max_completed_jobs(self.max_completed_jobs)
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// The job tracker shared by every handler.
    pub tracker: Arc<JobTracker>,
}

impl AxumContext {
    pub const fn new(tracker: Arc<JobTracker>) -> Self {
        Self { tracker }
    }
}

/// Bootstrap the Axum server with all services.
///
/// Fails if the yt-dlp binary is unusable or the downloads directory
/// cannot be created or written. The tracker receives the directory in
/// canonical absolute form, whatever form `config` gives it in.
pub async fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    let tool = config.yt_dlp_path.clone();
    let requested = config.downloads_dir.clone();
    let downloads_dir = tokio::task::spawn_blocking(move || check_paths(&tool, &requested))
        .await
        .context("Startup path checks did not complete")??;

    info!(
        target: "mediadrop.paths",
        downloads_dir = %downloads_dir.display(),
        yt_dlp_path = %config.yt_dlp_path.display(),
        failure_policy = %config.failure_policy,
        max_completed_jobs = config.max_completed_jobs,
        "Axum bootstrap resolved paths"
    );

    let downloader: Arc<dyn DownloaderPort> = Arc::new(YtDlpRunner::new(&config.yt_dlp_path));
    let tracker = Arc::new(JobTracker::new(
        downloader,
        config.tracker_config(downloads_dir),
    ));

    Ok(AxumContext::new(tracker))
}

/// Blocking filesystem checks; returns the prepared downloads directory.
fn check_paths(tool: &Path, downloads_dir: &Path) -> Result<PathBuf> {
    validate_tool(tool)?;
    prepare_downloads_dir(downloads_dir, DirectoryCreationStrategy::AutoCreate).with_context(
        || {
            format!(
                "Downloads directory unusable: {}",
                downloads_dir.display()
            )
        },
    )
}

/// Start the web server and run until Ctrl-C or SIGTERM.
///
/// If `config.static_dir` names an existing directory, the page and its
/// assets are served alongside the API. Otherwise, only the API is served.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let ctx = bootstrap(&config).await?;

    let static_dir = match config.static_dir {
        Some(ref dir) if dir.is_dir() => Some(dir),
        Some(ref dir) => {
            warn!(
                target: "mediadrop.paths",
                static_dir = %dir.display(),
                "Static directory missing; serving API only"
            );
            None
        }
        None => None,
    };

    let app = if let Some(dir) = static_dir {
        info!("Serving static assets from: {}", dir.display());
        crate::routes::create_static_router(ctx, dir, &config.cors)
    } else {
        crate::routes::create_router(ctx, &config.cors)
    };

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("mediadrop listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT (Ctrl-C), starting graceful shutdown"),
        () = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}
