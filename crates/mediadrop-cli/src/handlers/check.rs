//! `check` command handler.
//!
//! Runs the same startup checks as `serve` without binding a port.

use anyhow::Context;
use mediadrop_axum::ServerConfig;
use mediadrop_core::{DirectoryCreationStrategy, prepare_downloads_dir};
use mediadrop_runtime::validate_tool;

use crate::commands::PathArgs;

/// Report whether the tool and downloads directory are usable.
pub fn execute(paths: &PathArgs) -> anyhow::Result<()> {
    let config = paths.apply(ServerConfig::with_defaults()?);
    run_checks(&config)?;

    println!("yt-dlp:    {} (ok)", config.yt_dlp_path.display());
    println!("downloads: {} (ok)", config.downloads_dir.display());
    Ok(())
}

fn run_checks(config: &ServerConfig) -> anyhow::Result<()> {
    validate_tool(&config.yt_dlp_path)?;
    prepare_downloads_dir(&config.downloads_dir, DirectoryCreationStrategy::Disallow)
        .with_context(|| {
            format!(
                "Downloads directory unusable: {}",
                config.downloads_dir.display()
            )
        })?;
    Ok(())
}
