//! `serve` command handler.

use mediadrop_axum::start_server;

use crate::commands::ServeArgs;

/// Start the server and block until it shuts down.
pub async fn execute(args: ServeArgs) -> anyhow::Result<()> {
    let config = args.into_server_config()?;

    println!();
    println!("  mediadrop starting...");
    println!();
    println!("  Downloads: {}", config.downloads_dir.display());
    println!("  yt-dlp:    {}", config.yt_dlp_path.display());
    match config.static_dir {
        Some(ref dir) => println!("  Page:      {}", dir.display()),
        None => println!("  Page:      (API only)"),
    }
    println!("  Local:     http://localhost:{}", config.port);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    start_server(config).await
}
