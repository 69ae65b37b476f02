//! CLI entry point.
//!
//! Loads `.env`, installs the tracing subscriber, then dispatches to the
//! command handlers. All wiring of the server happens in `mediadrop-axum`.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mediadrop_cli::{Cli, Commands, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command_or_serve() {
        Commands::Serve(args) => handlers::serve::execute(args).await?,
        Commands::Check(paths) => handlers::check::execute(&paths)?,
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).init();
    tracing::debug!("Tracing initialized");
}
