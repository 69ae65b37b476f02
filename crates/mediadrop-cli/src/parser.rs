//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::{Commands, ServeArgs};

/// Command-line interface for the mediadrop server.
#[derive(Parser)]
#[command(name = "mediadrop")]
#[command(about = "Download media from a URL through a small web service")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Parser used when no subcommand is given: defaults plus environment.
#[derive(Parser)]
#[command(name = "mediadrop")]
struct DefaultServe {
    #[command(flatten)]
    args: ServeArgs,
}

impl Cli {
    /// The requested command, or `serve` configured from the environment.
    pub fn command_or_serve(self) -> Commands {
        self.command
            .unwrap_or_else(|| Commands::Serve(DefaultServe::parse_from(["mediadrop"]).args))
    }
}
