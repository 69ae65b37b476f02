#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

mod command;
mod runner;
pub mod tool;

// Re-export the main DownloaderPort implementation
pub use runner::YtDlpRunner;

pub use command::build_args;
pub use tool::{ToolError, YT_DLP_RELEASES_URL, default_tool_path, tool_binary_name, validate_tool};
