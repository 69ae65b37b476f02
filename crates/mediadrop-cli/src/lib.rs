#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by main.rs only
use dotenvy as _;
use tokio as _;
use tracing as _;
use tracing_subscriber as _;

pub mod commands;
pub mod handlers;
pub mod parser;

// Re-export primary types for convenient access
pub use commands::{Commands, PathArgs, ServeArgs};
pub use parser::Cli;
