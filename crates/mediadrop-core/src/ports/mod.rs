//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `tokio::process` types in any signature
//! - Intent-based methods: "download this", not "run this argv"

pub mod downloader;

pub use downloader::{DownloadOutcome, DownloadRequest, DownloaderPort, OUTPUT_TEMPLATE_SUFFIX};

#[cfg(test)]
pub use downloader::MockDownloaderPort;
