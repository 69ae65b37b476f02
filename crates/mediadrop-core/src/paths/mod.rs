//! Downloads directory helpers.
//!
//! Returns `PathError` and leaves reporting to the adapters.

mod downloads;
mod error;

pub use downloads::{
    DEFAULT_DOWNLOADS_DIR_RELATIVE, DirectoryCreationStrategy, default_downloads_dir,
    prepare_downloads_dir, verify_writable,
};
pub use error::PathError;
