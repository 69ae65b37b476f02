//! The downloads directory: default location and startup preparation.
//!
//! Every artifact lives directly inside this one flat directory. It is
//! prepared once at startup and handed to the tracker as an absolute path,
//! so the `outputPath` reported for a job never depends on where the
//! server was started from.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Downloads directory, relative to the working directory.
pub const DEFAULT_DOWNLOADS_DIR_RELATIVE: &str = "downloads";

/// Written and removed again to check that the directory accepts files.
/// It starts with a dot, so it never carries a job prefix.
const WRITE_CHECK_FILE: &str = ".mediadrop_write_test";

/// What to do when the downloads directory is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectoryCreationStrategy {
    /// Create it, parents included. Used by `serve`.
    #[default]
    AutoCreate,
    /// Report [`PathError::Missing`]. Used by read-only checks.
    Disallow,
}

/// `<cwd>/downloads`
pub fn default_downloads_dir() -> Result<PathBuf, PathError> {
    let cwd = env::current_dir().map_err(PathError::CurrentDir)?;
    Ok(cwd.join(DEFAULT_DOWNLOADS_DIR_RELATIVE))
}

/// Make sure `dir` exists and is writable, then return its canonical
/// absolute form.
///
/// Blocking; async callers should run it on the blocking pool.
pub fn prepare_downloads_dir(
    dir: &Path,
    strategy: DirectoryCreationStrategy,
) -> Result<PathBuf, PathError> {
    if dir.as_os_str().is_empty() {
        return Err(PathError::Empty);
    }

    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(PathError::NotADirectory(dir.to_path_buf())),
        Err(_) if strategy == DirectoryCreationStrategy::Disallow => {
            return Err(PathError::Missing(dir.to_path_buf()));
        }
        Err(_) => fs::create_dir_all(dir).map_err(|source| PathError::Create {
            path: dir.to_path_buf(),
            source,
        })?,
    }

    verify_writable(dir)?;

    fs::canonicalize(dir).map_err(|source| PathError::Resolve {
        path: dir.to_path_buf(),
        source,
    })
}

/// Check that files can be created in `dir`.
pub fn verify_writable(dir: &Path) -> Result<(), PathError> {
    let marker = dir.join(WRITE_CHECK_FILE);
    fs::write(&marker, b"").map_err(|source| PathError::NotWritable {
        path: dir.to_path_buf(),
        source,
    })?;
    // A leftover check file never matches a job prefix.
    let _ = fs::remove_file(&marker);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_downloads_dir_is_under_cwd() {
        let dir = default_downloads_dir().unwrap();
        assert!(dir.is_absolute());
        assert!(dir.ends_with(DEFAULT_DOWNLOADS_DIR_RELATIVE));
    }

    #[test]
    fn auto_create_makes_nested_directory() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested").join("downloads");

        let prepared = prepare_downloads_dir(&target, DirectoryCreationStrategy::AutoCreate).unwrap();
        assert!(target.is_dir());
        assert!(prepared.is_absolute());
        assert!(!target.join(WRITE_CHECK_FILE).exists());
    }

    #[test]
    fn relative_directory_comes_back_absolute() {
        // Created under the working directory so the path can be relative.
        let temp = TempDir::new_in(".").unwrap();
        let relative = temp.path().join("dl");
        assert!(relative.is_relative());

        let prepared =
            prepare_downloads_dir(&relative, DirectoryCreationStrategy::AutoCreate).unwrap();
        assert!(prepared.is_absolute());
        assert!(prepared.ends_with("dl"));
        assert_eq!(prepared, fs::canonicalize(&relative).unwrap());
    }

    #[test]
    fn disallow_reports_missing_directory() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("missing");

        let err = prepare_downloads_dir(&target, DirectoryCreationStrategy::Disallow).unwrap_err();
        assert!(matches!(err, PathError::Missing(_)));
        assert!(!target.exists());
    }

    #[test]
    fn file_in_place_of_directory_is_rejected() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("downloads");
        fs::write(&target, b"not a dir").unwrap();

        let err = prepare_downloads_dir(&target, DirectoryCreationStrategy::AutoCreate).unwrap_err();
        assert!(matches!(err, PathError::NotADirectory(_)));
    }

    #[test]
    fn empty_path_is_rejected() {
        let err = prepare_downloads_dir(Path::new(""), DirectoryCreationStrategy::AutoCreate)
            .unwrap_err();
        assert!(matches!(err, PathError::Empty));
    }
}
