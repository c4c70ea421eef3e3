//! Output directory preparation.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::error::PathError;

/// Create the output directory if needed and check that it accepts writes.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
    } else {
        fs::create_dir_all(path).map_err(|source| PathError::Create {
            path: path.to_path_buf(),
            source,
        })?;
    }

    verify_writable(path)
}

/// Write and remove a probe file.
pub fn verify_writable(path: &Path) -> Result<(), PathError> {
    let probe = path.join(".sunosync_write_test");
    let not_writable = |source| PathError::NotWritable {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&probe)
        .map_err(not_writable)?;
    file.write_all(b"test").map_err(not_writable)?;
    drop(file);
    let _ = fs::remove_file(&probe);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_nested_dirs() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("a").join("b");
        ensure_directory(&target).unwrap();
        assert!(target.is_dir());
        assert!(!target.join(".sunosync_write_test").exists());
    }

    #[test]
    fn test_existing_dir_is_accepted() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("Song.mp3"), b"x").unwrap();
        ensure_directory(tmp.path()).unwrap();
        assert!(tmp.path().join("Song.mp3").exists());
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("file");
        fs::write(&file, b"x").unwrap();
        let err = ensure_directory(&file).unwrap_err();
        assert!(matches!(err, PathError::NotADirectory(_)));
        assert!(err.to_string().ends_with("exists but is not a directory"));
    }
}
