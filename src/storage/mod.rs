//! Experiment directory storage
//!
//! **Single-Writer Design**:
//! - One `ExperimentContext` owns one directory for the lifetime of a run
//! - Writes replace whole files (no appends, no in-place updates)
//! - No locking: concurrent writers race, last rename wins
//!
//! Every write goes to a hidden sibling temp file which is flushed and then
//! renamed over the destination, so a failed save never truncates a file
//! that was previously persisted successfully.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Handle to an experiment's on-disk directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentDir {
    path: PathBuf,
}

impl ExperimentDir {
    /// Create the directory (and any missing parents).
    ///
    /// An already existing directory is success; its contents are left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory cannot be created, including when the
    /// path is occupied by a regular file.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    /// Directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the directory.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if `file_name` is not a single plain component.
    pub fn file_path(&self, file_name: &str) -> Result<PathBuf> {
        validate_component(file_name)?;
        Ok(self.path.join(file_name))
    }

    /// Atomically replace `file_name` with `contents`.
    ///
    /// Returns the destination path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` for unusable file names and `Io` if the temp
    /// file cannot be written or renamed. On error the destination keeps its
    /// previous contents.
    pub fn write_atomic(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf> {
        let dest = self.file_path(file_name)?;
        let tmp_path = self.temp_path();

        let written =
            write_synced(&tmp_path, contents).and_then(|()| fs::rename(&tmp_path, &dest));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::Io(e));
        }

        tracing::trace!(path = %dest.display(), bytes = contents.len(), "replaced file");
        Ok(dest)
    }

    /// Temp sibling used by `write_atomic`.
    ///
    /// Fixed length, so a destination name of up to 255 bytes still leaves
    /// the temp name within the file-name limit.
    fn temp_path(&self) -> PathBuf {
        self.path.join(format!(".trueno-{}.tmp", std::process::id()))
    }

    /// Read a whole file.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file does not exist, `InvalidName` for
    /// unusable file names, and `Io` for any other read failure.
    pub fn read(&self, file_name: &str) -> Result<Vec<u8>> {
        let path = self.file_path(file_name)?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound(path),
            _ => Error::Io(e),
        })
    }
}

fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Check that `name` can be used as exactly one path component.
///
/// # Errors
///
/// Returns `InvalidName` if the name is empty, longer than 255 bytes,
/// contains a separator or NUL, or is `.`/`..`.
pub fn validate_component(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.len() > 255 {
        Some("must be at most 255 bytes")
    } else if name.contains(['/', '\\', '\0']) {
        Some("must not contain path separators or NUL")
    } else if !matches!(Path::new(name).components().next(), Some(Component::Normal(_))) {
        Some("must not be a relative directory reference")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidName(format!("{name:?} {reason}"))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("a/b/exp");
        ExperimentDir::create(&path).unwrap();
        fs::write(path.join("keep.txt"), b"keep").unwrap();

        let dir = ExperimentDir::create(&path).unwrap();
        assert_eq!(fs::read(dir.path().join("keep.txt")).unwrap(), b"keep");
    }

    #[test]
    fn test_create_over_regular_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("occupied");
        fs::write(&path, b"not a dir").unwrap();

        let err = ExperimentDir::create(&path).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_write_atomic_replaces_and_cleans_up() {
        let temp = tempfile::tempdir().unwrap();
        let dir = ExperimentDir::create(temp.path()).unwrap();

        dir.write_atomic("results.json", b"first").unwrap();
        let dest = dir.write_atomic("results.json", b"second").unwrap();

        assert_eq!(fs::read(dest).unwrap(), b"second");
        assert!(!dir.temp_path().exists());
    }

    #[test]
    fn test_write_atomic_longest_file_name() {
        let temp = tempfile::tempdir().unwrap();
        let dir = ExperimentDir::create(temp.path()).unwrap();
        let name = "m".repeat(255);

        let dest = dir.write_atomic(&name, b"weights").unwrap();
        assert_eq!(fs::read(dest).unwrap(), b"weights");
        assert_eq!(dir.read(&name).unwrap(), b"weights");
        assert!(!dir.temp_path().exists());
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let temp = tempfile::tempdir().unwrap();
        let dir = ExperimentDir::create(temp.path()).unwrap();
        dir.write_atomic("model.pkl", b"good").unwrap();

        // A directory squatting on the temp path makes File::create fail.
        fs::create_dir(dir.temp_path()).unwrap();
        let err = dir.write_atomic("model.pkl", b"bad").unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        assert_eq!(dir.read("model.pkl").unwrap(), b"good");
    }

    #[test]
    fn test_read_missing() {
        let temp = tempfile::tempdir().unwrap();
        let dir = ExperimentDir::create(temp.path()).unwrap();
        match dir.read("model.pkl") {
            Err(Error::NotFound(path)) => assert!(path.ends_with("model.pkl")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_component() {
        for good in ["model.pkl", "exp1", "experiment_20240115_143022", "..hidden"] {
            assert!(validate_component(good).is_ok(), "{good}");
        }
        for bad in ["", ".", "..", "a/b", "..\\up", "nul\0byte", "/abs"] {
            assert!(
                matches!(validate_component(bad), Err(Error::InvalidName(_))),
                "{bad:?}"
            );
        }
        assert!(validate_component(&"x".repeat(256)).is_err());
    }
}
