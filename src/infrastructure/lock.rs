//! Single-instance lock file.
//!
//! Live runs and the scheduler hold an [`InstanceLock`] so two processes
//! never share the seen-market store. The file holds the owner's pid and is
//! removed when the lock is dropped. A crashed process leaves it behind;
//! delete it by hand once no edgescout process is running.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Exclusive lock held for the lifetime of the value.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    /// Create the lock file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RunInProgress`] when the file already exists and
    /// [`Error::Io`] for any other filesystem failure.
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let owner = fs::read_to_string(&path).unwrap_or_default();
                warn!(
                    path = %path.display(),
                    owner = owner.trim(),
                    "Lock file present, another instance is running"
                );
                return Err(Error::RunInProgress);
            }
            Err(e) => return Err(e.into()),
        };
        writeln!(file, "{}", std::process::id())?;

        debug!(path = %path.display(), "Instance lock acquired");
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to remove lock file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locks/edgescout.lock");

        let lock = InstanceLock::acquire(&path).unwrap();
        assert!(matches!(InstanceLock::acquire(&path), Err(Error::RunInProgress)));
        let pid = fs::read_to_string(lock.path()).unwrap();
        assert_eq!(pid.trim(), std::process::id().to_string());

        drop(lock);
        assert!(!path.exists());
        assert!(InstanceLock::acquire(&path).is_ok());
    }
}
