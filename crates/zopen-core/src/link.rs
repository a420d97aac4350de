//! Symbolic link helper shared by the installer and the home link.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::status::{self, LINK_FAILED};

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("{} exists and is not a symbolic link", link.display())]
    Occupied { link: PathBuf },

    #[error("error creating symbolic link from {} to {}: {source}", link.display(), target.display())]
    Io {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LinkError {
    /// Status code reported for this failure.
    pub fn code(&self) -> u8 {
        match self {
            Self::Occupied { .. } => LINK_FAILED,
            Self::Io { source, .. } => status::os_status(source, LINK_FAILED),
        }
    }
}

/// Point `link` at `target`, replacing an existing symbolic link.
///
/// Anything at `link` that is not a symbolic link is left untouched and
/// reported as [`LinkError::Occupied`].
///
/// # Errors
///
/// Returns [`LinkError`] if the old link cannot be removed or the new one
/// cannot be created.
pub fn refresh_symlink(target: &Path, link: &Path) -> Result<(), LinkError> {
    let io_err = |source: io::Error| LinkError::Io {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
        source,
    };

    match std::fs::symlink_metadata(link) {
        Ok(meta) if meta.file_type().is_symlink() => std::fs::remove_file(link).map_err(io_err)?,
        Ok(_) => {
            return Err(LinkError::Occupied {
                link: link.to_path_buf(),
            });
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(e)),
    }

    std::os::unix::fs::symlink(target, link).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_new_link() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("link");

        refresh_symlink(Path::new("target"), &link).unwrap();
        assert_eq!(std::fs::read_link(&link).unwrap(), Path::new("target"));
    }

    #[test]
    fn test_replaces_existing_link() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink("old", &link).unwrap();

        refresh_symlink(Path::new("new"), &link).unwrap();
        assert_eq!(std::fs::read_link(&link).unwrap(), Path::new("new"));
    }

    #[test]
    fn test_refuses_to_replace_directory() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("link");
        std::fs::create_dir(&link).unwrap();

        let err = refresh_symlink(Path::new("new"), &link).unwrap_err();
        assert!(matches!(err, LinkError::Occupied { .. }));
        assert_eq!(err.code(), LINK_FAILED);
        assert!(link.is_dir());
    }

    #[test]
    fn test_missing_parent_reports_errno() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("no/such/dir/link");

        let err = refresh_symlink(Path::new("t"), &link).unwrap_err();
        assert!(matches!(err, LinkError::Io { .. }));
        assert_ne!(err.code(), 0);
    }
}
