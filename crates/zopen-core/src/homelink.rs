//! Publishes `$HOME/zopen` pointing at the installation root.

use std::path::{Path, PathBuf};

use crate::link::{LinkError, refresh_symlink};
use crate::paths::{InstallRoot, home_link_path};

/// Create or refresh the home link under `home`.
///
/// # Errors
///
/// Returns [`LinkError`] if the link cannot be created, including when a
/// regular file or directory already occupies its location.
pub fn publish_home_link(home: &Path, root: &InstallRoot) -> Result<PathBuf, LinkError> {
    let link = home_link_path(home);
    refresh_symlink(root.path(), &link)?;
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_link_points_at_root() {
        let home = tempdir().unwrap();
        let install = tempdir().unwrap();
        let root = InstallRoot::resolve(install.path()).unwrap();

        let link = publish_home_link(home.path(), &root).unwrap();

        assert_eq!(link, home.path().join("zopen"));
        assert_eq!(std::fs::read_link(&link).unwrap(), root.path());
    }

    #[test]
    fn test_relinks_to_new_root() {
        let home = tempdir().unwrap();
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();

        publish_home_link(home.path(), &InstallRoot::resolve(first.path()).unwrap()).unwrap();
        let root = InstallRoot::resolve(second.path()).unwrap();
        let link = publish_home_link(home.path(), &root).unwrap();

        assert_eq!(std::fs::read_link(link).unwrap(), root.path());
    }

    #[test]
    fn test_existing_directory_is_a_failure() {
        let home = tempdir().unwrap();
        let install = tempdir().unwrap();
        std::fs::create_dir(home.path().join("zopen")).unwrap();

        let err = publish_home_link(home.path(), &InstallRoot::resolve(install.path()).unwrap())
            .unwrap_err();
        assert!(matches!(err, LinkError::Occupied { .. }));
    }
}
