use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Bootstrap tier: `<root>/boot`
pub const BOOT_DIR: &str = "boot";

/// Production tier: `<root>/prod`
pub const PROD_DIR: &str = "prod";

/// Development tier: `<root>/dev`
pub const DEV_DIR: &str = "dev";

/// Boot environment descriptor, written inside the boot tier.
pub const BOOT_ENV_FILE: &str = ".bootenv";

/// Name of the link created in the user's home directory.
pub const HOME_LINK_NAME: &str = "zopen";

/// Upper bound for any path or request URI built during a run.
pub const MAX_PATH_LEN: usize = 1024;

/// A constructed path or URI did not fit in [`MAX_PATH_LEN`] bytes.
#[derive(Error, Debug)]
#[error("{what} exceeds {MAX_PATH_LEN} bytes: {value}")]
pub struct PathTooLong {
    pub what: &'static str,
    pub value: String,
}

/// Reject `value` if it is longer than [`MAX_PATH_LEN`].
pub fn check_len(what: &'static str, value: &str) -> Result<(), PathTooLong> {
    if value.len() > MAX_PATH_LEN {
        return Err(PathTooLong {
            what,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Join `name` onto `base`, enforcing the length bound on the result.
pub fn bounded_join(base: &Path, name: &str) -> Result<PathBuf, PathTooLong> {
    let joined = base.join(name);
    check_len("path", &joined.to_string_lossy())?;
    Ok(joined)
}

/// Location of the home link for a given home directory.
pub fn home_link_path(home: &Path) -> PathBuf {
    home.join(HOME_LINK_NAME)
}

#[derive(Error, Debug)]
pub enum RootError {
    #[error("Directory {} does not exist, or is not writable", path.display())]
    Unresolvable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error(transparent)]
    TooLong(#[from] PathTooLong),
}

/// The absolute, existing directory everything is installed under.
///
/// Resolved once from the command line; every other path of a run is
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRoot(PathBuf);

impl InstallRoot {
    /// Canonicalize `arg` and check that it names a directory.
    ///
    /// # Errors
    ///
    /// Returns [`RootError::Unresolvable`] if the path does not exist or
    /// cannot be resolved, [`RootError::NotADirectory`] if it resolves to
    /// something else, and [`RootError::TooLong`] if the resolved path leaves
    /// no room under [`MAX_PATH_LEN`].
    pub fn resolve(arg: &Path) -> Result<Self, RootError> {
        let path = std::fs::canonicalize(arg).map_err(|source| RootError::Unresolvable {
            path: arg.to_path_buf(),
            source,
        })?;

        if !path.is_dir() {
            return Err(RootError::NotADirectory { path });
        }

        check_len("installation root", &path.to_string_lossy())?;
        Ok(Self(path))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// `<root>/boot`
    pub fn boot(&self) -> PathBuf {
        self.0.join(BOOT_DIR)
    }

    /// `<root>/prod`
    pub fn prod(&self) -> PathBuf {
        self.0.join(PROD_DIR)
    }

    /// `<root>/dev`
    pub fn dev(&self) -> PathBuf {
        self.0.join(DEV_DIR)
    }

    /// The three tiers, in creation order.
    pub fn tiers(&self) -> [PathBuf; 3] {
        [self.boot(), self.prod(), self.dev()]
    }

    /// `<root>/boot/.bootenv`
    pub fn boot_env(&self) -> PathBuf {
        self.boot().join(BOOT_ENV_FILE)
    }
}

impl fmt::Display for InstallRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
