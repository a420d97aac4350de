//! The `.bootenv` descriptor.
//!
//! A POSIX shell fragment written into the boot tier. Sourcing it exports the
//! root and boot paths and runs each installed package's own `.env` script,
//! which is enough for the `zopen` utilities to finish setting up the rest of
//! the installation.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::packages::PackageTable;
use crate::paths::InstallRoot;
use crate::status::{self, BOOTENV_FAILED};

const PACKAGES_VAR: &str = "ZOPEN_BOOT_PKGS";

#[derive(Error, Debug)]
pub enum BootEnvError {
    #[error("error creating {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} does not list any boot packages", path.display())]
    Malformed { path: PathBuf },
}

impl BootEnvError {
    /// Status code reported for this failure.
    pub fn code(&self) -> u8 {
        match self {
            Self::Write { source, .. } | Self::Read { source, .. } => {
                status::os_status(source, BOOTENV_FAILED)
            }
            Self::Malformed { .. } => BOOTENV_FAILED,
        }
    }
}

/// Contents of the boot environment descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootEnv {
    root: PathBuf,
    boot: PathBuf,
    packages: Vec<String>,
}

impl BootEnv {
    pub fn new(root: &InstallRoot, packages: &PackageTable) -> Self {
        Self {
            root: root.path().to_path_buf(),
            boot: root.boot(),
            packages: packages.names().into_iter().map(String::from).collect(),
        }
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// Render the shell fragment.
    pub fn render(&self) -> String {
        let mut script = String::new();
        script.push_str(
            "# Generated by zopen-setup. Source this file to set up the zopen boot environment.\n",
        );
        script.push_str(&format!(
            "ZOPEN_ROOT={}\n",
            shell_quote(&self.root.to_string_lossy())
        ));
        script.push_str(&format!(
            "ZOPEN_BOOT={}\n",
            shell_quote(&self.boot.to_string_lossy())
        ));
        script.push_str(&format!(
            "{PACKAGES_VAR}={}\n",
            shell_quote(&self.packages.join(" "))
        ));
        script.push_str(&format!("export ZOPEN_ROOT ZOPEN_BOOT {PACKAGES_VAR}\n"));
        script.push_str(
            r#"
zopen_cwd="${PWD}"
for zopen_pkg in ${ZOPEN_BOOT_PKGS}; do
  if [ -f "${ZOPEN_BOOT}/${zopen_pkg}/.env" ]; then
    cd "${ZOPEN_BOOT}/${zopen_pkg}" && . ./.env
  fi
done
cd "${zopen_cwd}"
unset zopen_cwd zopen_pkg
"#,
        );
        script
    }

    /// Write the descriptor to `path`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`BootEnvError::Write`] if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<(), BootEnvError> {
        std::fs::write(path, self.render()).map_err(|source| BootEnvError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read back the package list recorded in a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`BootEnvError::Read`] if the file cannot be read and
    /// [`BootEnvError::Malformed`] if it has no package list.
    pub fn read_packages(path: &Path) -> Result<Vec<String>, BootEnvError> {
        let content = std::fs::read_to_string(path).map_err(|source| BootEnvError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        content
            .lines()
            .find_map(|line| line.strip_prefix(PACKAGES_VAR)?.strip_prefix('='))
            .map(|value| {
                shell_unquote(value)
                    .split_whitespace()
                    .map(String::from)
                    .collect()
            })
            .ok_or_else(|| BootEnvError::Malformed {
                path: path.to_path_buf(),
            })
    }
}

/// Single-quote `value` for a POSIX shell.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn shell_unquote(value: &str) -> String {
    let inner = value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(value);
    inner.replace(r"'\''", "'")
}
