//! Temporary trust bundle used to validate HTTPS connections.
//!
//! The embedded root certificates are written to a uniquely named PEM file
//! at the start of a run and handed to every download. The file is removed
//! explicitly once the run has succeeded; a failed run leaves it on disk so
//! the diagnostic that names it can still be followed up.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Root certificates for github.com and its release download hosts.
pub const EMBEDDED_TRUST: &[u8] = include_bytes!("../certs/github-roots.pem");

#[derive(Error, Debug)]
pub enum TrustError {
    #[error("error acquiring storage for the pem file: {0}")]
    Allocate(#[source] io::Error),

    #[error("error creating pem file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading trust material from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error removing temporary pem file: {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Trust material for this run: the embedded bundle, or the contents of an
/// override file.
///
/// # Errors
///
/// Returns [`TrustError::Read`] if the override file cannot be read.
pub fn load_payload(override_path: Option<&Path>) -> Result<Cow<'static, [u8]>, TrustError> {
    match override_path {
        Some(path) => std::fs::read(path)
            .map(Cow::Owned)
            .map_err(|source| TrustError::Read {
                path: path.to_path_buf(),
                source,
            }),
        None => Ok(Cow::Borrowed(EMBEDDED_TRUST)),
    }
}

/// The on-disk PEM file shared by every download of a run.
#[derive(Debug)]
pub struct TrustBundle {
    path: PathBuf,
}

impl TrustBundle {
    /// Write `payload` to a new, uniquely named file in the system temp dir.
    ///
    /// # Errors
    ///
    /// See [`TrustBundle::create_in`].
    pub fn create(payload: &[u8]) -> Result<Self, TrustError> {
        Self::create_in(&std::env::temp_dir(), payload)
    }

    /// Write `payload` to a new, uniquely named file under `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Allocate`] if no unique name can be reserved and
    /// [`TrustError::Write`] if the payload cannot be written.
    pub fn create_in(dir: &Path, payload: &[u8]) -> Result<Self, TrustError> {
        let mut file = tempfile::Builder::new()
            .prefix("zopen-")
            .suffix(".pem")
            .tempfile_in(dir)
            .map_err(TrustError::Allocate)?;

        if let Err(source) = file.write_all(payload).and_then(|()| file.flush()) {
            return Err(TrustError::Write {
                path: file.path().to_path_buf(),
                source,
            });
        }

        // Detach from the guard so the file survives failed runs.
        let path = file
            .into_temp_path()
            .keep()
            .map_err(|e| TrustError::Allocate(e.error))?;

        tracing::debug!(path = %path.display(), "created trust bundle");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the bundle. Consumes it so it cannot be used afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Remove`] if the file cannot be deleted.
    pub fn remove(self) -> Result<(), TrustError> {
        std::fs::remove_file(&self.path).map_err(|source| TrustError::Remove {
            path: self.path.clone(),
            source,
        })
    }
}
