//! Installs a downloaded archive into the boot tier.
//!
//! The archive is unpacked next to it, `<boot>/<package>` is pointed at the
//! versioned directory it produced, and the archive itself is deleted.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::io::extract::{ExtractError, Extractor};
use crate::link::{LinkError, refresh_symlink};
use crate::packages::PackageSpec;
use crate::status::{self, EXTRACT_FAILED};

#[derive(Error, Debug)]
pub enum InstallError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("error removing {}: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InstallError {
    /// Status code reported for this failure.
    pub fn code(&self) -> u8 {
        match self {
            Self::Extract(e) => e.code(),
            Self::Link(e) => e.code(),
            Self::Cleanup { source, .. } => status::os_status(source, EXTRACT_FAILED),
        }
    }
}

/// Unpack `artifact` into `boot` and link it as `<boot>/<package>`.
///
/// Returns the package link. Nothing is rolled back on failure.
///
/// # Errors
///
/// Returns [`InstallError`] if extraction, linking, or removal of the
/// consumed archive fails.
pub fn install_package(
    extractor: &dyn Extractor,
    boot: &Path,
    spec: &PackageSpec,
    artifact: &Path,
) -> Result<PathBuf, InstallError> {
    let unpacked = extractor.extract(artifact, boot, spec.name())?;
    let link = boot.join(spec.name());

    // Relative target keeps the boot tier relocatable.
    let target = unpacked.strip_prefix(boot).unwrap_or(unpacked.as_path());
    if target != Path::new(spec.name()) {
        refresh_symlink(target, &link)?;
    }

    std::fs::remove_file(artifact).map_err(|source| InstallError::Cleanup {
        path: artifact.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        package = spec.name(),
        target = %target.display(),
        "linked package"
    );
    Ok(link)
}
