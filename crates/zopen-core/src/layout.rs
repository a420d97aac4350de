//! Creates the `boot`/`prod`/`dev` skeleton under the installation root.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::paths::InstallRoot;
use crate::status::{self, PROVISION_FAILED};

#[derive(Error, Debug)]
#[error("error creating directory {}: {source}", path.display())]
pub struct LayoutError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl LayoutError {
    /// Status code reported for this failure.
    pub fn code(&self) -> u8 {
        status::os_status(&self.source, PROVISION_FAILED)
    }
}

/// Create every tier under `root`, returning them in creation order.
///
/// Tiers that already exist are accepted as-is.
///
/// # Errors
///
/// Returns [`LayoutError`] for the first tier that cannot be created.
pub fn create_dirs(root: &InstallRoot) -> Result<Vec<PathBuf>, LayoutError> {
    let mut created = Vec::with_capacity(3);
    for tier in root.tiers() {
        std::fs::create_dir_all(&tier).map_err(|source| LayoutError {
            path: tier.clone(),
            source,
        })?;
        tracing::debug!(path = %tier.display(), "tier ready");
        created.push(tier);
    }
    Ok(created)
}
