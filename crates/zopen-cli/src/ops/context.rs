//! Shared setup context.
//!
//! Groups the installation root and the injected capabilities so the setup
//! stages can be driven against real HTTPS and archives, or against test
//! doubles.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use zopen_core::paths::InstallRoot;
use zopen_core::{Extractor, PackageTable, RemoteConfig, Reporter, Transport};

/// Everything a run needs beyond the command line.
#[derive(Clone)]
pub struct SetupContext {
    pub root: InstallRoot,
    /// Directory the home link is created in
    pub home: PathBuf,
    pub remote: RemoteConfig,
    /// PEM bytes written to the run's trust bundle
    pub trust_payload: Vec<u8>,
    pub packages: PackageTable,
    /// Where the trust bundle is written
    pub temp_dir: PathBuf,
    pub transport: Arc<dyn Transport>,
    pub extractor: Arc<dyn Extractor>,
    pub reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for SetupContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupContext")
            .field("root", &self.root)
            .field("home", &self.home)
            .field("remote", &self.remote)
            .field("packages", &self.packages)
            .finish_non_exhaustive()
    }
}

impl SetupContext {
    /// A context for the bootstrap package set with the system temp dir.
    pub fn new(
        root: InstallRoot,
        home: PathBuf,
        remote: RemoteConfig,
        trust_payload: Vec<u8>,
        transport: Arc<dyn Transport>,
        extractor: Arc<dyn Extractor>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            root,
            home,
            remote,
            trust_payload,
            packages: PackageTable::bootstrap(),
            temp_dir: std::env::temp_dir(),
            transport,
            extractor,
            reporter,
        }
    }

    pub fn with_packages(mut self, packages: PackageTable) -> Self {
        self.packages = packages;
        self
    }

    pub fn with_temp_dir(mut self, dir: PathBuf) -> Self {
        self.temp_dir = dir;
        self
    }
}
