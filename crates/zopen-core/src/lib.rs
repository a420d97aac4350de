//! Core library for `zopen-setup`.
//!
//! Everything needed to turn an empty directory into a zopen installation
//! root lives here: the directory layout, the bootstrap package table, the
//! temporary trust bundle, the download and extraction capabilities, and the
//! files published at the end of a run (`.bootenv` and `$HOME/zopen`).
//!
//! # Directory Layout
//!
//! ```text
//! <root>/
//! ├── boot/           # Bootstrap tools, one linked subtree per package
//! │   ├── .bootenv    # Sourceable descriptor of the boot environment
//! │   └── <pkg> -> <pkg>-<version>.zos/
//! ├── prod/           # Production packages
//! └── dev/            # Development checkouts
//! ```

pub mod bootenv;
pub mod homelink;
pub mod install;
pub mod io;
pub mod layout;
pub mod link;
pub mod packages;
pub mod paths;
pub mod remote;
pub mod reporter;
pub mod status;
pub mod trust;

pub use io::download::{FetchError, FetchRequest, HttpsTransport, Transport};
pub use io::extract::{ArchiveExtractor, ExtractError, Extractor};
pub use packages::{PackageSpec, PackageTable, UriSuffix};
pub use paths::*;
pub use remote::RemoteConfig;
pub use reporter::{NullReporter, Reporter, TraceReporter, Verbosity};
pub use trust::TrustBundle;

/// User Agent string for every HTTP request
pub const USER_AGENT: &str = concat!("zopen-setup/", env!("CARGO_PKG_VERSION"));
