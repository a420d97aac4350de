//! Reporter trait for dependency injection
//!
//! Stages report progress through this trait instead of printing directly,
//! so the installer logic is not tied to a particular output format.

use std::path::Path;
use std::sync::Arc;

/// How much a run prints. Chosen once from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only errors
    Quiet,
    /// Errors and a final summary
    #[default]
    Normal,
    /// Every stage and download
    Verbose,
}

impl Verbosity {
    pub fn is_verbose(self) -> bool {
        self == Self::Verbose
    }

    pub fn is_quiet(self) -> bool {
        self == Self::Quiet
    }

    /// Default `tracing` filter when `RUST_LOG` is not set.
    pub fn filter_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info,zopen_core=debug,zopen_cli=debug",
        }
    }
}

pub trait Reporter: Send + Sync {
    /// A stage has started (e.g. "Creating directories under /zopen").
    fn section(&self, title: &str);

    /// A package download is starting.
    fn downloading(&self, package: &str, url: &str);

    /// A package has been unpacked and linked.
    fn installed(&self, package: &str, location: &Path);

    /// The whole run completed.
    fn success(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn downloading(&self, package: &str, url: &str) {
        (**self).downloading(package, url);
    }
    fn installed(&self, package: &str, location: &Path) {
        (**self).installed(package, location);
    }
    fn success(&self, msg: &str) {
        (**self).success(msg);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn downloading(&self, _: &str, _: &str) {}
    fn installed(&self, _: &str, _: &Path) {}
    fn success(&self, _: &str) {}
}

/// Reporter that traces progress when verbose and prints the final summary
/// unless quiet.
#[derive(Debug, Clone, Copy)]
pub struct TraceReporter {
    verbosity: Verbosity,
}

impl TraceReporter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl Reporter for TraceReporter {
    fn section(&self, title: &str) {
        if self.verbosity.is_verbose() {
            tracing::info!("{title}");
        }
    }

    fn downloading(&self, package: &str, url: &str) {
        if self.verbosity.is_verbose() {
            tracing::info!(package, url, "downloading");
        }
    }

    fn installed(&self, package: &str, location: &Path) {
        if self.verbosity.is_verbose() {
            tracing::info!(package, location = %location.display(), "installed");
        }
    }

    fn success(&self, msg: &str) {
        if !self.verbosity.is_quiet() {
            println!("{msg}");
        }
    }
}
