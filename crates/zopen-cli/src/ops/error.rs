//! Setup errors and their exit codes

use std::fmt;

use thiserror::Error;
use zopen_core::paths::RootError;

/// Exit status for resource and setup failures.
pub const EXIT_RESOURCE: u8 = 4;

/// Exit status for malformed invocations.
pub const EXIT_USAGE: u8 = 8;

/// The pipeline stage a [`SetupError::Stage`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Directories,
    Download,
    Install,
    BootEnv,
    HomeLink,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Directories => "create directories",
            Self::Download => "download",
            Self::Install => "install",
            Self::BootEnv => "write boot environment",
            Self::HomeLink => "link home directory",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SetupError {
    /// No arguments at all.
    #[error("no installation root specified")]
    NoArguments,

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Root(#[from] RootError),

    #[error("{context}: {message}")]
    Resource {
        context: &'static str,
        message: String,
    },

    #[error("{message}")]
    Stage {
        stage: Stage,
        code: u8,
        message: String,
    },
}

impl SetupError {
    /// A local allocation, path-length, or cleanup failure.
    pub fn resource(context: &'static str, msg: impl fmt::Display) -> Self {
        Self::Resource {
            context,
            message: msg.to_string(),
        }
    }

    /// A collaborator failure whose status becomes the exit code.
    pub fn stage(stage: Stage, code: u8, msg: impl fmt::Display) -> Self {
        Self::Stage {
            stage,
            code: if code == 0 { 1 } else { code },
            message: msg.to_string(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => EXIT_USAGE,
            Self::NoArguments | Self::Root(_) | Self::Resource { .. } => EXIT_RESOURCE,
            Self::Stage { code, .. } => *code,
        }
    }

    /// Whether the syntax message should follow the diagnostic.
    pub fn shows_syntax(&self) -> bool {
        matches!(self, Self::NoArguments | Self::Usage(_) | Self::Root(_))
    }
}
