//! zopen-setup - bootstrap a z/OS Open Source Tools installation
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Turns an existing, empty directory into a zopen installation root:
//!
//! 1. Creates `boot`, `prod` and `dev` under the root
//! 2. Writes a temporary PEM file used to validate github.com
//! 3. Downloads each bootstrap package into `boot` and unpacks it
//! 4. Writes `boot/.bootenv` for sourcing into a shell
//! 5. Links `$HOME/zopen` to the root
//!
//! Any failing step stops the run; nothing already done is undone.

pub mod ops;

pub use zopen_core::paths::*;
pub use zopen_core::{USER_AGENT, Verbosity};

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "zopen-setup")]
#[command(about = "Install the z/OS Open Source Tools 'starter' environment")]
#[command(args_override_self = true)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Print out verbose messages
    #[arg(short = 'v', overrides_with = "quiet")]
    pub verbose: bool,

    /// Only print out errors
    #[arg(short = 'q', overrides_with = "verbose")]
    pub quiet: bool,

    /// Directory to install into; boot, prod and dev are created under it
    pub root: PathBuf,
}

impl Cli {
    /// The later of `-v` and `-q` wins; neither means normal output.
    pub fn verbosity(&self) -> Verbosity {
        if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}
