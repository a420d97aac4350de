pub mod args;
pub mod context;
pub mod error;
pub mod setup;

pub use args::Invocation;
pub use context::SetupContext;
pub use error::{SetupError, Stage};
pub use setup::{SetupReport, run_setup};
