//! zopen-setup - bootstrap a z/OS Open Source Tools installation

use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use zopen_cli::ops::args::{self, Invocation};
use zopen_cli::ops::{SetupContext, SetupError, run_setup};
use zopen_core::trust::load_payload;
use zopen_core::{ArchiveExtractor, HttpsTransport, RemoteConfig, Reporter, TraceReporter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let argv: Vec<OsString> = std::env::args_os().collect();
    let program = args::program_name(argv.first());

    match setup(argv).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{program}: {err}");
            if err.shows_syntax() {
                eprint!("{}", args::syntax(&program));
            }
            ExitCode::from(err.exit_code())
        }
    }
}

async fn setup(argv: Vec<OsString>) -> Result<(), SetupError> {
    let Invocation { verbosity, root } = args::resolve(argv)?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let home = dirs::home_dir()
        .ok_or_else(|| SetupError::resource("home directory", "unable to determine $HOME"))?;

    let remote = RemoteConfig::from_env();
    let trust_payload = load_payload(remote.ca_bundle.as_deref())
        .map_err(|e| SetupError::resource("trust bundle", e))?
        .into_owned();

    let reporter = Arc::new(TraceReporter::new(verbosity));
    let ctx = SetupContext::new(
        root,
        home,
        remote.clone(),
        trust_payload,
        Arc::new(HttpsTransport::new(remote)),
        Arc::new(ArchiveExtractor::new()),
        reporter.clone(),
    );

    let report = run_setup(&ctx).await?;
    reporter.success(&format!(
        "Installed {} bootstrap packages into {}. Source {} to use them.",
        report.installed.len(),
        ctx.root,
        report.boot_env.display()
    ));
    Ok(())
}
