//! The setup run.
//!
//! Stages run strictly in order and the first failure ends the run:
//!
//! ```text
//! directories -> trust bundle -> (download -> install) per package
//!             -> .bootenv -> $HOME/zopen -> remove trust bundle
//! ```
//!
//! Nothing done before a failure is undone. The trust bundle is only removed
//! once everything else has succeeded.

use std::path::PathBuf;

use zopen_core::bootenv::BootEnv;
use zopen_core::homelink::publish_home_link;
use zopen_core::install::install_package;
use zopen_core::layout::create_dirs;
use zopen_core::paths::{bounded_join, home_link_path};
use zopen_core::{FetchRequest, PackageSpec, TrustBundle};

use crate::ops::{SetupContext, SetupError, Stage};

/// What a successful run left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    /// `<boot>/<package>` for every installed package, in install order
    pub installed: Vec<PathBuf>,
    pub boot_env: PathBuf,
    pub home_link: PathBuf,
}

/// Run every stage against `ctx`.
///
/// # Errors
///
/// Returns the first failing stage as a [`SetupError`]; its exit code is the
/// failing collaborator's status.
pub async fn run_setup(ctx: &SetupContext) -> Result<SetupReport, SetupError> {
    let boot = ctx.root.boot();

    ctx.reporter
        .section(&format!("Creating directories under {}", ctx.root));
    create_dirs(&ctx.root).map_err(|e| SetupError::stage(Stage::Directories, e.code(), e))?;

    let trust = TrustBundle::create_in(&ctx.temp_dir, &ctx.trust_payload)
        .map_err(|e| SetupError::resource("trust bundle", e))?;

    let mut installed = Vec::with_capacity(ctx.packages.len());
    for spec in &ctx.packages {
        ctx.reporter
            .section(&format!("Download {} into {}", spec.name(), boot.display()));
        let link = install_one(ctx, spec, &trust).await?;
        ctx.reporter.installed(spec.name(), &link);
        installed.push(link);
    }

    let boot_env = ctx.root.boot_env();
    ctx.reporter.section(&format!(
        "Create .bootenv for sourcing in {}",
        boot.display()
    ));
    BootEnv::new(&ctx.root, &ctx.packages)
        .write(&boot_env)
        .map_err(|e| SetupError::stage(Stage::BootEnv, e.code(), e))?;

    ctx.reporter.section(&format!(
        "Create symbolic link from {} to {}",
        home_link_path(&ctx.home).display(),
        ctx.root
    ));
    let home_link = publish_home_link(&ctx.home, &ctx.root).map_err(|e| {
        let code = e.code();
        SetupError::stage(
            Stage::HomeLink,
            code,
            format!("unable to link {} to {}: {e}", ctx.home.display(), ctx.root),
        )
    })?;
    tracing::debug!(link = %home_link.display(), "home link published");

    trust
        .remove()
        .map_err(|e| SetupError::resource("trust bundle", e))?;

    Ok(SetupReport {
        installed,
        boot_env,
        home_link,
    })
}

async fn install_one(
    ctx: &SetupContext,
    spec: &PackageSpec,
    trust: &TrustBundle,
) -> Result<PathBuf, SetupError> {
    let boot = ctx.root.boot();

    let filename = ctx
        .transport
        .resolve_filename(spec, trust.path())
        .await
        .map_err(|e| {
            SetupError::stage(
                Stage::Download,
                e.code(),
                format!("unable to find the archive for {}: {e}", spec.repository()),
            )
        })?;

    let artifact = bounded_join(&boot, &filename)
        .map_err(|e| SetupError::resource("output file", e))?;
    let path = ctx
        .remote
        .request_path(spec, &filename)
        .map_err(|e| SetupError::resource("download uri", e))?;

    let request = FetchRequest {
        host: &ctx.remote.host,
        path: &path,
        trust_bundle: trust.path(),
        dest: &artifact,
    };
    let url = request.url();
    ctx.reporter.downloading(spec.name(), &url);

    let bytes = ctx.transport.fetch(&request).await.map_err(|e| {
        SetupError::stage(
            Stage::Download,
            e.code(),
            format!(
                "error downloading {url} with PEM file {} to {}: {e}",
                trust.path().display(),
                artifact.display()
            ),
        )
    })?;
    tracing::debug!(package = spec.name(), bytes, "downloaded");

    install_package(ctx.extractor.as_ref(), &boot, spec, &artifact).map_err(|e| {
        SetupError::stage(
            Stage::Install,
            e.code(),
            format!("error unpaxing {}: {e}", artifact.display()),
        )
    })
}
