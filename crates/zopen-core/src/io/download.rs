//! HTTPS fetch capability.
//!
//! A [`Transport`] answers two questions for a package: which archive to
//! download (a lookup against the package's release metadata) and the bytes
//! of that archive. Both calls are validated against the run's trust bundle.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Certificate, Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::io::extract::split_archive_name;
use crate::packages::PackageSpec;
use crate::remote::{ARCHIVE_EXTENSION, RemoteConfig};
use crate::status::{self, FETCH_FAILED, METADATA_FAILED};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid trust bundle {}: {reason}", path.display())]
    Trust { path: PathBuf, reason: String },

    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error("release metadata for {repository}: {reason}")]
    Metadata { repository: String, reason: String },
}

impl FetchError {
    /// Status code reported for this failure.
    pub fn code(&self) -> u8 {
        match self {
            Self::Io(e) => status::os_status(e, FETCH_FAILED),
            Self::Metadata { .. } => METADATA_FAILED,
            Self::Http(_) | Self::Trust { .. } | Self::Status { .. } => FETCH_FAILED,
        }
    }
}

/// A single archive download.
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    /// Scheme and host, e.g. `https://github.com`
    pub host: &'a str,
    /// Request path built from the URI template
    pub path: &'a str,
    /// PEM file with the roots to trust
    pub trust_bundle: &'a Path,
    /// Local file the body is written to
    pub dest: &'a Path,
}

impl FetchRequest<'_> {
    pub fn url(&self) -> String {
        format!("{}{}", self.host, self.path)
    }
}

/// The fetch capability the installer is built against.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Name of the archive to download for `spec`.
    async fn resolve_filename(
        &self,
        spec: &PackageSpec,
        trust_bundle: &Path,
    ) -> Result<String, FetchError>;

    /// Download `request` into `request.dest`, returning the bytes written.
    async fn fetch(&self, request: &FetchRequest<'_>) -> Result<u64, FetchError>;
}

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Deserialize)]
struct ReleaseAsset {
    name: String,
}

/// [`Transport`] over HTTPS using only the roots in the trust bundle.
#[derive(Debug, Clone)]
pub struct HttpsTransport {
    config: RemoteConfig,
}

impl HttpsTransport {
    pub fn new(config: RemoteConfig) -> Self {
        Self { config }
    }

    /// Build a client that trusts the certificates in `trust_bundle`.
    ///
    /// The bundle is re-read on every call so each request sees exactly the
    /// file the run created.
    async fn client(trust_bundle: &Path) -> Result<Client, FetchError> {
        let pem = tokio::fs::read(trust_bundle).await?;
        let certs = Certificate::from_pem_bundle(&pem).map_err(|e| FetchError::Trust {
            path: trust_bundle.to_path_buf(),
            reason: e.to_string(),
        })?;
        if certs.is_empty() {
            return Err(FetchError::Trust {
                path: trust_bundle.to_path_buf(),
                reason: "no certificates found".to_string(),
            });
        }

        let mut builder = Client::builder()
            .use_rustls_tls()
            .tls_built_in_root_certs(false)
            .user_agent(crate::USER_AGENT);
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
        Ok(builder.build()?)
    }
}

/// The first `.pax.Z` asset, or failing that the first asset in any other
/// format [`split_archive_name`] understands.
fn pick_asset<'a>(names: impl Iterator<Item = &'a str> + Clone) -> Option<&'a str> {
    let mut installable = names.filter(|name| !name.contains('/'));
    installable
        .clone()
        .find(|name| name.ends_with(ARCHIVE_EXTENSION))
        .or_else(|| installable.find(|name| split_archive_name(name).is_some()))
}

#[async_trait]
impl Transport for HttpsTransport {
    async fn resolve_filename(
        &self,
        spec: &PackageSpec,
        trust_bundle: &Path,
    ) -> Result<String, FetchError> {
        let url = self.config.release_metadata_url(spec);
        let client = Self::client(trust_bundle).await?;

        let response = client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status(),
            });
        }

        let release: Release = response.json().await?;
        tracing::debug!(
            package = spec.name(),
            tag = %release.tag_name,
            assets = release.assets.len(),
            "fetched release metadata"
        );

        pick_asset(release.assets.iter().map(|asset| asset.name.as_str()))
            .map(String::from)
            .ok_or_else(|| FetchError::Metadata {
                repository: spec.repository(),
                reason: format!("release {} has no installable archive", release.tag_name),
            })
    }

    async fn fetch(&self, request: &FetchRequest<'_>) -> Result<u64, FetchError> {
        let url = request.url();
        let client = Self::client(request.trust_bundle).await?;

        let response = client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status(),
            });
        }

        let mut file = File::create(request.dest).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        tracing::debug!(url = %url, bytes = written, "download complete");
        Ok(written)
    }
}
