//! Where bootstrap packages are downloaded from.
//!
//! Request paths follow a fixed template:
//!
//! ```text
//! /<uri-prefix>/<package><suffix>/<uri-suffix-segment>/<filename>
//! /ZOSOpenTools/curlport/releases/latest/download/curl-8.4.0.zos.pax.Z
//! ```

use std::path::PathBuf;

use crate::packages::PackageSpec;
use crate::paths::{PathTooLong, check_len};

/// Host every archive is downloaded from.
pub const DEFAULT_HOST: &str = "https://github.com";

/// Base URL of the release metadata API.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Organization owning the package repositories.
pub const URI_PREFIX: &str = "ZOSOpenTools";

/// Path segment between the repository and the file name.
pub const URI_SUFFIX_SEGMENT: &str = "releases/latest/download";

/// Release assets with this extension are the installable archives.
pub const ARCHIVE_EXTENSION: &str = ".pax.Z";

/// Remote endpoints and trust material overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Download host, including scheme (e.g., `https://github.com`)
    pub host: String,
    /// Release metadata API base (e.g., `https://api.github.com`)
    pub api_base: String,
    /// First path segment of every request
    pub uri_prefix: String,
    /// Segment between repository and file name
    pub uri_suffix: String,
    /// PEM file to use instead of the embedded trust material
    pub ca_bundle: Option<PathBuf>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            uri_prefix: URI_PREFIX.to_string(),
            uri_suffix: URI_SUFFIX_SEGMENT.to_string(),
            ca_bundle: None,
        }
    }
}

impl RemoteConfig {
    /// Defaults, overridden by `ZOPEN_BOOT_URL`, `ZOPEN_BOOT_API_URL` and
    /// `ZOPEN_CA_BUNDLE` when set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        Self {
            host: var("ZOPEN_BOOT_URL")
                .map_or(defaults.host, |v| v.trim_end_matches('/').to_string()),
            api_base: var("ZOPEN_BOOT_API_URL")
                .map_or(defaults.api_base, |v| v.trim_end_matches('/').to_string()),
            ca_bundle: var("ZOPEN_CA_BUNDLE").map(PathBuf::from),
            ..defaults
        }
    }

    /// Build the request path for `filename` of `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`PathTooLong`] if the path exceeds the length bound.
    pub fn request_path(&self, spec: &PackageSpec, filename: &str) -> Result<String, PathTooLong> {
        let path = format!(
            "/{}/{}/{}/{}",
            self.uri_prefix,
            spec.repository(),
            self.uri_suffix,
            filename
        );
        check_len("request uri", &path)?;
        Ok(path)
    }

    /// Release metadata endpoint for `spec`.
    pub fn release_metadata_url(&self, spec: &PackageSpec) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base,
            self.uri_prefix,
            spec.repository()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::{PackageTable, UriSuffix};

    #[test]
    fn test_request_path_template() {
        let config = RemoteConfig::default();
        let table = PackageTable::with_primary("primary", &["primary", "alpha"]);
        let paths: Vec<String> = table
            .iter()
            .map(|spec| config.request_path(spec, "file.pax.Z").unwrap())
            .collect();

        assert_eq!(
            paths,
            [
                "/ZOSOpenTools/primary/releases/latest/download/file.pax.Z",
                "/ZOSOpenTools/alphaport/releases/latest/download/file.pax.Z",
            ]
        );
    }

    #[test]
    fn test_request_path_overflow() {
        let config = RemoteConfig::default();
        let spec = PackageSpec::new("curl", UriSuffix::Port);
        let filename = "a".repeat(crate::paths::MAX_PATH_LEN);
        assert!(config.request_path(&spec, &filename).is_err());
    }

    #[test]
    fn test_release_metadata_url() {
        let config = RemoteConfig {
            api_base: "http://127.0.0.1:9000".to_string(),
            ..RemoteConfig::default()
        };
        let spec = PackageSpec::new("jq", UriSuffix::Port);
        assert_eq!(
            config.release_metadata_url(&spec),
            "http://127.0.0.1:9000/repos/ZOSOpenTools/jqport/releases/latest"
        );
    }
}
