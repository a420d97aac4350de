//! Archive extraction module
//!
//! Bootstrap packages ship as `.pax.Z` archives, which are handed to the
//! system `pax` tool. Tar-family archives (`.tar`, `.tar.gz`, `.tar.zst`)
//! are unpacked in-process.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use zstd::stream::Decoder as ZstdDecoder;

use crate::status::{self, EXTRACT_FAILED};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Unsupported archive format: {0}")]
    UnsupportedFormat(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("'pax' is required to unpack {}: {source}", archive.display())]
    PaxMissing {
        archive: PathBuf,
        #[source]
        source: which::Error,
    },

    #[error("pax failed on {} ({status})", archive.display())]
    Pax { archive: PathBuf, status: ExitStatus },

    #[error("{label}: archive did not produce {}", expected.display())]
    MissingRoot { label: String, expected: PathBuf },
}

impl ExtractError {
    /// Status code reported for this failure.
    pub fn code(&self) -> u8 {
        match self {
            Self::Io(e) => status::os_status(e, EXTRACT_FAILED),
            Self::Pax { status, .. } => status::exit_status(status.code(), EXTRACT_FAILED),
            _ => EXTRACT_FAILED,
        }
    }
}

/// Archive formats understood by [`ArchiveExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// compress(1)-ed pax archive (`.pax.Z`)
    PaxZ,
    /// Plain pax archive (`.pax`)
    Pax,
    /// Gzip-compressed tar (`.tar.gz` / `.tgz`)
    TarGz,
    /// Zstandard-compressed tar (`.tar.zst` / `.tzst`)
    TarZst,
    /// Uncompressed tar (`.tar`)
    Tar,
}

const EXTENSIONS: &[(&str, ArchiveFormat)] = &[
    (".pax.z", ArchiveFormat::PaxZ),
    (".pax", ArchiveFormat::Pax),
    (".tar.gz", ArchiveFormat::TarGz),
    (".tgz", ArchiveFormat::TarGz),
    (".tar.zst", ArchiveFormat::TarZst),
    (".tzst", ArchiveFormat::TarZst),
    (".tar", ArchiveFormat::Tar),
];

/// Split an archive file name into its stem and format.
///
/// The stem is the name of the directory the archive unpacks to:
/// `curl-8.4.0.zos.pax.Z` unpacks to `curl-8.4.0.zos`.
pub fn split_archive_name(file_name: &str) -> Option<(&str, ArchiveFormat)> {
    let lower = file_name.to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(ext, _)| lower.ends_with(ext) && lower.len() > ext.len())
        .map(|(ext, format)| (&file_name[..file_name.len() - ext.len()], *format))
}

/// The extract capability the installer is built against.
pub trait Extractor: Send + Sync {
    /// Unpack `archive` under `dest_dir` and return the top-level directory
    /// it produced. `label` names the package in diagnostics.
    fn extract(&self, archive: &Path, dest_dir: &Path, label: &str)
    -> Result<PathBuf, ExtractError>;
}

/// [`Extractor`] that picks a strategy from the archive's file name.
///
/// `.pax.Z` archives are handed to `pax`, looked up on `PATH` unless an
/// explicit tool is configured with [`ArchiveExtractor::with_pax`].
#[derive(Debug, Default, Clone)]
pub struct ArchiveExtractor {
    pax: Option<PathBuf>,
}

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `tool` instead of the `pax` found on `PATH`.
    pub fn with_pax(tool: impl Into<PathBuf>) -> Self {
        Self {
            pax: Some(tool.into()),
        }
    }

    fn pax_tool(&self, archive: &Path) -> Result<PathBuf, ExtractError> {
        let tool = self
            .pax
            .as_deref()
            .map_or_else(|| which::which("pax"), which::which);
        tool.map_err(|source| ExtractError::PaxMissing {
            archive: archive.to_path_buf(),
            source,
        })
    }
}

impl Extractor for ArchiveExtractor {
    fn extract(
        &self,
        archive: &Path,
        dest_dir: &Path,
        label: &str,
    ) -> Result<PathBuf, ExtractError> {
        let file_name = archive
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| ExtractError::UnsupportedFormat(archive.display().to_string()))?;
        let (stem, format) = split_archive_name(file_name)
            .ok_or_else(|| ExtractError::UnsupportedFormat(file_name.to_string()))?;

        fs::create_dir_all(dest_dir)?;
        tracing::debug!(package = label, ?format, archive = %archive.display(), "extracting");

        match format {
            ArchiveFormat::PaxZ | ArchiveFormat::Pax => {
                run_pax(&self.pax_tool(archive)?, archive, dest_dir)?;
            }
            ArchiveFormat::TarGz => {
                let reader = BufReader::new(File::open(archive)?);
                extract_tar(flate2::read::GzDecoder::new(reader), dest_dir)?;
            }
            ArchiveFormat::TarZst => {
                let reader = BufReader::new(File::open(archive)?);
                extract_tar(ZstdDecoder::new(reader)?, dest_dir)?;
            }
            ArchiveFormat::Tar => {
                extract_tar(BufReader::new(File::open(archive)?), dest_dir)?;
            }
        }

        let root = dest_dir.join(stem);
        if !root.is_dir() {
            return Err(ExtractError::MissingRoot {
                label: label.to_string(),
                expected: root,
            });
        }
        Ok(root)
    }
}

/// Unpack with `pax`, preserving permissions and extended attributes
/// (`-ppx`).
fn run_pax(pax: &Path, archive: &Path, dest_dir: &Path) -> Result<(), ExtractError> {
    // pax runs inside dest_dir, so the archive path must not be relative.
    let archive = fs::canonicalize(archive)?;

    let status = Command::new(pax)
        .arg("-rf")
        .arg(&archive)
        .arg("-ppx")
        .current_dir(dest_dir)
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        return Err(ExtractError::Pax { archive, status });
    }
    Ok(())
}

/// Extract a tar stream, refusing entries that would land outside `dest_dir`.
fn extract_tar<R: Read>(reader: R, dest_dir: &Path) -> Result<(), ExtractError> {
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);

    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.unpack_in(dest_dir)? {
            let path = entry.path()?.display().to_string();
            return Err(ExtractError::Archive(format!(
                "Invalid path in archive: {path}"
            )));
        }
    }

    Ok(())
}
