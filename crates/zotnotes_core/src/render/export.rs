//! Dated RTF file export with pre-flight and post-write checks.
//!
//! # Responsibility
//! - Derive a filesystem-safe file name from the user query and date.
//! - Verify the target directory before writing; verify the file after.
//!
//! # Invariants
//! - The target directory is never created implicitly.
//! - Overwriting an existing file and writing an empty body are warnings.
//! - The file is written as UTF-8.

use crate::render::rtf::wrap_document;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

const FILE_NAME_INFIX: &str = "_Zotero_notes_";
const FILE_EXTENSION: &str = "rtf";
const DATE_FORMAT: &str = "%Y-%m-%d";
const RTF_MAGIC: &[u8] = br"{\rtf1";

/// Errors from document export.
#[derive(Debug)]
pub enum ExportError {
    MissingDirectory(PathBuf),
    NotADirectory(PathBuf),
    ReadOnlyDirectory(PathBuf),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDirectory(path) => {
                write!(f, "output directory does not exist: {}", path.display())
            }
            Self::NotADirectory(path) => {
                write!(f, "output path is not a directory: {}", path.display())
            }
            Self::ReadOnlyDirectory(path) => {
                write!(f, "output directory is not writable: {}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result of directory checks run before writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preflight {
    pub target: PathBuf,
    /// Target file already exists and will be replaced.
    pub will_overwrite: bool,
}

/// Result of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub bytes_written: u64,
    /// Re-read file starts with the RTF magic.
    pub header_verified: bool,
    pub overwrote: bool,
    pub empty_body: bool,
}

/// Keeps alphanumerics, spaces, `-` and `_`, then trims.
pub fn sanitize_file_stem(query: &str) -> String {
    query
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Returns `{stem}_Zotero_notes_{YYYY-MM-DD}.rtf`.
pub fn output_file_name(query: &str, date: NaiveDate) -> String {
    format!(
        "{}{FILE_NAME_INFIX}{}.{FILE_EXTENSION}",
        sanitize_file_stem(query),
        date.format(DATE_FORMAT)
    )
}

/// Checks that `directory` exists, is a directory and is writable by the
/// current user.
pub fn preflight(directory: &Path, file_name: &str) -> Result<Preflight, ExportError> {
    let metadata = match fs::metadata(directory) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ExportError::MissingDirectory(directory.to_path_buf()));
        }
        Err(source) => {
            return Err(ExportError::Io {
                path: directory.to_path_buf(),
                source,
            });
        }
    };
    if !metadata.is_dir() {
        return Err(ExportError::NotADirectory(directory.to_path_buf()));
    }
    ensure_writable(directory)?;

    let target = directory.join(file_name);
    let will_overwrite = target.exists();
    Ok(Preflight {
        target,
        will_overwrite,
    })
}

/// Writes `body` wrapped as an RTF document into `directory`.
///
/// # Errors
/// - Directory errors from [`preflight`].
/// - `Io` when writing or re-reading the file fails.
pub fn write_document(
    directory: &Path,
    query: &str,
    date: NaiveDate,
    body: &str,
) -> Result<ExportReport, ExportError> {
    let checks = preflight(directory, &output_file_name(query, date))?;
    if checks.will_overwrite {
        warn!(
            "event=export_overwrite module=export status=warn path={}",
            checks.target.display()
        );
    }
    let empty_body = body.trim().is_empty();
    if empty_body {
        warn!("event=export_empty module=export status=warn reason=no_content");
    }

    let io_error = |source| ExportError::Io {
        path: checks.target.clone(),
        source,
    };
    fs::write(&checks.target, wrap_document(body)).map_err(io_error)?;

    let bytes_written = fs::metadata(&checks.target).map_err(io_error)?.len();
    let header_verified = starts_with_magic(&checks.target).map_err(io_error)?;
    info!(
        "event=export_written module=export status=ok path={} bytes={} header_verified={}",
        checks.target.display(),
        bytes_written,
        header_verified
    );

    Ok(ExportReport {
        path: checks.target,
        bytes_written,
        header_verified,
        overwrote: checks.will_overwrite,
        empty_body,
    })
}

/// Creates and drops a scratch file so the check reflects the current user.
fn ensure_writable(directory: &Path) -> Result<(), ExportError> {
    match tempfile::NamedTempFile::new_in(directory) {
        Ok(scratch) => scratch.close().map_err(|source| ExportError::Io {
            path: directory.to_path_buf(),
            source,
        }),
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(ExportError::ReadOnlyDirectory(directory.to_path_buf()))
        }
        Err(source) => Err(ExportError::Io {
            path: directory.to_path_buf(),
            source,
        }),
    }
}

fn starts_with_magic(path: &Path) -> std::io::Result<bool> {
    let mut prefix = [0u8; RTF_MAGIC.len()];
    let mut file = fs::File::open(path)?;
    match file.read_exact(&mut prefix) {
        Ok(()) => Ok(&prefix[..] == RTF_MAGIC),
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(err) => Err(err),
    }
}
