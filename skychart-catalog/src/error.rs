use std::path::{Path, PathBuf};

use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failures while loading catalog files. All of them are fatal for a run.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Required catalog file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Malformed catalog {} ({location}): {message}", .path.display())]
    Format {
        path: PathBuf,
        location: String,
        message: String,
    },

    #[error(
        "Master reference cycle in {}: {}",
        .path.display(),
        .designations.join(" -> ")
    )]
    ReferenceCycle {
        path: PathBuf,
        designations: Vec<String>,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn format(
        path: impl Into<PathBuf>,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Format {
            path: path.into(),
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn at_line(path: &Path, line: usize, message: impl Into<String>) -> Self {
        Self::format(path, format!("line {line}"), message)
    }

    pub fn at_record(path: &Path, record: u64, message: impl Into<String>) -> Self {
        Self::format(path, format!("record {record}"), message)
    }

    pub fn in_header(path: &Path, message: impl Into<String>) -> Self {
        Self::format(path, "header", message)
    }

    pub fn reference_cycle(path: impl Into<PathBuf>, designations: Vec<String>) -> Self {
        Self::ReferenceCycle {
            path: path.into(),
            designations,
        }
    }

    /// Maps an I/O error, turning `NotFound` into [`CatalogError::NotFound`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// The file that caused the error.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::Format { path, .. }
            | Self::ReferenceCycle { path, .. }
            | Self::Io { path, .. } => path,
        }
    }
}
