use std::path::{Path, PathBuf};

use skychart_catalog::CatalogError;
use skychart_core::FieldError;
use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

/// Per-request failures. Catalog errors are fatal for a run; the others only
/// skip the chart that raised them.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Object not found in catalogs: {designation}")]
    ObjectNotFound { designation: String },

    #[error("Invalid field: {0}")]
    InvalidField(#[from] FieldError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("Invalid configuration {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl ChartError {
    pub fn object_not_found(designation: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            designation: designation.into(),
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error invalidates every chart of the run, not just one.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Catalog(_) | Self::Config { .. })
    }
}

/// Failures while turning draw commands into output bytes.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Unsupported output format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Drawing backend error: {message}")]
    Backend { message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SinkError {
    pub fn unsupported(path: &Path) -> Self {
        Self::UnsupportedFormat {
            path: path.to_path_buf(),
        }
    }

    pub fn backend(message: impl ToString) -> Self {
        Self::Backend {
            message: message.to_string(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_input() {
        let err = ChartError::object_not_found("NGC 9999");
        assert_eq!(err.to_string(), "Object not found in catalogs: NGC 9999");
        assert!(!err.is_fatal());

        let err = SinkError::unsupported(Path::new("out/m31.pdf"));
        assert!(err.to_string().contains("out/m31.pdf"));

        let err = ChartError::config("chart.json", "expected `,`");
        assert!(err.to_string().contains("chart.json"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_conversions() {
        let err: ChartError = CatalogError::not_found("data/stars.bin").into();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("stars.bin"));

        let err: ChartError = FieldError::invalid_radius(-1.0, "radius must be positive").into();
        assert!(matches!(err, ChartError::InvalidField(_)));
        assert!(!err.is_fatal());
    }
}
