//! Error types shared by the extraction and reporting stages.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Coarse classification used for exit codes and user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required file (or required column) is absent.
    MissingInput,
    /// A file exists but its contents could not be parsed.
    MalformedInput,
    /// Reading or writing failed for reasons unrelated to the input's shape.
    Io,
}

#[derive(Debug, Error)]
pub enum QualityError {
    /// Required input file is absent.
    #[error("required input not found: {}", path.display())]
    MissingInput { path: PathBuf },

    /// Input exists but could not be decoded.
    #[error("malformed input {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    /// Filesystem error while reading or writing.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV codec error (writer side, or an unreadable record).
    #[error("CSV error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Workbook or document could not be produced.
    #[error("failed to render {artifact}: {reason}")]
    Render { artifact: String, reason: String },
}

pub type Result<T, E = QualityError> = std::result::Result<T, E>;

impl QualityError {
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self::MissingInput { path: path.into() }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn render(artifact: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Render {
            artifact: artifact.into(),
            reason: reason.to_string(),
        }
    }

    /// Map an `io::Error` from opening `path`, turning `NotFound` into `MissingInput`.
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::missing(path)
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingInput { .. } => ErrorKind::MissingInput,
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::Csv { source, .. } if !source.is_io_error() => ErrorKind::MalformedInput,
            Self::Io { .. } | Self::Csv { .. } | Self::Render { .. } => ErrorKind::Io,
        }
    }

    /// Returns true if this error indicates a required file was absent.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Self::MissingInput { .. })
    }

    /// Path the error refers to, when it has one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::MissingInput { path }
            | Self::MalformedInput { path, .. }
            | Self::Io { path, .. }
            | Self::Csv { path, .. } => Some(path),
            Self::Render { .. } => None,
        }
    }
}

/// Read a whole file as UTF-8, classifying absence as `MissingInput`.
pub(crate) fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            QualityError::malformed(path, "file is not valid UTF-8")
        } else {
            QualityError::from_io(path, e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_missing_input() {
        let err = QualityError::from_io(
            Path::new("out_csv/summary.csv"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_missing_input());
        assert_eq!(err.kind(), ErrorKind::MissingInput);
        assert_eq!(err.path(), Some(Path::new("out_csv/summary.csv")));
        assert!(err.to_string().contains("out_csv/summary.csv"));
    }

    #[test]
    fn permission_denied_stays_io() {
        let err = QualityError::from_io(
            Path::new("x"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn read_missing_file_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_to_string(&dir.path().join("absent.xml")).unwrap_err();
        assert!(err.is_missing_input());
    }
}
