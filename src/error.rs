use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure classes a scan can end with.
///
/// Every variant is terminal: `main` prints it once and exits with
/// [`ScanError::exit_code`].
#[derive(Error, Debug)]
pub enum ScanError {
    /// The manifest type token is not one we know how to parse.
    #[error("unsupported input: unknown manifest type `{0}` (expected -r or -p)")]
    UnsupportedInput(String),

    /// The manifest is missing or we are not allowed to read it.
    #[error("cannot access input: {reason} at {}", path.display())]
    InputAccess { path: PathBuf, reason: &'static str },

    /// Anything else: decoding, JSON syntax, malformed pins, lookup failures.
    #[error("unexpected error: {0:#}")]
    Unexpected(#[from] anyhow::Error),
}

impl ScanError {
    /// Classify an I/O error raised while opening `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ScanError::InputAccess {
                path: path.to_path_buf(),
                reason: "file not found",
            },
            io::ErrorKind::PermissionDenied => ScanError::InputAccess {
                path: path.to_path_buf(),
                reason: "permission denied",
            },
            _ => ScanError::Unexpected(
                anyhow::Error::new(err).context(format!("failed to read {}", path.display())),
            ),
        }
    }

    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            ScanError::Unexpected(_) => 1,
            ScanError::InputAccess { .. } => 3,
            ScanError::UnsupportedInput(_) => 4,
        }
    }
}
