//! Error types for image construction.

use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;

use thiserror::Error;

/// Everything that can abort an image build. None of these are recoverable.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not under root {}", path.display(), root.display())]
    PathNotUnderRoot { path: PathBuf, root: PathBuf },

    #[error("path is not valid UTF-8: {}", path.display())]
    NonUtf8Path { path: PathBuf },

    #[error("invalid UTF-8 in {} at line {line}: {source}", path.display())]
    Transform {
        path: PathBuf,
        line: usize,
        #[source]
        source: Utf8Error,
    },

    #[error("offset {offset:#x} does not fit in a 32-bit image field")]
    ImageTooLarge { offset: u64 },
}

impl ImageError {
    /// Wraps an `io::Error` together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ImageError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImageError>;
