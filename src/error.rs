//! Error types for archive packaging.

use std::io;
use std::path::PathBuf;

/// Result type alias for archive operations.
pub type Result<T, E = ArchiveError> = std::result::Result<T, E>;

/// Errors raised while building an archive.
///
/// Writing the same internal path twice is not an error: the second write is
/// skipped silently.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The destination archive could not be created.
    #[error("cannot create archive {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A local file passed to `write_file` does not exist.
    #[error("source file not found: {}", path.display())]
    SourceMissing { path: PathBuf },

    /// A local file exists but could not be read.
    #[error("cannot read source file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The fetch collaborator failed to retrieve a URL.
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A write or close was attempted on an archive that is not open.
    #[error("archive is not open")]
    NotOpen,

    /// `open` was called on an archive that is already open.
    #[error("archive is already open")]
    AlreadyOpen,

    /// A value does not fit the 32-bit zip format.
    #[error("{what} exceeds the zip format limit (ZIP64 is not supported)")]
    TooLarge { what: &'static str },

    /// Writing to the archive failed.
    #[error("archive I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ArchiveError {
    /// Wraps a fetch collaborator failure for `url`.
    pub fn fetch(url: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Fetch {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Returns true if the error is a missing local source file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SourceMissing { .. })
    }
}
