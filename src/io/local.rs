use std::io::ErrorKind;
use std::path::Path;

use crate::error::{ArchiveError, Result};

/// Read a whole local file, mapping a missing file to [`ArchiveError::SourceMissing`]
pub async fn read_source_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|source| match source.kind() {
        ErrorKind::NotFound => ArchiveError::SourceMissing {
            path: path.to_path_buf(),
        },
        _ => ArchiveError::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Convert a local path to a zip entry name.
///
/// Zip names are relative and `/`-separated: backslashes become `/`, and
/// leading `/` and `./` components are dropped.
pub fn zip_path(path: &str) -> String {
    let mut name = path.replace('\\', "/");
    loop {
        if let Some(rest) = name.strip_prefix("./") {
            name = rest.to_string();
        } else if let Some(rest) = name.strip_prefix('/') {
            name = rest.to_string();
        } else {
            break;
        }
    }
    name
}
