//! Local file picker adapter

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;

use crate::domain::upload::{AudioFormat, SelectedFile, MAX_UPLOAD_BYTES};

/// Errors reading a local file
#[derive(Debug, Error)]
pub enum PickError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Turn a local path into a [`SelectedFile`].
///
/// The media type is declared from the extension unless `media_type`
/// overrides it. The payload is only read when the declared size fits the
/// upload ceiling; oversized files are handed over with an empty payload so
/// validation can refuse them without loading them.
pub async fn pick_file(path: &Path, media_type: Option<String>) -> Result<SelectedFile, PickError> {
    let io_err = |source: std::io::Error| {
        if source.kind() == std::io::ErrorKind::NotFound {
            PickError::NotFound(path.to_path_buf())
        } else {
            PickError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    };

    let metadata = fs::metadata(path).await.map_err(io_err)?;
    if !metadata.is_file() {
        return Err(PickError::NotAFile(path.to_path_buf()));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let declared_type = media_type
        .or_else(|| AudioFormat::from_file_name(&name).map(|f| f.media_type().to_string()));
    let size = metadata.len();

    let payload = if size <= MAX_UPLOAD_BYTES {
        fs::read(path).await.map_err(io_err)?
    } else {
        Vec::new()
    };

    Ok(SelectedFile::new(name, size, declared_type, payload))
}
