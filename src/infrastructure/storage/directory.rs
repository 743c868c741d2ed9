//! Directory artifact sink adapter

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::application::ports::{ArtifactSink, DownloadError};

/// Upper bound on " (n)" suffixes tried before giving up
const MAX_COLLISION_SUFFIX: u32 = 999;

/// Saves artifacts into a local directory.
///
/// Existing files are never overwritten: a colliding name gets a ` (1)`,
/// ` (2)`, … suffix before its extension.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reduce a suggested name to a plain file name
    fn sanitize(name: &str) -> String {
        let cleaned: String = name
            .trim()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();

        let cleaned = cleaned.trim_start_matches('.');
        if cleaned.is_empty() {
            "download".to_string()
        } else {
            cleaned.to_string()
        }
    }

    /// Candidate name for the n-th collision
    fn numbered(name: &str, n: u32) -> String {
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => format!("{} ({}).{}", stem, n, ext),
            _ => format!("{} ({})", name, n),
        }
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn save(&self, suggested_name: &str, data: &[u8]) -> Result<PathBuf, DownloadError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DownloadError::SaveFailed(e.to_string()))?;

        let name = Self::sanitize(suggested_name);

        for n in 0..=MAX_COLLISION_SUFFIX {
            let candidate = if n == 0 {
                name.clone()
            } else {
                Self::numbered(&name, n)
            };
            let path = self.dir.join(&candidate);

            // create_new makes the existence check and the create atomic
            let file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            match file {
                Ok(file) => {
                    write_or_discard(&path, file, data).await?;
                    return Ok(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(DownloadError::SaveFailed(e.to_string())),
            }
        }

        Err(DownloadError::SaveFailed(format!(
            "too many files named like '{}' in {}",
            name,
            self.dir.display()
        )))
    }
}

/// Write `data` to a freshly created file, removing it if the write fails
async fn write_or_discard(path: &Path, mut file: fs::File, data: &[u8]) -> Result<(), DownloadError> {
    let written = match file.write_all(data).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };
    drop(file);

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %cleanup, "could not remove partial file");
        }
        return Err(DownloadError::SaveFailed(e.to_string()));
    }
    Ok(())
}
