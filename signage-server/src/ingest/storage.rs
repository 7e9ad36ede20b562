//! Uploaded asset files
//!
//! Uploads live directly in the asset folder, one file per asset named by
//! the asset id. Identical uploads share an id and therefore a file.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct AssetStorage {
    folder: PathBuf,
}

impl AssetStorage {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// File path for `asset_id`, or `None` if the id could escape the folder
    pub fn path_for(&self, asset_id: &str) -> Option<PathBuf> {
        let safe = !asset_id.is_empty()
            && asset_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        safe.then(|| self.folder.join(asset_id))
    }

    /// Does `uri` point into the asset folder?
    pub fn holds(&self, uri: &str) -> bool {
        Path::new(uri).starts_with(&self.folder)
    }

    /// Write `bytes` as the file for `asset_id`, replacing any existing file
    pub async fn store(&self, asset_id: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.path_for(asset_id).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("invalid asset id {}", asset_id))
        })?;
        tokio::fs::create_dir_all(&self.folder).await?;
        tokio::fs::write(&path, bytes).await?;
        info!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Remove the file for `asset_id` if one exists. Returns whether a file was removed.
    pub async fn remove(&self, asset_id: &str) -> io::Result<bool> {
        let Some(path) = self.path_for(asset_id) else {
            warn!("Refusing to remove file for unsafe asset id {:?}", asset_id);
            return Ok(false);
        };

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                tokio::fs::remove_file(&path).await?;
                info!("Removed {}", path.display());
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
