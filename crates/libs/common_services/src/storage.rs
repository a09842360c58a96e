//! Filesystem persistence of rendered invitations.

use color_eyre::eyre::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// A file written by [`InvitationStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredInvitation {
    pub file_name: String,
    pub path: PathBuf,
}

/// Writes invitations into a single folder. Existing files with the same name are replaced.
#[derive(Debug, Clone)]
pub struct InvitationStore {
    folder: PathBuf,
}

impl InvitationStore {
    #[must_use]
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Creates the folder and its parents if needed. Safe to call concurrently.
    pub async fn ensure_folder(&self) -> Result<()> {
        fs::create_dir_all(&self.folder)
            .await
            .wrap_err_with(|| format!("Cannot create folder {}", self.folder.display()))
    }

    /// Writes `bytes` to `folder/file_name` and only returns once the data is flushed and synced.
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<StoredInvitation> {
        if bytes.is_empty() {
            bail!("Refusing to store empty invitation {file_name}");
        }
        self.ensure_folder().await?;

        let path = self.folder.join(file_name);
        let mut file = File::create(&path)
            .await
            .wrap_err_with(|| format!("Cannot create {}", path.display()))?;
        file.write_all(bytes)
            .await
            .wrap_err_with(|| format!("Cannot write {}", path.display()))?;
        file.flush().await?;
        file.sync_all()
            .await
            .wrap_err_with(|| format!("Cannot sync {}", path.display()))?;

        debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(StoredInvitation {
            file_name: file_name.to_owned(),
            path,
        })
    }
}
