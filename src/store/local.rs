use super::{check_cancelled, Config, Result, Storage, StorageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use tokio_util::sync::CancellationToken;

// History is not sensitive, and tightening this to 0600 would break existing setups.
#[cfg(unix)]
const HISTORY_FILE_MODE: u32 = 0o644;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LocalConfig {
    /// Path to the history file, relative to the current working directory.
    pub path: PathBuf,
}

impl Config for LocalConfig {
    fn new_storage(&self) -> Result<Box<dyn Storage>> {
        if self.path.as_os_str().is_empty() {
            return Err(StorageError::InvalidConfig(
                "local storage requires a non-empty path".to_string(),
            ));
        }
        Ok(Box::new(LocalStorage::new(self.path.clone())))
    }
}

/// Keeps the history in a single file on the local filesystem.
///
/// Useful for debugging, or as a workaround for remote backends that are not
/// supported: the file can be synced to the remote by hand.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn write(&self, cancel: &CancellationToken, blob: &[u8]) -> Result<()> {
        check_cancelled(cancel)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(HISTORY_FILE_MODE);

        // Not atomic: a crash mid-write can leave a truncated file behind.
        let mut file = options.open(&self.path).await?;
        file.write_all(blob).await?;
        file.flush().await?;

        tracing::debug!(
            "Wrote {} bytes of history to {}",
            blob.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn read(&self, cancel: &CancellationToken) -> Result<Vec<u8>> {
        check_cancelled(cancel)?;

        match tokio::fs::read(&self.path).await {
            Ok(contents) => {
                tracing::debug!(
                    "Read {} bytes of history from {}",
                    contents.len(),
                    self.path.display()
                );
                Ok(contents)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    "No history file at {}, treating as uninitialized",
                    self.path.display()
                );
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}
