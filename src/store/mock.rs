use super::{check_cancelled, Config, Result, Storage, StorageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct MockConfig {
    /// Initial serialized history.
    pub data: String,
    /// Makes every `write` fail.
    pub write_error: bool,
    /// Makes every `read` fail.
    pub read_error: bool,
}

impl MockConfig {
    /// Like [`Config::new_storage`], but keeps the concrete type so tests can
    /// hold a clone and inspect what was written.
    pub fn new_mock_storage(&self) -> MockStorage {
        MockStorage::new(self.data.as_bytes(), self.write_error, self.read_error)
    }
}

impl Config for MockConfig {
    fn new_storage(&self) -> Result<Box<dyn Storage>> {
        Ok(Box::new(self.new_mock_storage()))
    }
}

/// In-memory storage for testing, with switchable failures.
///
/// Clones share the same data.
#[derive(Clone, Debug)]
pub struct MockStorage {
    data: Arc<RwLock<Vec<u8>>>,
    write_error: bool,
    read_error: bool,
}

impl MockStorage {
    pub fn new(data: impl Into<Vec<u8>>, write_error: bool, read_error: bool) -> Self {
        Self {
            data: Arc::new(RwLock::new(data.into())),
            write_error,
            read_error,
        }
    }

    /// Raw stored bytes, bypassing the injected read failure.
    #[cfg(any(test, feature = "test-support"))]
    pub fn storage_data(&self) -> Vec<u8> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn write(&self, cancel: &CancellationToken, blob: &[u8]) -> Result<()> {
        check_cancelled(cancel)?;

        if self.write_error {
            tracing::warn!("Injected mock storage write failure");
            return Err(StorageError::Injected(format!(
                "failed to write mock storage: write_error = {}",
                self.write_error
            )));
        }

        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *data = blob.to_vec();
        Ok(())
    }

    async fn read(&self, cancel: &CancellationToken) -> Result<Vec<u8>> {
        check_cancelled(cancel)?;

        if self.read_error {
            tracing::warn!("Injected mock storage read failure");
            return Err(StorageError::Injected(format!(
                "failed to read mock storage: read_error = {}",
                self.read_error
            )));
        }

        Ok(self
            .data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
