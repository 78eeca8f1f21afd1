pub mod config;
pub mod local;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub use config::StorageConfig;
pub use local::{LocalConfig, LocalStorage};
pub use mock::{MockConfig, MockStorage};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Injected(String),
    #[error("Storage operation cancelled.")]
    Cancelled,
    #[error("Invalid storage config. {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Read/write access to the migration history blob.
///
/// A store that has never been written reads as an empty blob.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Replaces the whole stored blob.
    async fn write(&self, cancel: &CancellationToken, blob: &[u8]) -> Result<()>;
    async fn read(&self, cancel: &CancellationToken) -> Result<Vec<u8>>;
}

/// Builds a [`Storage`] from backend-specific settings without touching it.
pub trait Config {
    fn new_storage(&self) -> Result<Box<dyn Storage>>;
}

fn check_cancelled(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(StorageError::Cancelled);
    }
    Ok(())
}
