use super::{Config, LocalConfig, MockConfig, Result, Storage};
use serde::{Deserialize, Serialize};

/// A storage block as it appears in the host tool's configuration, tagged by
/// backend name.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    Local(LocalConfig),
    Mock(MockConfig),
}

impl StorageConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Mock(_) => "mock",
        }
    }
}

impl Config for StorageConfig {
    fn new_storage(&self) -> Result<Box<dyn Storage>> {
        tracing::debug!("Creating {} history storage", self.kind());
        match self {
            Self::Local(config) => config.new_storage(),
            Self::Mock(config) => config.new_storage(),
        }
    }
}

impl From<LocalConfig> for StorageConfig {
    fn from(config: LocalConfig) -> Self {
        Self::Local(config)
    }
}

impl From<MockConfig> for StorageConfig {
    fn from(config: MockConfig) -> Self {
        Self::Mock(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn decodes_local_block() {
        let config: StorageConfig =
            serde_json::from_str(r#"{"type": "local", "path": "tmp/history.json"}"#).unwrap();
        assert_eq!(
            config,
            StorageConfig::Local(LocalConfig {
                path: PathBuf::from("tmp/history.json"),
            })
        );
    }

    #[test]
    fn decodes_mock_block_with_defaults() {
        let config: StorageConfig = serde_json::from_str(r#"{"type": "mock"}"#).unwrap();
        assert_eq!(config, StorageConfig::Mock(MockConfig::default()));

        let config: StorageConfig = serde_json::from_str(
            r#"{"type": "mock", "data": "foo", "write_error": true, "read_error": false}"#,
        )
        .unwrap();
        assert_eq!(
            config,
            StorageConfig::Mock(MockConfig {
                data: "foo".to_string(),
                write_error: true,
                read_error: false,
            })
        );
    }

    #[test]
    fn rejects_bad_blocks() {
        assert!(serde_json::from_str::<StorageConfig>(r#"{"type": "s3"}"#).is_err());
        assert!(serde_json::from_str::<StorageConfig>(r#"{"type": "local"}"#).is_err());
        assert!(
            serde_json::from_str::<StorageConfig>(r#"{"type": "mock", "date": "typo"}"#).is_err()
        );
    }

    #[tokio::test]
    async fn dispatches_to_backend() {
        let config = StorageConfig::from(MockConfig {
            data: "seed".to_string(),
            ..Default::default()
        });
        assert_eq!(config.kind(), "mock");

        let storage = config.new_storage().unwrap();
        assert_eq!(
            storage.read(&CancellationToken::new()).await.unwrap(),
            b"seed"
        );
    }
}
