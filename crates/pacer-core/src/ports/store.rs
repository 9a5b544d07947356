//! KeyValueStore port - タスク結果の永続化先
//!
//! コアは中身を見ずにタスクへ渡すだけです。

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend: {0}")]
    Backend(String),
}

/// Opaque key-value handle passed through to tasks unmodified.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    async fn put(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;

    /// Returns whether the key existed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
}
