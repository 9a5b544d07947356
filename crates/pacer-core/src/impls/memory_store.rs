//! InMemoryStore - 開発用・テスト用のキーバリューストア

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ports::{KeyValueStore, StoreError};

#[derive(Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, serde_json::Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every entry (for inspection).
    pub async fn snapshot(&self) -> HashMap<String, serde_json::Value> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_get_delete() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.put("k", json!({"n": 1})).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!({"n": 1})));

        store.put("k", json!(2)).await.unwrap();
        assert_eq!(store.snapshot().await.len(), 1);
        assert_eq!(store.get("k").await.unwrap(), Some(json!(2)));

        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
    }
}
