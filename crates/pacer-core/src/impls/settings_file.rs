//! Settings loaders: a JSON file on disk, or a fixed value.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::ports::{Settings, SettingsError, SettingsLoader};

/// Reads `{"service.request.interval": <ms>}` from a JSON file.
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsLoader for JsonFileSettings {
    async fn load(&self) -> Result<Settings, SettingsError> {
        let path = self.path.display().to_string();
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SettingsError::Io {
                path: path.clone(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|source| SettingsError::Parse { path, source })
    }
}

pub struct StaticSettings(pub Settings);

#[async_trait]
impl SettingsLoader for StaticSettings {
    async fn load(&self) -> Result<Settings, SettingsError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pacer-{}-{name}", ulid::Ulid::new()))
    }

    #[tokio::test]
    async fn reads_request_interval() {
        let path = temp_path("settings.json");
        tokio::fs::write(&path, r#"{"service.request.interval": 750, "other": true}"#)
            .await
            .unwrap();

        let settings = JsonFileSettings::new(&path).load().await.unwrap();
        assert_eq!(settings.request_interval(), Duration::from_millis(750));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn accepts_fractional_interval() {
        let path = temp_path("float.json");
        tokio::fs::write(&path, r#"{"service.request.interval": 1500.0}"#)
            .await
            .unwrap();

        let settings = JsonFileSettings::new(&path).load().await.unwrap();
        assert_eq!(settings.request_interval_ms, 1500);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn negative_interval_is_parse_error() {
        let path = temp_path("negative.json");
        tokio::fs::write(&path, r#"{"service.request.interval": -5}"#)
            .await
            .unwrap();

        let err = JsonFileSettings::new(&path).load().await.unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = JsonFileSettings::new(temp_path("absent.json"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[tokio::test]
    async fn missing_key_is_parse_error() {
        let path = temp_path("empty.json");
        tokio::fs::write(&path, "{}").await.unwrap();

        let err = JsonFileSettings::new(&path).load().await.unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
