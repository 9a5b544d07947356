//! SettingsLoader port - 永続化された設定の読み込み
//!
//! コアが使うのは `service.request.interval`（ミリ秒）だけです。

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Persisted settings as stored by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Minimum interval between outbound calls, in milliseconds.
    ///
    /// Any JSON number is accepted; fractions are rounded to the nearest ms.
    #[serde(
        rename = "service.request.interval",
        deserialize_with = "deserialize_interval_ms"
    )]
    pub request_interval_ms: u64,
}

fn deserialize_interval_ms<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() || raw < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "service.request.interval must be a non-negative number, got {raw}"
        )));
    }
    // `as` saturates at u64::MAX
    Ok(raw.round() as u64)
}

impl Settings {
    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings io ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("settings parse ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait SettingsLoader: Send + Sync {
    async fn load(&self) -> Result<Settings, SettingsError>;
}
