//! Fetch port - 外部ネットワーク呼び出しの抽象化
//!
//! タスクはこの trait を通してだけ外部へ通信します。
//! コアは `gate::ThrottledFetch` で包むだけで、シグネチャもエラーの意味も変えません。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request options, shaped after the usual fetch `init` argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInit {
    #[serde(default = "RequestInit::default_method")]
    pub method: String,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestInit {
    fn default_method() -> String {
        "GET".to_string()
    }

    pub fn get() -> Self {
        Self::default()
    }
}

impl Default for RequestInit {
    fn default() -> Self {
        Self {
            method: Self::default_method(),
            headers: Vec::new(),
            body: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub input: String,
    #[serde(default)]
    pub init: RequestInit,
}

impl FetchRequest {
    pub fn get(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            init: RequestInit::get(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub status: u16,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {input} failed: {message}")]
    Transport { input: String, message: String },

    #[error("request to {input} returned status={status}")]
    Status { input: String, status: u16 },
}

/// The network primitive handed to tasks.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError>;
}
