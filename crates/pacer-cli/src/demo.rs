//! デモ用のタスクとネットワーク実装

use async_trait::async_trait;
use pacer_core::domain::TaskError;
use pacer_core::ports::{Fetch, FetchError, FetchRequest, FetchResponse};
use pacer_core::typed::{NamedTask, Task, TaskContext};
use serde::Deserialize;
use serde_json::json;
use tokio::time::{Duration, sleep};
use tracing::info;

/// `{"op":"assign","name":"hello","args":["pacer"]}`
#[derive(Debug, Deserialize)]
pub struct Hello {
    name: String,
}

#[async_trait]
impl Task for Hello {
    async fn run(&self, ctx: &TaskContext) -> Result<(), TaskError> {
        info!(task_id = %ctx.task_id(), "Hello, {}!", self.name);
        Ok(())
    }
}

impl NamedTask for Hello {
    const NAME: &'static str = "hello";
}

/// `{"op":"assign","name":"crawl","args":["key",["https://a","https://b"]]}`
///
/// Fetches every url through the rate gate and stores the bodies under `key`.
#[derive(Debug, Deserialize)]
pub struct Crawl {
    key: String,
    urls: Vec<String>,
}

#[async_trait]
impl Task for Crawl {
    async fn run(&self, ctx: &TaskContext) -> Result<(), TaskError> {
        let mut pages = Vec::with_capacity(self.urls.len());
        for url in &self.urls {
            let response = ctx.fetch().fetch(FetchRequest::get(url.clone())).await?;
            if !response.is_success() {
                return Err(FetchError::Status {
                    input: url.clone(),
                    status: response.status,
                }
                .into());
            }
            pages.push(json!({ "url": url, "body": response.body }));
        }
        ctx.store().put(&self.key, json!(pages)).await?;
        Ok(())
    }
}

impl NamedTask for Crawl {
    const NAME: &'static str = "crawl";
}

/// Pretends to talk to the network: answers after a short delay.
pub struct SimulatedFetch {
    latency: Duration,
}

impl SimulatedFetch {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl Fetch for SimulatedFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        sleep(self.latency).await;
        if request.input.is_empty() {
            return Err(FetchError::Transport {
                input: request.input,
                message: "empty url".to_string(),
            });
        }
        info!(method = %request.init.method, input = %request.input, "fetched");
        Ok(FetchResponse::ok(format!("<html>{}</html>", request.input)))
    }
}
