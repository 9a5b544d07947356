//! Task trait - 名前付きタスクの定義
//!
//! `Task` は実行時の振る舞い、`NamedTask` は名前と引数の型を対応付けます。
//! 引数は `assign` で渡された JSON 配列から serde でデコードされます。

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::domain::{TaskError, TaskId};
use crate::ports::{Fetch, KeyValueStore};

/// What a task gets to work with.
///
/// `fetch()` is already wrapped by the rate gate, so every call through it is
/// a checkpoint.
pub struct TaskContext {
    task_id: TaskId,
    fetch: Arc<dyn Fetch>,
    store: Arc<dyn KeyValueStore>,
}

impl TaskContext {
    pub fn new(task_id: TaskId, fetch: Arc<dyn Fetch>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            task_id,
            fetch,
            store,
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn fetch(&self) -> &dyn Fetch {
        self.fetch.as_ref()
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}

/// A runnable task instance produced by the task factory.
#[async_trait]
pub trait Task: Send + Sync {
    async fn run(&self, ctx: &TaskContext) -> Result<(), TaskError>;
}

/// A task type addressable by name.
///
/// # 使用例
/// ```ignore
/// #[derive(Deserialize)]
/// struct Crawl {
///     urls: Vec<String>,
/// }
///
/// impl NamedTask for Crawl {
///     const NAME: &'static str = "crawl";
/// }
/// ```
///
/// `assign("crawl", [["https://a", "https://b"]])` then decodes the args
/// array into `Crawl`.
pub trait NamedTask: Task + DeserializeOwned + 'static {
    const NAME: &'static str;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::ports::FetchRequest;
    use serde::Deserialize;

    /// Fetches each url and stores the bodies under `key`.
    #[derive(Debug, Deserialize)]
    pub struct FetchAll {
        pub key: String,
        pub urls: Vec<String>,
    }

    #[async_trait]
    impl Task for FetchAll {
        async fn run(&self, ctx: &TaskContext) -> Result<(), TaskError> {
            let mut bodies = Vec::with_capacity(self.urls.len());
            for url in &self.urls {
                let response = ctx.fetch().fetch(FetchRequest::get(url.clone())).await?;
                bodies.push(response.body);
            }
            ctx.store()
                .put(&self.key, serde_json::to_value(bodies)?)
                .await?;
            Ok(())
        }
    }

    impl NamedTask for FetchAll {
        const NAME: &'static str = "test.fetch_all";
    }

    #[derive(Debug, Deserialize)]
    pub struct Fail {
        pub message: String,
    }

    #[async_trait]
    impl Task for Fail {
        async fn run(&self, _ctx: &TaskContext) -> Result<(), TaskError> {
            Err(TaskError::other(self.message.clone()))
        }
    }

    impl NamedTask for Fail {
        const NAME: &'static str = "test.fail";
    }
}
