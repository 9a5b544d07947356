use std::sync::Arc;

use async_trait::async_trait;

use super::RateGate;
use crate::ports::{Fetch, FetchError, FetchRequest, FetchResponse};

/// Wraps a network primitive so every call passes the rate gate first.
///
/// Signature and error semantics of the inner fetcher are unchanged.
pub struct ThrottledFetch {
    gate: Arc<RateGate>,
    inner: Arc<dyn Fetch>,
}

impl ThrottledFetch {
    pub fn new(gate: Arc<RateGate>, inner: Arc<dyn Fetch>) -> Self {
        Self { gate, inner }
    }
}

#[async_trait]
impl Fetch for ThrottledFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        self.gate.pass().await;
        self.inner.fetch(request).await
    }
}
