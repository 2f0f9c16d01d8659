//! # Service Client
//!
//! Trait and implementations for talking to the sentiment service.
//!
//! - [`SentimentApi`] - classification + liveness calls
//! - [`HttpSentimentApi`] - production client over reqwest
//! - [`MockApi`] - scripted client for tests and offline demos
//!
//! Both calls collapse transport failures into [`SentimentError`](crate::error::SentimentError)
//! variants; callers never see a raw `reqwest::Error`.

mod http;
mod mock;

pub use http::HttpSentimentApi;
pub use mock::{MockApi, MockReply};

use async_trait::async_trait;

use crate::error::Result;
use crate::model::AnalysisResult;

/// Remote sentiment service
#[async_trait]
pub trait SentimentApi: Send + Sync {
    /// Short name for logs ("http", "mock")
    fn name(&self) -> &str;

    /// Classify an already validated, trimmed text
    async fn classify(&self, text: &str) -> Result<AnalysisResult>;

    /// Liveness check; `Ok` only on a 2xx answer
    async fn health(&self) -> Result<()>;
}
