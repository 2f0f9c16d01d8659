//! Mock client for testing
//!
//! Returns scripted outcomes without making real HTTP calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::SentimentApi;
use crate::error::{Result, SentimentError};
use crate::model::{AnalysisResult, Label};

/// Scripted outcome for one `classify` call
#[derive(Debug, Clone)]
pub enum MockReply {
    Result { label: String, probability: f64 },
    Status(u16),
    Network,
}

impl MockReply {
    fn into_result(self) -> Result<AnalysisResult> {
        match self {
            Self::Result { label, probability } => {
                Ok(AnalysisResult::new(Label::new(&label), probability))
            }
            Self::Status(429) => Err(SentimentError::TransientService),
            Self::Status(status) => Err(SentimentError::Http { status }),
            Self::Network => Err(SentimentError::Network("mock network failure".to_string())),
        }
    }
}

/// Mock service with a FIFO of replies and a request log
#[derive(Clone)]
pub struct MockApi {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    healthy: Arc<Mutex<bool>>,
    latency: Duration,
    requests: Arc<Mutex<Vec<String>>>,
    health_checks: Arc<Mutex<usize>>,
}

impl MockApi {
    /// Healthy service answering "positivo" at 0.9 when the queue is empty
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            healthy: Arc::new(Mutex::new(true)),
            latency: Duration::ZERO,
            requests: Arc::new(Mutex::new(Vec::new())),
            health_checks: Arc::new(Mutex::new(0)),
        }
    }

    /// Delay every `classify` call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn queue_reply(&self, reply: MockReply) {
        self.replies.lock().push_back(reply);
    }

    pub fn queue_result(&self, label: &str, probability: f64) {
        self.queue_reply(MockReply::Result {
            label: label.to_string(),
            probability,
        });
    }

    pub fn set_healthy(&self, healthy: bool) {
        *self.healthy.lock() = healthy;
    }

    /// Texts received by `classify`, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn health_checks(&self) -> usize {
        *self.health_checks.lock()
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SentimentApi for MockApi {
    fn name(&self) -> &str {
        "mock"
    }

    async fn classify(&self, text: &str) -> Result<AnalysisResult> {
        self.requests.lock().push(text.to_string());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let reply = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or(MockReply::Result {
                label: "positivo".to_string(),
                probability: 0.9,
            });
        reply.into_result()
    }

    async fn health(&self) -> Result<()> {
        *self.health_checks.lock() += 1;
        if *self.healthy.lock() {
            Ok(())
        } else {
            Err(SentimentError::Http { status: 503 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_reply() {
        let api = MockApi::new();
        let result = api.classify("good stuff").await.unwrap();
        assert_eq!(result.label.as_str(), "positivo");
        assert_eq!(api.requests(), vec!["good stuff".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_queued_replies() {
        let api = MockApi::new();
        api.queue_result("Negativo", 0.7);
        api.queue_reply(MockReply::Status(429));
        api.queue_reply(MockReply::Network);

        assert_eq!(
            api.classify("one").await.unwrap().label.as_str(),
            "negativo"
        );
        assert!(matches!(
            api.classify("two").await,
            Err(SentimentError::TransientService)
        ));
        assert!(matches!(
            api.classify("three").await,
            Err(SentimentError::Network(_))
        ));
        assert_eq!(api.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_mock_health_toggle() {
        let api = MockApi::new();
        assert!(api.health().await.is_ok());
        api.set_healthy(false);
        assert!(api.health().await.is_err());
        assert_eq!(api.health_checks(), 2);
    }
}
