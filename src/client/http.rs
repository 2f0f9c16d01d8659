//! HTTP client for the sentiment service
//!
//! `POST /sentiment` with `{"text": ...}` and `GET /actuator/health`.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use url::Url;

use super::SentimentApi;
use crate::config::ClientConfig;
use crate::error::{Result, SentimentError};
use crate::model::{AnalysisResult, SentimentRequest, SentimentResponse};

/// reqwest-backed [`SentimentApi`]
pub struct HttpSentimentApi {
    client: reqwest::Client,
    sentiment_url: Url,
    health_url: Url,
}

impl HttpSentimentApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SentimentError::Config {
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            sentiment_url: config.sentiment_url()?,
            health_url: config.health_url()?,
        })
    }

    pub fn sentiment_url(&self) -> &Url {
        &self.sentiment_url
    }
}

#[async_trait]
impl SentimentApi for HttpSentimentApi {
    fn name(&self) -> &str {
        "http"
    }

    async fn classify(&self, text: &str) -> Result<AnalysisResult> {
        tracing::debug!(
            url = %self.sentiment_url,
            text_len = text.chars().count(),
            "Sending classification request"
        );

        let response = self
            .client
            .post(self.sentiment_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&SentimentRequest { text })
            .send()
            .await
            .map_err(|e| SentimentError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(status = %status, "Sentiment service is warming up");
            return Err(SentimentError::TransientService);
        }
        if !status.is_success() {
            tracing::error!(status = %status, "Sentiment service error");
            return Err(SentimentError::Http {
                status: status.as_u16(),
            });
        }

        // Read the body first so a dropped connection is a network error,
        // not a malformed body
        let body = response
            .bytes()
            .await
            .map_err(|e| SentimentError::Network(e.to_string()))?;

        let parsed: SentimentResponse =
            serde_json::from_slice(&body).map_err(|e| SentimentError::MalformedResponse {
                status: status.as_u16(),
                reason: e.to_string(),
            })?;

        let result = parsed.into_result(status.as_u16())?;
        tracing::debug!(
            label = %result.label,
            probability = result.probability,
            "Classification received"
        );
        Ok(result)
    }

    async fn health(&self) -> Result<()> {
        let response = self
            .client
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(|e| SentimentError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SentimentError::Http {
                status: status.as_u16(),
            })
        }
    }
}
