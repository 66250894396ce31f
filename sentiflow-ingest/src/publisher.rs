//! HTTP push publisher
//!
//! Delivers each post to the enrichment service as a push-subscription
//! envelope. A non-2xx answer is a transport error for that row.

use async_trait::async_trait;
use reqwest::Client;
use sentiflow_common::models::CanonicalPost;
use sentiflow_common::transport::{PostPublisher, PushEnvelope, TransportMessage};
use sentiflow_common::{Error, Result};
use std::time::Duration;

/// Publishes posts by POSTing push envelopes to a fixed endpoint
#[derive(Debug, Clone)]
pub struct HttpPushPublisher {
    client: Client,
    push_url: String,
    subscription: String,
}

impl HttpPushPublisher {
    pub fn new(push_url: impl Into<String>, topic: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            push_url: push_url.into(),
            subscription: format!("{}-push", topic),
        })
    }

    pub fn push_url(&self) -> &str {
        &self.push_url
    }
}

#[async_trait]
impl PostPublisher for HttpPushPublisher {
    async fn publish(&self, post: &CanonicalPost) -> Result<String> {
        let message = TransportMessage::from_post(post)?;
        let envelope = PushEnvelope::wrap(&message, self.subscription.as_str());

        let response = self
            .client
            .post(&self.push_url)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Push to {} failed: {}", self.push_url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!(
                "Push to {} rejected with status {}",
                self.push_url, status
            )));
        }

        Ok(message.message_id)
    }
}
