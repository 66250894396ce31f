//! Message transport between the ingestion and enrichment services
//!
//! A transport message is the UTF-8 JSON encoding of one [`CanonicalPost`].
//! Two deliveries are supported: an in-process channel ([`ChannelPublisher`])
//! and push-subscription envelopes ([`PushEnvelope`]) carrying the payload as
//! base64, as used by the HTTP push publisher.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::models::CanonicalPost;
use crate::{Error, Result};

/// Encode a post as a transport payload
pub fn encode_post(post: &CanonicalPost) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(post)?)
}

/// Decode a transport payload into a post
pub fn decode_post(data: &[u8]) -> Result<CanonicalPost> {
    let text = std::str::from_utf8(data)
        .map_err(|e| Error::Decode(format!("Payload is not UTF-8: {}", e)))?;
    Ok(serde_json::from_str(text)?)
}

/// One published message
#[derive(Debug, Clone, PartialEq)]
pub struct TransportMessage {
    pub message_id: String,
    pub data: Vec<u8>,
    pub publish_time: String,
}

impl TransportMessage {
    /// Wrap a post in a freshly identified message
    pub fn from_post(post: &CanonicalPost) -> Result<Self> {
        Ok(Self {
            message_id: Uuid::new_v4().to_string(),
            data: encode_post(post)?,
            publish_time: crate::time::now_iso8601(),
        })
    }

    pub fn decode_post(&self) -> Result<CanonicalPost> {
        decode_post(&self.data)
    }
}

/// Sink for canonical posts leaving the ingestion pipeline
#[async_trait]
pub trait PostPublisher: Send + Sync {
    /// Publish one post, returning the transport message id
    async fn publish(&self, post: &CanonicalPost) -> Result<String>;
}

/// In-process transport backed by a bounded tokio channel
#[derive(Clone)]
pub struct ChannelPublisher {
    tx: mpsc::Sender<TransportMessage>,
}

impl ChannelPublisher {
    /// Create a publisher and the receiver that consumes its messages
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<TransportMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl PostPublisher for ChannelPublisher {
    async fn publish(&self, post: &CanonicalPost) -> Result<String> {
        let message = TransportMessage::from_post(post)?;
        let message_id = message.message_id.clone();

        self.tx
            .send(message)
            .await
            .map_err(|_| Error::Transport("Channel receiver dropped".to_string()))?;

        Ok(message_id)
    }
}

/// Push-subscription request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEnvelope {
    pub message: PushMessage,
    #[serde(default)]
    pub subscription: String,
}

/// Message part of a push envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Base64-encoded transport payload
    pub data: String,
    #[serde(rename = "messageId", alias = "message_id", default)]
    pub message_id: String,
    #[serde(rename = "publishTime", alias = "publish_time", default)]
    pub publish_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<HashMap<String, String>>,
}

impl PushEnvelope {
    pub fn wrap(message: &TransportMessage, subscription: impl Into<String>) -> Self {
        Self {
            message: PushMessage {
                data: STANDARD.encode(&message.data),
                message_id: message.message_id.clone(),
                publish_time: message.publish_time.clone(),
                attributes: None,
            },
            subscription: subscription.into(),
        }
    }

    /// Raw payload bytes
    pub fn payload(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.message.data.as_bytes())
            .map_err(|e| Error::Decode(format!("Invalid base64 payload: {}", e)))
    }

    pub fn decode_post(&self) -> Result<CanonicalPost> {
        decode_post(&self.payload()?)
    }
}
