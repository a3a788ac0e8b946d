//! NATS publisher for valuation replies

use anyhow::Result;
use async_nats::{Client, Subject};
use tracing::debug;

/// Publishes replies to the reply subject of each request
#[derive(Clone)]
pub struct ReplyPublisher {
    client: Client,
}

impl ReplyPublisher {
    /// Create a new reply publisher
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Publish an encoded reply
    pub async fn reply(&self, subject: Subject, payload: Vec<u8>) -> Result<()> {
        let len = payload.len();
        self.client.publish(subject.clone(), payload.into()).await?;

        debug!(subject = %subject, bytes = len, "Published valuation reply");
        Ok(())
    }
}
