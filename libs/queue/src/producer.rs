//! Job producer
//!
//! Publishes JSON payloads onto worker pool queues. The routing key is the
//! bare queue name; the full queue URL is the configured base with the name
//! appended. Publishing is a single attempt, there is no retry or buffering.

use anyhow::Result;
use aws_sdk_sqs::Client;
use serde::Serialize;
use tracing::info;

use crate::config::QueueConfig;

/// Producer for dispatching jobs onto worker pool queues
#[derive(Clone)]
pub struct JobProducer {
    client: Client,
    base_url: String,
}

impl JobProducer {
    pub fn new(client: Client, config: &QueueConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full queue URL for a routing key
    pub fn queue_url(&self, routing_key: &str) -> String {
        format!("{}/{}", self.base_url, routing_key)
    }

    /// Publish one payload on the queue named by `routing_key`
    pub async fn publish<T: Serialize>(&self, routing_key: &str, payload: &T) -> Result<()> {
        let body = serde_json::to_string(payload)?;
        let queue_url = self.queue_url(routing_key);

        self.client
            .send_message()
            .queue_url(&queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to publish to queue {}: {}", routing_key, e))?;

        info!("Published job to queue {}", routing_key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn producer(base_url: &str) -> JobProducer {
        let config = aws_sdk_sqs::Config::builder()
            .behavior_version(aws_sdk_sqs::config::BehaviorVersion::latest())
            .build();
        JobProducer::new(
            Client::from_conf(config),
            &QueueConfig {
                base_url: base_url.to_string(),
                completion_queue: "transfer-finish".to_string(),
            },
        )
    }

    #[test]
    fn test_queue_url_appends_routing_key() {
        let producer = producer("http://localhost:4566/000000000000");
        assert_eq!(
            producer.queue_url("style-candy"),
            "http://localhost:4566/000000000000/style-candy"
        );
    }

    #[test]
    fn test_queue_url_tolerates_trailing_slash() {
        let producer = producer("http://localhost:4566/000000000000/");
        assert_eq!(
            producer.queue_url("style-candy"),
            "http://localhost:4566/000000000000/style-candy"
        );
    }
}
