//! Completion queue consumer
//!
//! Long-polls the completion queue in batches. Callers must acknowledge a
//! message before handling it: the broker delete happens regardless of what
//! the handler later does with the body.

use anyhow::Result;
use aws_sdk_sqs::types::Message;
use aws_sdk_sqs::Client;

use crate::config::QueueConfig;

const WAIT_TIME_SECONDS: i32 = 20;
const MAX_MESSAGES: i32 = 10;

/// Consumer for the transfer completion queue
#[derive(Clone)]
pub struct JobConsumer {
    client: Client,
    queue_url: String,
}

impl JobConsumer {
    pub fn new(client: Client, config: &QueueConfig) -> Self {
        let queue_url = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            config.completion_queue
        );

        Self { client, queue_url }
    }

    /// Receive the next batch of messages, long-polling up to 20 seconds
    pub async fn receive(&self) -> Result<Vec<Message>> {
        let response = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .wait_time_seconds(WAIT_TIME_SECONDS)
            .max_number_of_messages(MAX_MESSAGES)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to receive from completion queue: {}", e))?;

        Ok(response.messages.unwrap_or_default())
    }

    /// Delete a message from the queue so it is never redelivered
    pub async fn acknowledge(&self, message: &Message) -> Result<()> {
        let Some(receipt_handle) = message.receipt_handle() else {
            return Ok(());
        };

        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to acknowledge message: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumer_targets_completion_queue() {
        let config = aws_sdk_sqs::Config::builder()
            .behavior_version(aws_sdk_sqs::config::BehaviorVersion::latest())
            .build();
        let consumer = JobConsumer::new(
            Client::from_conf(config),
            &QueueConfig {
                base_url: "http://localhost:4566/000000000000".to_string(),
                completion_queue: "transfer-finish".to_string(),
            },
        );

        assert_eq!(
            consumer.queue_url,
            "http://localhost:4566/000000000000/transfer-finish"
        );
    }
}
