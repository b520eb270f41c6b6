//! Background consumer for the transfer completion queue
//!
//! Workers that cannot reach the HTTP callback endpoints report
//! completions through a queue instead; both paths feed the same
//! coordinator.

use std::time::Duration;

use queue::JobConsumer;
use tokio::time::sleep;
use tracing::{error, info};

use crate::models::media::MediaType;
use crate::models::transfer::TransferCompletion;
use crate::transfer::TransferCoordinator;

const RECEIVE_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Long-polls the completion queue and feeds each message to the coordinator
pub struct CompletionConsumer {
    consumer: JobConsumer,
    coordinator: TransferCoordinator,
}

impl CompletionConsumer {
    pub fn new(consumer: JobConsumer, coordinator: TransferCoordinator) -> Self {
        Self {
            consumer,
            coordinator,
        }
    }

    /// Run the consume loop forever
    pub async fn run(self) {
        info!("Starting completion queue consumer");

        loop {
            let messages = match self.consumer.receive().await {
                Ok(messages) => messages,
                Err(e) => {
                    error!("Failed to receive from completion queue: {}", e);
                    sleep(RECEIVE_RETRY_DELAY).await;
                    continue;
                }
            };

            for message in messages {
                // Acknowledgment happens before handling, so a failed
                // completion is never redelivered.
                if let Err(e) = self.consumer.acknowledge(&message).await {
                    error!("Failed to acknowledge completion message: {}", e);
                }

                let body = message.body().unwrap_or_default();
                let completion: TransferCompletion = match serde_json::from_str(body) {
                    Ok(completion) => completion,
                    Err(e) => {
                        error!("Discarding malformed completion message: {}", e);
                        continue;
                    }
                };

                let media_type = completion.media_type.unwrap_or(MediaType::Video);
                if let Err(e) = self.coordinator.complete(&completion, media_type).await {
                    error!("Failed to handle transfer completion: {}", e);
                }
            }
        }
    }
}
