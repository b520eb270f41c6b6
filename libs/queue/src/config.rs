//! Queue configuration

use std::env;

/// Queue configuration struct
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Base URL queue names are appended to
    pub base_url: String,
    /// Name of the queue carrying transfer completion messages
    pub completion_queue: String,
}

impl QueueConfig {
    /// Create a new QueueConfig from environment variables
    ///
    /// # Environment Variables
    /// - `QUEUE_BASE_URL`: Queue base URL (default: local emulator account)
    /// - `QUEUE_COMPLETION_QUEUE`: Completion queue name (default: transfer-finish)
    pub fn from_env() -> Self {
        let base_url = env::var("QUEUE_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:4566/000000000000".to_string());

        let completion_queue =
            env::var("QUEUE_COMPLETION_QUEUE").unwrap_or_else(|_| "transfer-finish".to_string());

        Self {
            base_url,
            completion_queue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_queue_config_defaults() {
        unsafe {
            std::env::remove_var("QUEUE_BASE_URL");
            std::env::remove_var("QUEUE_COMPLETION_QUEUE");
        }

        let config = QueueConfig::from_env();
        assert_eq!(config.base_url, "http://localhost:4566/000000000000");
        assert_eq!(config.completion_queue, "transfer-finish");
    }
}
