//! Queue library for the Artisan backend
//!
//! Style-transfer work is dispatched over SQS: each worker pool consumes
//! its own queue, selected by the routing key stored on the style. This
//! crate provides the producer used to dispatch jobs and the consumer the
//! backend runs against the completion queue.

pub mod config;
pub mod consumer;
pub mod producer;

pub use config::QueueConfig;
pub use consumer::JobConsumer;
pub use producer::JobProducer;
