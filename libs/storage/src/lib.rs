//! Object storage library for the Artisan backend
//!
//! This crate wraps the S3 client used to store user photos, style assets
//! and model snapshots. It owns the naming scheme for uploaded objects and
//! the derivation of public CDN URLs from stored locations.

pub mod client;
pub mod config;
pub mod key;

pub use client::ObjectStorage;
pub use config::StorageConfig;
pub use key::{object_key, KeyScope};
