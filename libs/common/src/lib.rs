//! Common library for the Artisan backend
//!
//! This crate provides shared functionality used across the Artisan
//! workspace: PostgreSQL connection pooling and the database error
//! types the other crates build on.

pub mod database;
pub mod error;
