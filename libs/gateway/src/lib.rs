//! Socket gateway for the Artisan backend
//!
//! Clients that kick off long-running work (uploads, style transfers) open a
//! WebSocket and register it under a correlation token. When the work
//! finishes, the backend pushes a named event to whichever connection holds
//! that token. Nothing is awaited from the client and nothing is buffered
//! for clients that are gone.

pub mod registry;
pub mod socket;

pub use registry::{ClientEvent, SocketRegistry, TRANSFER_COMPLETED, UPLOAD_IMAGE_SUCCESS};
pub use socket::handle_socket;
