//! Web API module for Cubby.
//!
//! This module provides the REST API for file storage: uploads, downloads,
//! metadata listing and updates, and sharing through grant lists.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
