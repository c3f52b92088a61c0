//! Middleware for the Web API.

pub mod auth;
pub mod cors;

pub use auth::{RequesterId, USER_ID_HEADER};
pub use cors::create_cors_layer;
