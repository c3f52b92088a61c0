//! Cubby - A multi-tenant personal file storage service.
//!
//! Cubby stores each user's files with per-user quotas, secrecy controls,
//! and editor/viewer sharing, exposed over a REST API.

pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{CubbyError, Result};
pub use file::{
    parse_limit, BlobStore, File, FilePage, FileRepository, FileService, FileUpdate, ListParams,
    NewFile, QuotaAccountant, Visibility,
};
pub use web::WebServer;
