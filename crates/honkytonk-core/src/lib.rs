//! Honkytonk Hub core types
//!
//! Configuration, the shared error type and the domain models used by every other crate.

pub mod config;
pub mod error;
pub mod models;

pub use config::{parse_list, Config, HubConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::*;
