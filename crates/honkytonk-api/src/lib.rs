// Library exports for integration tests and the binary

pub mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod seo;
pub mod setup;
pub mod state;
