//! Postgres repositories for Honkytonk Hub.

pub mod db;

pub use db::*;
