//! Route handlers. Public reads first, then the admin surface.

pub mod admin_channels;
pub mod admin_sync;
pub mod channels;
pub mod charts;
pub mod news;
pub mod sync;
pub mod top30;
pub mod videos;
