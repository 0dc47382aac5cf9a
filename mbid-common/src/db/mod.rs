//! Database initialization for the durable MBID cache

pub mod init;

pub use init::*;
