//! # MBID Common Library
//!
//! Shared code for the MBID resolver workspace:
//! - Error type and result alias
//! - TOML configuration, root folder resolution and environment detection
//! - SQLite initialization for the durable cache

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;

pub use error::{Error, Result};
