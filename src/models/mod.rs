//! Data models shared with the rest of the service.
pub mod config;
