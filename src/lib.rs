//! Startup configuration for the request-baskets capture service.
//!
//! The resolved [`models::config::ServerConfig`] is built once by
//! [`services::assembler::ConfigAssembler`] from compiled-in defaults, an
//! optional `config.yaml`, environment variables and command-line flags.
pub mod catalog;
pub mod cli;
pub mod domain;
pub mod models;
pub mod services;

pub const SERVICE_NAME: &str = "request-baskets";
pub const SERVICE_API_PATH: &str = "api";
pub const SERVICE_UI_PATH: &str = "web";

pub const DEFAULT_SERVICE_PORT: i64 = 55555;
pub const DEFAULT_SERVICE_ADDR: &str = "127.0.0.1";
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const INIT_BASKET_CAPACITY: i64 = 200;
pub const MAX_BASKET_CAPACITY: i64 = 2000;
pub const DEFAULT_DB_FILE: &str = "./baskets.db";

/// Longest basket name accepted for auto-creation.
pub const MAX_BASKET_NAME_LEN: usize = 250;

/// Base name of the optional config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "config";
