//! Resolution services turning raw sources into a [`ServerConfig`].
//!
//! [`ServerConfig`]: crate::models::config::ServerConfig
pub mod assembler;
pub mod sources;
pub mod token;

use crate::domain::TypeConstraintError;

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Cli(#[from] clap::Error),
    #[error("failed to load configuration key `{key}`")]
    Source {
        key: String,
        #[source]
        source: config::ConfigError,
    },
    #[error("failed to load configuration sources")]
    Build(#[source] config::ConfigError),
    #[error("unknown configuration key `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue {
        key: String,
        value: String,
        #[source]
        source: TypeConstraintError,
    },
    #[error("invalid configuration: {0}")]
    Validation(String),
    #[error("secure random source unavailable")]
    Randomness(#[source] rand_core::Error),
    #[error("configuration has already been assembled for this process")]
    AlreadyInitialized,
}
