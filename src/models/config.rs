//! Resolved service configuration.
use std::borrow::Cow;

use validator::{Validate, ValidationError};

use crate::domain::theme::{Theme, ThemeCss};
use crate::domain::{BasketName, DbType, MasterToken, PathPrefix, ServiceMode, StorageTarget};

/// Configuration shared read-only by every part of the service.
///
/// Only [`ConfigAssembler`](crate::services::assembler::ConfigAssembler)
/// builds one; there are no setters.
#[derive(Clone, Debug, Validate)]
#[validate(schema(function = "validate_capacity"))]
pub struct ServerConfig {
    #[validate(range(min = 1))]
    server_port: u16,
    #[validate(length(min = 1))]
    server_addr: String,
    #[validate(range(min = 1))]
    init_capacity: usize,
    #[validate(range(min = 1))]
    max_capacity: usize,
    #[validate(range(min = 1))]
    page_size: usize,
    master_token: MasterToken,
    db_type: DbType,
    db_file: String,
    db_connection: String,
    baskets: Vec<BasketName>,
    path_prefix: PathPrefix,
    mode: ServiceMode,
    theme: Theme,
    theme_css: ThemeCss,
}

fn validate_capacity(config: &ServerConfig) -> Result<(), ValidationError> {
    if config.max_capacity < config.init_capacity {
        return Err(ValidationError::new("capacity").with_message(Cow::Owned(format!(
            "maxsize {} is smaller than size {}",
            config.max_capacity, config.init_capacity
        ))));
    }
    Ok(())
}

/// Field values handed over by the assembler.
pub(crate) struct ServerConfigParts {
    pub server_port: u16,
    pub server_addr: String,
    pub init_capacity: usize,
    pub max_capacity: usize,
    pub page_size: usize,
    pub master_token: MasterToken,
    pub db_type: DbType,
    pub db_file: String,
    pub db_connection: String,
    pub baskets: Vec<BasketName>,
    pub path_prefix: PathPrefix,
    pub mode: ServiceMode,
    pub theme: Theme,
}

impl ServerConfig {
    /// Builds the configuration, deriving the theme stylesheet from the theme.
    pub(crate) fn from_parts(parts: ServerConfigParts) -> Self {
        Self {
            server_port: parts.server_port,
            server_addr: parts.server_addr,
            init_capacity: parts.init_capacity,
            max_capacity: parts.max_capacity,
            page_size: parts.page_size,
            master_token: parts.master_token,
            db_type: parts.db_type,
            db_file: parts.db_file,
            db_connection: parts.db_connection,
            baskets: parts.baskets,
            path_prefix: parts.path_prefix,
            mode: parts.mode,
            theme: parts.theme,
            theme_css: parts.theme.css(),
        }
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }

    /// `listener:port`, ready to bind.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }

    pub fn init_capacity(&self) -> usize {
        self.init_capacity
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn master_token(&self) -> &MasterToken {
        &self.master_token
    }

    pub fn db_type(&self) -> DbType {
        self.db_type
    }

    pub fn db_file(&self) -> &str {
        &self.db_file
    }

    pub fn db_connection(&self) -> &str {
        &self.db_connection
    }

    pub fn storage(&self) -> StorageTarget<'_> {
        StorageTarget::new(self.db_type, &self.db_file, &self.db_connection)
    }

    /// Baskets to create at startup, in the order they were given.
    pub fn baskets(&self) -> &[BasketName] {
        &self.baskets
    }

    pub fn path_prefix(&self) -> &PathPrefix {
        &self.path_prefix
    }

    pub fn mode(&self) -> ServiceMode {
        self.mode
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn theme_css(&self) -> ThemeCss {
        self.theme_css
    }
}
