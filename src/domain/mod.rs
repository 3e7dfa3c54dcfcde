//! Strongly-typed values carried by the resolved configuration.
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::MAX_BASKET_NAME_LEN;

pub mod theme;

/// Storage backend holding the baskets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DbType {
    Memory,
    /// Embedded file-backed store.
    Bolt,
    Sql,
}

impl DbType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbType::Memory => "memory",
            DbType::Bolt => "bolt",
            DbType::Sql => "sql",
        }
    }
}

impl FromStr for DbType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" | "mem" => Ok(DbType::Memory),
            "bolt" => Ok(DbType::Bolt),
            "sql" => Ok(DbType::Sql),
            _ => Err(TypeConstraintError::UnknownDbType),
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who may create baskets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ServiceMode {
    Public,
    /// Basket creation requires the master token.
    Restricted,
}

impl ServiceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceMode::Public => "public",
            ServiceMode::Restricted => "restricted",
        }
    }

    pub fn requires_token_for_create(&self) -> bool {
        matches!(self, ServiceMode::Restricted)
    }
}

impl FromStr for ServiceMode {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(ServiceMode::Public),
            "restricted" => Ok(ServiceMode::Restricted),
            _ => Err(TypeConstraintError::UnknownMode),
        }
    }
}

impl fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URL path prefix, either empty or starting with a single `/`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct PathPrefix(String);

impl PathPrefix {
    /// Prepends `/` to a non-empty prefix that lacks one. Nothing else is touched.
    pub fn normalize(raw: &str) -> Self {
        if !raw.is_empty() && !raw.starts_with('/') {
            Self(format!("/{raw}"))
        } else {
            Self(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins a route segment below the prefix, e.g. `/prefix/api`.
    pub fn join(&self, segment: &str) -> String {
        format!("{}/{}", self.0, segment.trim_start_matches('/'))
    }
}

impl fmt::Display for PathPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a basket to auto-create: 1..=250 chars of `[A-Za-z0-9_.-]`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct BasketName(String);

impl BasketName {
    pub fn try_new(value: String) -> Result<Self, TypeConstraintError> {
        let valid_chars = value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if value.is_empty() || value.len() > MAX_BASKET_NAME_LEN || !valid_chars {
            return Err(TypeConstraintError::InvalidBasketName);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BasketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Administrative secret. Never empty.
#[derive(Clone, Eq, PartialEq)]
pub struct MasterToken(String);

impl MasterToken {
    pub fn try_new(value: String) -> Result<Self, TypeConstraintError> {
        if value.is_empty() {
            return Err(TypeConstraintError::EmptyToken);
        }
        Ok(Self(value))
    }

    /// Wraps a freshly generated token, which is never empty.
    pub(crate) fn generated(value: String) -> Self {
        debug_assert!(!value.is_empty());
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MasterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterToken(***)")
    }
}

/// Where baskets are persisted, with the `conn` -> `file` fallback applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StorageTarget<'a> {
    Memory,
    Bolt { file: &'a str },
    Sql { connection: &'a str },
}

impl<'a> StorageTarget<'a> {
    pub fn new(db_type: DbType, file: &'a str, connection: &'a str) -> Self {
        match db_type {
            DbType::Memory => StorageTarget::Memory,
            DbType::Bolt => StorageTarget::Bolt { file },
            DbType::Sql if connection.is_empty() => StorageTarget::Sql { connection: file },
            DbType::Sql => StorageTarget::Sql { connection },
        }
    }
}

impl fmt::Display for StorageTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageTarget::Memory => f.write_str("memory"),
            StorageTarget::Bolt { file } => write!(f, "bolt ({file})"),
            StorageTarget::Sql { .. } => f.write_str("sql"),
        }
    }
}


#[derive(Debug, Error)]
pub enum TypeConstraintError {
    #[error("unknown storage type, expected one of: memory, bolt, sql")]
    UnknownDbType,
    #[error("unknown service mode, expected one of: public, restricted")]
    UnknownMode,
    #[error("unknown theme, expected one of: standard, adaptive, flatly")]
    UnknownTheme,
    #[error("invalid basket name")]
    InvalidBasketName,
    #[error("empty master token")]
    EmptyToken,
}
