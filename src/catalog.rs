//! Registry of every recognised configuration key.
use crate::domain::theme::Theme;
use crate::domain::{DbType, ServiceMode};
use crate::{
    DEFAULT_DB_FILE, DEFAULT_PAGE_SIZE, DEFAULT_SERVICE_ADDR, DEFAULT_SERVICE_PORT,
    INIT_BASKET_CAPACITY, MAX_BASKET_CAPACITY,
};

pub const KEY_PORT: &str = "port";
pub const KEY_LISTENER: &str = "listener";
pub const KEY_SIZE: &str = "size";
pub const KEY_MAXSIZE: &str = "maxsize";
pub const KEY_PAGE: &str = "page";
pub const KEY_TOKEN: &str = "token";
pub const KEY_DB_TYPE: &str = "db-type";
pub const KEY_FILE: &str = "file";
pub const KEY_CONN: &str = "conn";
pub const KEY_PREFIX: &str = "prefix";
pub const KEY_MODE: &str = "mode";
pub const KEY_THEME: &str = "theme";
pub const KEY_BASKET: &str = "basket";

/// Value used when no dynamic source supplies a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefaultValue {
    Int(i64),
    Str(&'static str),
    /// Repeatable option; defaults to an empty sequence.
    List,
}

impl DefaultValue {
    pub fn to_value(&self) -> config::Value {
        match self {
            DefaultValue::Int(v) => config::Value::from(*v),
            DefaultValue::Str(v) => config::Value::from(*v),
            DefaultValue::List => config::Value::from(Vec::<String>::new()),
        }
    }
}

/// Metadata for a single key. Holds no resolved value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionSpec {
    pub key: &'static str,
    pub default: DefaultValue,
    pub description: String,
}

impl OptionSpec {
    pub fn new(key: &'static str, default: DefaultValue, description: impl Into<String>) -> Self {
        Self {
            key,
            default,
            description: description.into(),
        }
    }

    pub fn is_repeatable(&self) -> bool {
        matches!(self.default, DefaultValue::List)
    }

    /// Environment variable bound to this key: upper-case, `-` becomes `_`.
    pub fn env_var(&self) -> String {
        env_var_name(self.key)
    }
}

pub fn env_var_name(key: &str) -> String {
    key.to_ascii_uppercase().replace('-', "_")
}

/// Caller-constructed set of recognised keys, in registration order.
#[derive(Clone, Debug, Default)]
pub struct OptionCatalog {
    specs: Vec<OptionSpec>,
}

impl OptionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a key. Re-registering a key replaces its earlier entry in place.
    pub fn register(mut self, spec: OptionSpec) -> Self {
        match self.specs.iter_mut().find(|s| s.key == spec.key) {
            Some(existing) => *existing = spec,
            None => self.specs.push(spec),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionSpec> {
        self.specs.iter()
    }

    /// The keys understood by the service.
    pub fn standard() -> Self {
        Self::new()
            .register(OptionSpec::new(
                KEY_PORT,
                DefaultValue::Int(DEFAULT_SERVICE_PORT),
                "HTTP service port",
            ))
            .register(OptionSpec::new(
                KEY_LISTENER,
                DefaultValue::Str(DEFAULT_SERVICE_ADDR),
                "HTTP listen address",
            ))
            .register(OptionSpec::new(
                KEY_SIZE,
                DefaultValue::Int(INIT_BASKET_CAPACITY),
                "Initial basket size (capacity)",
            ))
            .register(OptionSpec::new(
                KEY_MAXSIZE,
                DefaultValue::Int(MAX_BASKET_CAPACITY),
                "Maximum allowed basket size (max capacity)",
            ))
            .register(OptionSpec::new(
                KEY_PAGE,
                DefaultValue::Int(DEFAULT_PAGE_SIZE),
                "Default page size",
            ))
            .register(OptionSpec::new(
                KEY_TOKEN,
                DefaultValue::Str(""),
                "Master token, random token is generated if not provided",
            ))
            .register(OptionSpec::new(
                KEY_DB_TYPE,
                DefaultValue::Str(DbType::Memory.as_str()),
                format!(
                    "Baskets storage type: \"{}\" - in-memory, \"{}\" - Bolt DB, \"{}\" - SQL database",
                    DbType::Memory,
                    DbType::Bolt,
                    DbType::Sql
                ),
            ))
            .register(OptionSpec::new(
                KEY_FILE,
                DefaultValue::Str(DEFAULT_DB_FILE),
                "Database location, only applicable for file or SQL databases",
            ))
            .register(OptionSpec::new(
                KEY_CONN,
                DefaultValue::Str(""),
                "Database connection string for SQL databases, if undefined \"file\" argument is considered",
            ))
            .register(OptionSpec::new(
                KEY_PREFIX,
                DefaultValue::Str(""),
                "Service URL path prefix",
            ))
            .register(OptionSpec::new(
                KEY_MODE,
                DefaultValue::Str(ServiceMode::Public.as_str()),
                format!(
                    "Service mode: \"{}\" - any visitor can create a new basket, \"{}\" - baskets creation requires master token",
                    ServiceMode::Public,
                    ServiceMode::Restricted
                ),
            ))
            .register(OptionSpec::new(
                KEY_THEME,
                DefaultValue::Str(Theme::Standard.as_str()),
                format!(
                    "CSS theme for web UI, supported values: {}, {}, {}",
                    Theme::Standard,
                    Theme::Adaptive,
                    Theme::Flatly
                ),
            ))
            .register(OptionSpec::new(
                KEY_BASKET,
                DefaultValue::List,
                "Name of a basket to auto-create during service startup (can be specified multiple times)",
            ))
    }
}
