//! One-shot assembly of the [`ServerConfig`].
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use rand_core::OsRng;
use validator::Validate;

use crate::catalog::{
    KEY_BASKET, KEY_CONN, KEY_DB_TYPE, KEY_FILE, KEY_LISTENER, KEY_MAXSIZE, KEY_MODE, KEY_PAGE,
    KEY_PORT, KEY_PREFIX, KEY_SIZE, KEY_THEME, KEY_TOKEN, OptionCatalog,
};
use crate::cli::FlagValues;
use crate::domain::theme::Theme;
use crate::domain::{BasketName, DbType, PathPrefix, ServiceMode, TypeConstraintError};
use crate::models::config::{ServerConfig, ServerConfigParts};
use crate::services::sources::{EnvSnapshot, LayeredSources};
use crate::services::token::provision_token;
use crate::services::{ConfigError, ConfigResult};

/// Set once the process command line has been handed to an assembler.
static PROCESS_ARGS_TAKEN: AtomicBool = AtomicBool::new(false);

/// Inputs for a single configuration build. Consumed by [`assemble`].
///
/// [`assemble`]: ConfigAssembler::assemble
#[derive(Debug)]
pub struct ConfigAssembler {
    catalog: OptionCatalog,
    args: Vec<OsString>,
    env: EnvSnapshot,
    config_dir: PathBuf,
}

impl ConfigAssembler {
    pub fn new<I, T>(catalog: OptionCatalog, args: I, env: EnvSnapshot, config_dir: PathBuf) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self {
            catalog,
            args: args.into_iter().map(Into::into).collect(),
            env,
            config_dir,
        }
    }

    /// Assembler over the real command line, environment and working
    /// directory. Only the first call per process succeeds.
    pub fn from_process() -> ConfigResult<Self> {
        if PROCESS_ARGS_TAKEN.swap(true, Ordering::SeqCst) {
            return Err(ConfigError::AlreadyInitialized);
        }
        Ok(Self::new(
            OptionCatalog::standard(),
            env::args_os(),
            EnvSnapshot::from_process(),
            PathBuf::from("."),
        ))
    }

    pub fn assemble(self) -> ConfigResult<ServerConfig> {
        let flags = FlagValues::parse_from(&self.catalog, self.args)?;
        let sources = LayeredSources::bind(&self.catalog, &self.config_dir, &self.env, &flags)?;
        if let Some(path) = sources.config_file() {
            log::info!("Loaded configuration file {}", path.display());
        }

        let db_type: DbType = parse_value(&sources, KEY_DB_TYPE)?;
        let db_connection = sources.resolve_string(KEY_CONN)?;
        if db_type != DbType::Sql && !db_connection.is_empty() {
            log::warn!("Ignoring `{KEY_CONN}`: only used with `{KEY_DB_TYPE}` sql, got {db_type}");
        }

        let baskets = sources
            .resolve_list(KEY_BASKET)?
            .into_iter()
            .map(|name| {
                BasketName::try_new(name.clone()).map_err(|source| invalid(KEY_BASKET, name, source))
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        let master_token = provision_token(sources.resolve_string(KEY_TOKEN)?, &mut OsRng)?;

        let config = ServerConfig::from_parts(ServerConfigParts {
            server_port: sources.resolve_int(KEY_PORT)?,
            server_addr: sources.resolve_string(KEY_LISTENER)?,
            init_capacity: sources.resolve_int(KEY_SIZE)?,
            max_capacity: sources.resolve_int(KEY_MAXSIZE)?,
            page_size: sources.resolve_int(KEY_PAGE)?,
            master_token,
            db_type,
            db_file: sources.resolve_string(KEY_FILE)?,
            db_connection,
            baskets,
            path_prefix: PathPrefix::normalize(&sources.resolve_string(KEY_PREFIX)?),
            mode: parse_value::<ServiceMode>(&sources, KEY_MODE)?,
            theme: parse_value::<Theme>(&sources, KEY_THEME)?,
        });

        config
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        Ok(config)
    }
}

fn parse_value<T>(sources: &LayeredSources, key: &str) -> ConfigResult<T>
where
    T: std::str::FromStr<Err = TypeConstraintError>,
{
    let raw = sources.resolve_string(key)?;
    raw.parse().map_err(|source| invalid(key, raw, source))
}

fn invalid(key: &str, value: String, source: TypeConstraintError) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value,
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::tempdir;

    use super::*;
    use crate::domain::StorageTarget;
    use crate::services::token::TOKEN_LENGTH;
    use crate::{
        DEFAULT_DB_FILE, DEFAULT_PAGE_SIZE, DEFAULT_SERVICE_ADDR, INIT_BASKET_CAPACITY,
        MAX_BASKET_CAPACITY, SERVICE_NAME,
    };

    fn assemble(dir: &Path, env: EnvSnapshot, args: &[&str]) -> ConfigResult<ServerConfig> {
        let argv = std::iter::once(SERVICE_NAME).chain(args.iter().copied());
        ConfigAssembler::new(OptionCatalog::standard(), argv, env, dir.to_path_buf()).assemble()
    }

    #[test]
    fn flags_without_file_or_environment() {
        let dir = tempdir().unwrap();
        let config = assemble(
            dir.path(),
            EnvSnapshot::default(),
            &["--port=8080", "--db-type=memory", "--basket=x", "--basket=y"],
        )
        .unwrap();

        assert_eq!(config.server_port(), 8080);
        assert_eq!(config.db_type(), DbType::Memory);
        let baskets: Vec<&str> = config.baskets().iter().map(BasketName::as_str).collect();
        assert_eq!(baskets, ["x", "y"]);
        assert_eq!(config.master_token().as_str().len(), TOKEN_LENGTH);
        assert_eq!(config.path_prefix().as_str(), "");
    }

    #[test]
    fn defaults_fill_everything() {
        let dir = tempdir().unwrap();
        let config = assemble(dir.path(), EnvSnapshot::default(), &[]).unwrap();

        assert_eq!(config.server_addr(), DEFAULT_SERVICE_ADDR);
        assert_eq!(config.init_capacity() as i64, INIT_BASKET_CAPACITY);
        assert_eq!(config.max_capacity() as i64, MAX_BASKET_CAPACITY);
        assert_eq!(config.page_size() as i64, DEFAULT_PAGE_SIZE);
        assert_eq!(config.db_file(), DEFAULT_DB_FILE);
        assert_eq!(config.db_connection(), "");
        assert_eq!(config.mode(), ServiceMode::Public);
        assert_eq!(config.theme(), Theme::Standard);
        assert_eq!(config.theme_css(), Theme::Standard.css());
        assert!(config.baskets().is_empty());
    }

    #[test]
    fn explicit_token_is_used_verbatim() {
        let dir = tempdir().unwrap();
        let config = assemble(dir.path(), EnvSnapshot::default(), &["--token=abc123"]).unwrap();

        assert_eq!(config.master_token().as_str(), "abc123");
    }

    #[test]
    fn empty_token_flag_generates_one() {
        let dir = tempdir().unwrap();
        let env = EnvSnapshot::from_pairs([("TOKEN", "from-env")]);
        let config = assemble(dir.path(), env, &["--token="]).unwrap();

        assert_ne!(config.master_token().as_str(), "from-env");
        assert_eq!(config.master_token().as_str().len(), TOKEN_LENGTH);
    }

    #[test]
    fn valueless_file_keys_fall_through() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.yaml"), "token:\nprefix:\nconn:\n").unwrap();

        let config = assemble(dir.path(), EnvSnapshot::default(), &[]).unwrap();

        assert_eq!(config.master_token().as_str().len(), TOKEN_LENGTH);
        assert_eq!(config.path_prefix().as_str(), "");
        assert_eq!(config.db_connection(), "");
    }

    #[test]
    fn extensionless_config_file_is_used() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config"), "port: 1111\n").unwrap();

        let config = assemble(dir.path(), EnvSnapshot::default(), &[]).unwrap();

        assert_eq!(config.server_port(), 1111);
    }

    #[test]
    fn layers_combine_per_key() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "port: 1000\nlistener: 0.0.0.0\nprefix: hooks\ntheme: flatly\n",
        )
        .unwrap();
        let env = EnvSnapshot::from_pairs([("PORT", "2000"), ("MODE", "restricted")]);

        let config = assemble(dir.path(), env, &["--theme", "adaptive"]).unwrap();

        assert_eq!(config.server_port(), 2000);
        assert_eq!(config.server_addr(), "0.0.0.0");
        assert_eq!(config.path_prefix().as_str(), "/hooks");
        assert_eq!(config.mode(), ServiceMode::Restricted);
        assert_eq!(config.theme(), Theme::Adaptive);
        assert_eq!(config.listen_addr(), "0.0.0.0:2000");
    }

    #[test]
    fn sql_without_connection_uses_file() {
        let dir = tempdir().unwrap();
        let config = assemble(
            dir.path(),
            EnvSnapshot::default(),
            &["--db-type", "sql", "--file", "/var/lib/baskets.sqlite"],
        )
        .unwrap();

        assert_eq!(
            config.storage(),
            StorageTarget::Sql {
                connection: "/var/lib/baskets.sqlite"
            }
        );
    }

    #[test]
    fn connection_is_kept_but_unused_for_bolt() {
        let dir = tempdir().unwrap();
        let config = assemble(
            dir.path(),
            EnvSnapshot::default(),
            &["--db-type=bolt", "--conn=postgres://db/baskets"],
        )
        .unwrap();

        assert_eq!(config.db_connection(), "postgres://db/baskets");
        assert_eq!(
            config.storage(),
            StorageTarget::Bolt {
                file: DEFAULT_DB_FILE
            }
        );
    }

    #[test]
    fn unknown_theme_aborts() {
        let dir = tempdir().unwrap();
        let err = assemble(dir.path(), EnvSnapshot::default(), &["--theme=darkly"]).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                source: TypeConstraintError::UnknownTheme,
                ..
            }
        ));
    }

    #[test]
    fn unknown_db_type_from_environment_aborts() {
        let dir = tempdir().unwrap();
        let env = EnvSnapshot::from_pairs([("DB_TYPE", "mongo")]);
        let err = assemble(dir.path(), env, &[]).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                source: TypeConstraintError::UnknownDbType,
                ..
            }
        ));
    }

    #[test]
    fn unknown_mode_from_file_aborts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("config.yaml"), "mode: open\n").unwrap();
        let err = assemble(dir.path(), EnvSnapshot::default(), &[]).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                source: TypeConstraintError::UnknownMode,
                ..
            }
        ));
    }

    #[test]
    fn invalid_basket_name_aborts() {
        let dir = tempdir().unwrap();
        let err = assemble(
            dir.path(),
            EnvSnapshot::default(),
            &["--basket", "ok", "--basket", "not/ok"],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                source: TypeConstraintError::InvalidBasketName,
                ..
            }
        ));
    }

    #[test]
    fn capacity_invariant_is_enforced() {
        let dir = tempdir().unwrap();
        let err = assemble(
            dir.path(),
            EnvSnapshot::default(),
            &["--size=300", "--maxsize=100"],
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn zero_port_is_rejected() {
        let dir = tempdir().unwrap();
        let err = assemble(dir.path(), EnvSnapshot::default(), &["--port=0"]).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn malformed_flags_abort() {
        let dir = tempdir().unwrap();
        let err = assemble(dir.path(), EnvSnapshot::default(), &["--port"]).unwrap_err();

        assert!(matches!(err, ConfigError::Cli(_)));
    }

    #[test]
    fn process_assembler_is_created_once() {
        let _first = ConfigAssembler::from_process();
        let second = ConfigAssembler::from_process();

        assert!(matches!(second, Err(ConfigError::AlreadyInitialized)));
    }
}
