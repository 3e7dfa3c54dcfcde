//! Priority-ordered lookup across defaults, config file, environment and flags.
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat, Map, Source, Value};
use serde::de::DeserializeOwned;

use crate::CONFIG_FILE_NAME;
use crate::catalog::OptionCatalog;
use crate::cli::FlagValues;
use crate::services::{ConfigError, ConfigResult};

const CONFIG_FILE_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Copy of the environment variables visible to the resolver.
#[derive(Clone, Debug, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the current process environment, skipping non-UTF-8 entries.
    pub fn from_process() -> Self {
        let vars = env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Empty values count as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Environment values already mapped onto catalog keys.
#[derive(Clone, Debug)]
struct EnvLayer {
    values: Vec<(&'static str, String)>,
}

impl EnvLayer {
    fn bind(catalog: &OptionCatalog, env: &EnvSnapshot) -> Self {
        let values = catalog
            .iter()
            .filter_map(|spec| {
                env.get(&spec.env_var())
                    .map(|value| (spec.key, value.to_string()))
            })
            .collect();
        Self { values }
    }
}

impl Source for EnvLayer {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
        let origin = String::from("the environment");
        Ok(self
            .values
            .iter()
            .map(|(key, value)| (key.to_string(), Value::new(Some(&origin), value.as_str())))
            .collect())
    }
}

/// Returns `config.yaml`, `config.yml` or an extensionless `config` from
/// `dir`, whichever exists first. All are read as YAML.
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    let stem = dir.join(CONFIG_FILE_NAME);
    CONFIG_FILE_EXTENSIONS
        .iter()
        .map(|ext| stem.with_extension(ext))
        .chain(std::iter::once(stem.clone()))
        .find(|path| path.is_file())
}

/// All sources merged; flags > environment > config file > catalog default.
#[derive(Debug)]
pub struct LayeredSources {
    catalog: OptionCatalog,
    merged: Config,
    config_file: Option<PathBuf>,
}

impl LayeredSources {
    /// Merges every layer for the keys in `catalog`. The config file is looked
    /// up in `config_dir`; its absence is not an error, a corrupt one is.
    pub fn bind(
        catalog: &OptionCatalog,
        config_dir: &Path,
        env: &EnvSnapshot,
        flags: &FlagValues,
    ) -> ConfigResult<Self> {
        let mut builder = Config::builder();

        for spec in catalog.iter() {
            builder = builder
                .set_default(spec.key, spec.default.to_value())
                .map_err(ConfigError::Build)?;
        }

        let config_file = find_config_file(config_dir);
        match &config_file {
            Some(path) => {
                let path_str = path.to_string_lossy().into_owned();
                builder = builder.add_source(File::new(&path_str, FileFormat::Yaml).required(true));
            }
            None => log::debug!(
                "No {CONFIG_FILE_NAME} file found in {}, using environment and defaults",
                config_dir.display()
            ),
        }

        builder = builder.add_source(EnvLayer::bind(catalog, env));

        for (key, value) in flags.singles() {
            builder = builder
                .set_override(key, value)
                .map_err(ConfigError::Build)?;
        }
        for (key, values) in flags.repeats() {
            builder = builder
                .set_override(key, values.as_slice().to_vec())
                .map_err(ConfigError::Build)?;
        }

        let merged = builder.build().map_err(ConfigError::Build)?;

        Ok(Self {
            catalog: catalog.clone(),
            merged,
            config_file,
        })
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    fn ensure_known(&self, key: &str) -> ConfigResult<()> {
        if self.catalog.contains(key) {
            Ok(())
        } else {
            Err(ConfigError::UnknownKey(key.to_string()))
        }
    }

    /// Value of `key` from the highest-priority layer that supplies it.
    pub fn resolve<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<T> {
        self.ensure_known(key)?;
        self.merged
            .get::<T>(key)
            .map_err(|source| ConfigError::Source {
                key: key.to_string(),
                source,
            })
    }

    /// A key present in the file without a value (`token:`) reads as `""`.
    pub fn resolve_string(&self, key: &str) -> ConfigResult<String> {
        Ok(self.resolve::<Option<String>>(key)?.unwrap_or_default())
    }

    /// Resolves an integer and narrows it to the target type.
    pub fn resolve_int<T: TryFrom<i64>>(&self, key: &str) -> ConfigResult<T> {
        let value: i64 = self.resolve(key)?;
        T::try_from(value).map_err(|_| {
            ConfigError::Validation(format!("`{key}` value {value} is out of range"))
        })
    }

    /// A list may come from flags or YAML as a sequence, or from the
    /// environment or YAML as a comma-separated string.
    pub fn resolve_list(&self, key: &str) -> ConfigResult<Vec<String>> {
        self.ensure_known(key)?;
        match self.merged.get::<Vec<String>>(key) {
            Ok(values) => Ok(values),
            Err(_) => Ok(split_list(&self.resolve_string(key)?)),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
