//! Command-line flags generated from the option catalog.
//!
//! Only flags that actually appear on the command line are recorded, so lower
//! priority sources stay visible for everything else.
use std::fmt;

use clap::{Arg, ArgAction, ArgMatches, Command, crate_version};

use crate::SERVICE_NAME;
use crate::catalog::{DefaultValue, OptionCatalog, OptionSpec};
use crate::services::ConfigResult;

/// Ordered values of a repeatable flag, one per occurrence.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RepeatedValues(Vec<String>);

impl RepeatedValues {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RepeatedValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// Appends every occurrence in the order given. No deduplication.
pub fn accumulate<I, S>(occurrences: I) -> RepeatedValues
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    RepeatedValues(occurrences.into_iter().map(Into::into).collect())
}

/// Builds the `clap` command for every key in the catalog.
pub fn command(catalog: &OptionCatalog) -> Command {
    catalog.iter().fold(
        Command::new(SERVICE_NAME)
            .version(crate_version!())
            .about("Collects and inspects HTTP requests stored in baskets")
            .args_override_self(true),
        |cmd, spec| cmd.arg(flag_for(spec)),
    )
}

fn flag_for(spec: &OptionSpec) -> Arg {
    let help = match &spec.default {
        DefaultValue::Int(v) => format!("{} [default: {v}]", spec.description),
        DefaultValue::Str(v) if !v.is_empty() => format!("{} [default: {v}]", spec.description),
        _ => spec.description.clone(),
    };
    let action = if spec.is_repeatable() {
        ArgAction::Append
    } else {
        ArgAction::Set
    };

    Arg::new(spec.key).long(spec.key).help(help).action(action)
}

/// Flags present on the command line, keyed by catalog key.
#[derive(Clone, Debug, Default)]
pub struct FlagValues {
    single: Vec<(&'static str, String)>,
    repeated: Vec<(&'static str, RepeatedValues)>,
}

impl FlagValues {
    /// Parses `args` (binary name first) against the catalog.
    pub fn parse_from<I, T>(catalog: &OptionCatalog, args: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = command(catalog).try_get_matches_from(args)?;
        Ok(Self::from_matches(catalog, &matches))
    }

    fn from_matches(catalog: &OptionCatalog, matches: &ArgMatches) -> Self {
        let mut flags = Self::default();
        for spec in catalog.iter() {
            if spec.is_repeatable() {
                if let Some(values) = matches.get_many::<String>(spec.key) {
                    flags.repeated.push((spec.key, accumulate(values.cloned())));
                }
            } else if let Some(value) = matches.get_one::<String>(spec.key) {
                flags.single.push((spec.key, value.clone()));
            }
        }
        flags
    }

    pub fn singles(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.single.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn repeats(&self) -> impl Iterator<Item = (&'static str, &RepeatedValues)> {
        self.repeated.iter().map(|(k, v)| (*k, v))
    }

    pub fn is_empty(&self) -> bool {
        self.single.is_empty() && self.repeated.is_empty()
    }
}
