use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const BUILTIN_CLICKER_CATALOG: &str = include_str!("../../assets/clicker_upgrades.json");

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    EmptyTable {
        table: String,
    },
    LengthMismatch {
        table: String,
        values: usize,
        costs: usize,
    },
    MissingTable {
        catalog: String,
        table: String,
    },
    NegativeEntry {
        table: String,
        list: &'static str,
        level: usize,
        value: i64,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::EmptyTable { table } => write!(f, "upgrade table `{table}` is empty"),
            Self::LengthMismatch {
                table,
                values,
                costs,
            } => write!(
                f,
                "upgrade table `{table}` has {values} values but {costs} costs"
            ),
            Self::MissingTable { catalog, table } => {
                write!(f, "catalog `{catalog}` has no table `{table}`")
            }
            Self::NegativeEntry {
                table,
                list,
                level,
                value,
            } => write!(
                f,
                "upgrade table `{table}` has negative {list} {value} at level {level}"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::EmptyTable { .. }
            | Self::LengthMismatch { .. }
            | Self::MissingTable { .. }
            | Self::NegativeEntry { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Level-indexed upgrade values and their purchase costs.
///
/// Both lists are non-negative once validated.
///
/// `values[level]` is the effect at `level`; `costs[level]` is the price of
/// reaching `level`, so `costs[0]` is never charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeTable {
    pub values: Vec<i64>,
    pub costs: Vec<i64>,
}

impl UpgradeTable {
    pub fn validate(&self, table: &str) -> ConfigResult<()> {
        if self.values.is_empty() || self.costs.is_empty() {
            return Err(ConfigError::EmptyTable {
                table: table.to_string(),
            });
        }
        if self.values.len() != self.costs.len() {
            return Err(ConfigError::LengthMismatch {
                table: table.to_string(),
                values: self.values.len(),
                costs: self.costs.len(),
            });
        }
        for (list, entries) in [("value", &self.values), ("cost", &self.costs)] {
            if let Some((level, value)) = entries
                .iter()
                .copied()
                .enumerate()
                .find(|(_, value)| *value < 0)
            {
                return Err(ConfigError::NegativeEntry {
                    table: table.to_string(),
                    list,
                    level,
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn value_at(&self, level: i64) -> Option<i64> {
        index(level).and_then(|i| self.values.get(i).copied())
    }

    pub fn cost_at(&self, level: i64) -> Option<i64> {
        index(level).and_then(|i| self.costs.get(i).copied())
    }

    /// Cost of going from `level` to `level + 1`; `None` at max level.
    pub fn next_cost(&self, level: i64) -> Option<i64> {
        self.cost_at(level.checked_add(1)?)
    }

    pub fn max_level(&self) -> i64 {
        i64::try_from(self.values.len()).map_or(i64::MAX, |len| len - 1)
    }

    pub fn is_max_level(&self, level: i64) -> bool {
        level >= self.max_level()
    }
}

fn index(level: i64) -> Option<usize> {
    usize::try_from(level).ok()
}

/// Named set of upgrade tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeCatalog {
    pub name: String,
    pub tables: BTreeMap<String, UpgradeTable>,
}

impl UpgradeCatalog {
    /// Parses and validates a catalog document.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        info!(
            "event=config_load module=config status=ok catalog={} tables={} path={}",
            catalog.name,
            catalog.tables.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Catalog bundled for the clicker sample.
    pub fn builtin_clicker() -> ConfigResult<Self> {
        Self::from_json_str(BUILTIN_CLICKER_CATALOG)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.tables
            .iter()
            .try_for_each(|(name, table)| table.validate(name))
    }

    pub fn table(&self, name: &str) -> Option<&UpgradeTable> {
        self.tables.get(name)
    }

    pub fn require(&self, name: &str) -> ConfigResult<&UpgradeTable> {
        self.table(name).ok_or_else(|| ConfigError::MissingTable {
            catalog: self.name.clone(),
            table: name.to_string(),
        })
    }
}
