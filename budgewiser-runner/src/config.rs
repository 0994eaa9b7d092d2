//! Settings file — cascade percentages loaded from TOML or JSON.
//!
//! ```toml
//! [percentages]
//! contingency_percent = 15.0
//!
//! [percentages.direct]
//! piping = 30.0
//! # ...
//! ```
//!
//! Keys may carry the legacy `_percent` suffix. Every table is validated on
//! load; nothing missing or misspelled is ever read as zero.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use budgewiser_core::cascade::check_input;
use budgewiser_core::{
    CascadeError, CascadeRunner, ClientIndirect, ContractorIndirect, CostCategory,
    DirectCategory, PercentageTable, Stage,
};

/// Settings shipped with the tool, used when no file is given.
pub const DEFAULT_SETTINGS_TOML: &str = include_str!("../../config/settings.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid percentages: {0}")]
    Percentages(#[from] CascadeError),
}

/// Validated cascade configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub direct: PercentageTable<DirectCategory>,
    pub contractor_indirects: PercentageTable<ContractorIndirect>,
    pub client_indirects: PercentageTable<ClientIndirect>,
    pub contingency_percent: f64,
}

impl Settings {
    /// Load from disk. `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        tracing::debug!(path = %path.display(), json = is_json, "loading settings");
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawSettings = toml::from_str(content)?;
        Ok(raw.validate()?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawSettings = serde_json::from_str(content)?;
        Ok(raw.validate()?)
    }

    pub fn default_settings() -> Result<Self, ConfigError> {
        Self::from_toml_str(DEFAULT_SETTINGS_TOML)
    }

    /// Load `path` if given, otherwise the shipped defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::default_settings(),
        }
    }

    pub fn runner(&self) -> Result<CascadeRunner, CascadeError> {
        CascadeRunner::new(
            self.direct.clone(),
            self.contractor_indirects.clone(),
            self.client_indirects.clone(),
            self.contingency_percent,
        )
    }
}

// ── Raw file shape ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawSettings {
    percentages: RawPercentages,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPercentages {
    direct: RawTable,
    contractor_indirects: RawTable,
    client_indirects: RawTable,
    contingency_percent: RawCoefficient,
}

type RawTable = BTreeMap<String, RawCoefficient>;

/// A coefficient as written in the file, before it is known to be numeric.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCoefficient {
    Number(f64),
    Other(serde_json::Value),
}

impl RawSettings {
    fn validate(self) -> Result<Settings, CascadeError> {
        let p = self.percentages;
        let contingency_percent = match p.contingency_percent {
            RawCoefficient::Number(value) => {
                check_input(Stage::Installed, "contingency_percent", value)?
            }
            RawCoefficient::Other(other) => {
                return Err(CascadeError::InvalidCoefficient {
                    stage: Stage::Installed,
                    category: "contingency_percent".into(),
                    value: other.to_string(),
                })
            }
        };

        Ok(Settings {
            direct: validate_table(p.direct)?,
            contractor_indirects: validate_table(p.contractor_indirects)?,
            client_indirects: validate_table(p.client_indirects)?,
            contingency_percent,
        })
    }
}

fn validate_table<C: CostCategory>(raw: RawTable) -> Result<PercentageTable<C>, CascadeError> {
    let mut entries = Vec::with_capacity(raw.len());
    for (key, value) in raw {
        if C::from_key(&key).is_none() {
            return Err(CascadeError::UnknownCoefficient {
                stage: C::STAGE,
                key,
            });
        }
        match value {
            RawCoefficient::Number(number) => entries.push((key, number)),
            RawCoefficient::Other(other) => {
                return Err(CascadeError::InvalidCoefficient {
                    stage: C::STAGE,
                    category: key,
                    value: other.to_string(),
                })
            }
        }
    }
    PercentageTable::from_named(entries)
}
