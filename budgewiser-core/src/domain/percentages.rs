//! Percentage tables — the coefficient set that configures one cascade stage.
//!
//! Every stage owns a closed set of cost categories. A `PercentageTable` can
//! only be built when each category of its stage is present exactly once with
//! a finite, non-negative percentage. There is no upper bound: contingency
//! stacking above 100% is legal.

use std::fmt;
use std::marker::PhantomData;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::cascade::CascadeError;

/// Older settings files spell every key with this suffix (`piping_percent`).
pub const LEGACY_KEY_SUFFIX: &str = "_percent";

/// The three stages of the escalation cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Direct,
    Epc,
    Installed,
}

impl Stage {
    /// Label of the synthetic row that closes this stage's breakdown.
    pub fn total_label(self) -> &'static str {
        match self {
            Stage::Direct => "Total Direct Cost",
            Stage::Epc => "Total EPC Cost",
            Stage::Installed => "Total Installed Cost",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Direct => "direct cost",
            Stage::Epc => "EPC cost",
            Stage::Installed => "installed cost",
        };
        f.write_str(name)
    }
}

/// A closed, ordered set of cost categories belonging to one stage.
///
/// `ALL` fixes both the required key set and the breakdown row order.
pub trait CostCategory: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    const STAGE: Stage;
    const ALL: &'static [Self];

    /// Position of this category within `ALL`.
    fn index(self) -> usize;

    /// Configuration key, e.g. `operational_spares`.
    fn key(self) -> &'static str;

    /// Human-readable breakdown label, e.g. `Operational Spares`.
    fn label(self) -> &'static str;

    /// Resolve a configuration key. The legacy `_percent` suffix is accepted.
    fn from_key(key: &str) -> Option<Self> {
        let key = key.strip_suffix(LEGACY_KEY_SUFFIX).unwrap_or(key);
        Self::ALL.iter().copied().find(|c| c.key() == key)
    }
}

/// Field costs added on top of the material cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectCategory {
    Piping,
    Instrumentation,
    Electrical,
    Structural,
    Others,
    OperationalSpares,
    Installation,
    Construction,
    Commissioning,
}

impl CostCategory for DirectCategory {
    const STAGE: Stage = Stage::Direct;
    const ALL: &'static [Self] = &[
        DirectCategory::Piping,
        DirectCategory::Instrumentation,
        DirectCategory::Electrical,
        DirectCategory::Structural,
        DirectCategory::Others,
        DirectCategory::OperationalSpares,
        DirectCategory::Installation,
        DirectCategory::Construction,
        DirectCategory::Commissioning,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn key(self) -> &'static str {
        match self {
            DirectCategory::Piping => "piping",
            DirectCategory::Instrumentation => "instrumentation",
            DirectCategory::Electrical => "electrical",
            DirectCategory::Structural => "structural",
            DirectCategory::Others => "others",
            DirectCategory::OperationalSpares => "operational_spares",
            DirectCategory::Installation => "installation",
            DirectCategory::Construction => "construction",
            DirectCategory::Commissioning => "commissioning",
        }
    }

    fn label(self) -> &'static str {
        match self {
            DirectCategory::Piping => "Piping",
            DirectCategory::Instrumentation => "Instrumentation",
            DirectCategory::Electrical => "Electrical",
            DirectCategory::Structural => "Structural",
            DirectCategory::Others => "Others",
            DirectCategory::OperationalSpares => "Operational Spares",
            DirectCategory::Installation => "Installation",
            DirectCategory::Construction => "Construction",
            DirectCategory::Commissioning => "Commissioning",
        }
    }
}

/// Contractor-side indirects (Engineering, Procurement, Construction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractorIndirect {
    DetailedEngineering,
    Freight,
    Tpia,
    Supervision,
}

impl CostCategory for ContractorIndirect {
    const STAGE: Stage = Stage::Epc;
    const ALL: &'static [Self] = &[
        ContractorIndirect::DetailedEngineering,
        ContractorIndirect::Freight,
        ContractorIndirect::Tpia,
        ContractorIndirect::Supervision,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn key(self) -> &'static str {
        match self {
            ContractorIndirect::DetailedEngineering => "detailed_engineering",
            ContractorIndirect::Freight => "freight",
            ContractorIndirect::Tpia => "tpia",
            ContractorIndirect::Supervision => "supervision",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ContractorIndirect::DetailedEngineering => "Detailed Engineering",
            ContractorIndirect::Freight => "Freight",
            ContractorIndirect::Tpia => "TPIA",
            ContractorIndirect::Supervision => "Supervision",
        }
    }
}

/// Owner-side indirects applied to the EPC cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientIndirect {
    PrefeedFeed,
    PmcPmt,
    Insurance,
}

impl CostCategory for ClientIndirect {
    const STAGE: Stage = Stage::Installed;
    const ALL: &'static [Self] = &[
        ClientIndirect::PrefeedFeed,
        ClientIndirect::PmcPmt,
        ClientIndirect::Insurance,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn key(self) -> &'static str {
        match self {
            ClientIndirect::PrefeedFeed => "prefeed_feed",
            ClientIndirect::PmcPmt => "pmc_pmt",
            ClientIndirect::Insurance => "insurance",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ClientIndirect::PrefeedFeed => "PreFEED/FEED",
            ClientIndirect::PmcPmt => "PMC/PMT",
            ClientIndirect::Insurance => "Insurance",
        }
    }
}

/// Validated percentages for every category of one stage.
///
/// Values are stored in `C::ALL` order, so iteration order is the breakdown
/// row order.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentageTable<C: CostCategory> {
    values: Vec<f64>,
    _category: PhantomData<C>,
}

impl<C: CostCategory> PercentageTable<C> {
    /// Build a table from typed entries.
    ///
    /// Fails with `DuplicateCoefficient` if a category repeats,
    /// `InvalidCoefficient` if a value is negative or non-finite, and
    /// `MissingCoefficient` for the first category (in `C::ALL` order) that
    /// was never supplied.
    pub fn new(entries: impl IntoIterator<Item = (C, f64)>) -> Result<Self, CascadeError> {
        let mut slots: Vec<Option<f64>> = vec![None; C::ALL.len()];

        for (category, value) in entries {
            let slot = &mut slots[category.index()];
            if slot.is_some() {
                return Err(CascadeError::DuplicateCoefficient {
                    stage: C::STAGE,
                    category: category.key(),
                });
            }
            if !value.is_finite() || value < 0.0 {
                return Err(CascadeError::InvalidCoefficient {
                    stage: C::STAGE,
                    category: category.key().to_string(),
                    value: value.to_string(),
                });
            }
            *slot = Some(value);
        }

        let values = C::ALL
            .iter()
            .zip(slots)
            .map(|(category, slot)| {
                slot.ok_or(CascadeError::MissingCoefficient {
                    stage: C::STAGE,
                    category: category.key(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            values,
            _category: PhantomData,
        })
    }

    /// Build a table from configuration keys.
    ///
    /// Keys outside the stage's category set are rejected with
    /// `UnknownCoefficient` rather than ignored. Supplying both `piping` and
    /// `piping_percent` counts as a duplicate.
    pub fn from_named<K: AsRef<str>>(
        entries: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<Self, CascadeError> {
        let typed = entries
            .into_iter()
            .map(|(key, value)| {
                let key = key.as_ref();
                C::from_key(key)
                    .map(|category| (category, value))
                    .ok_or_else(|| CascadeError::UnknownCoefficient {
                        stage: C::STAGE,
                        key: key.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(typed)
    }

    /// Same percentage for every category.
    pub fn uniform(percent: f64) -> Result<Self, CascadeError> {
        Self::new(C::ALL.iter().map(|&c| (c, percent)))
    }

    pub fn stage(&self) -> Stage {
        C::STAGE
    }

    pub fn get(&self, category: C) -> f64 {
        self.values[category.index()]
    }

    /// `(category, percent)` pairs in breakdown order.
    pub fn iter(&self) -> impl Iterator<Item = (C, f64)> + '_ {
        C::ALL.iter().copied().zip(self.values.iter().copied())
    }

    /// Sum of all percentages in the table.
    pub fn total_percent(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl<C: CostCategory> Serialize for PercentageTable<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (category, value) in self.iter() {
            map.serialize_entry(category.key(), &value)?;
        }
        map.end()
    }
}
