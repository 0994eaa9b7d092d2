//! Domain types for BudgeWiser

pub mod breakdown;
pub mod percentages;

pub use breakdown::{CostBreakdown, CostLineItem};
pub use percentages::{
    ClientIndirect, ContractorIndirect, CostCategory, DirectCategory, PercentageTable, Stage,
    LEGACY_KEY_SUFFIX,
};
