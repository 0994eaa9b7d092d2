//! Cost escalation cascade: direct cost → EPC cost → total installed cost.
//!
//! Each stage takes the previous stage's total as its base, applies its own
//! percentage table, and returns both a scalar total and a `CostBreakdown`.
//! Stages are pure: no I/O, no shared state, same input gives the same
//! output bit for bit.

pub mod direct;
pub mod epc;
pub mod error;
pub mod installed;
pub mod runner;

pub use direct::DirectCostStage;
pub use epc::EpcCostStage;
pub use error::{check_input, check_total, CascadeError};
pub use installed::InstalledCostStage;
pub use runner::{run_cascade, CascadeResult, CascadeRunner};

use crate::domain::{CostBreakdown, CostCategory, CostLineItem, PercentageTable, Stage};

/// Total and ledger produced by one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome {
    pub total: f64,
    pub breakdown: CostBreakdown,
}

/// One step of the cascade.
///
/// A stage is configured once with its percentage table and can then be
/// applied to any number of base amounts.
pub trait CostStage {
    fn stage(&self) -> Stage;

    /// Name of the base amount, used in `InvalidInput` errors.
    fn base_field(&self) -> &'static str;

    /// Label of the first breakdown row.
    fn base_label(&self) -> &'static str;

    fn apply(&self, base: f64) -> Result<StageOutcome, CascadeError>;
}

/// Shared rule of the direct and EPC stages: every category is a percentage
/// of the same base, and the total is the base plus all of them.
pub(crate) fn additive_stage<C: CostCategory>(
    base_field: &'static str,
    base_label: &'static str,
    base: f64,
    percentages: &PercentageTable<C>,
) -> Result<StageOutcome, CascadeError> {
    let base = check_input(C::STAGE, base_field, base)?;

    let mut lines = Vec::with_capacity(C::ALL.len() + 2);
    lines.push(CostLineItem::base(base_label, base));

    let mut total = base;
    for (category, percent) in percentages.iter() {
        let line = CostLineItem::percent_of(category.label(), percent, base);
        total += line.amount;
        lines.push(line);
    }
    let total = check_total(C::STAGE, base, total)?;

    Ok(StageOutcome {
        total,
        breakdown: CostBreakdown::close(C::STAGE, lines, total),
    })
}
