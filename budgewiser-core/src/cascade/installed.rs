//! Installed cost stage — client indirects, then contingency on the subtotal.
//!
//! Unlike the other stages this is not a plain sum of percentages of one
//! base. Contingency is taken on `epc_cost + client_indirect_cost`:
//!
//! ```text
//! client_indirect_cost = Σ epc_cost * pct_i / 100
//! contingency_cost     = (epc_cost + client_indirect_cost) * contingency / 100
//! total_installed_cost = epc_cost + client_indirect_cost + contingency_cost
//! ```

use super::{check_input, check_total, CascadeError, CostStage, StageOutcome};
use crate::domain::{ClientIndirect, CostBreakdown, CostCategory, CostLineItem, PercentageTable, Stage};

pub const CONTINGENCY_LABEL: &str = "Contingency";

#[derive(Debug, Clone, PartialEq)]
pub struct InstalledCostStage {
    client_indirects: PercentageTable<ClientIndirect>,
    contingency_percent: f64,
}

impl InstalledCostStage {
    /// Fails with `InvalidInput` when `contingency_percent` is negative or
    /// non-finite.
    pub fn new(
        client_indirects: PercentageTable<ClientIndirect>,
        contingency_percent: f64,
    ) -> Result<Self, CascadeError> {
        let contingency_percent =
            check_input(Stage::Installed, "contingency_percent", contingency_percent)?;
        Ok(Self {
            client_indirects,
            contingency_percent,
        })
    }

    pub fn client_indirects(&self) -> &PercentageTable<ClientIndirect> {
        &self.client_indirects
    }

    pub fn contingency_percent(&self) -> f64 {
        self.contingency_percent
    }
}

impl CostStage for InstalledCostStage {
    fn stage(&self) -> Stage {
        Stage::Installed
    }

    fn base_field(&self) -> &'static str {
        "epc_cost"
    }

    fn base_label(&self) -> &'static str {
        "EPC Cost"
    }

    fn apply(&self, epc_cost: f64) -> Result<StageOutcome, CascadeError> {
        let epc_cost = check_input(Stage::Installed, self.base_field(), epc_cost)?;

        let mut lines = Vec::with_capacity(ClientIndirect::ALL.len() + 3);
        lines.push(CostLineItem::base(self.base_label(), epc_cost));

        let mut client_indirect_cost = 0.0;
        for (category, percent) in self.client_indirects.iter() {
            let line = CostLineItem::percent_of(category.label(), percent, epc_cost);
            client_indirect_cost += line.amount;
            lines.push(line);
        }

        let subtotal = epc_cost + client_indirect_cost;
        let contingency =
            CostLineItem::percent_of(CONTINGENCY_LABEL, self.contingency_percent, subtotal);
        let total = check_total(
            Stage::Installed,
            epc_cost,
            epc_cost + client_indirect_cost + contingency.amount,
        )?;
        lines.push(contingency);

        Ok(StageOutcome {
            total,
            breakdown: CostBreakdown::close(Stage::Installed, lines, total),
        })
    }
}
