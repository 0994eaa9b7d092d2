//! EPC cost stage — direct cost plus contractor indirects.

use super::{additive_stage, CascadeError, CostStage, StageOutcome};
use crate::domain::{ContractorIndirect, PercentageTable, Stage};

#[derive(Debug, Clone, PartialEq)]
pub struct EpcCostStage {
    contractor_indirects: PercentageTable<ContractorIndirect>,
}

impl EpcCostStage {
    pub fn new(contractor_indirects: PercentageTable<ContractorIndirect>) -> Self {
        Self {
            contractor_indirects,
        }
    }

    pub fn contractor_indirects(&self) -> &PercentageTable<ContractorIndirect> {
        &self.contractor_indirects
    }
}

impl CostStage for EpcCostStage {
    fn stage(&self) -> Stage {
        Stage::Epc
    }

    fn base_field(&self) -> &'static str {
        "direct_cost"
    }

    fn base_label(&self) -> &'static str {
        "Direct Cost"
    }

    fn apply(&self, direct_cost: f64) -> Result<StageOutcome, CascadeError> {
        additive_stage(
            self.base_field(),
            self.base_label(),
            direct_cost,
            &self.contractor_indirects,
        )
    }
}
