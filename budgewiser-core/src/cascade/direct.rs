//! Direct cost stage — material cost plus field-cost percentages.

use super::{additive_stage, CascadeError, CostStage, StageOutcome};
use crate::domain::{DirectCategory, PercentageTable, Stage};

/// `total_direct_cost = material_cost + Σ material_cost * pct / 100`
#[derive(Debug, Clone, PartialEq)]
pub struct DirectCostStage {
    percentages: PercentageTable<DirectCategory>,
}

impl DirectCostStage {
    pub fn new(percentages: PercentageTable<DirectCategory>) -> Self {
        Self { percentages }
    }

    pub fn percentages(&self) -> &PercentageTable<DirectCategory> {
        &self.percentages
    }
}

impl CostStage for DirectCostStage {
    fn stage(&self) -> Stage {
        Stage::Direct
    }

    fn base_field(&self) -> &'static str {
        "material_cost"
    }

    fn base_label(&self) -> &'static str {
        "Material"
    }

    fn apply(&self, material_cost: f64) -> Result<StageOutcome, CascadeError> {
        additive_stage(
            self.base_field(),
            self.base_label(),
            material_cost,
            &self.percentages,
        )
    }
}
