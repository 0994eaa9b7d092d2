//! Cascade runner — threads each stage's total into the next.

use serde::Serialize;

use super::{CascadeError, CostStage, DirectCostStage, EpcCostStage, InstalledCostStage};
use crate::domain::{
    ClientIndirect, ContractorIndirect, CostBreakdown, DirectCategory, PercentageTable,
};

/// Totals and ledgers of one cascade run. Owned by the caller; never mutated
/// by the cascade after it is returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeResult {
    pub direct_cost: f64,
    pub epc_cost: f64,
    pub total_installed_cost: f64,
    pub direct: CostBreakdown,
    pub epc: CostBreakdown,
    pub installed: CostBreakdown,
}

impl CascadeResult {
    /// The three ledgers in cascade order.
    pub fn breakdowns(&self) -> [&CostBreakdown; 3] {
        [&self.direct, &self.epc, &self.installed]
    }
}

/// The three stages, configured and ready to run.
///
/// All configuration is validated when the runner is built, so `run` can only
/// fail on the material cost itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeRunner {
    direct: DirectCostStage,
    epc: EpcCostStage,
    installed: InstalledCostStage,
}

impl CascadeRunner {
    pub fn new(
        direct_percentages: PercentageTable<DirectCategory>,
        contractor_indirects: PercentageTable<ContractorIndirect>,
        client_indirects: PercentageTable<ClientIndirect>,
        contingency_percent: f64,
    ) -> Result<Self, CascadeError> {
        Ok(Self::from_stages(
            DirectCostStage::new(direct_percentages),
            EpcCostStage::new(contractor_indirects),
            InstalledCostStage::new(client_indirects, contingency_percent)?,
        ))
    }

    pub fn from_stages(
        direct: DirectCostStage,
        epc: EpcCostStage,
        installed: InstalledCostStage,
    ) -> Self {
        Self {
            direct,
            epc,
            installed,
        }
    }

    pub fn direct_stage(&self) -> &DirectCostStage {
        &self.direct
    }

    pub fn epc_stage(&self) -> &EpcCostStage {
        &self.epc
    }

    pub fn installed_stage(&self) -> &InstalledCostStage {
        &self.installed
    }

    /// Run direct → EPC → installed in strict sequence.
    ///
    /// Stops at the first failing stage; no breakdown is produced on error.
    pub fn run(&self, material_cost: f64) -> Result<CascadeResult, CascadeError> {
        let direct = self.direct.apply(material_cost)?;
        let epc = self.epc.apply(direct.total)?;
        let installed = self.installed.apply(epc.total)?;

        Ok(CascadeResult {
            direct_cost: direct.total,
            epc_cost: epc.total,
            total_installed_cost: installed.total,
            direct: direct.breakdown,
            epc: epc.breakdown,
            installed: installed.breakdown,
        })
    }
}

/// One-shot convenience over `CascadeRunner`.
pub fn run_cascade(
    material_cost: f64,
    direct_percentages: &PercentageTable<DirectCategory>,
    contractor_indirects: &PercentageTable<ContractorIndirect>,
    client_indirects: &PercentageTable<ClientIndirect>,
    contingency_percent: f64,
) -> Result<CascadeResult, CascadeError> {
    CascadeRunner::new(
        direct_percentages.clone(),
        contractor_indirects.clone(),
        client_indirects.clone(),
        contingency_percent,
    )?
    .run(material_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Stage;

    fn runner() -> CascadeRunner {
        CascadeRunner::new(
            PercentageTable::uniform(10.0).unwrap(),
            PercentageTable::uniform(5.0).unwrap(),
            PercentageTable::uniform(2.0).unwrap(),
            10.0,
        )
        .unwrap()
    }

    #[test]
    fn threads_totals_between_stages() {
        let result = runner().run(1000.0).unwrap();
        assert!((result.direct_cost - 1900.0).abs() < 1e-9);
        assert!((result.epc_cost - 2280.0).abs() < 1e-9);
        assert!((result.total_installed_cost - 2658.48).abs() < 1e-9);

        assert_eq!(result.epc.base().amount, result.direct_cost);
        assert_eq!(result.installed.base().amount, result.epc_cost);
        assert_eq!(result.installed.total_amount(), result.total_installed_cost);
    }

    #[test]
    fn breakdowns_in_cascade_order() {
        let result = runner().run(10.0).unwrap();
        let stages: Vec<_> = result.breakdowns().iter().map(|b| b.stage()).collect();
        assert_eq!(stages, [Stage::Direct, Stage::Epc, Stage::Installed]);
    }

    #[test]
    fn negative_material_cost_fails_fast() {
        let err = runner().run(-1.0).unwrap_err();
        assert_eq!(err.stage(), Stage::Direct);
        assert!(matches!(err, CascadeError::InvalidInput { field: "material_cost", .. }));
    }

    #[test]
    fn negative_contingency_fails_before_any_stage_runs() {
        let err = run_cascade(
            1000.0,
            &PercentageTable::uniform(10.0).unwrap(),
            &PercentageTable::uniform(5.0).unwrap(),
            &PercentageTable::uniform(2.0).unwrap(),
            -10.0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CascadeError::InvalidInput {
                stage: Stage::Installed,
                field: "contingency_percent",
                ..
            }
        ));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let runner = runner();
        assert_eq!(runner.run(777.7).unwrap(), runner.run(777.7).unwrap());
    }
}
