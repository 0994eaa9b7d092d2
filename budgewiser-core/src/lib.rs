//! BudgeWiser Core — capital cost estimation for process-plant equipment.
//!
//! This crate is pure computation, with no I/O and no logging:
//! - Percentage tables with a closed category set per cascade stage
//! - Ordered cost breakdown ledgers
//! - The escalation cascade: direct cost → EPC cost → total installed cost
//! - Power-law purchased equipment cost scaling with CEPCI correction

pub mod cascade;
pub mod domain;
pub mod equipment;

pub use cascade::{
    run_cascade, CascadeError, CascadeResult, CascadeRunner, CostStage, DirectCostStage,
    EpcCostStage, InstalledCostStage, StageOutcome,
};
pub use domain::{
    ClientIndirect, ContractorIndirect, CostBreakdown, CostCategory, CostLineItem,
    DirectCategory, PercentageTable, Stage,
};
pub use equipment::{purchased_equipment_cost, EquipmentError, EquipmentReference};
