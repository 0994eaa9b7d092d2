//! BudgeWiser Runner — settings, estimate orchestration, report bundles.
//!
//! This crate builds on `budgewiser-core` to provide:
//! - Settings file loading (TOML or JSON) with full coefficient validation
//! - Capital equipment cost database lookup by equipment and family type
//! - Estimate runs with content-addressed run ids
//! - CSV/JSON report bundles plus a zip archive for download

pub mod config;
pub mod database;
pub mod estimate;
pub mod reporting;

pub use config::{ConfigError, Settings, DEFAULT_SETTINGS_TOML};
pub use database::{DatabaseError, EquipmentDatabase};
pub use estimate::{
    run_estimate, Estimate, EstimateError, EstimateInput, EstimateMeta, RunId, SCHEMA_VERSION,
};
pub use reporting::{export_json, render_files, zip_bundle, ReportFile, ReportPaths, ReportWriter};
