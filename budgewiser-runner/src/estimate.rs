//! Estimate runner — wires settings, the cost cascade, and run metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use budgewiser_core::{CascadeError, CascadeResult};

use crate::config::Settings;

/// Current schema version for persisted estimates.
pub const SCHEMA_VERSION: u32 = 1;

/// Content hash identifying an estimate's inputs.
pub type RunId = String;

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("cascade error: {0}")]
    Cascade(#[from] CascadeError),
    #[error("failed to fingerprint inputs: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

/// Who and when; goes into `meta_input.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateMeta {
    pub project: String,
    pub generated_at: DateTime<Utc>,
    pub run_id: RunId,
}

/// Everything the cascade consumed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateInput {
    pub material_cost: f64,
    pub settings: Settings,
}

impl EstimateInput {
    /// Deterministic blake3 hash of the project name and the serialized
    /// inputs. The same project with identical inputs always produces the
    /// same id; another project never shares it.
    pub fn run_id(&self, project: &str) -> Result<RunId, serde_json::Error> {
        let json = serde_json::to_string(&(project, self))?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

/// Complete result of one estimation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub schema_version: u32,
    pub meta: EstimateMeta,
    pub input: EstimateInput,
    pub output: CascadeResult,
}

/// Run the cascade for `material_cost` under `settings`.
pub fn run_estimate(
    project: &str,
    material_cost: f64,
    settings: &Settings,
) -> Result<Estimate, EstimateError> {
    let output = settings.runner()?.run(material_cost)?;
    tracing::debug!(
        direct_cost = output.direct_cost,
        epc_cost = output.epc_cost,
        total_installed_cost = output.total_installed_cost,
        "cascade complete"
    );

    let input = EstimateInput {
        material_cost,
        settings: settings.clone(),
    };
    let run_id = input.run_id(project)?;

    Ok(Estimate {
        schema_version: SCHEMA_VERSION,
        meta: EstimateMeta {
            project: project.to_string(),
            generated_at: Utc::now(),
            run_id,
        },
        input,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgewiser_core::Stage;

    fn settings() -> Settings {
        Settings::default_settings().unwrap()
    }

    #[test]
    fn estimate_carries_cascade_totals() {
        let estimate = run_estimate("Demo", 100_000.0, &settings()).unwrap();
        assert_eq!(estimate.schema_version, SCHEMA_VERSION);
        assert_eq!(estimate.meta.project, "Demo");
        assert_eq!(estimate.input.material_cost, 100_000.0);
        // Direct: 103% on top of material
        assert!((estimate.output.direct_cost - 203_000.0).abs() < 1e-6);
        assert!(estimate.output.total_installed_cost > estimate.output.epc_cost);
    }

    #[test]
    fn run_id_is_deterministic_and_input_sensitive() {
        let a = run_estimate("A", 1000.0, &settings()).unwrap();
        let again = run_estimate("A", 1000.0, &settings()).unwrap();
        let c = run_estimate("A", 1000.5, &settings()).unwrap();

        assert_eq!(a.meta.run_id, again.meta.run_id);
        assert_ne!(a.meta.run_id, c.meta.run_id);
        assert_eq!(a.meta.run_id.len(), 64);
    }

    #[test]
    fn run_id_depends_on_project() {
        let a = run_estimate("Plant A", 1000.0, &settings()).unwrap();
        let b = run_estimate("Plant B", 1000.0, &settings()).unwrap();

        assert_ne!(a.meta.run_id, b.meta.run_id);
        assert_eq!(a.output, b.output);
    }

    #[test]
    fn invalid_material_cost_surfaces_cascade_error() {
        let err = run_estimate("Demo", -1.0, &settings()).unwrap_err();
        match err {
            EstimateError::Cascade(inner) => assert_eq!(inner.stage(), Stage::Direct),
            other => panic!("unexpected error: {other}"),
        }
    }
}
