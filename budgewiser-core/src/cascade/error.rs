use thiserror::Error;

use crate::domain::Stage;

/// Validation failures raised by percentage tables and cascade stages.
///
/// All of these are deterministic input problems; retrying with the same
/// input reproduces the same error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CascadeError {
    #[error("{stage} table is missing required coefficient '{category}'")]
    MissingCoefficient {
        stage: Stage,
        category: &'static str,
    },

    #[error("{stage} coefficient '{category}' must be a finite, non-negative percentage (got {value})")]
    InvalidCoefficient {
        stage: Stage,
        category: String,
        value: String,
    },

    #[error("{stage} input '{field}' must be finite and non-negative (got {value})")]
    InvalidInput {
        stage: Stage,
        field: &'static str,
        value: f64,
    },

    #[error("{stage} total overflows for base {base}")]
    Overflow { stage: Stage, base: f64 },

    #[error("{stage} table has unknown coefficient '{key}'")]
    UnknownCoefficient { stage: Stage, key: String },

    #[error("{stage} coefficient '{category}' is given more than once")]
    DuplicateCoefficient {
        stage: Stage,
        category: &'static str,
    },
}

impl CascadeError {
    /// Stage the failure belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            CascadeError::MissingCoefficient { stage, .. }
            | CascadeError::InvalidCoefficient { stage, .. }
            | CascadeError::InvalidInput { stage, .. }
            | CascadeError::Overflow { stage, .. }
            | CascadeError::UnknownCoefficient { stage, .. }
            | CascadeError::DuplicateCoefficient { stage, .. } => *stage,
        }
    }
}

/// Reject negative or non-finite base costs and percentages.
pub fn check_input(stage: Stage, field: &'static str, value: f64) -> Result<f64, CascadeError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CascadeError::InvalidInput {
            stage,
            field,
            value,
        })
    }
}

/// Reject a stage total that left the finite range.
pub fn check_total(stage: Stage, base: f64, total: f64) -> Result<f64, CascadeError> {
    if total.is_finite() {
        Ok(total)
    } else {
        Err(CascadeError::Overflow { stage, base })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_zero_and_positive() {
        assert_eq!(check_input(Stage::Direct, "material_cost", 0.0), Ok(0.0));
        assert_eq!(check_input(Stage::Direct, "material_cost", 12.5), Ok(12.5));
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = check_input(Stage::Epc, "direct_cost", bad).unwrap_err();
            assert_eq!(err.stage(), Stage::Epc);
            assert!(matches!(err, CascadeError::InvalidInput { field: "direct_cost", .. }));
        }
    }

    #[test]
    fn infinite_total_is_overflow() {
        assert_eq!(check_total(Stage::Direct, 1.0, 2.0), Ok(2.0));
        let err = check_total(Stage::Direct, 1e308, f64::INFINITY).unwrap_err();
        assert_eq!(
            err,
            CascadeError::Overflow {
                stage: Stage::Direct,
                base: 1e308,
            }
        );
    }

    #[test]
    fn message_names_stage_and_field() {
        let err = check_input(Stage::Installed, "contingency_percent", -5.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "installed cost input 'contingency_percent' must be finite and non-negative (got -5)"
        );
    }
}
