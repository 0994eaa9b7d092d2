//! Purchased equipment cost — power-law scaling from a reference row.
//!
//! `cost = min_cost * (size / min_scale)^n * (TARGET_CEPCI / cepci) * FREIGHT_FACTOR`
//!
//! The result is a material cost suitable as the cascade's input.

use serde::Serialize;
use thiserror::Error;

/// Plant cost index the estimate is escalated to.
pub const TARGET_CEPCI: f64 = 800.0;

/// Delivery allowance applied to every purchased item.
pub const FREIGHT_FACTOR: f64 = 1.07;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EquipmentError {
    #[error("reference field '{field}' must be finite and positive (got {value})")]
    InvalidReference { field: &'static str, value: f64 },

    #[error("{quantity} {size} {unit} is outside the reference range {min}..={max}")]
    SizeOutOfRange {
        quantity: String,
        unit: String,
        size: f64,
        min: f64,
        max: f64,
    },
}

/// One row of the capital equipment cost dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentReference {
    pub equipment: String,
    pub family_type: String,
    /// What the size measures, e.g. "Volume".
    pub scaling_quantity: String,
    pub unit: String,
    /// Cost at `min_scale`, in USD at the row's CEPCI.
    pub min_cost: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Power-law exponent `n`.
    pub scaling_factor: f64,
    pub cepci: f64,
}

impl EquipmentReference {
    fn validate(&self) -> Result<(), EquipmentError> {
        for (field, value) in [
            ("min_cost", self.min_cost),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("scaling_factor", self.scaling_factor),
            ("cepci", self.cepci),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EquipmentError::InvalidReference { field, value });
            }
        }
        Ok(())
    }

    pub fn contains(&self, size: f64) -> bool {
        (self.min_scale..=self.max_scale).contains(&size)
    }
}

/// Scale the reference cost to `size`, escalate to `TARGET_CEPCI` and add
/// freight.
pub fn purchased_equipment_cost(
    reference: &EquipmentReference,
    size: f64,
) -> Result<f64, EquipmentError> {
    reference.validate()?;
    if !size.is_finite() || !reference.contains(size) {
        return Err(EquipmentError::SizeOutOfRange {
            quantity: reference.scaling_quantity.clone(),
            unit: reference.unit.clone(),
            size,
            min: reference.min_scale,
            max: reference.max_scale,
        });
    }

    let scaled = reference.min_cost * (size / reference.min_scale).powf(reference.scaling_factor);
    Ok(scaled * TARGET_CEPCI / reference.cepci * FREIGHT_FACTOR)
}
