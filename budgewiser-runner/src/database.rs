//! Capital equipment cost database — reference rows keyed by equipment and
//! family type.
//!
//! The CSV carries one header row; the columns read are `Equipment`,
//! `Family_type`, `Scaling_quantity`, `Unit`, `Min_Cost`, `Min_Scale`,
//! `Max_Scale`, `Scaling_Factor` and `CEPCI`. Other columns are ignored.
//! Files that are not valid UTF-8 are read as Latin-1.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use budgewiser_core::EquipmentReference;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("failed to read equipment database {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid equipment database: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown equipment '{0}'")]
    UnknownEquipment(String),
    #[error("equipment '{equipment}' has no family type '{family_type}'")]
    UnknownFamilyType {
        equipment: String,
        family_type: String,
    },
}

#[derive(Debug, Deserialize)]
struct EquipmentRow {
    #[serde(rename = "Equipment")]
    equipment: String,
    #[serde(rename = "Family_type")]
    family_type: Option<String>,
    #[serde(rename = "Scaling_quantity")]
    scaling_quantity: String,
    #[serde(rename = "Unit")]
    unit: String,
    #[serde(rename = "Min_Cost")]
    min_cost: f64,
    #[serde(rename = "Min_Scale")]
    min_scale: f64,
    #[serde(rename = "Max_Scale")]
    max_scale: f64,
    #[serde(rename = "Scaling_Factor")]
    scaling_factor: f64,
    #[serde(rename = "CEPCI")]
    cepci: f64,
}

impl From<EquipmentRow> for EquipmentReference {
    fn from(row: EquipmentRow) -> Self {
        EquipmentReference {
            equipment: row.equipment.trim().to_string(),
            family_type: row.family_type.unwrap_or_default().trim().to_string(),
            scaling_quantity: row.scaling_quantity,
            unit: row.unit,
            min_cost: row.min_cost,
            min_scale: row.min_scale,
            max_scale: row.max_scale,
            scaling_factor: row.scaling_factor,
            cepci: row.cepci,
        }
    }
}

/// Reference rows in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EquipmentDatabase {
    references: Vec<EquipmentReference>,
}

impl EquipmentDatabase {
    pub fn load(path: &Path) -> Result<Self, DatabaseError> {
        let bytes = std::fs::read(path).map_err(|source| DatabaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
        };

        let database = Self::from_csv_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            rows = database.len(),
            "loaded equipment database"
        );
        Ok(database)
    }

    pub fn from_csv_str(content: &str) -> Result<Self, DatabaseError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(content.as_bytes());
        let references = reader
            .deserialize::<EquipmentRow>()
            .map(|row| row.map(EquipmentReference::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { references })
    }

    pub fn references(&self) -> &[EquipmentReference] {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Distinct equipment names in first-seen order.
    pub fn equipment(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for reference in &self.references {
            if !names.contains(&reference.equipment.as_str()) {
                names.push(&reference.equipment);
            }
        }
        names
    }

    /// Distinct family types of one equipment, first-seen order. Rows with a
    /// blank family type are not selectable and are skipped.
    pub fn family_types(&self, equipment: &str) -> Result<Vec<&str>, DatabaseError> {
        let mut rows = self
            .references
            .iter()
            .filter(|r| r.equipment == equipment)
            .peekable();
        if rows.peek().is_none() {
            return Err(DatabaseError::UnknownEquipment(equipment.to_string()));
        }

        let mut types: Vec<&str> = Vec::new();
        for reference in rows {
            let family = reference.family_type.as_str();
            if !family.is_empty() && !types.contains(&family) {
                types.push(family);
            }
        }
        Ok(types)
    }

    /// First row matching both keys.
    pub fn lookup(
        &self,
        equipment: &str,
        family_type: &str,
    ) -> Result<&EquipmentReference, DatabaseError> {
        if !self.references.iter().any(|r| r.equipment == equipment) {
            return Err(DatabaseError::UnknownEquipment(equipment.to_string()));
        }
        self.references
            .iter()
            .find(|r| r.equipment == equipment && r.family_type == family_type)
            .ok_or_else(|| DatabaseError::UnknownFamilyType {
                equipment: equipment.to_string(),
                family_type: family_type.to_string(),
            })
    }
}
