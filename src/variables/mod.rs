//! Static dispatch tables mapping variable names to the raw fields they
//! need and the derivation function that computes them. Adding a variable
//! is a data change here, not a new branch in the pipelines.

pub mod grid;
pub mod station;

use std::collections::HashMap;

use crate::error::{ConvertError, Result};
use crate::units::PhysicalQuantity;

pub use grid::{grid_spec, GridVariableSpec, GRID_VARIABLES};
pub use station::{station_spec, StationVariableSpec, STATION_VARIABLES};

/// Signature shared by every derivation entry.
pub type DeriveFn = fn(&FieldSet) -> Result<PhysicalQuantity>;

/// The raw fields gathered for one derivation, keyed by source field name.
#[derive(Debug, Default)]
pub struct FieldSet {
    fields: HashMap<String, PhysicalQuantity>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, quantity: PhysicalQuantity) {
        self.fields.insert(name.to_string(), quantity);
    }

    pub fn get(&self, name: &str) -> Result<&PhysicalQuantity> {
        self.fields
            .get(name)
            .ok_or_else(|| ConvertError::SourceRead(format!("field '{}' was not gathered", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    #[test]
    fn test_field_set_lookup() {
        let mut fields = FieldSet::new();
        fields.insert("temperature", PhysicalQuantity::scalar(293.15, Unit::Kelvin));

        assert!(fields.get("temperature").is_ok());
        assert!(matches!(
            fields.get("dewpoint"),
            Err(ConvertError::SourceRead(_))
        ));
    }
}
