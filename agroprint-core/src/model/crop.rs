//! Crop characterisation carried alongside a scenario for reporting.

use serde::{Deserialize, Serialize};

/// Whether the crop is replanted every season or stays in the ground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CropCycle {
    Annual,
    #[default]
    Perennial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Morphology {
    #[default]
    Tree,
    Shrub,
    Herb,
    Other,
}

/// Description of the crop a footprint is computed for
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Crop {
    pub name: String,
    pub cycle: CropCycle,
    pub morphology: Morphology,
    pub location: Option<String>,
    pub soil_type: Option<String>,
    pub climate: Option<String>,
    pub notes: Option<String>,
}

impl Crop {
    pub fn new(name: impl Into<String>, cycle: CropCycle, morphology: Morphology) -> Self {
        Self {
            name: name.into(),
            cycle,
            morphology,
            ..Default::default()
        }
    }

    pub fn is_annual(&self) -> bool {
        self.cycle == CropCycle::Annual
    }
}
