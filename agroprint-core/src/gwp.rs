//! Global warming potentials
//!
//! Converts the mass of a greenhouse gas into CO2-equivalent mass using
//! 100-year GWP values.

use crate::units::FloatValue;
use serde::{Deserialize, Serialize};

/// Greenhouse gases reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GreenhouseGas {
    CO2,
    CH4,
    N2O,
}

/// 100-year global warming potentials
///
/// Defaults follow IPCC AR6 (2021), using the non-fossil value for methane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GwpSet {
    /// unit: kg CO2e / kg CO2
    /// default: 1
    pub co2: FloatValue,
    /// Non-fossil methane
    /// unit: kg CO2e / kg CH4
    /// default: 27
    pub ch4: FloatValue,
    /// unit: kg CO2e / kg N2O
    /// default: 273
    pub n2o: FloatValue,
}

impl Default for GwpSet {
    fn default() -> Self {
        Self {
            co2: 1.0,
            ch4: 27.0,
            n2o: 273.0,
        }
    }
}

impl GwpSet {
    /// GWP of a single gas
    pub fn get(&self, gas: GreenhouseGas) -> FloatValue {
        match gas {
            GreenhouseGas::CO2 => self.co2,
            GreenhouseGas::CH4 => self.ch4,
            GreenhouseGas::N2O => self.n2o,
        }
    }

    /// Convert a mass of `gas` (kg) into kg CO2e
    pub fn co2e(&self, gas: GreenhouseGas, mass: FloatValue) -> FloatValue {
        mass * self.get(gas)
    }
}
