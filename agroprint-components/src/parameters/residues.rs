//! Crop residue burning and composting
//!
//! IPCC 2019 Refinement, Volume 4, Chapter 2 (Table 2.5) and Volume 5,
//! Chapter 4 (Table 4.1).

use agroprint_core::activity::CompostingMode;
use agroprint_core::units::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters for open burning of residues.
///
/// $$M_B = B \cdot f_{dry} \cdot C_f$$
///
/// where $B$ is fresh biomass and $C_f$ the combustion (burned) fraction.
/// CH4 and N2O are emitted in proportion to $M_B$.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurningParameters {
    /// Dry matter fraction of fresh residues.
    ///
    /// Default: 0.8
    pub dry_fraction: FloatValue,

    /// Fraction of the dry matter actually burned.
    ///
    /// Default: 0.9
    pub burned_fraction: FloatValue,

    /// CH4 emitted per unit of dry matter burned (kg CH4 / kg).
    ///
    /// Default: 0.0027
    pub ch4_factor: FloatValue,

    /// N2O emitted per unit of dry matter burned (kg N2O / kg).
    ///
    /// Default: 0.00007
    pub n2o_factor: FloatValue,
}

impl Default for BurningParameters {
    fn default() -> Self {
        Self {
            dry_fraction: 0.8,
            burned_fraction: 0.9,
            ch4_factor: 0.0027,
            n2o_factor: 0.00007,
        }
    }
}

/// Parameters for composting of residues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompostingParameters {
    /// Dry matter fraction of fresh residues.
    ///
    /// Default: 0.8
    pub dry_fraction: FloatValue,

    /// CH4 from well-managed aerobic composting (kg CH4 / kg dry matter).
    ///
    /// Default: 0.004
    pub aerobic_ch4: FloatValue,

    /// N2O from aerobic composting (kg N2O / kg dry matter).
    ///
    /// Default: 0.0003
    pub aerobic_n2o: FloatValue,

    /// CH4 from poorly aerated (anaerobic) composting.
    ///
    /// Default: 0.01
    pub anaerobic_ch4: FloatValue,

    /// N2O from anaerobic composting.
    ///
    /// Default: 0.0006
    pub anaerobic_n2o: FloatValue,
}

impl CompostingParameters {
    /// (CH4, N2O) factors for a composting mode
    pub fn factors(&self, mode: CompostingMode) -> (FloatValue, FloatValue) {
        match mode {
            CompostingMode::Aerobic => (self.aerobic_ch4, self.aerobic_n2o),
            CompostingMode::Anaerobic => (self.anaerobic_ch4, self.anaerobic_n2o),
        }
    }
}

impl Default for CompostingParameters {
    fn default() -> Self {
        Self {
            dry_fraction: 0.8,
            aerobic_ch4: 0.004,
            aerobic_n2o: 0.0003,
            anaerobic_ch4: 0.01,
            anaerobic_n2o: 0.0006,
        }
    }
}
