//! N2O from nitrogen additions
//!
//! IPCC 2019 Refinement, Volume 4, Chapter 11, Tables 11.1 and 11.3.

use agroprint_core::units::FloatValue;
use serde::{Deserialize, Serialize};

/// Emission factors and loss fractions for managed soils.
///
/// $$N_2O = \left(N \cdot EF_1 + N \cdot Frac_{GAS} \cdot EF_4 + N \cdot Frac_{LEACH} \cdot EF_5\right) \cdot \frac{44}{28}$$
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NitrousOxideParameters {
    /// Direct emission factor EF1 (kg N2O-N / kg N applied).
    ///
    /// Default: 0.01
    pub ef1: FloatValue,

    /// Indirect emission factor EF4 for volatilised and redeposited N
    /// (kg N2O-N / kg N volatilised).
    ///
    /// Default: 0.01
    pub ef4: FloatValue,

    /// Indirect emission factor EF5 for leached N (kg N2O-N / kg N leached).
    ///
    /// Default: 0.011
    pub ef5: FloatValue,

    /// Fraction of synthetic fertilizer N volatilised (FracGASF).
    ///
    /// Used for fertilizers outside the catalogue; catalogue products carry
    /// their own fraction.
    ///
    /// Default: 0.11
    pub inorganic_volatilisation: FloatValue,

    /// Fraction of organic amendment N volatilised (FracGASM).
    ///
    /// Default: 0.21
    pub organic_volatilisation: FloatValue,

    /// Fraction of applied N lost by leaching and runoff (FracLEACH).
    ///
    /// Default: 0.24
    pub leaching: FloatValue,
}

impl Default for NitrousOxideParameters {
    fn default() -> Self {
        Self {
            ef1: 0.01,
            ef4: 0.01,
            ef5: 0.011,
            inorganic_volatilisation: 0.11,
            organic_volatilisation: 0.21,
            leaching: 0.24,
        }
    }
}
