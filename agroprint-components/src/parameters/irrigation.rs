//! Irrigation parameters

use agroprint_core::units::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters for water supply emissions.
///
/// Energy factors for pumping come from the reference catalogue; only the
/// embodied emissions of the water itself are configured here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrigationParameters {
    /// Emissions of supplying one litre of irrigation water (kg CO2e / L).
    ///
    /// When `None` the generic water factor of the reference catalogue is used.
    ///
    /// Default: None (0.00015 kg CO2e / L in the embedded catalogue)
    pub water_factor: Option<FloatValue>,
}
