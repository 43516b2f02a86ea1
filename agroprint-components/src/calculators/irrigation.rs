//! Irrigation and pumping emissions
//!
//! Per activity:
//!
//! - water: `volume (m3) × 1000 × water factor (kg CO2e / L)`
//! - energy: `energy consumed × energy factor`, where the factor is the
//!   activity override if given, else the catalogue factor of the energy type
//!
//! Both are multiplied by the duration, which is the same as repeating the
//! per-year computation once per year and summing.

use crate::parameters::IrrigationParameters;
use agroprint_core::activity::{ActivityData, IrrigationEnergyActivity};
use agroprint_core::component::EmissionSource;
use agroprint_core::reference::ReferenceData;
use agroprint_core::results::{IrrigationEmissions, IrrigationItem, SourceCategory, SourceResult};
use agroprint_core::units::{FloatValue, LITRES_PER_M3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IrrigationCalculator {
    #[serde(default)]
    parameters: IrrigationParameters,
}

impl IrrigationCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parameters(parameters: IrrigationParameters) -> Self {
        Self { parameters }
    }

    /// kg CO2e / L
    pub fn water_factor(&self, reference: &ReferenceData) -> FloatValue {
        self.parameters
            .water_factor
            .unwrap_or(reference.generic.water)
    }

    /// Factor for the energy of an activity (kg CO2e / kWh or / L)
    pub fn energy_factor(
        &self,
        activity: &IrrigationEnergyActivity,
        reference: &ReferenceData,
    ) -> FloatValue {
        activity
            .emission_factor
            .unwrap_or_else(|| reference.energy_factor(&activity.energy_type))
    }

    pub fn calculate(
        &self,
        activities: &[IrrigationEnergyActivity],
        duration: FloatValue,
        reference: &ReferenceData,
    ) -> IrrigationEmissions {
        let water_factor = self.water_factor(reference);
        let mut result = IrrigationEmissions::default();

        for activity in activities {
            let energy_consumed = activity.energy_consumed(reference);
            let factor = self.energy_factor(activity, reference);
            let item = IrrigationItem {
                activity_name: activity.activity_name.clone(),
                water_volume_m3: activity.water_volume_m3,
                energy_type: activity.energy_type.clone(),
                energy_consumed,
                emission_factor: factor,
                water_emissions: activity.water_volume_m3 * LITRES_PER_M3 * water_factor * duration,
                energy_emissions: energy_consumed * factor * duration,
            };
            result.water += item.water_emissions;
            result.energy += item.energy_emissions;
            result.items.push(item);
        }
        result
    }
}

#[typetag::serde]
impl EmissionSource for IrrigationCalculator {
    fn category(&self) -> SourceCategory {
        SourceCategory::Irrigation
    }

    fn evaluate(
        &self,
        activities: &ActivityData,
        duration: FloatValue,
        reference: &ReferenceData,
    ) -> SourceResult {
        self.calculate(&activities.irrigation, duration, reference)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agroprint_core::activity::EnergyUse;
    use agroprint_core::reference::REFERENCE_DATA;
    use is_close::is_close;

    #[test]
    fn test_water_and_electricity() {
        let drip = IrrigationEnergyActivity::new(
            "Drip irrigation",
            6000.0,
            "Electric",
            EnergyUse::Consumption(1200.0),
        );
        let result = IrrigationCalculator::new().calculate(&[drip], 2.0, &REFERENCE_DATA);

        assert!(is_close!(result.water, 6000.0 * 1000.0 * 0.00015 * 2.0));
        assert!(is_close!(result.energy, 1200.0 * 0.2021 * 2.0));
        assert!(is_close!(result.total(), result.items[0].total()));
    }

    #[test]
    fn test_fuel_pump_with_efficiency() {
        let pump = IrrigationEnergyActivity::new(
            "Well pump",
            0.0,
            "Diesel (100% mineral)",
            EnergyUse::PowerHours {
                power_kw: 10.0,
                hours: 200.0,
                engine_efficiency: None,
            },
        );
        let result = IrrigationCalculator::new().calculate(&[pump], 1.0, &REFERENCE_DATA);
        assert!(is_close!(result.items[0].energy_consumed, 500.0));
        assert!(is_close!(result.energy, 500.0 * 2.66155));
        assert_eq!(result.water, 0.0);
    }

    #[test]
    fn test_unknown_energy_and_override() {
        let unknown = IrrigationEnergyActivity::new(
            "Generator",
            0.0,
            "Biogas",
            EnergyUse::Consumption(10.0),
        );
        // An explicit override of zero is kept
        let zero = unknown.clone().with_emission_factor(0.0);
        let calculator = IrrigationCalculator::from_parameters(IrrigationParameters {
            water_factor: Some(0.0),
        });
        let result = calculator.calculate(&[unknown, zero], 1.0, &REFERENCE_DATA);

        assert!(is_close!(
            result.items[0].energy_emissions,
            10.0 * REFERENCE_DATA.generic.fuel
        ));
        assert_eq!(result.items[1].energy_emissions, 0.0);
    }
}
