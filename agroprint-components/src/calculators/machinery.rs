//! Machinery fuel emissions
//!
//! Each labour pass burns `litres × fuel factor`; the sum over passes is
//! multiplied by the duration. Manual labour uses no fuel.

use agroprint_core::activity::{ActivityData, MachineryPass};
use agroprint_core::component::EmissionSource;
use agroprint_core::reference::ReferenceData;
use agroprint_core::results::{MachineryEmissions, MachineryItem, SourceCategory, SourceResult};
use agroprint_core::units::FloatValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MachineryCalculator {}

impl MachineryCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// Combustion factor for a pass (kg CO2e / L)
    ///
    /// Unknown fuels resolve to 0.
    pub fn emission_factor(&self, pass: &MachineryPass, reference: &ReferenceData) -> FloatValue {
        match pass.emission_factor_override {
            Some(factor) if factor > 0.0 => factor,
            _ => reference.fuel_factor(&pass.fuel_type),
        }
    }

    pub fn calculate(
        &self,
        passes: &[MachineryPass],
        duration: FloatValue,
        reference: &ReferenceData,
    ) -> MachineryEmissions {
        let items: Vec<MachineryItem> = passes
            .iter()
            .map(|pass| {
                let (litres, factor) = if pass.is_manual() {
                    (0.0, 0.0)
                } else {
                    (pass.litres(reference), self.emission_factor(pass, reference))
                };
                MachineryItem {
                    labor_name: pass.labor_name.clone(),
                    machine_name: pass.machine_name.clone(),
                    fuel_type: pass.fuel_type.clone(),
                    litres,
                    emission_factor: factor,
                    emissions: litres * factor * duration,
                }
            })
            .collect();

        MachineryEmissions {
            total: items.iter().map(|item| item.emissions).sum(),
            items,
        }
    }
}

#[typetag::serde]
impl EmissionSource for MachineryCalculator {
    fn category(&self) -> SourceCategory {
        SourceCategory::Machinery
    }

    fn evaluate(
        &self,
        activities: &ActivityData,
        duration: FloatValue,
        reference: &ReferenceData,
    ) -> SourceResult {
        self.calculate(&activities.machinery, duration, reference)
            .into()
    }
}
