//! Agrochemical emissions
//!
//! Embodied emissions of plant-protection products:
//!
//! $$E = \sum_i a_i \cdot d \cdot EF_i$$
//!
//! where $a_i$ is the active ingredient applied per period, $d$ the duration
//! and $EF_i$ the override factor if positive, else the catalogue value for the
//! named active ingredient, else the category average, else the generic factor.

use agroprint_core::activity::{ActivityData, AgrochemicalApplication};
use agroprint_core::component::EmissionSource;
use agroprint_core::reference::ReferenceData;
use agroprint_core::results::{AgrochemicalEmissions, AgrochemicalItem, SourceCategory, SourceResult};
use agroprint_core::units::FloatValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgrochemicalCalculator {}

impl AgrochemicalCalculator {
    pub fn new() -> Self {
        Self {}
    }

    /// Factor used for one application (kg CO2e / kg a.i.)
    pub fn emission_factor(
        &self,
        application: &AgrochemicalApplication,
        reference: &ReferenceData,
    ) -> FloatValue {
        match application.emission_factor {
            Some(factor) if factor > 0.0 => factor,
            _ => reference
                .agrochemical_factor(application.category, &application.active_ingredient_name),
        }
    }

    pub fn calculate(
        &self,
        agrochemicals: &[AgrochemicalApplication],
        duration: FloatValue,
        reference: &ReferenceData,
    ) -> AgrochemicalEmissions {
        let items: Vec<AgrochemicalItem> = agrochemicals
            .iter()
            .map(|application| {
                let quantity = application.active_ingredient_quantity();
                let factor = self.emission_factor(application, reference);
                AgrochemicalItem {
                    category: application.category,
                    active_ingredient_name: application.active_ingredient_name.clone(),
                    active_ingredient_quantity: quantity,
                    emission_factor: factor,
                    emissions: quantity * duration * factor,
                }
            })
            .collect();

        AgrochemicalEmissions {
            total: items.iter().map(|item| item.emissions).sum(),
            items,
        }
    }
}

#[typetag::serde]
impl EmissionSource for AgrochemicalCalculator {
    fn category(&self) -> SourceCategory {
        SourceCategory::Agrochemicals
    }

    fn evaluate(
        &self,
        activities: &ActivityData,
        duration: FloatValue,
        reference: &ReferenceData,
    ) -> SourceResult {
        self.calculate(&activities.agrochemicals, duration, reference)
            .into()
    }
}
