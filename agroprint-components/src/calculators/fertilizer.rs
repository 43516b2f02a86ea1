//! Fertilizer emissions
//!
//! Embodied production emissions and N2O from nitrogen additions for
//! organic amendments, catalogue mineral fertilizers and user-described
//! mineral fertilizers.
//!
//! # Nitrogen applied
//!
//! | Product              | N applied (kg N / ha)                  | FracGAS          | FracLEACH        |
//! |----------------------|----------------------------------------|------------------|------------------|
//! | Organic              | quantity × dry fraction × N% / 100     | organic (0.21)   | 0.24             |
//! | Other, percent entry | quantity × N% / 100                    | inorganic (0.11) | 0.24             |
//! | Other, nutrient entry| quantity if the nutrient is N, else 0  | inorganic (0.11) | 0.24             |
//! | Catalogue            | quantity × N fraction of the variant   | from the variant | from the variant |
//!
//! All nitrogen masses are scaled by the duration before conversion to N2O.
//!
//! # Production emissions
//!
//! `quantity × duration × factor`, where the factor is the custom factor if
//! positive, else the production factor of the catalogue variant. Organic
//! amendments and fertilizers outside the catalogue have no default factor,
//! so they only produce production emissions when a positive custom factor
//! is given. This applies to organic amendments too.

use crate::parameters::NitrousOxideParameters;
use agroprint_core::activity::{
    ActivityData, FertilizerApplication, FertilizerProduct, Nutrient, NutrientContent,
};
use agroprint_core::component::EmissionSource;
use agroprint_core::gwp::{GreenhouseGas, GwpSet};
use agroprint_core::reference::ReferenceData;
use agroprint_core::results::{FertilizerEmissions, FertilizerItem, SourceCategory, SourceResult};
use agroprint_core::units::{percent_to_fraction, FloatValue, N2O_N_TO_N2O};
use log::debug;
use serde::{Deserialize, Serialize};

/// Nitrogen content and loss fractions resolved for one application
#[derive(Debug, Clone, Copy, PartialEq)]
struct NitrogenProfile {
    /// kg N / ha per period
    applied: FloatValue,
    volatilisation_fraction: FloatValue,
    leaching_fraction: FloatValue,
    /// Catalogue production factor, 0 when none is known
    production_factor: FloatValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FertilizerCalculator {
    #[serde(default)]
    parameters: NitrousOxideParameters,
    #[serde(default)]
    gwp: GwpSet,
}

impl FertilizerCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parameters(parameters: NitrousOxideParameters) -> Self {
        Self {
            parameters,
            gwp: GwpSet::default(),
        }
    }

    pub fn with_gwp(mut self, gwp: GwpSet) -> Self {
        self.gwp = gwp;
        self
    }

    pub fn parameters(&self) -> &NitrousOxideParameters {
        &self.parameters
    }

    fn profile(
        &self,
        application: &FertilizerApplication,
        reference: &ReferenceData,
    ) -> NitrogenProfile {
        let quantity = application.quantity;
        match &application.product {
            FertilizerProduct::Organic {
                name,
                dry_fraction,
                nitrogen_percent,
                ..
            } => {
                let catalogue = reference.organic_amendment(name);
                let dry_fraction = dry_fraction
                    .or(catalogue.map(|c| c.dry_fraction))
                    .unwrap_or(1.0);
                let nitrogen_percent = nitrogen_percent
                    .or(catalogue.map(|c| c.nitrogen_percent))
                    .unwrap_or(0.0);
                NitrogenProfile {
                    applied: quantity * dry_fraction * percent_to_fraction(nitrogen_percent),
                    volatilisation_fraction: self.parameters.organic_volatilisation,
                    leaching_fraction: self.parameters.leaching,
                    production_factor: 0.0,
                }
            }
            FertilizerProduct::InorganicOther { content, .. } => {
                let applied = match content {
                    NutrientContent::Percent {
                        nitrogen_percent, ..
                    } => quantity * percent_to_fraction(*nitrogen_percent),
                    NutrientContent::Nutrient(Nutrient::N) => quantity,
                    NutrientContent::Nutrient(_) => 0.0,
                };
                NitrogenProfile {
                    applied,
                    volatilisation_fraction: self.parameters.inorganic_volatilisation,
                    leaching_fraction: self.parameters.leaching,
                    production_factor: 0.0,
                }
            }
            FertilizerProduct::InorganicCatalog { product, origin } => {
                match reference.fertilizer_variant(product, origin.as_deref()) {
                    Some(variant) => NitrogenProfile {
                        applied: quantity * variant.nitrogen_fraction,
                        volatilisation_fraction: variant.volatilisation_fraction,
                        leaching_fraction: variant.leaching_fraction,
                        production_factor: variant.production_factor,
                    },
                    None => {
                        debug!(
                            "Fertilizer '{}' is not in the catalogue; it contributes no nitrogen",
                            product
                        );
                        NitrogenProfile {
                            applied: 0.0,
                            volatilisation_fraction: self.parameters.inorganic_volatilisation,
                            leaching_fraction: self.parameters.leaching,
                            production_factor: 0.0,
                        }
                    }
                }
            }
        }
    }

    /// N2O as CO2e from an N2O-N mass
    fn n2o_co2e(&self, n2o_n: FloatValue) -> FloatValue {
        self.gwp.co2e(GreenhouseGas::N2O, n2o_n * N2O_N_TO_N2O)
    }

    /// Emissions of a list of fertilizer applications over `duration` years or cycles.
    ///
    /// Every application is listed in the breakdown, including those that
    /// contribute nothing.
    pub fn calculate(
        &self,
        fertilizers: &[FertilizerApplication],
        duration: FloatValue,
        reference: &ReferenceData,
    ) -> FertilizerEmissions {
        let mut result = FertilizerEmissions::default();
        let mut total_volatilised = 0.0;
        let mut total_leached = 0.0;

        for application in fertilizers {
            let profile = self.profile(application, reference);
            let factor = match application.custom_emission_factor {
                Some(factor) if factor > 0.0 => factor,
                _ => profile.production_factor,
            };

            let nitrogen_applied = profile.applied * duration;
            let nitrogen_volatilised = nitrogen_applied * profile.volatilisation_fraction;
            let nitrogen_leached = nitrogen_applied * profile.leaching_fraction;

            let item = FertilizerItem {
                name: application.product.name().to_string(),
                organic: application.product.is_organic(),
                origin: application.product.origin().map(str::to_string),
                quantity: application.quantity,
                production_factor: factor,
                nitrogen_applied,
                nitrogen_volatilised,
                nitrogen_leached,
                production: application.quantity * duration * factor,
                direct_n2o: self.n2o_co2e(nitrogen_applied * self.parameters.ef1),
                indirect_n2o: self.n2o_co2e(
                    nitrogen_volatilised * self.parameters.ef4
                        + nitrogen_leached * self.parameters.ef5,
                ),
            };

            result.production += item.production;
            result.nitrogen_applied += nitrogen_applied;
            total_volatilised += nitrogen_volatilised;
            total_leached += nitrogen_leached;
            result.items.push(item);
        }

        result.direct_n2o = self.n2o_co2e(result.nitrogen_applied * self.parameters.ef1);
        result.indirect_volatilisation = self.n2o_co2e(total_volatilised * self.parameters.ef4);
        result.indirect_leaching = self.n2o_co2e(total_leached * self.parameters.ef5);
        result.indirect_n2o = result.indirect_volatilisation + result.indirect_leaching;
        result
    }
}

#[typetag::serde]
impl EmissionSource for FertilizerCalculator {
    fn category(&self) -> SourceCategory {
        SourceCategory::Fertilizers
    }

    fn evaluate(
        &self,
        activities: &ActivityData,
        duration: FloatValue,
        reference: &ReferenceData,
    ) -> SourceResult {
        self.calculate(&activities.fertilizers, duration, reference)
            .into()
    }
}
