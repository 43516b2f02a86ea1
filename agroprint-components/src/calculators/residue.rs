//! Crop residue emissions
//!
//! CH4 and N2O from burning and composting residues. Soil incorporation,
//! removal from the field and unmanaged residues have no on-site emissions
//! under Tier-1 (soil carbon changes are not modelled) but are still reported
//! with their biomass.
//!
//! Residue biomass is entered per stage, so the duration is not applied.

use crate::parameters::{BurningParameters, CompostingParameters};
use agroprint_core::activity::{
    ActivityData, BurningAdjustments, CompostingAdjustments, ResidueManagement, ResidueTreatment,
};
use agroprint_core::component::EmissionSource;
use agroprint_core::gwp::{GreenhouseGas, GwpSet};
use agroprint_core::reference::ReferenceData;
use agroprint_core::results::{ResidueEmissions, ResidueItem, SourceCategory, SourceResult};
use agroprint_core::units::FloatValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResidueCalculator {
    #[serde(default)]
    burning: BurningParameters,
    #[serde(default)]
    composting: CompostingParameters,
    #[serde(default)]
    gwp: GwpSet,
}

impl ResidueCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parameters(burning: BurningParameters, composting: CompostingParameters) -> Self {
        Self {
            burning,
            composting,
            gwp: GwpSet::default(),
        }
    }

    pub fn with_gwp(mut self, gwp: GwpSet) -> Self {
        self.gwp = gwp;
        self
    }

    /// (CH4, N2O) in kg from burning `biomass` kg of fresh residues
    pub fn burning_gases(
        &self,
        biomass: FloatValue,
        adjustments: &BurningAdjustments,
    ) -> (FloatValue, FloatValue) {
        let dry_fraction = adjustments
            .dry_fraction
            .unwrap_or(self.burning.dry_fraction);
        let burned_fraction = adjustments
            .burned_fraction
            .unwrap_or(self.burning.burned_fraction);
        let ch4_factor = adjustments.ch4_factor.unwrap_or(self.burning.ch4_factor);
        let n2o_factor = adjustments.n2o_factor.unwrap_or(self.burning.n2o_factor);

        let burned = biomass * dry_fraction * burned_fraction;
        (burned * ch4_factor, burned * n2o_factor)
    }

    /// (CH4, N2O) in kg from composting `biomass` kg of fresh residues
    pub fn composting_gases(
        &self,
        biomass: FloatValue,
        adjustments: &CompostingAdjustments,
    ) -> (FloatValue, FloatValue) {
        let dry_fraction = adjustments
            .dry_fraction
            .unwrap_or(self.composting.dry_fraction);
        let (ch4_factor, n2o_factor) = self.composting.factors(adjustments.mode);

        let dry_matter = biomass * dry_fraction;
        (dry_matter * ch4_factor, dry_matter * n2o_factor)
    }

    pub fn calculate(&self, management: &ResidueManagement) -> ResidueEmissions {
        let mut items: BTreeMap<_, ResidueItem> = BTreeMap::new();

        for treatment in &management.treatments {
            let (ch4, n2o) = match treatment {
                ResidueTreatment::Burning {
                    biomass,
                    adjustments,
                } => self.burning_gases(*biomass, adjustments),
                ResidueTreatment::Composting {
                    biomass,
                    adjustments,
                } => self.composting_gases(*biomass, adjustments),
                ResidueTreatment::SoilIncorporation { .. }
                | ResidueTreatment::FieldRemoval { .. }
                | ResidueTreatment::Unmanaged { .. } => (0.0, 0.0),
            };

            let pathway = treatment.pathway();
            let item = items
                .entry(pathway)
                .or_insert_with(|| ResidueItem::new(pathway));
            item.biomass += treatment.biomass();
            item.ch4 += ch4;
            item.n2o += n2o;
            item.ch4_co2e += self.gwp.co2e(GreenhouseGas::CH4, ch4);
            item.n2o_co2e += self.gwp.co2e(GreenhouseGas::N2O, n2o);
        }

        let items: Vec<ResidueItem> = items.into_values().collect();
        ResidueEmissions {
            total: items.iter().map(ResidueItem::emissions).sum(),
            items,
        }
    }
}

#[typetag::serde]
impl EmissionSource for ResidueCalculator {
    fn category(&self) -> SourceCategory {
        SourceCategory::Residues
    }

    fn evaluate(
        &self,
        activities: &ActivityData,
        _duration: FloatValue,
        _reference: &ReferenceData,
    ) -> SourceResult {
        self.calculate(&activities.residues).into()
    }
}
