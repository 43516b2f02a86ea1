//! Per-source emission results
//!
//! Each calculator returns its totals together with an itemized breakdown.
//! Every item carries the raw inputs that produced it and its own emission
//! value so a report can show contributions without recomputation.
//!
//! All emissions are in kg CO2e / ha over the evaluated duration.

use crate::activity::{AgrochemicalCategory, ResiduePathway};
use crate::units::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// The emission sources of the farm-gate boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceCategory {
    Fertilizers,
    Agrochemicals,
    Irrigation,
    Machinery,
    Residues,
}

impl SourceCategory {
    pub const ALL: [SourceCategory; 5] = [
        SourceCategory::Fertilizers,
        SourceCategory::Agrochemicals,
        SourceCategory::Irrigation,
        SourceCategory::Machinery,
        SourceCategory::Residues,
    ];
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceCategory::Fertilizers => "Fertilizers",
            SourceCategory::Agrochemicals => "Agrochemicals",
            SourceCategory::Irrigation => "Irrigation",
            SourceCategory::Machinery => "Machinery",
            SourceCategory::Residues => "Residues",
        };
        write!(f, "{}", name)
    }
}

/// Emission totals keyed by source
///
/// This is the accumulator threaded through the aggregation layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceTotals {
    pub fertilizers: FloatValue,
    pub agrochemicals: FloatValue,
    pub irrigation: FloatValue,
    pub machinery: FloatValue,
    pub residues: FloatValue,
}

impl SourceTotals {
    pub fn get(&self, category: SourceCategory) -> FloatValue {
        match category {
            SourceCategory::Fertilizers => self.fertilizers,
            SourceCategory::Agrochemicals => self.agrochemicals,
            SourceCategory::Irrigation => self.irrigation,
            SourceCategory::Machinery => self.machinery,
            SourceCategory::Residues => self.residues,
        }
    }

    pub fn accumulate(&mut self, category: SourceCategory, value: FloatValue) {
        let slot = match category {
            SourceCategory::Fertilizers => &mut self.fertilizers,
            SourceCategory::Agrochemicals => &mut self.agrochemicals,
            SourceCategory::Irrigation => &mut self.irrigation,
            SourceCategory::Machinery => &mut self.machinery,
            SourceCategory::Residues => &mut self.residues,
        };
        *slot += value;
    }

    /// Sum over all sources
    pub fn sum(&self) -> FloatValue {
        SourceCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceCategory, FloatValue)> + '_ {
        SourceCategory::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

impl AddAssign for SourceTotals {
    fn add_assign(&mut self, rhs: Self) {
        for (category, value) in rhs.iter() {
            self.accumulate(category, value);
        }
    }
}

impl Add for SourceTotals {
    type Output = SourceTotals;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::iter::Sum for SourceTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(SourceTotals::default(), Add::add)
    }
}

// =============================================================================
// Fertilizers
// =============================================================================

/// Breakdown entry for one fertilizer application
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FertilizerItem {
    pub name: String,
    pub organic: bool,
    pub origin: Option<String>,
    /// unit: kg / ha per period
    pub quantity: FloatValue,
    /// Production factor actually used
    /// unit: kg CO2e / kg
    pub production_factor: FloatValue,
    /// Nitrogen applied over the duration
    /// unit: kg N / ha
    pub nitrogen_applied: FloatValue,
    /// unit: kg N / ha
    pub nitrogen_volatilised: FloatValue,
    /// unit: kg N / ha
    pub nitrogen_leached: FloatValue,
    pub production: FloatValue,
    pub direct_n2o: FloatValue,
    pub indirect_n2o: FloatValue,
}

impl FertilizerItem {
    pub fn total(&self) -> FloatValue {
        self.production + self.direct_n2o + self.indirect_n2o
    }
}

/// Result of the fertilizer calculator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FertilizerEmissions {
    /// Embodied production emissions
    pub production: FloatValue,
    /// Direct N2O from N additions, as CO2e
    pub direct_n2o: FloatValue,
    /// Indirect N2O (volatilisation + leaching), as CO2e
    pub indirect_n2o: FloatValue,
    pub indirect_volatilisation: FloatValue,
    pub indirect_leaching: FloatValue,
    /// unit: kg N / ha
    pub nitrogen_applied: FloatValue,
    pub items: Vec<FertilizerItem>,
}

impl FertilizerEmissions {
    pub fn total(&self) -> FloatValue {
        self.production + self.direct_n2o + self.indirect_n2o
    }
}

// =============================================================================
// Agrochemicals
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgrochemicalItem {
    pub category: AgrochemicalCategory,
    pub active_ingredient_name: String,
    /// unit: kg a.i. / ha per period
    pub active_ingredient_quantity: FloatValue,
    /// unit: kg CO2e / kg a.i.
    pub emission_factor: FloatValue,
    pub emissions: FloatValue,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgrochemicalEmissions {
    pub total: FloatValue,
    pub items: Vec<AgrochemicalItem>,
}

impl AgrochemicalEmissions {
    /// Total per category, in category order
    pub fn by_category(&self) -> Vec<(AgrochemicalCategory, FloatValue)> {
        let mut totals: std::collections::BTreeMap<AgrochemicalCategory, FloatValue> =
            Default::default();
        for item in &self.items {
            *totals.entry(item.category).or_default() += item.emissions;
        }
        totals.into_iter().collect()
    }
}

// =============================================================================
// Machinery
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineryItem {
    pub labor_name: String,
    pub machine_name: String,
    pub fuel_type: String,
    /// Fuel used per period
    /// unit: L / ha
    pub litres: FloatValue,
    /// unit: kg CO2e / L
    pub emission_factor: FloatValue,
    pub emissions: FloatValue,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MachineryEmissions {
    pub total: FloatValue,
    pub items: Vec<MachineryItem>,
}

// =============================================================================
// Residues
// =============================================================================

/// Breakdown entry for one residue pathway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidueItem {
    pub pathway: ResiduePathway,
    /// unit: kg fresh / ha
    pub biomass: FloatValue,
    /// unit: kg CH4 / ha
    pub ch4: FloatValue,
    /// unit: kg N2O / ha
    pub n2o: FloatValue,
    pub ch4_co2e: FloatValue,
    pub n2o_co2e: FloatValue,
}

impl ResidueItem {
    pub fn new(pathway: ResiduePathway) -> Self {
        Self {
            pathway,
            biomass: 0.0,
            ch4: 0.0,
            n2o: 0.0,
            ch4_co2e: 0.0,
            n2o_co2e: 0.0,
        }
    }

    pub fn emissions(&self) -> FloatValue {
        self.ch4_co2e + self.n2o_co2e
    }
}

/// Result of the residue calculator
///
/// Holds one item per pathway present, ordered by pathway. Treatments sharing a
/// pathway are accumulated into the same item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResidueEmissions {
    pub total: FloatValue,
    pub items: Vec<ResidueItem>,
}

impl ResidueEmissions {
    pub fn get(&self, pathway: ResiduePathway) -> Option<&ResidueItem> {
        self.items.iter().find(|item| item.pathway == pathway)
    }
}

// =============================================================================
// Irrigation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationItem {
    pub activity_name: String,
    /// unit: m3 / ha per period
    pub water_volume_m3: FloatValue,
    pub energy_type: String,
    /// unit: kWh or L per period
    pub energy_consumed: FloatValue,
    pub emission_factor: FloatValue,
    pub water_emissions: FloatValue,
    pub energy_emissions: FloatValue,
}

impl IrrigationItem {
    pub fn total(&self) -> FloatValue {
        self.water_emissions + self.energy_emissions
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IrrigationEmissions {
    pub water: FloatValue,
    pub energy: FloatValue,
    pub items: Vec<IrrigationItem>,
}

impl IrrigationEmissions {
    pub fn total(&self) -> FloatValue {
        self.water + self.energy
    }
}

// =============================================================================
// Any source
// =============================================================================

/// Detail of a source result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceDetail {
    Fertilizers(FertilizerEmissions),
    Agrochemicals(AgrochemicalEmissions),
    Irrigation(IrrigationEmissions),
    Machinery(MachineryEmissions),
    Residues(ResidueEmissions),
}

impl SourceDetail {
    pub fn category(&self) -> SourceCategory {
        match self {
            SourceDetail::Fertilizers(_) => SourceCategory::Fertilizers,
            SourceDetail::Agrochemicals(_) => SourceCategory::Agrochemicals,
            SourceDetail::Irrigation(_) => SourceCategory::Irrigation,
            SourceDetail::Machinery(_) => SourceCategory::Machinery,
            SourceDetail::Residues(_) => SourceCategory::Residues,
        }
    }

    pub fn total(&self) -> FloatValue {
        match self {
            SourceDetail::Fertilizers(r) => r.total(),
            SourceDetail::Agrochemicals(r) => r.total,
            SourceDetail::Irrigation(r) => r.total(),
            SourceDetail::Machinery(r) => r.total,
            SourceDetail::Residues(r) => r.total,
        }
    }
}

/// Output of one [`crate::component::EmissionSource`] for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceResult {
    pub category: SourceCategory,
    pub total: FloatValue,
    pub detail: SourceDetail,
}

impl From<SourceDetail> for SourceResult {
    fn from(detail: SourceDetail) -> Self {
        Self {
            category: detail.category(),
            total: detail.total(),
            detail,
        }
    }
}

macro_rules! impl_into_source_result {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for SourceResult {
            fn from(value: $ty) -> Self {
                SourceDetail::$variant(value).into()
            }
        }
    };
}

impl_into_source_result!(FertilizerEmissions, Fertilizers);
impl_into_source_result!(AgrochemicalEmissions, Agrochemicals);
impl_into_source_result!(IrrigationEmissions, Irrigation);
impl_into_source_result!(MachineryEmissions, Machinery);
impl_into_source_result!(ResidueEmissions, Residues);

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn test_source_totals_accumulate() {
        let mut totals = SourceTotals::default();
        totals.accumulate(SourceCategory::Fertilizers, 10.0);
        totals.accumulate(SourceCategory::Residues, 2.5);
        totals.accumulate(SourceCategory::Fertilizers, 1.0);

        assert_eq!(totals.get(SourceCategory::Fertilizers), 11.0);
        assert!(is_close!(totals.sum(), 13.5));

        let doubled: SourceTotals = vec![totals, totals].into_iter().sum();
        assert!(is_close!(doubled.sum(), 27.0));
        assert_eq!(doubled.get(SourceCategory::Machinery), 0.0);
    }

    #[test]
    fn test_source_result_from_detail() {
        let result: SourceResult = IrrigationEmissions {
            water: 1.5,
            energy: 3.0,
            items: vec![],
        }
        .into();
        assert_eq!(result.category, SourceCategory::Irrigation);
        assert_eq!(result.total, 4.5);
    }

    #[test]
    fn test_agrochemical_by_category() {
        let item = |category, emissions| AgrochemicalItem {
            category,
            active_ingredient_name: "Average".to_string(),
            active_ingredient_quantity: 1.0,
            emission_factor: emissions,
            emissions,
        };
        let result = AgrochemicalEmissions {
            total: 6.0,
            items: vec![
                item(AgrochemicalCategory::Herbicide, 2.0),
                item(AgrochemicalCategory::Fungicide, 1.0),
                item(AgrochemicalCategory::Herbicide, 3.0),
            ],
        };
        assert_eq!(
            result.by_category(),
            vec![
                (AgrochemicalCategory::Fungicide, 1.0),
                (AgrochemicalCategory::Herbicide, 5.0)
            ]
        );
    }
}
