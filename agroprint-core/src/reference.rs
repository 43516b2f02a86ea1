//! Reference data tables
//!
//! The emission-factor catalogue is a versioned, read-only data asset kept
//! separate from the calculation code. The default catalogue is embedded at
//! compile time from `data/reference.toml` and exposed through
//! [`REFERENCE_DATA`]; alternative catalogues with the same schema can be
//! loaded with [`ReferenceData::from_toml_str`] or [`ReferenceData::from_path`].
//!
//! Lookups never fail. A key that is not in the catalogue resolves to a
//! documented generic default (or to zero where there is no sensible
//! default), and the fallback is logged at debug level.

use crate::activity::AgrochemicalCategory;
use crate::errors::AgroResult;
use crate::units::FloatValue;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

/// Key of the electricity entry in the fuel table
pub const ELECTRIC: &str = "Electric";

/// Key of the generic organic amendment entry
pub const OTHER_ORGANIC: &str = "Other";

const EMBEDDED_REFERENCE_DATA: &str = include_str!("../data/reference.toml");

/// The embedded reference catalogue
///
/// Parsed once on first use.
pub static REFERENCE_DATA: LazyLock<ReferenceData> = LazyLock::new(|| {
    ReferenceData::embedded().expect("embedded reference data must match the ReferenceData schema")
});

/// Generic factors used when a catalogue lookup misses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericFactors {
    /// Fuel or energy type not present in the fuel table
    /// unit: kg CO2e / L
    pub fuel: FloatValue,
    /// Grid electricity, used when the fuel table has no electric entry
    /// unit: kg CO2e / kWh
    pub electricity: FloatValue,
    /// Irrigation water
    /// unit: kg CO2e / L
    pub water: FloatValue,
    /// Agrochemical active ingredient with no catalogue entry
    /// unit: kg CO2e / kg a.i.
    pub agrochemical: FloatValue,
    /// Fuel use of combustion engines driving pumps
    /// unit: L / kWh
    pub engine_efficiency: FloatValue,
    /// Fuel rate of machinery with no catalogue entry
    /// unit: L / h
    pub machinery_fuel_rate: FloatValue,
}

/// Production factors for one class of agrochemical
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgrochemicalTable {
    /// Category average
    /// unit: kg CO2e / kg a.i.
    pub average: FloatValue,
    /// Factors for individual active ingredients
    /// unit: kg CO2e / kg a.i.
    #[serde(default)]
    pub active_ingredients: BTreeMap<String, FloatValue>,
}

/// Agrochemical factors grouped by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgrochemicalCatalogue {
    pub pesticide: AgrochemicalTable,
    pub fungicide: AgrochemicalTable,
    pub insecticide: AgrochemicalTable,
    pub herbicide: AgrochemicalTable,
}

impl AgrochemicalCatalogue {
    pub fn table(&self, category: AgrochemicalCategory) -> &AgrochemicalTable {
        match category {
            AgrochemicalCategory::Pesticide => &self.pesticide,
            AgrochemicalCategory::Fungicide => &self.fungicide,
            AgrochemicalCategory::Insecticide => &self.insecticide,
            AgrochemicalCategory::Herbicide => &self.herbicide,
        }
    }
}

/// Typical composition of an organic amendment (manure, guano, compost...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicAmendment {
    /// Dry matter share of the fresh mass
    /// unit: fraction
    pub dry_fraction: FloatValue,
    /// unit: % of fresh weight
    pub nitrogen_percent: FloatValue,
    /// unit: % of fresh weight
    pub phosphate_percent: FloatValue,
    /// unit: % of fresh weight
    pub potash_percent: FloatValue,
    #[serde(default)]
    pub source: String,
}

/// One regional production variant of a catalogue mineral fertilizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerVariant {
    /// Region or production route
    pub origin: String,
    /// Nitrogen content
    /// unit: kg N / kg product
    pub nitrogen_fraction: FloatValue,
    /// Share of applied N lost through volatilisation
    pub volatilisation_fraction: FloatValue,
    /// Share of applied N lost through leaching and runoff
    pub leaching_fraction: FloatValue,
    /// Embodied production emissions
    /// unit: kg CO2e / kg product
    pub production_factor: FloatValue,
    #[serde(default)]
    pub source: String,
}

/// The full emission-factor catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Version label of the dataset
    pub version: String,
    pub generic: GenericFactors,
    /// Combustion factors per fuel (and per kWh for [`ELECTRIC`])
    pub fuels: BTreeMap<String, FloatValue>,
    /// Default fuel rates per machine type
    /// unit: L / h
    pub machinery: BTreeMap<String, FloatValue>,
    pub agrochemicals: AgrochemicalCatalogue,
    pub organic_amendments: BTreeMap<String, OrganicAmendment>,
    /// Regional variants per mineral fertilizer, in catalogue order
    pub mineral_fertilizers: BTreeMap<String, Vec<FertilizerVariant>>,
}

impl ReferenceData {
    /// Parse the catalogue shipped with the crate
    pub fn embedded() -> AgroResult<Self> {
        Self::from_toml_str(EMBEDDED_REFERENCE_DATA)
    }

    /// Parse a catalogue from TOML
    pub fn from_toml_str(content: &str) -> AgroResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a catalogue file
    pub fn from_path(path: impl AsRef<Path>) -> AgroResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialise the catalogue back to TOML
    pub fn to_toml(&self) -> AgroResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Combustion factor of a machinery fuel
    ///
    /// Unknown fuels (including `"N/A"` for manual labour) contribute nothing.
    pub fn fuel_factor(&self, fuel: &str) -> FloatValue {
        match self.fuels.get(fuel) {
            Some(factor) => *factor,
            None => {
                debug!("Unknown fuel '{}', using a factor of 0", fuel);
                0.0
            }
        }
    }

    /// Emission factor of an energy source used for pumping
    ///
    /// Falls back to grid electricity for [`ELECTRIC`] and to the generic
    /// fuel factor otherwise.
    pub fn energy_factor(&self, energy: &str) -> FloatValue {
        match self.fuels.get(energy) {
            Some(factor) => *factor,
            None if energy == ELECTRIC => self.generic.electricity,
            None => {
                debug!(
                    "Unknown energy type '{}', using generic factor {}",
                    energy, self.generic.fuel
                );
                self.generic.fuel
            }
        }
    }

    /// Default fuel rate of a machine type
    pub fn machinery_fuel_rate(&self, machine: &str) -> FloatValue {
        match self.machinery.get(machine) {
            Some(rate) => *rate,
            None => {
                debug!(
                    "Unknown machine '{}', using generic fuel rate {}",
                    machine, self.generic.machinery_fuel_rate
                );
                self.generic.machinery_fuel_rate
            }
        }
    }

    /// Production factor of an agrochemical active ingredient
    ///
    /// Resolution order: named active ingredient in its category, the
    /// category average (when no name, or the name "Average", is given), then
    /// the generic agrochemical factor.
    pub fn agrochemical_factor(&self, category: AgrochemicalCategory, name: &str) -> FloatValue {
        let table = self.agrochemicals.table(category);
        let name = name.trim();
        if let Some(factor) = table.active_ingredients.get(name) {
            return *factor;
        }
        if name.is_empty() || name.eq_ignore_ascii_case("average") {
            return table.average;
        }
        debug!(
            "Unknown {} '{}', using generic factor {}",
            category, name, self.generic.agrochemical
        );
        self.generic.agrochemical
    }

    /// Composition of an organic amendment, falling back to [`OTHER_ORGANIC`]
    pub fn organic_amendment(&self, name: &str) -> Option<&OrganicAmendment> {
        self.organic_amendments.get(name).or_else(|| {
            debug!("Unknown organic amendment '{}', using '{}'", name, OTHER_ORGANIC);
            self.organic_amendments.get(OTHER_ORGANIC)
        })
    }

    /// Variant of a catalogue mineral fertilizer
    ///
    /// An unmatched (or missing) origin falls back to the first variant of
    /// the product. An unknown product yields `None`.
    pub fn fertilizer_variant(&self, product: &str, origin: Option<&str>) -> Option<&FertilizerVariant> {
        let variants = self.mineral_fertilizers.get(product)?;
        origin
            .and_then(|origin| variants.iter().find(|v| v.origin == origin))
            .or_else(|| {
                debug!(
                    "Origin {:?} not found for '{}', using the first variant",
                    origin, product
                );
                variants.first()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn test_embedded_parses() {
        let data = ReferenceData::embedded().unwrap();
        assert!(!data.fuels.is_empty());
        assert!(!data.mineral_fertilizers.is_empty());
        assert!(data.organic_amendments.contains_key(OTHER_ORGANIC));
    }

    #[test]
    fn test_all_factors_non_negative() {
        let data = &*REFERENCE_DATA;
        assert!(data.fuels.values().all(|v| *v >= 0.0));
        assert!(data.machinery.values().all(|v| *v >= 0.0));
        for variants in data.mineral_fertilizers.values() {
            for v in variants {
                assert!(v.production_factor >= 0.0, "{}", v.origin);
                assert!((0.0..=1.0).contains(&v.nitrogen_fraction));
                assert!((0.0..=1.0).contains(&v.volatilisation_fraction));
                assert!((0.0..=1.0).contains(&v.leaching_fraction));
            }
        }
        for amendment in data.organic_amendments.values() {
            assert!((0.0..=1.0).contains(&amendment.dry_fraction));
        }
    }

    #[test]
    fn test_urea_average_variant() {
        let urea = REFERENCE_DATA
            .fertilizer_variant("Urea", Some("Average"))
            .unwrap();
        assert!(is_close!(urea.nitrogen_fraction, 0.46));
        assert!(is_close!(urea.volatilisation_fraction, 0.15));
        assert!(is_close!(urea.leaching_fraction, 0.24));
        assert!(is_close!(urea.production_factor, 1.864));
    }

    #[test]
    fn test_unmatched_origin_uses_first_variant() {
        let variant = REFERENCE_DATA
            .fertilizer_variant("Urea", Some("Atlantis"))
            .unwrap();
        assert_eq!(variant.origin, "European Union");

        let variant = REFERENCE_DATA.fertilizer_variant("Urea", None).unwrap();
        assert_eq!(variant.origin, "European Union");
    }

    #[test]
    fn test_unknown_fertilizer() {
        assert!(REFERENCE_DATA.fertilizer_variant("Moon dust", None).is_none());
    }

    #[test]
    fn test_fuel_fallbacks() {
        let data = &*REFERENCE_DATA;
        assert!(is_close!(data.fuel_factor("Diesel (100% mineral)"), 2.66155));
        assert_eq!(data.fuel_factor("N/A"), 0.0);
        assert!(is_close!(data.energy_factor("Rocket fuel"), data.generic.fuel));
        assert!(is_close!(data.energy_factor(ELECTRIC), 0.2021));
    }

    #[test]
    fn test_electric_falls_back_to_grid_factor() {
        let mut data = REFERENCE_DATA.clone();
        data.fuels.remove(ELECTRIC);
        data.generic.electricity = 0.5;
        assert!(is_close!(data.energy_factor(ELECTRIC), 0.5));
    }

    #[test]
    fn test_agrochemical_lookup() {
        let data = &*REFERENCE_DATA;
        assert!(is_close!(
            data.agrochemical_factor(AgrochemicalCategory::Herbicide, "Glyphosate"),
            9.1
        ));
        assert!(is_close!(
            data.agrochemical_factor(AgrochemicalCategory::Fungicide, "Average"),
            3.9
        ));
        assert!(is_close!(
            data.agrochemical_factor(AgrochemicalCategory::Pesticide, ""),
            5.1
        ));
        assert!(is_close!(
            data.agrochemical_factor(AgrochemicalCategory::Insecticide, "Unknown"),
            5.0
        ));
    }

    #[test]
    fn test_machinery_rates() {
        let data = &*REFERENCE_DATA;
        assert!(is_close!(data.machinery_fuel_rate("Harvester"), 15.0));
        assert!(is_close!(data.machinery_fuel_rate("Quad bike"), 10.0));
    }

    #[test]
    fn test_organic_fallback() {
        let data = &*REFERENCE_DATA;
        let manure = data.organic_amendment("Solid cattle manure").unwrap();
        assert!(is_close!(manure.dry_fraction, 0.215));
        let other = data.organic_amendment("Local compost").unwrap();
        assert!(is_close!(other.nitrogen_percent, 0.0));
        assert!(is_close!(other.dry_fraction, 1.0));
    }

    #[test]
    fn test_toml_roundtrip() {
        let data = &*REFERENCE_DATA;
        let serialised = data.to_toml().unwrap();
        let parsed = ReferenceData::from_toml_str(&serialised).unwrap();
        assert_eq!(&parsed, data);
    }
}
