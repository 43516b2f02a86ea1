//! Activity records
//!
//! Plain input records built by the data-collection layer for one stage or
//! cycle. All quantities are per hectare and per period (one year or one
//! cycle); the stage duration scales them later.
//!
//! Each record has a `validate` method which is the input-validation boundary:
//! negative quantities and out-of-range percentages are rejected there, never
//! inside the calculators.

use crate::errors::{ensure_non_negative, ensure_within, AgroResult};
use crate::reference::ReferenceData;
use crate::units::{percent_to_fraction, FloatValue};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Fertilizers
// =============================================================================

/// Primary nutrient of a fertilizer entered as nutrient mass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nutrient {
    /// Nitrogen (N)
    N,
    /// Phosphate (P2O5)
    P,
    /// Potash (K2O)
    K,
}

/// Nutrient content of a fertilizer outside the catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NutrientContent {
    /// Quantity is product mass with the given nutrient percentages
    Percent {
        nitrogen_percent: FloatValue,
        #[serde(default)]
        phosphate_percent: FloatValue,
        #[serde(default)]
        potash_percent: FloatValue,
    },
    /// Quantity is the mass of a single nutrient
    Nutrient(Nutrient),
}

/// What kind of fertilizer an application is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FertilizerProduct {
    /// Manure, slurry, guano, compost...
    ///
    /// Missing dry fraction or N content default from the organic amendment
    /// catalogue.
    Organic {
        name: String,
        #[serde(default)]
        dry_fraction: Option<FloatValue>,
        #[serde(default)]
        nitrogen_percent: Option<FloatValue>,
        #[serde(default)]
        phosphate_percent: Option<FloatValue>,
        #[serde(default)]
        potash_percent: Option<FloatValue>,
    },
    /// A mineral fertilizer from the catalogue, optionally with its production origin
    InorganicCatalog {
        product: String,
        #[serde(default)]
        origin: Option<String>,
    },
    /// A mineral fertilizer described by the user
    InorganicOther {
        name: String,
        content: NutrientContent,
    },
}

impl FertilizerProduct {
    pub fn is_organic(&self) -> bool {
        matches!(self, FertilizerProduct::Organic { .. })
    }

    /// Display name of the product
    pub fn name(&self) -> &str {
        match self {
            FertilizerProduct::Organic { name, .. } => name,
            FertilizerProduct::InorganicCatalog { product, .. } => product,
            FertilizerProduct::InorganicOther { name, .. } => name,
        }
    }

    /// Production origin, only known for catalogue fertilizers
    pub fn origin(&self) -> Option<&str> {
        match self {
            FertilizerProduct::InorganicCatalog { origin, .. } => origin.as_deref(),
            _ => None,
        }
    }
}

/// One fertilizer entry in a stage or cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerApplication {
    pub product: FertilizerProduct,
    /// Applied quantity (fresh weight for organics, nutrient mass for
    /// [`NutrientContent::Nutrient`])
    /// unit: kg / ha per period
    pub quantity: FloatValue,
    /// Overrides the catalogue production factor when positive
    /// unit: kg CO2e / kg product
    #[serde(default)]
    pub custom_emission_factor: Option<FloatValue>,
}

impl FertilizerApplication {
    /// An organic amendment using the catalogue composition
    pub fn organic(name: impl Into<String>, quantity: FloatValue) -> Self {
        Self {
            product: FertilizerProduct::Organic {
                name: name.into(),
                dry_fraction: None,
                nitrogen_percent: None,
                phosphate_percent: None,
                potash_percent: None,
            },
            quantity,
            custom_emission_factor: None,
        }
    }

    /// A catalogue mineral fertilizer
    pub fn catalog(product: impl Into<String>, origin: Option<&str>, quantity: FloatValue) -> Self {
        Self {
            product: FertilizerProduct::InorganicCatalog {
                product: product.into(),
                origin: origin.map(str::to_string),
            },
            quantity,
            custom_emission_factor: None,
        }
    }

    /// A user-described mineral fertilizer
    pub fn other(name: impl Into<String>, content: NutrientContent, quantity: FloatValue) -> Self {
        Self {
            product: FertilizerProduct::InorganicOther {
                name: name.into(),
                content,
            },
            quantity,
            custom_emission_factor: None,
        }
    }

    pub fn with_emission_factor(mut self, factor: FloatValue) -> Self {
        self.custom_emission_factor = Some(factor);
        self
    }

    pub fn validate(&self) -> AgroResult<()> {
        ensure_non_negative("fertilizer quantity", self.quantity)?;
        if let Some(factor) = self.custom_emission_factor {
            ensure_non_negative("fertilizer emission factor", factor)?;
        }
        match &self.product {
            FertilizerProduct::Organic {
                dry_fraction,
                nitrogen_percent,
                phosphate_percent,
                potash_percent,
                ..
            } => {
                if let Some(v) = dry_fraction {
                    ensure_within("dry_fraction", *v, 1.0)?;
                }
                for (field, value) in [
                    ("nitrogen_percent", nitrogen_percent),
                    ("phosphate_percent", phosphate_percent),
                    ("potash_percent", potash_percent),
                ] {
                    if let Some(v) = value {
                        ensure_within(field, *v, 100.0)?;
                    }
                }
            }
            FertilizerProduct::InorganicOther {
                content:
                    NutrientContent::Percent {
                        nitrogen_percent,
                        phosphate_percent,
                        potash_percent,
                    },
                ..
            } => {
                ensure_within("nitrogen_percent", *nitrogen_percent, 100.0)?;
                ensure_within("phosphate_percent", *phosphate_percent, 100.0)?;
                ensure_within("potash_percent", *potash_percent, 100.0)?;
            }
            _ => {}
        }
        Ok(())
    }
}

// =============================================================================
// Agrochemicals
// =============================================================================

/// Class of plant-protection product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgrochemicalCategory {
    Pesticide,
    Fungicide,
    Insecticide,
    Herbicide,
}

impl fmt::Display for AgrochemicalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgrochemicalCategory::Pesticide => "pesticide",
            AgrochemicalCategory::Fungicide => "fungicide",
            AgrochemicalCategory::Insecticide => "insecticide",
            AgrochemicalCategory::Herbicide => "herbicide",
        };
        write!(f, "{}", name)
    }
}

/// How the applied amount of an agrochemical was entered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActiveIngredientAmount {
    /// Active ingredient mass
    /// unit: kg a.i. / ha per period
    ActiveIngredient(FloatValue),
    /// Commercial product mass and its active ingredient concentration
    CommercialProduct {
        /// unit: kg / ha per period
        quantity: FloatValue,
        /// unit: %
        concentration_percent: FloatValue,
    },
}

impl ActiveIngredientAmount {
    /// Active ingredient mass
    /// unit: kg a.i. / ha per period
    pub fn active_ingredient(&self) -> FloatValue {
        match self {
            ActiveIngredientAmount::ActiveIngredient(quantity) => *quantity,
            ActiveIngredientAmount::CommercialProduct {
                quantity,
                concentration_percent,
            } => quantity * percent_to_fraction(*concentration_percent),
        }
    }
}

/// One pesticide, fungicide, insecticide or herbicide entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgrochemicalApplication {
    pub category: AgrochemicalCategory,
    /// Catalogue name of the active ingredient, or "Average" for the category mean
    pub active_ingredient_name: String,
    pub amount: ActiveIngredientAmount,
    /// Overrides the catalogue factor when positive
    /// unit: kg CO2e / kg a.i.
    #[serde(default)]
    pub emission_factor: Option<FloatValue>,
}

impl AgrochemicalApplication {
    pub fn new(
        category: AgrochemicalCategory,
        active_ingredient_name: impl Into<String>,
        amount: ActiveIngredientAmount,
    ) -> Self {
        Self {
            category,
            active_ingredient_name: active_ingredient_name.into(),
            amount,
            emission_factor: None,
        }
    }

    pub fn with_emission_factor(mut self, factor: FloatValue) -> Self {
        self.emission_factor = Some(factor);
        self
    }

    /// unit: kg a.i. / ha per period
    pub fn active_ingredient_quantity(&self) -> FloatValue {
        self.amount.active_ingredient()
    }

    pub fn validate(&self) -> AgroResult<()> {
        match self.amount {
            ActiveIngredientAmount::ActiveIngredient(quantity) => {
                ensure_non_negative("active ingredient quantity", quantity)?
            }
            ActiveIngredientAmount::CommercialProduct {
                quantity,
                concentration_percent,
            } => {
                ensure_non_negative("commercial product quantity", quantity)?;
                ensure_within("concentration_percent", concentration_percent, 100.0)?;
            }
        }
        if let Some(factor) = self.emission_factor {
            ensure_non_negative("agrochemical emission factor", factor)?;
        }
        Ok(())
    }
}

// =============================================================================
// Machinery
// =============================================================================

/// Machine name used for labour done by hand
pub const MANUAL: &str = "Manual";

/// Fuel type recorded for manual labour
pub const NO_FUEL: &str = "N/A";

/// How the fuel consumption of a machinery pass was entered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FuelUse {
    /// No machine involved
    Manual,
    /// Litres per pass, repeated `passes` times
    Litres { litres_per_pass: FloatValue, passes: u32 },
    /// Hours per pass at a fuel rate, repeated `passes` times
    ///
    /// A missing fuel rate defaults from the machinery catalogue.
    Hours {
        hours_per_pass: FloatValue,
        #[serde(default)]
        fuel_rate: Option<FloatValue>,
        passes: u32,
    },
}

/// One labour + machine + fuel combination within a stage or cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineryPass {
    pub labor_name: String,
    pub machine_name: String,
    pub fuel_type: String,
    pub fuel_use: FuelUse,
    /// Overrides the catalogue fuel factor when positive
    /// unit: kg CO2e / L
    #[serde(default)]
    pub emission_factor_override: Option<FloatValue>,
}

impl MachineryPass {
    /// A mechanised pass
    pub fn new(
        labor_name: impl Into<String>,
        machine_name: impl Into<String>,
        fuel_type: impl Into<String>,
        fuel_use: FuelUse,
    ) -> Self {
        Self {
            labor_name: labor_name.into(),
            machine_name: machine_name.into(),
            fuel_type: fuel_type.into(),
            fuel_use,
            emission_factor_override: None,
        }
    }

    /// Labour done by hand
    pub fn manual(labor_name: impl Into<String>) -> Self {
        Self::new(labor_name, MANUAL, NO_FUEL, FuelUse::Manual)
    }

    pub fn with_emission_factor(mut self, factor: FloatValue) -> Self {
        self.emission_factor_override = Some(factor);
        self
    }

    pub fn is_manual(&self) -> bool {
        matches!(self.fuel_use, FuelUse::Manual) || self.machine_name == MANUAL
    }

    /// Fuel used over all passes
    /// unit: L / ha per period
    pub fn litres(&self, reference: &ReferenceData) -> FloatValue {
        if self.is_manual() {
            return 0.0;
        }
        match self.fuel_use {
            FuelUse::Manual => 0.0,
            FuelUse::Litres {
                litres_per_pass,
                passes,
            } => litres_per_pass * FloatValue::from(passes),
            FuelUse::Hours {
                hours_per_pass,
                fuel_rate,
                passes,
            } => {
                let rate =
                    fuel_rate.unwrap_or_else(|| reference.machinery_fuel_rate(&self.machine_name));
                hours_per_pass * rate * FloatValue::from(passes)
            }
        }
    }

    pub fn validate(&self) -> AgroResult<()> {
        match self.fuel_use {
            FuelUse::Manual => {}
            FuelUse::Litres {
                litres_per_pass, ..
            } => ensure_non_negative("litres per pass", litres_per_pass)?,
            FuelUse::Hours {
                hours_per_pass,
                fuel_rate,
                ..
            } => {
                ensure_non_negative("hours per pass", hours_per_pass)?;
                if let Some(rate) = fuel_rate {
                    ensure_non_negative("fuel rate", rate)?;
                }
            }
        }
        if let Some(factor) = self.emission_factor_override {
            ensure_non_negative("fuel emission factor", factor)?;
        }
        Ok(())
    }
}

// =============================================================================
// Irrigation and energy
// =============================================================================

/// How the energy used by an irrigation activity was entered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnergyUse {
    /// Total consumption: kWh for electricity, litres for fuels
    Consumption(FloatValue),
    /// Power and running time
    ///
    /// Fuel-driven engines convert kWh to litres with `engine_efficiency`
    /// (L/kWh), defaulting to the catalogue value. Electric equipment ignores it.
    PowerHours {
        power_kw: FloatValue,
        hours: FloatValue,
        #[serde(default)]
        engine_efficiency: Option<FloatValue>,
    },
}

/// One irrigation or pumping activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationEnergyActivity {
    pub activity_name: String,
    /// unit: m3 / ha per period
    pub water_volume_m3: FloatValue,
    /// Fuel key or [`crate::reference::ELECTRIC`]
    pub energy_type: String,
    pub energy_use: EnergyUse,
    /// Overrides the catalogue factor when present
    /// unit: kg CO2e / kWh or kg CO2e / L
    #[serde(default)]
    pub emission_factor: Option<FloatValue>,
}

impl IrrigationEnergyActivity {
    pub fn new(
        activity_name: impl Into<String>,
        water_volume_m3: FloatValue,
        energy_type: impl Into<String>,
        energy_use: EnergyUse,
    ) -> Self {
        Self {
            activity_name: activity_name.into(),
            water_volume_m3,
            energy_type: energy_type.into(),
            energy_use,
            emission_factor: None,
        }
    }

    pub fn with_emission_factor(mut self, factor: FloatValue) -> Self {
        self.emission_factor = Some(factor);
        self
    }

    pub fn is_electric(&self) -> bool {
        self.energy_type == crate::reference::ELECTRIC
    }

    /// Energy consumed
    /// unit: kWh (electric) or L (fuels) per ha per period
    pub fn energy_consumed(&self, reference: &ReferenceData) -> FloatValue {
        match self.energy_use {
            EnergyUse::Consumption(amount) => amount,
            EnergyUse::PowerHours {
                power_kw, hours, ..
            } if self.is_electric() => power_kw * hours,
            EnergyUse::PowerHours {
                power_kw,
                hours,
                engine_efficiency,
            } => {
                let efficiency = engine_efficiency.unwrap_or(reference.generic.engine_efficiency);
                power_kw * hours * efficiency
            }
        }
    }

    pub fn validate(&self) -> AgroResult<()> {
        ensure_non_negative("water volume", self.water_volume_m3)?;
        match self.energy_use {
            EnergyUse::Consumption(amount) => ensure_non_negative("energy consumption", amount)?,
            EnergyUse::PowerHours {
                power_kw,
                hours,
                engine_efficiency,
            } => {
                ensure_non_negative("power", power_kw)?;
                ensure_non_negative("hours", hours)?;
                if let Some(efficiency) = engine_efficiency {
                    ensure_non_negative("engine efficiency", efficiency)?;
                }
            }
        }
        if let Some(factor) = self.emission_factor {
            ensure_non_negative("energy emission factor", factor)?;
        }
        Ok(())
    }
}

// =============================================================================
// Crop residues
// =============================================================================

/// Fate of crop residues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResiduePathway {
    Burning,
    Composting,
    SoilIncorporation,
    FieldRemoval,
    Unmanaged,
}

impl fmt::Display for ResiduePathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResiduePathway::Burning => "Burning",
            ResiduePathway::Composting => "Composting",
            ResiduePathway::SoilIncorporation => "SoilIncorporation",
            ResiduePathway::FieldRemoval => "FieldRemoval",
            ResiduePathway::Unmanaged => "Unmanaged",
        };
        write!(f, "{}", name)
    }
}

/// Composting conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompostingMode {
    #[default]
    Aerobic,
    Anaerobic,
}

/// Optional burning adjustments; `None` uses the Tier-1 default
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BurningAdjustments {
    #[serde(default)]
    pub dry_fraction: Option<FloatValue>,
    #[serde(default)]
    pub burned_fraction: Option<FloatValue>,
    /// unit: kg CH4 / kg dry matter
    #[serde(default)]
    pub ch4_factor: Option<FloatValue>,
    /// unit: kg N2O / kg dry matter
    #[serde(default)]
    pub n2o_factor: Option<FloatValue>,
}

/// Optional composting adjustments
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CompostingAdjustments {
    #[serde(default)]
    pub mode: CompostingMode,
    #[serde(default)]
    pub dry_fraction: Option<FloatValue>,
}

/// Biomass sent down one pathway, with the pathway's own adjustments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResidueTreatment {
    Burning {
        /// unit: kg fresh / ha
        biomass: FloatValue,
        #[serde(default)]
        adjustments: BurningAdjustments,
    },
    Composting {
        biomass: FloatValue,
        #[serde(default)]
        adjustments: CompostingAdjustments,
    },
    SoilIncorporation {
        biomass: FloatValue,
    },
    FieldRemoval {
        biomass: FloatValue,
        #[serde(default)]
        destination: Option<String>,
    },
    Unmanaged {
        biomass: FloatValue,
    },
}

impl ResidueTreatment {
    /// Treatment of `biomass` along `pathway` with default adjustments
    pub fn with_defaults(pathway: ResiduePathway, biomass: FloatValue) -> Self {
        match pathway {
            ResiduePathway::Burning => ResidueTreatment::Burning {
                biomass,
                adjustments: BurningAdjustments::default(),
            },
            ResiduePathway::Composting => ResidueTreatment::Composting {
                biomass,
                adjustments: CompostingAdjustments::default(),
            },
            ResiduePathway::SoilIncorporation => ResidueTreatment::SoilIncorporation { biomass },
            ResiduePathway::FieldRemoval => ResidueTreatment::FieldRemoval {
                biomass,
                destination: None,
            },
            ResiduePathway::Unmanaged => ResidueTreatment::Unmanaged { biomass },
        }
    }

    pub fn pathway(&self) -> ResiduePathway {
        match self {
            ResidueTreatment::Burning { .. } => ResiduePathway::Burning,
            ResidueTreatment::Composting { .. } => ResiduePathway::Composting,
            ResidueTreatment::SoilIncorporation { .. } => ResiduePathway::SoilIncorporation,
            ResidueTreatment::FieldRemoval { .. } => ResiduePathway::FieldRemoval,
            ResidueTreatment::Unmanaged { .. } => ResiduePathway::Unmanaged,
        }
    }

    /// unit: kg fresh / ha
    pub fn biomass(&self) -> FloatValue {
        match self {
            ResidueTreatment::Burning { biomass, .. }
            | ResidueTreatment::Composting { biomass, .. }
            | ResidueTreatment::SoilIncorporation { biomass }
            | ResidueTreatment::FieldRemoval { biomass, .. }
            | ResidueTreatment::Unmanaged { biomass } => *biomass,
        }
    }

    fn set_biomass(&mut self, value: FloatValue) {
        match self {
            ResidueTreatment::Burning { biomass, .. }
            | ResidueTreatment::Composting { biomass, .. }
            | ResidueTreatment::SoilIncorporation { biomass }
            | ResidueTreatment::FieldRemoval { biomass, .. }
            | ResidueTreatment::Unmanaged { biomass } => *biomass = value,
        }
    }

    pub fn validate(&self) -> AgroResult<()> {
        ensure_non_negative("residue biomass", self.biomass())?;
        match self {
            ResidueTreatment::Burning { adjustments, .. } => {
                if let Some(v) = adjustments.dry_fraction {
                    ensure_within("dry_fraction", v, 1.0)?;
                }
                if let Some(v) = adjustments.burned_fraction {
                    ensure_within("burned_fraction", v, 1.0)?;
                }
                if let Some(v) = adjustments.ch4_factor {
                    ensure_non_negative("ch4_factor", v)?;
                }
                if let Some(v) = adjustments.n2o_factor {
                    ensure_non_negative("n2o_factor", v)?;
                }
            }
            ResidueTreatment::Composting { adjustments, .. } => {
                if let Some(v) = adjustments.dry_fraction {
                    ensure_within("dry_fraction", v, 1.0)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// How residue allocations were entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationMode {
    /// Share of the generated biomass, in %
    Percent,
    /// Mass of biomass, in kg / ha
    Kilograms,
}

/// Whether the allocations cover the generated biomass
///
/// Values are expressed in the unit of the [`AllocationMode`] used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AllocationStatus {
    Complete,
    /// Part of the biomass was not allocated
    Shortfall(FloatValue),
    /// More than the generated biomass was allocated
    Excess(FloatValue),
}

/// Crop residue management of one stage or cycle
///
/// Treatments keep their insertion order. Allocation need not be
/// exhaustive; biomass not allocated anywhere is implicitly unmanaged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResidueManagement {
    /// Biomass generated by the crop
    /// unit: kg fresh / ha
    #[serde(default)]
    pub generated_biomass: FloatValue,
    #[serde(default)]
    pub treatments: Vec<ResidueTreatment>,
}

impl ResidueManagement {
    pub fn new(generated_biomass: FloatValue) -> Self {
        Self {
            generated_biomass,
            treatments: vec![],
        }
    }

    pub fn with_treatment(mut self, treatment: ResidueTreatment) -> Self {
        self.treatments.push(treatment);
        self
    }

    /// Build the management record from allocations of the generated biomass.
    ///
    /// Allocations are percentages or kilograms depending on `mode`. When at
    /// least one allocation is given and the total falls short, the remainder
    /// is recorded as [`ResiduePathway::Unmanaged`]. An excess is kept as
    /// given: values are never clamped.
    pub fn from_allocations(
        generated_biomass: FloatValue,
        mode: AllocationMode,
        allocations: &[(ResidueTreatment, FloatValue)],
    ) -> (Self, AllocationStatus) {
        let mut management = Self::new(generated_biomass);
        let mut allocated = 0.0;
        for (treatment, value) in allocations {
            let biomass = match mode {
                AllocationMode::Percent => generated_biomass * percent_to_fraction(*value),
                AllocationMode::Kilograms => *value,
            };
            let mut treatment = treatment.clone();
            treatment.set_biomass(biomass);
            management.treatments.push(treatment);
            allocated += value;
        }

        let expected = match mode {
            AllocationMode::Percent => 100.0,
            AllocationMode::Kilograms => generated_biomass,
        };
        let missing = expected - allocated;
        let status = if missing > 0.0 {
            if !allocations.is_empty() {
                let biomass = match mode {
                    AllocationMode::Percent => generated_biomass * percent_to_fraction(missing),
                    AllocationMode::Kilograms => missing,
                };
                log::warn!(
                    "Residue allocation is short by {}; {} kg/ha recorded as unmanaged",
                    missing,
                    biomass
                );
                management
                    .treatments
                    .push(ResidueTreatment::Unmanaged { biomass });
            }
            AllocationStatus::Shortfall(missing)
        } else if missing < 0.0 {
            log::warn!(
                "Residue allocation exceeds the generated biomass by {}",
                -missing
            );
            AllocationStatus::Excess(-missing)
        } else {
            AllocationStatus::Complete
        };
        (management, status)
    }

    /// Sum of biomass over all treatments
    pub fn allocated_biomass(&self) -> FloatValue {
        self.treatments.iter().map(ResidueTreatment::biomass).sum()
    }

    /// Compare allocated biomass to generated biomass (in kg)
    pub fn allocation_status(&self) -> AllocationStatus {
        let missing = self.generated_biomass - self.allocated_biomass();
        if missing > 0.0 {
            AllocationStatus::Shortfall(missing)
        } else if missing < 0.0 {
            AllocationStatus::Excess(-missing)
        } else {
            AllocationStatus::Complete
        }
    }

    pub fn is_empty(&self) -> bool {
        self.treatments.is_empty()
    }

    pub fn validate(&self) -> AgroResult<()> {
        ensure_non_negative("generated biomass", self.generated_biomass)?;
        self.treatments
            .iter()
            .try_for_each(ResidueTreatment::validate)
    }
}

// =============================================================================
// All activity data of one period
// =============================================================================

/// Activity records of one period (a year or a cycle) of a stage
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActivityData {
    #[serde(default)]
    pub fertilizers: Vec<FertilizerApplication>,
    #[serde(default)]
    pub agrochemicals: Vec<AgrochemicalApplication>,
    #[serde(default)]
    pub machinery: Vec<MachineryPass>,
    #[serde(default)]
    pub irrigation: Vec<IrrigationEnergyActivity>,
    #[serde(default)]
    pub residues: ResidueManagement,
}

impl ActivityData {
    pub fn validate(&self) -> AgroResult<()> {
        self.fertilizers
            .iter()
            .try_for_each(FertilizerApplication::validate)?;
        self.agrochemicals
            .iter()
            .try_for_each(AgrochemicalApplication::validate)?;
        self.machinery.iter().try_for_each(MachineryPass::validate)?;
        self.irrigation
            .iter()
            .try_for_each(IrrigationEnergyActivity::validate)?;
        self.residues.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::REFERENCE_DATA;
    use is_close::is_close;

    #[test]
    fn test_commercial_product_active_ingredient() {
        let amount = ActiveIngredientAmount::CommercialProduct {
            quantity: 2.0,
            concentration_percent: 48.0,
        };
        assert!(is_close!(amount.active_ingredient(), 0.96));
        assert!(is_close!(
            ActiveIngredientAmount::ActiveIngredient(1.5).active_ingredient(),
            1.5
        ));
    }

    #[test]
    fn test_machinery_litres() {
        let direct = MachineryPass::new(
            "Harvest",
            "Tractor",
            "Diesel (100% mineral)",
            FuelUse::Litres {
                litres_per_pass: 12.0,
                passes: 3,
            },
        );
        assert!(is_close!(direct.litres(&REFERENCE_DATA), 36.0));

        let hours_default_rate = MachineryPass::new(
            "Harvest",
            "Harvester",
            "Diesel (100% mineral)",
            FuelUse::Hours {
                hours_per_pass: 2.0,
                fuel_rate: None,
                passes: 2,
            },
        );
        assert!(is_close!(hours_default_rate.litres(&REFERENCE_DATA), 60.0));

        let hours_custom_rate = MachineryPass::new(
            "Spraying",
            "Sprayer",
            "Petrol (100% mineral)",
            FuelUse::Hours {
                hours_per_pass: 1.5,
                fuel_rate: Some(6.0),
                passes: 4,
            },
        );
        assert!(is_close!(hours_custom_rate.litres(&REFERENCE_DATA), 36.0));
    }

    #[test]
    fn test_manual_pass_uses_no_fuel() {
        let manual = MachineryPass::manual("Pruning");
        assert!(manual.is_manual());
        assert_eq!(manual.fuel_type, NO_FUEL);
        assert_eq!(manual.litres(&REFERENCE_DATA), 0.0);
    }

    #[test]
    fn test_energy_consumed() {
        let electric = IrrigationEnergyActivity::new(
            "Drip",
            500.0,
            "Electric",
            EnergyUse::PowerHours {
                power_kw: 5.0,
                hours: 100.0,
                engine_efficiency: Some(0.3),
            },
        );
        // Efficiency only applies to fuel engines
        assert!(is_close!(electric.energy_consumed(&REFERENCE_DATA), 500.0));

        let diesel = IrrigationEnergyActivity::new(
            "Sprinkler",
            0.0,
            "Diesel (100% mineral)",
            EnergyUse::PowerHours {
                power_kw: 5.0,
                hours: 100.0,
                engine_efficiency: None,
            },
        );
        assert!(is_close!(diesel.energy_consumed(&REFERENCE_DATA), 125.0));
    }

    #[test]
    fn test_allocation_percent_shortfall() {
        let (management, status) = ResidueManagement::from_allocations(
            1000.0,
            AllocationMode::Percent,
            &[(
                ResidueTreatment::with_defaults(ResiduePathway::Burning, 0.0),
                60.0,
            )],
        );
        assert_eq!(status, AllocationStatus::Shortfall(40.0));
        assert_eq!(management.treatments.len(), 2);
        assert!(is_close!(management.treatments[0].biomass(), 600.0));
        assert_eq!(management.treatments[1].pathway(), ResiduePathway::Unmanaged);
        assert!(is_close!(management.treatments[1].biomass(), 400.0));
        assert_eq!(management.allocation_status(), AllocationStatus::Complete);
    }

    #[test]
    fn test_allocation_excess_is_not_clamped() {
        let (management, status) = ResidueManagement::from_allocations(
            1000.0,
            AllocationMode::Kilograms,
            &[
                (
                    ResidueTreatment::with_defaults(ResiduePathway::Composting, 0.0),
                    800.0,
                ),
                (
                    ResidueTreatment::with_defaults(ResiduePathway::FieldRemoval, 0.0),
                    500.0,
                ),
            ],
        );
        assert_eq!(status, AllocationStatus::Excess(300.0));
        assert!(is_close!(management.allocated_biomass(), 1300.0));
        assert_eq!(management.allocation_status(), AllocationStatus::Excess(300.0));
    }

    #[test]
    fn test_empty_allocation_adds_nothing() {
        let (management, status) =
            ResidueManagement::from_allocations(1000.0, AllocationMode::Percent, &[]);
        assert!(management.is_empty());
        assert_eq!(status, AllocationStatus::Shortfall(100.0));
    }

    #[test]
    fn test_validation_rejects_negative_quantities() {
        let fertilizer = FertilizerApplication::catalog("Urea", None, -1.0);
        assert!(fertilizer.validate().is_err());

        let organic = FertilizerApplication {
            product: FertilizerProduct::Organic {
                name: "Compost".to_string(),
                dry_fraction: Some(1.5),
                nitrogen_percent: None,
                phosphate_percent: None,
                potash_percent: None,
            },
            quantity: 10.0,
            custom_emission_factor: None,
        };
        assert!(organic.validate().is_err());

        let activities = ActivityData {
            residues: ResidueManagement::new(100.0).with_treatment(ResidueTreatment::Burning {
                biomass: 50.0,
                adjustments: BurningAdjustments {
                    burned_fraction: Some(2.0),
                    ..Default::default()
                },
            }),
            ..Default::default()
        };
        assert!(activities.validate().is_err());
        assert!(ActivityData::default().validate().is_ok());
    }
}
