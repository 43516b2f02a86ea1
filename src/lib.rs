//! Cradle-to-farm-gate greenhouse-gas footprints of fruit production.
//!
//! A crop is described as a series of stages (or cycles for annual crops),
//! each holding per-hectare activity data: fertilizers, agrochemicals,
//! irrigation and pumping energy, machinery fuel and crop residue management.
//! Every stage is run through the IPCC Tier-1 calculators and the results are
//! aggregated per source, per stage and per kg of harvested fruit.
//!
//! ```no_run
//! use agroprint::activity::{ActivityData, FertilizerApplication};
//! use agroprint::model::{Period, Stage, StageKind};
//! use agroprint::reference::REFERENCE_DATA;
//!
//! let activities = ActivityData {
//!     fertilizers: vec![FertilizerApplication::catalog("Urea", Some("Average"), 200.0)],
//!     ..Default::default()
//! };
//! let scenario = agroprint::scenario_builder()
//!     .with_stage(Stage::uniform(
//!         "Production",
//!         StageKind::Production,
//!         10,
//!         Period::new(25000.0, activities),
//!     ))
//!     .build()
//!     .unwrap();
//! let result = scenario.run(&REFERENCE_DATA);
//! println!("{:.1} kg CO2e/ha, {:?} kg CO2e/kg", result.total(), result.intensity());
//! ```

pub use agroprint_components::{calculators, default_sources, parameters};
pub use agroprint_core::{activity, component, errors, gwp, model, reference, results, units};

use agroprint_core::model::ScenarioBuilder;

#[cfg(feature = "python")]
mod python;

/// A scenario builder with every calculator registered with default parameters
pub fn scenario_builder() -> ScenarioBuilder {
    let mut builder = ScenarioBuilder::new();
    builder.with_sources(default_sources());
    builder
}
