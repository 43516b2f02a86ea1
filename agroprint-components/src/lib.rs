//! Emission calculators for cradle-to-farm-gate fruit footprints.
//!
//! Each calculator implements [`EmissionSource`] for one source category and
//! can also be called directly through its `calculate` method.
//!
//! | Calculator                 | Source         | Scaled by duration |
//! |----------------------------|----------------|--------------------|
//! | [`FertilizerCalculator`]   | Fertilizers    | yes                |
//! | [`AgrochemicalCalculator`] | Agrochemicals  | yes                |
//! | [`IrrigationCalculator`]   | Irrigation     | yes                |
//! | [`MachineryCalculator`]    | Machinery      | yes                |
//! | [`ResidueCalculator`]      | Residues       | no                 |

pub mod calculators;
pub mod parameters;

use agroprint_core::component::EmissionSource;
use agroprint_core::model::Source;
use std::sync::Arc;

pub use calculators::{
    AgrochemicalCalculator, FertilizerCalculator, IrrigationCalculator, MachineryCalculator,
    ResidueCalculator,
};

/// One calculator per source category, all with default parameters
pub fn default_sources() -> Vec<Source> {
    let sources: Vec<Arc<dyn EmissionSource>> = vec![
        Arc::new(FertilizerCalculator::new()),
        Arc::new(AgrochemicalCalculator::new()),
        Arc::new(IrrigationCalculator::new()),
        Arc::new(MachineryCalculator::new()),
        Arc::new(ResidueCalculator::new()),
    ];
    sources
}
