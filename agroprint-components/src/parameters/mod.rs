//! Calculator parameters
//!
//! IPCC 2019 Tier-1 defaults for every calculator. Each struct deserialises
//! with missing fields filled from its `Default`, so a scenario only needs to
//! name the values it changes.

mod irrigation;
mod nitrous_oxide;
mod residues;

pub use irrigation::IrrigationParameters;
pub use nitrous_oxide::NitrousOxideParameters;
pub use residues::{BurningParameters, CompostingParameters};
