//! IPCC Tier-1 emission calculators, one per source.

mod agrochemical;
mod fertilizer;
mod irrigation;
mod machinery;
mod residue;

pub use agrochemical::AgrochemicalCalculator;
pub use fertilizer::FertilizerCalculator;
pub use irrigation::IrrigationCalculator;
pub use machinery::MachineryCalculator;
pub use residue::ResidueCalculator;
