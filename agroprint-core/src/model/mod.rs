//! A scenario is a crop, the stages (or cycles) of its life and the emission
//! sources used to account for them.
//!
//! Each stage is evaluated independently: every source is run on the activity
//! data of each period and the results are aggregated into stage and then
//! scenario totals. No state is shared between stages.

mod aggregation;
mod crop;
mod scenario;
mod stage;

pub use aggregation::{PeriodResult, ScenarioResult, StageResult};
pub use crop::{Crop, CropCycle, Morphology};
pub use scenario::{Scenario, ScenarioBuilder, Source};
pub use stage::{Period, Stage, StageKind, StageSchedule};
