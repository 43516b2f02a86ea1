//! The seam between the scenario model and the calculators.
//!
//! Each calculator implements [`EmissionSource`] for a single [`SourceCategory`].
//! Sources are stateless apart from their parameters, so one instance can be
//! evaluated for any number of periods.

use crate::activity::ActivityData;
use crate::reference::ReferenceData;
use crate::results::{SourceCategory, SourceResult};
use crate::units::FloatValue;
use std::fmt::Debug;

/// A calculator turning the activity records of one period into CO2e
///
/// `duration` is the number of years or cycles the per-period activity data
/// stands for. Evaluation never fails: unknown catalogue keys and missing
/// quantities degrade to documented defaults or zero.
#[typetag::serde(tag = "type")]
pub trait EmissionSource: Debug + Send + Sync {
    /// The source this calculator accounts for
    fn category(&self) -> SourceCategory;

    fn evaluate(
        &self,
        activities: &ActivityData,
        duration: FloatValue,
        reference: &ReferenceData,
    ) -> SourceResult;
}
