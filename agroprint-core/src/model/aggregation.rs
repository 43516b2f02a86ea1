//! Aggregation of per-period source results into stage and scenario totals.
//!
//! Totals are accumulated into explicit [`SourceTotals`] values which are
//! returned to the caller; nothing is kept between runs. Three aggregation
//! paths must agree for any result:
//!
//! 1. the sum over sources of the global per-source totals
//! 2. the sum over stages of the stage totals
//! 3. the sum over every source result of every period
//!
//! [`ScenarioResult::is_consistent`] checks this.

use crate::model::crop::Crop;
use crate::model::stage::StageKind;
use crate::results::{SourceCategory, SourceResult, SourceTotals};
use crate::units::{intensity, FloatValue};
use serde::{Deserialize, Serialize};

/// Results of one year or cycle of a stage
///
/// For a uniform stage the single period spans the whole stage and its values
/// already include the duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodResult {
    pub index: usize,
    /// Number of years or cycles covered
    pub span: u32,
    /// Production over the span
    /// unit: kg / ha
    pub production: FloatValue,
    pub totals: SourceTotals,
    pub sources: Vec<SourceResult>,
}

impl PeriodResult {
    pub fn new(index: usize, span: u32, production: FloatValue, sources: Vec<SourceResult>) -> Self {
        let mut totals = SourceTotals::default();
        for source in &sources {
            totals.accumulate(source.category, source.total);
        }
        Self {
            index,
            span,
            production,
            totals,
            sources,
        }
    }

    pub fn total(&self) -> FloatValue {
        self.totals.sum()
    }

    /// unit: kg CO2e / kg fruit
    pub fn intensity(&self) -> Option<FloatValue> {
        intensity(self.total(), self.production)
    }

    pub fn source(&self, category: SourceCategory) -> Option<&SourceResult> {
        self.sources.iter().find(|s| s.category == category)
    }
}

/// Results of one stage or cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    pub name: String,
    pub kind: StageKind,
    /// unit: kg / ha over the stage, 0 for stages without harvest
    pub production: FloatValue,
    pub totals: SourceTotals,
    pub periods: Vec<PeriodResult>,
}

impl StageResult {
    pub fn from_periods(name: impl Into<String>, kind: StageKind, periods: Vec<PeriodResult>) -> Self {
        let totals = periods.iter().map(|p| p.totals).sum();
        let production = periods.iter().map(|p| p.production).sum();
        Self {
            name: name.into(),
            kind,
            production,
            totals,
            periods,
        }
    }

    /// unit: kg CO2e / ha over the stage
    pub fn total(&self) -> FloatValue {
        self.totals.sum()
    }

    /// Emissions per kg of fruit, `None` when the stage has no production
    pub fn intensity(&self) -> Option<FloatValue> {
        intensity(self.total(), self.production)
    }

    /// Number of years or cycles covered
    pub fn duration(&self) -> u32 {
        self.periods.iter().map(|p| p.span).sum()
    }

    /// Every source result of this stage for `category`, in period order
    pub fn source_results(&self, category: SourceCategory) -> impl Iterator<Item = &SourceResult> {
        self.periods.iter().filter_map(move |p| p.source(category))
    }
}

/// Global results of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub crop: Crop,
    pub stages: Vec<StageResult>,
    /// Global per-source totals
    pub totals: SourceTotals,
    /// unit: kg / ha over all stages
    pub production: FloatValue,
}

impl ScenarioResult {
    /// Aggregate stage results into global totals
    pub fn from_stages(crop: Crop, stages: Vec<StageResult>) -> Self {
        let totals = stages.iter().map(|s| s.totals).sum();
        let production = stages.iter().map(|s| s.production).sum();
        Self {
            crop,
            stages,
            totals,
            production,
        }
    }

    /// unit: kg CO2e / ha
    pub fn total(&self) -> FloatValue {
        self.totals.sum()
    }

    /// Emissions per kg of fruit over the whole scenario
    pub fn intensity(&self) -> Option<FloatValue> {
        intensity(self.total(), self.production)
    }

    pub fn stage(&self, name: &str) -> Option<&StageResult> {
        self.stages.iter().find(|s| s.name == name)
    }

    /// Share of each source in the global total, in %
    ///
    /// `None` when the global total is zero.
    pub fn source_shares(&self) -> Vec<(SourceCategory, Option<FloatValue>)> {
        let total = self.total();
        self.totals
            .iter()
            .map(|(category, value)| {
                let share = if total != 0.0 {
                    Some(100.0 * value / total)
                } else {
                    None
                };
                (category, share)
            })
            .collect()
    }

    /// Sum over stages of the stage totals
    pub fn stage_sum(&self) -> FloatValue {
        self.stages.iter().map(StageResult::total).sum()
    }

    /// Sum over every source result of every period
    pub fn source_result_sum(&self) -> FloatValue {
        self.stages
            .iter()
            .flat_map(|s| s.periods.iter())
            .flat_map(|p| p.sources.iter())
            .map(|r| r.total)
            .sum()
    }

    /// Check that all aggregation paths agree within a relative tolerance
    pub fn is_consistent(&self, tolerance: FloatValue) -> bool {
        let reference = self.total();
        let scale = reference.abs().max(1.0);
        [self.stage_sum(), self.source_result_sum()]
            .iter()
            .all(|value| (value - reference).abs() <= tolerance * scale)
    }
}
