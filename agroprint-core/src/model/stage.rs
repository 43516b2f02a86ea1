//! Stages and cycles of a crop's life.

use crate::activity::ActivityData;
use crate::errors::{ensure_non_negative, AgroError, AgroResult};
use crate::units::FloatValue;
use serde::{Deserialize, Serialize};

/// Role of a stage in the crop's life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageKind {
    /// Planting and establishment of a perennial crop
    Establishment,
    /// Growth of a perennial crop before it bears fruit
    Growth,
    /// Perennial crop in full production
    Production,
    /// One cycle of an annual crop
    Cycle,
}

impl StageKind {
    /// Establishment and growth stages never report production
    pub fn is_productive(&self) -> bool {
        matches!(self, StageKind::Production | StageKind::Cycle)
    }
}

/// Activity data and harvest of one year or cycle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Period {
    /// Harvested fruit
    /// unit: kg / ha
    #[serde(default)]
    pub production: FloatValue,
    #[serde(default)]
    pub activities: ActivityData,
}

impl Period {
    pub fn new(production: FloatValue, activities: ActivityData) -> Self {
        Self {
            production,
            activities,
        }
    }
}

/// How the periods of a stage were entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageSchedule {
    /// A single period repeated for `duration` years or cycles
    Uniform { duration: u32, period: Period },
    /// One period per year, each evaluated on its own
    Segmented { periods: Vec<Period> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub kind: StageKind,
    pub schedule: StageSchedule,
}

impl Stage {
    pub fn uniform(
        name: impl Into<String>,
        kind: StageKind,
        duration: u32,
        period: Period,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            schedule: StageSchedule::Uniform { duration, period },
        }
    }

    pub fn segmented(name: impl Into<String>, kind: StageKind, periods: Vec<Period>) -> Self {
        Self {
            name: name.into(),
            kind,
            schedule: StageSchedule::Segmented { periods },
        }
    }

    /// Expand identical cycles of an annual crop into one stage per cycle
    ///
    /// Stages are named `"{prefix} {n}"` with `n` starting at 1.
    pub fn repeat_cycles(prefix: &str, count: u32, period: &Period) -> Vec<Stage> {
        (1..=count)
            .map(|n| {
                Stage::uniform(
                    format!("{} {}", prefix, n),
                    StageKind::Cycle,
                    1,
                    period.clone(),
                )
            })
            .collect()
    }

    /// Number of years or cycles covered by the stage
    pub fn duration(&self) -> u32 {
        match &self.schedule {
            StageSchedule::Uniform { duration, .. } => *duration,
            StageSchedule::Segmented { periods } => periods.len() as u32,
        }
    }

    /// Periods with the number of years or cycles each one stands for
    pub fn periods(&self) -> Vec<(u32, &Period)> {
        match &self.schedule {
            StageSchedule::Uniform { duration, period } => vec![(*duration, period)],
            StageSchedule::Segmented { periods } => periods.iter().map(|p| (1, p)).collect(),
        }
    }

    pub fn validate(&self) -> AgroResult<()> {
        if self.duration() == 0 {
            return Err(AgroError::InvalidDuration(self.name.clone()));
        }
        for (_, period) in self.periods() {
            ensure_non_negative("production", period.production)?;
            if !self.kind.is_productive() && period.production > 0.0 {
                return Err(AgroError::invalid_input(
                    format!("production of stage '{}'", self.name),
                    period.production,
                    format!("{:?} stages do not produce fruit", self.kind),
                ));
            }
            period.activities.validate()?;
        }
        Ok(())
    }
}
