//! Scenario construction and evaluation.

use crate::component::EmissionSource;
use crate::errors::{AgroError, AgroResult};
use crate::model::aggregation::{PeriodResult, ScenarioResult, StageResult};
use crate::model::crop::Crop;
use crate::model::stage::Stage;
use crate::reference::ReferenceData;
use crate::units::FloatValue;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Shared handle to an emission source
pub type Source = Arc<dyn EmissionSource>;

/// Build a validated [`Scenario`].
///
/// [`ScenarioBuilder::build`] is where activity records are checked; a
/// scenario that was built can always be evaluated.
#[derive(Debug, Default)]
pub struct ScenarioBuilder {
    crop: Crop,
    stages: Vec<Stage>,
    sources: Vec<Source>,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crop(&mut self, crop: Crop) -> &mut Self {
        self.crop = crop;
        self
    }

    /// Add a stage. Stages are evaluated in insertion order.
    pub fn with_stage(&mut self, stage: Stage) -> &mut Self {
        self.stages.push(stage);
        self
    }

    pub fn with_stages(&mut self, stages: impl IntoIterator<Item = Stage>) -> &mut Self {
        self.stages.extend(stages);
        self
    }

    /// Register an emission source. Each source category may only be registered once.
    pub fn with_source(&mut self, source: Source) -> &mut Self {
        self.sources.push(source);
        self
    }

    pub fn with_sources(&mut self, sources: impl IntoIterator<Item = Source>) -> &mut Self {
        self.sources.extend(sources);
        self
    }

    pub fn build(&self) -> AgroResult<Scenario> {
        let scenario = Scenario {
            crop: self.crop.clone(),
            stages: self.stages.clone(),
            sources: self.sources.clone(),
        };
        scenario.validate()?;
        Ok(scenario)
    }
}

/// A crop, its stages and the emission sources used to evaluate them
///
/// Deserialising a scenario, from any format, validates it.
#[derive(Debug, Serialize, Deserialize)]
#[serde(try_from = "ScenarioData")]
pub struct Scenario {
    pub crop: Crop,
    stages: Vec<Stage>,
    sources: Vec<Source>,
}

/// Unvalidated form of a [`Scenario`] as read by serde
#[derive(Deserialize)]
struct ScenarioData {
    #[serde(default)]
    crop: Crop,
    stages: Vec<Stage>,
    #[serde(default)]
    sources: Vec<Source>,
}

impl TryFrom<ScenarioData> for Scenario {
    type Error = AgroError;

    fn try_from(data: ScenarioData) -> AgroResult<Self> {
        let scenario = Scenario {
            crop: data.crop,
            stages: data.stages,
            sources: data.sources,
        };
        scenario.validate()?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn validate(&self) -> AgroResult<()> {
        if self.stages.is_empty() {
            return Err(AgroError::Error(
                "A scenario needs at least one stage or cycle".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.category()) {
                return Err(AgroError::DuplicateSource(source.category().to_string()));
            }
        }
        self.stages.iter().try_for_each(Stage::validate)
    }

    /// Evaluate every source for one stage
    pub fn run_stage(&self, stage: &Stage, reference: &ReferenceData) -> StageResult {
        debug!(
            "Evaluating stage '{}' ({:?}, {} period(s))",
            stage.name,
            stage.kind,
            stage.duration()
        );
        let periods = stage
            .periods()
            .into_iter()
            .enumerate()
            .map(|(index, (span, period))| {
                let duration = FloatValue::from(span);
                let sources = self
                    .sources
                    .iter()
                    .map(|source| source.evaluate(&period.activities, duration, reference))
                    .collect();
                let production = if stage.kind.is_productive() {
                    period.production * duration
                } else {
                    0.0
                };
                PeriodResult::new(index, span, production, sources)
            })
            .collect();
        StageResult::from_periods(stage.name.clone(), stage.kind, periods)
    }

    /// Evaluate the whole scenario
    pub fn run(&self, reference: &ReferenceData) -> ScenarioResult {
        let stages = self
            .stages
            .iter()
            .map(|stage| self.run_stage(stage, reference))
            .collect();
        ScenarioResult::from_stages(self.crop.clone(), stages)
    }

    /// Read and validate a scenario from TOML
    pub fn from_toml_str(content: &str) -> AgroResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> AgroResult<String> {
        Ok(toml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityData, MachineryPass};
    use crate::component::tests::PassCounter;
    use crate::model::stage::{Period, StageKind};
    use crate::reference::REFERENCE_DATA;
    use crate::results::SourceCategory;
    use is_close::is_close;

    fn period_with_passes(production: FloatValue, passes: usize) -> Period {
        Period::new(
            production,
            ActivityData {
                machinery: (0..passes)
                    .map(|i| MachineryPass::manual(format!("Labour {}", i)))
                    .collect(),
                ..Default::default()
            },
        )
    }

    fn builder() -> ScenarioBuilder {
        let mut builder = ScenarioBuilder::new();
        builder
            .with_stage(Stage::uniform(
                "Establishment",
                StageKind::Establishment,
                2,
                period_with_passes(0.0, 3),
            ))
            .with_stage(Stage::segmented(
                "Production",
                StageKind::Production,
                vec![period_with_passes(1000.0, 1), period_with_passes(3000.0, 2)],
            ))
            .with_source(Arc::new(PassCounter { per_pass: 10.0 }));
        builder
    }

    #[test]
    fn test_run() {
        let scenario = builder().build().unwrap();
        let result = scenario.run(&REFERENCE_DATA);

        let establishment = result.stage("Establishment").unwrap();
        assert!(is_close!(establishment.total(), 60.0));
        assert_eq!(establishment.production, 0.0);
        assert_eq!(establishment.intensity(), None);

        let production = result.stage("Production").unwrap();
        assert_eq!(production.periods.len(), 2);
        assert!(is_close!(production.periods[1].total(), 20.0));
        assert!(is_close!(production.total(), 30.0));
        assert!(is_close!(production.production, 4000.0));

        assert!(is_close!(result.totals.get(SourceCategory::Machinery), 90.0));
        assert!(is_close!(result.intensity().unwrap(), 90.0 / 4000.0));
        assert!(result.is_consistent(1e-12));
    }

    #[test]
    fn test_uniform_production_scales_with_duration() {
        let mut builder = ScenarioBuilder::new();
        builder.with_stage(Stage::uniform(
            "Production",
            StageKind::Production,
            5,
            period_with_passes(2000.0, 0),
        ));
        let result = builder.build().unwrap().run(&REFERENCE_DATA);
        assert!(is_close!(result.production, 10000.0));
        assert!(is_close!(result.intensity().unwrap(), 0.0));
    }

    #[test]
    fn test_build_rejects_duplicate_sources() {
        let mut builder = builder();
        builder.with_source(Arc::new(PassCounter { per_pass: 1.0 }));
        assert!(matches!(
            builder.build(),
            Err(AgroError::DuplicateSource(name)) if name == "Machinery"
        ));
    }

    #[test]
    fn test_build_rejects_empty_and_invalid_stages() {
        assert!(ScenarioBuilder::new().build().is_err());

        let mut builder = builder();
        builder.with_stage(Stage::uniform(
            "Growth",
            StageKind::Growth,
            0,
            Period::default(),
        ));
        assert!(matches!(
            builder.build(),
            Err(AgroError::InvalidDuration(name)) if name == "Growth"
        ));
    }

    #[test]
    fn test_toml_roundtrip() {
        let scenario = builder().build().unwrap();
        let serialised = scenario.to_toml().unwrap();
        let restored = Scenario::from_toml_str(&serialised).unwrap();

        assert_eq!(restored.stages(), scenario.stages());
        assert_eq!(restored.sources().len(), 1);
        assert_eq!(
            restored.run(&REFERENCE_DATA),
            scenario.run(&REFERENCE_DATA)
        );
    }

    #[test]
    fn test_deserialise_validates() {
        let scenario = builder().build().unwrap();
        let mut value = serde_json::to_value(&scenario).unwrap();
        let sources = value["sources"].as_array_mut().unwrap();
        sources.push(sources[0].clone());
        let err = serde_json::from_value::<Scenario>(value).unwrap_err();
        assert!(err.to_string().contains("registered more than once"));

        let mut value = serde_json::to_value(&scenario).unwrap();
        value["stages"][0]["schedule"]["Uniform"]["duration"] = 0.into();
        let err = serde_json::from_value::<Scenario>(value).unwrap_err();
        assert!(err.to_string().contains("at least one year"));

        let content = scenario.to_toml().unwrap().replace("duration = 2", "duration = 0");
        assert!(matches!(
            Scenario::from_toml_str(&content),
            Err(AgroError::Deserialisation(_))
        ));
    }
}
