//! End-to-end scenario tests.
//!
//! A perennial orchard and an annual crop are run through every calculator
//! and the aggregated results are checked against the per-source results.

use agroprint::activity::{
    ActiveIngredientAmount, ActivityData, AgrochemicalApplication, AgrochemicalCategory,
    AllocationMode, AllocationStatus, EnergyUse, FertilizerApplication, FuelUse,
    IrrigationEnergyActivity, MachineryPass, ResidueManagement, ResiduePathway, ResidueTreatment,
};
use agroprint::calculators::FertilizerCalculator;
use agroprint::model::{Crop, CropCycle, Morphology, Period, Scenario, Stage, StageKind};
use agroprint::reference::REFERENCE_DATA;
use agroprint::results::{SourceCategory, SourceDetail};
use approx::assert_relative_eq;

fn orchard_activities(biomass: f64) -> ActivityData {
    let (residues, status) = ResidueManagement::from_allocations(
        biomass,
        AllocationMode::Percent,
        &[
            (
                ResidueTreatment::with_defaults(ResiduePathway::Burning, 0.0),
                30.0,
            ),
            (
                ResidueTreatment::with_defaults(ResiduePathway::Composting, 0.0),
                50.0,
            ),
        ],
    );
    assert_eq!(status, AllocationStatus::Shortfall(20.0));

    ActivityData {
        fertilizers: vec![
            FertilizerApplication::catalog("Urea", Some("Average"), 150.0),
            FertilizerApplication::organic("Solid cattle manure", 10000.0),
        ],
        agrochemicals: vec![AgrochemicalApplication::new(
            AgrochemicalCategory::Fungicide,
            "Average",
            ActiveIngredientAmount::ActiveIngredient(2.0),
        )],
        machinery: vec![
            MachineryPass::new(
                "Spraying",
                "Tractor",
                "Diesel (100% mineral)",
                FuelUse::Hours {
                    hours_per_pass: 2.0,
                    fuel_rate: None,
                    passes: 6,
                },
            ),
            MachineryPass::manual("Harvest"),
        ],
        irrigation: vec![IrrigationEnergyActivity::new(
            "Drip",
            7000.0,
            "Electric",
            EnergyUse::PowerHours {
                power_kw: 5.5,
                hours: 400.0,
                engine_efficiency: None,
            },
        )],
        residues,
    }
}

fn orchard() -> Scenario {
    agroprint::scenario_builder()
        .with_crop(Crop::new("Avocado", CropCycle::Perennial, Morphology::Tree))
        .with_stage(Stage::uniform(
            "Establishment",
            StageKind::Establishment,
            1,
            Period::new(0.0, orchard_activities(500.0)),
        ))
        .with_stage(Stage::uniform(
            "Growth",
            StageKind::Growth,
            3,
            Period::new(0.0, orchard_activities(1500.0)),
        ))
        .with_stage(Stage::segmented(
            "Production",
            StageKind::Production,
            vec![
                Period::new(8000.0, orchard_activities(3000.0)),
                Period::new(12000.0, orchard_activities(3000.0)),
                Period::new(0.0, orchard_activities(3000.0)),
            ],
        ))
        .build()
        .unwrap()
}

#[test]
fn test_aggregation_paths_agree() {
    let result = orchard().run(&REFERENCE_DATA);

    let by_source: f64 = SourceCategory::ALL
        .iter()
        .map(|c| result.totals.get(*c))
        .sum();
    let by_stage: f64 = result.stages.iter().map(|s| s.total()).sum();
    assert_relative_eq!(by_source, result.total(), max_relative = 1e-12);
    assert_relative_eq!(by_stage, result.total(), max_relative = 1e-12);
    assert!(result.is_consistent(1e-9));
    assert!(result.total() > 0.0);
}

#[test]
fn test_production_and_intensity() {
    let result = orchard().run(&REFERENCE_DATA);

    assert_eq!(result.production, 20000.0);
    assert_eq!(result.stage("Establishment").unwrap().intensity(), None);
    assert_eq!(result.stage("Growth").unwrap().intensity(), None);

    let production = result.stage("Production").unwrap();
    assert_relative_eq!(
        production.intensity().unwrap(),
        production.total() / 20000.0,
        max_relative = 1e-12
    );
    // A year without harvest still has emissions but no intensity
    assert_eq!(production.periods[2].intensity(), None);
    assert!(production.periods[2].total() > 0.0);

    assert_relative_eq!(
        result.intensity().unwrap(),
        result.total() / 20000.0,
        max_relative = 1e-12
    );
}

#[test]
fn test_uniform_stage_matches_direct_calculation() {
    let result = orchard().run(&REFERENCE_DATA);
    let growth = result.stage("Growth").unwrap();

    let expected = FertilizerCalculator::new().calculate(
        &orchard_activities(1500.0).fertilizers,
        3.0,
        &REFERENCE_DATA,
    );
    let fertilizers = growth
        .source_results(SourceCategory::Fertilizers)
        .next()
        .unwrap();
    match &fertilizers.detail {
        SourceDetail::Fertilizers(detail) => assert_eq!(detail, &expected),
        other => panic!("Unexpected detail {:?}", other),
    }
    assert_eq!(growth.duration(), 3);
}

#[test]
fn test_residue_shortfall_is_unmanaged() {
    let result = orchard().run(&REFERENCE_DATA);
    let establishment = result.stage("Establishment").unwrap();
    let residues = establishment
        .source_results(SourceCategory::Residues)
        .next()
        .unwrap();

    match &residues.detail {
        SourceDetail::Residues(detail) => {
            let unmanaged = detail.get(ResiduePathway::Unmanaged).unwrap();
            assert_relative_eq!(unmanaged.biomass, 100.0, max_relative = 1e-12);
            assert_eq!(unmanaged.emissions(), 0.0);
        }
        other => panic!("Unexpected detail {:?}", other),
    }
}

#[test]
fn test_annual_cycles() {
    let period = Period::new(
        30000.0,
        ActivityData {
            fertilizers: vec![FertilizerApplication::catalog("Urea", Some("Average"), 200.0)],
            ..Default::default()
        },
    );
    let scenario = agroprint::scenario_builder()
        .with_crop(Crop::new("Strawberry", CropCycle::Annual, Morphology::Herb))
        .with_stages(Stage::repeat_cycles("Cycle", 2, &period))
        .build()
        .unwrap();
    let result = scenario.run(&REFERENCE_DATA);

    assert_eq!(result.stages.len(), 2);
    assert_relative_eq!(result.production, 60000.0);
    assert_relative_eq!(
        result.totals.get(SourceCategory::Fertilizers),
        2.0 * result.stages[0].total(),
        max_relative = 1e-12
    );
    assert_relative_eq!(result.stages[0].total(), 930.88, max_relative = 1e-4);
}

#[test]
fn test_json_roundtrip() {
    let scenario = orchard();
    let serialised = serde_json::to_string(&scenario).unwrap();
    let restored: Scenario = serde_json::from_str(&serialised).unwrap();

    assert_eq!(restored.crop, scenario.crop);
    assert_eq!(restored.stages(), scenario.stages());
    assert_eq!(restored.sources().len(), 5);
    assert_eq!(
        restored.run(&REFERENCE_DATA),
        scenario.run(&REFERENCE_DATA)
    );
}

#[test]
fn test_toml_scenario() {
    let content = r#"
        [crop]
        name = "Lemon"
        cycle = "Perennial"
        morphology = "Tree"

        [[stages]]
        name = "Production"
        kind = "Production"

        [stages.schedule.Uniform]
        duration = 2

        [stages.schedule.Uniform.period]
        production = 40000.0

        [[stages.schedule.Uniform.period.activities.machinery]]
        labor_name = "Mowing"
        machine_name = "Tractor"
        fuel_type = "Diesel (100% mineral)"
        fuel_use = { Litres = { litres_per_pass = 10.0, passes = 2 } }

        [[sources]]
        type = "MachineryCalculator"
    "#;
    let scenario = Scenario::from_toml_str(content).unwrap();
    let result = scenario.run(&REFERENCE_DATA);

    assert_relative_eq!(
        result.total(),
        20.0 * 2.66155 * 2.0,
        max_relative = 1e-12
    );
    assert_relative_eq!(result.production, 80000.0);
}
