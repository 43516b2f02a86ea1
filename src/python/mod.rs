//! Python extension module
//!
//! Inputs and outputs cross the boundary as plain dictionaries and lists with
//! the same shape as the serde representation of the Rust types.

use crate::activity::{
    AgrochemicalApplication, FertilizerApplication, IrrigationEnergyActivity, MachineryPass,
    ResidueManagement,
};
use crate::calculators::{
    AgrochemicalCalculator, FertilizerCalculator, IrrigationCalculator, MachineryCalculator,
    ResidueCalculator,
};
use crate::errors::{AgroError, AgroResult};
use crate::model::{Crop, Stage};
use crate::reference::REFERENCE_DATA;
use crate::units::FloatValue;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pythonize::{depythonize_bound, pythonize};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Stages and crop of a scenario evaluated with the default calculators
#[derive(Debug, Deserialize)]
struct ScenarioInput {
    #[serde(default)]
    crop: Crop,
    stages: Vec<Stage>,
}

fn from_python<T: DeserializeOwned>(value: Bound<'_, PyAny>) -> PyResult<T> {
    depythonize_bound::<T>(value).map_err(|e| PyValueError::new_err(format!("{}", e)))
}

fn to_python<T: Serialize>(py: Python<'_>, value: &T) -> PyResult<PyObject> {
    pythonize(py, value).map_err(|e| PyValueError::new_err(format!("{}", e)))
}

fn value_error(error: AgroError) -> PyErr {
    PyValueError::new_err(format!("{}", error))
}

/// Records are validated here the same way `ScenarioBuilder::build` does
fn validate_all<T>(records: &[T], validate: fn(&T) -> AgroResult<()>) -> PyResult<()> {
    records.iter().try_for_each(validate).map_err(value_error)
}

/// Durations are whole years or cycles, at least one
fn check_duration(duration: u32) -> PyResult<FloatValue> {
    if duration == 0 {
        return Err(PyValueError::new_err(
            "Duration must be at least one year or cycle",
        ));
    }
    Ok(FloatValue::from(duration))
}

/// The embedded emission-factor catalogue
#[pyfunction]
fn reference_data(py: Python<'_>) -> PyResult<PyObject> {
    to_python(py, &*REFERENCE_DATA)
}

#[pyfunction]
fn calculate_fertilizers(
    py: Python<'_>,
    fertilizers: Bound<'_, PyAny>,
    duration: u32,
) -> PyResult<PyObject> {
    let duration = check_duration(duration)?;
    let fertilizers: Vec<FertilizerApplication> = from_python(fertilizers)?;
    validate_all(&fertilizers, FertilizerApplication::validate)?;
    let result = FertilizerCalculator::new().calculate(&fertilizers, duration, &REFERENCE_DATA);
    to_python(py, &result)
}

#[pyfunction]
fn calculate_agrochemicals(
    py: Python<'_>,
    agrochemicals: Bound<'_, PyAny>,
    duration: u32,
) -> PyResult<PyObject> {
    let duration = check_duration(duration)?;
    let agrochemicals: Vec<AgrochemicalApplication> = from_python(agrochemicals)?;
    validate_all(&agrochemicals, AgrochemicalApplication::validate)?;
    let result =
        AgrochemicalCalculator::new().calculate(&agrochemicals, duration, &REFERENCE_DATA);
    to_python(py, &result)
}

#[pyfunction]
fn calculate_machinery(
    py: Python<'_>,
    passes: Bound<'_, PyAny>,
    duration: u32,
) -> PyResult<PyObject> {
    let duration = check_duration(duration)?;
    let passes: Vec<MachineryPass> = from_python(passes)?;
    validate_all(&passes, MachineryPass::validate)?;
    let result = MachineryCalculator::new().calculate(&passes, duration, &REFERENCE_DATA);
    to_python(py, &result)
}

#[pyfunction]
fn calculate_irrigation(
    py: Python<'_>,
    activities: Bound<'_, PyAny>,
    duration: u32,
) -> PyResult<PyObject> {
    let duration = check_duration(duration)?;
    let activities: Vec<IrrigationEnergyActivity> = from_python(activities)?;
    validate_all(&activities, IrrigationEnergyActivity::validate)?;
    let result = IrrigationCalculator::new().calculate(&activities, duration, &REFERENCE_DATA);
    to_python(py, &result)
}

#[pyfunction]
fn calculate_residues(py: Python<'_>, management: Bound<'_, PyAny>) -> PyResult<PyObject> {
    let management: ResidueManagement = from_python(management)?;
    management.validate().map_err(value_error)?;
    let result = ResidueCalculator::new().calculate(&management);
    to_python(py, &result)
}

/// Validate and run a scenario with the default calculators
#[pyfunction]
fn run_scenario(py: Python<'_>, scenario: Bound<'_, PyAny>) -> PyResult<PyObject> {
    let input: ScenarioInput = from_python(scenario)?;
    let scenario = crate::scenario_builder()
        .with_crop(input.crop)
        .with_stages(input.stages)
        .build()
        .map_err(value_error)?;
    to_python(py, &scenario.run(&REFERENCE_DATA))
}

#[pymodule]
#[pyo3(name = "_lib")]
fn agroprint(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("REFERENCE_DATA_VERSION", REFERENCE_DATA.version.as_str())?;
    m.add_function(wrap_pyfunction!(reference_data, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_fertilizers, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_agrochemicals, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_machinery, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_irrigation, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_residues, m)?)?;
    m.add_function(wrap_pyfunction!(run_scenario, m)?)?;
    Ok(())
}
