use thiserror::Error;

/// Error type for invalid operations.
///
/// Calculators never produce these. They are raised when loading reference
/// data, (de)serialising scenarios, or validating activity records before a
/// scenario is built.
#[derive(Error, Debug)]
pub enum AgroError {
    #[error("{0}")]
    Error(String),
    #[error("Invalid value for {field}: {value}. {reason}")]
    InvalidInput {
        field: String,
        value: f64,
        reason: String,
    },
    #[error("Stage '{0}' must span at least one year or cycle")]
    InvalidDuration(String),
    #[error("Emission source '{0}' was registered more than once")]
    DuplicateSource(String),
    #[error("Could not parse TOML: {0}")]
    Deserialisation(#[from] toml::de::Error),
    #[error("Could not serialise to TOML: {0}")]
    Serialisation(#[from] toml::ser::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type for `Result<T, AgroError>`.
pub type AgroResult<T> = Result<T, AgroError>;

impl AgroError {
    /// Build an [`AgroError::InvalidInput`] for a value outside its allowed range
    pub fn invalid_input(field: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            value,
            reason: reason.into(),
        }
    }
}

/// Reject negative (or NaN) quantities.
pub fn ensure_non_negative(field: &str, value: f64) -> AgroResult<()> {
    if value.is_nan() || value < 0.0 {
        return Err(AgroError::invalid_input(
            field,
            value,
            "Quantities must be zero or positive",
        ));
    }
    Ok(())
}

/// Reject values outside `[0, upper]`.
pub fn ensure_within(field: &str, value: f64, upper: f64) -> AgroResult<()> {
    if value.is_nan() || !(0.0..=upper).contains(&value) {
        return Err(AgroError::invalid_input(
            field,
            value,
            format!("Expected a value between 0 and {}", upper),
        ));
    }
    Ok(())
}
