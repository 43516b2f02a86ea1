//! Numeric type and unit conversions shared by every calculator.

/// Floating point type used for all quantities
pub type FloatValue = f64;

/// Molecular mass ratio converting N2O-N to N2O (44/28)
pub const N2O_N_TO_N2O: FloatValue = 44.0 / 28.0;

/// Litres per cubic metre
pub const LITRES_PER_M3: FloatValue = 1000.0;

/// Convert a percentage (0-100) to a fraction (0-1)
pub fn percent_to_fraction(percent: FloatValue) -> FloatValue {
    percent / 100.0
}

/// Divide emissions by production, returning `None` when there is no production.
///
/// Used for every per-kg-of-fruit intensity so that a zero harvest is
/// reported as undefined rather than as zero or infinity.
pub fn intensity(emissions: FloatValue, production: FloatValue) -> Option<FloatValue> {
    if production > 0.0 {
        Some(emissions / production)
    } else {
        None
    }
}
