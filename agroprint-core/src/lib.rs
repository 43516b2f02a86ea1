//! Core types for cradle-to-farm-gate carbon footprints of fruit production.
//!
//! This crate holds everything the emission calculators share:
//!
//! - [`reference`]: the read-only emission-factor catalogue
//! - [`activity`]: activity records collected for a stage or cycle
//! - [`results`]: per-source results and itemised breakdowns
//! - [`component`]: the [`component::EmissionSource`] trait implemented by calculators
//! - [`model`]: crops, stages, scenarios and the aggregation layer
//!
//! The calculators themselves live in `agroprint-components`.

pub mod activity;
pub mod component;
pub mod errors;
pub mod gwp;
pub mod model;
pub mod reference;
pub mod results;
pub mod units;
