//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the prediction record and its encoded form (`PredictionRequest`, `EncodedRecord`)
//! - the label-encoded field set (`CategoricalField`) and accident mapping
//! - the brand → fuel → model catalog (`CarCatalog`)

pub mod catalog;
pub mod types;

pub use catalog::*;
pub use types::*;
