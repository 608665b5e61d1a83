//! Shared domain types.
//!
//! These types are intentionally small and owned so a request can be built by
//! any front-end (TUI, line prompt, one-shot command) and handed to the
//! prediction adapter without borrowing from the form that produced it.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Earliest selectable model year.
pub const MODEL_YEAR_MIN: i32 = 1990;
/// Latest selectable model year.
pub const MODEL_YEAR_MAX: i32 = 2025;

/// Mileage input step in kilometers.
pub const MILEAGE_STEP_KM: f64 = 100.0;

/// The predictor was trained on meter-denominated mileage.
pub const METERS_PER_KM: f64 = 1000.0;

/// Feature order the predictor was trained on.
pub const FEATURE_NAMES: [&str; 7] = [
    "brand",
    "model",
    "model_year",
    "milage",
    "fuel_type",
    "transmission",
    "accident",
];

/// Convert user-entered kilometers to the meters the predictor expects.
pub fn km_to_meters(km: f64) -> f64 {
    km * METERS_PER_KM
}

/// A label-encoded field of the prediction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    Brand,
    Model,
    FuelType,
    Transmission,
    Accident,
}

impl CategoricalField {
    /// Encoding order. The first unknown value in this order aborts a submission.
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::Brand,
        CategoricalField::Model,
        CategoricalField::FuelType,
        CategoricalField::Transmission,
        CategoricalField::Accident,
    ];

    /// Column name in the encoder artifact and the training data.
    pub fn key(self) -> &'static str {
        match self {
            CategoricalField::Brand => "brand",
            CategoricalField::Model => "model",
            CategoricalField::FuelType => "fuel_type",
            CategoricalField::Transmission => "transmission",
            CategoricalField::Accident => "accident",
        }
    }

    /// Human-readable label for messages.
    pub fn label(self) -> &'static str {
        match self {
            CategoricalField::Brand => "Brand",
            CategoricalField::Model => "Model",
            CategoricalField::FuelType => "Fuel type",
            CategoricalField::Transmission => "Transmission",
            CategoricalField::Accident => "Accident",
        }
    }
}

impl std::fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Binary accident-history answer as the user gives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AccidentHistory {
    #[default]
    No,
    Yes,
}

impl AccidentHistory {
    pub const ALL: [AccidentHistory; 2] = [AccidentHistory::No, AccidentHistory::Yes];

    /// Answer as shown in the form.
    pub fn display_name(self) -> &'static str {
        match self {
            AccidentHistory::No => "No",
            AccidentHistory::Yes => "Yes",
        }
    }

    /// Canonical string from the training data. Must match the accident encoder.
    pub fn canonical(self) -> &'static str {
        match self {
            AccidentHistory::No => "None reported",
            AccidentHistory::Yes => "At least 1 accident or damage reported",
        }
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.display_name().eq_ignore_ascii_case(name.trim()))
    }
}

/// One completed form submission, in the units the predictor expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub brand: String,
    pub model: String,
    pub model_year: i32,
    /// Meters.
    pub milage: f64,
    pub fuel_type: String,
    pub transmission: String,
    pub accident: String,
}

impl PredictionRequest {
    /// Raw value of a categorical field.
    pub fn categorical(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Brand => &self.brand,
            CategoricalField::Model => &self.model,
            CategoricalField::FuelType => &self.fuel_type,
            CategoricalField::Transmission => &self.transmission,
            CategoricalField::Accident => &self.accident,
        }
    }
}

/// A request after label encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedRecord {
    pub brand: u32,
    pub model: u32,
    pub model_year: i32,
    pub milage: f64,
    pub fuel_type: u32,
    pub transmission: u32,
    pub accident: u32,
}

impl EncodedRecord {
    /// Feature vector in `FEATURE_NAMES` order.
    pub fn features(&self) -> [f64; 7] {
        [
            f64::from(self.brand),
            f64::from(self.model),
            f64::from(self.model_year),
            self.milage,
            f64::from(self.fuel_type),
            f64::from(self.transmission),
            f64::from(self.accident),
        ]
    }
}

/// Point-estimate price produced by the predictor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictedPrice(pub f64);

impl PredictedPrice {
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Locations of the three startup artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub encoders: PathBuf,
    pub catalog: PathBuf,
}
