//! Price predictors.
//!
//! The trained model is opaque to the rest of the crate: anything that maps a
//! feature vector (in `domain::FEATURE_NAMES` order) to a sequence of outputs
//! can stand in for it. The shipped implementation evaluates a gradient-boosted
//! regression tree ensemble exported as JSON.

pub mod forest;

pub use forest::*;

use crate::error::AppError;

/// A trained regression model.
pub trait Predictor: Send + Sync {
    /// Number of input features the model was trained on.
    fn n_features(&self) -> usize;

    /// Predict for one record. Callers use the first output.
    fn predict(&self, features: &[f64]) -> Result<Vec<f64>, AppError>;
}
