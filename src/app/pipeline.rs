//! Submission pipeline shared by every front-end.
//!
//! request -> label encoding -> predictor -> price
//!
//! The front-ends only gather a [`PredictionRequest`] and present the outcome.

use tracing::{debug, info, warn};

use crate::app::context::AppContext;
use crate::domain::{PredictedPrice, PredictionRequest};
use crate::encode::UnknownCategory;
use crate::error::AppError;

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Priced(PredictedPrice),
    /// A categorical value the model never saw. Nothing was predicted.
    Rejected(UnknownCategory),
}

impl Submission {
    /// Text shown to the user.
    pub fn message(&self) -> String {
        match self {
            Submission::Priced(price) => {
                format!("Estimated price: {}", crate::report::format_price(price.value()))
            }
            Submission::Rejected(reason) => reason.to_string(),
        }
    }
}

/// Encode the request and ask the predictor for a price.
///
/// Unknown categorical values are a [`Submission::Rejected`], not an error; the
/// predictor is only called once every field has been encoded.
pub fn submit(ctx: &AppContext, request: &PredictionRequest) -> Result<Submission, AppError> {
    let record = match ctx.encoders().encode(request) {
        Ok(record) => record,
        Err(reason) => {
            warn!(field = %reason.field, value = reason.value.as_str(), "submission rejected");
            return Ok(Submission::Rejected(reason));
        }
    };
    debug!(?record, "encoded request");

    let outputs = ctx.predictor().predict(&record.features())?;
    let value = outputs
        .first()
        .copied()
        .ok_or_else(|| AppError::runtime("Model returned no prediction."))?;
    if !value.is_finite() {
        return Err(AppError::runtime(format!("Model returned a non-finite prediction ({value}).")));
    }

    info!(
        brand = request.brand.as_str(),
        model = request.model.as_str(),
        year = request.model_year,
        price = value,
        "priced submission"
    );
    Ok(Submission::Priced(PredictedPrice(value)))
}
