//! In-memory artifacts shared by unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::app::context::AppContext;
use crate::domain::{CarCatalog, CategoricalField, PredictionRequest};
use crate::encode::{LabelEncoder, LabelEncoderSet};
use crate::error::AppError;
use crate::models::{Predictor, TreeEnsemble};
use crate::taxonomy::{RAW_TRANSMISSION_LABELS, TransmissionTaxonomy};

pub const CATALOG_JSON: &str = r#"{
    "Toyota": {"Gasoline": ["RAV4", "Camry", "Corolla"], "Hybrid": ["Prius", "Camry"]},
    "Audi": {"Gasoline": ["Q5", "A4"], "Diesel": ["A6"]},
    "Ford": {"Gasoline": ["Mustang", "F-150"]}
}"#;

/// Two trees: year/mileage splits plus a constant 0.5.
pub const MODEL_JSON: &str = r#"{
    "learner": {
        "attributes": {},
        "feature_names": ["brand", "model", "model_year", "milage", "fuel_type", "transmission", "accident"],
        "feature_types": ["int", "int", "int", "float", "int", "int", "int"],
        "gradient_booster": {
            "model": {
                "gbtree_model_param": {"num_parallel_tree": "1", "num_trees": "2"},
                "tree_info": [0, 0],
                "trees": [
                    {
                        "base_weights": [0.0, -10.0, 0.0, 50.0, 5.0],
                        "default_left": [1, 0, 0, 0, 0],
                        "id": 0,
                        "left_children": [1, -1, 3, -1, -1],
                        "right_children": [2, -1, 4, -1, -1],
                        "split_conditions": [2010.0, -10.0, 100000000.0, 50.0, 5.0],
                        "split_indices": [2, 0, 3, 0, 0],
                        "tree_param": {"num_feature": "7", "num_nodes": "5"}
                    },
                    {
                        "base_weights": [0.5],
                        "default_left": [0],
                        "id": 1,
                        "left_children": [-1],
                        "right_children": [-1],
                        "split_conditions": [0.5],
                        "split_indices": [0],
                        "tree_param": {"num_feature": "7", "num_nodes": "1"}
                    }
                ]
            },
            "name": "gbtree"
        },
        "learner_model_param": {"base_score": "[1E2]", "num_class": "0", "num_feature": "7", "num_target": "1"},
        "objective": {"name": "reg:squarederror", "reg_loss_param": {"scale_pos_weight": "1"}}
    },
    "version": [2, 0, 3]
}"#;

pub fn catalog() -> CarCatalog {
    serde_json::from_str(CATALOG_JSON).unwrap()
}

fn sorted(values: impl IntoIterator<Item = impl Into<String>>) -> LabelEncoder {
    let mut classes: Vec<String> = values.into_iter().map(Into::into).collect();
    classes.sort();
    LabelEncoder::new(classes).unwrap()
}

/// Encoders whose vocabularies cover the fixture catalog and every raw transmission label.
pub fn encoders() -> LabelEncoderSet {
    LabelEncoderSet::new([
        (CategoricalField::Brand, sorted(["Audi", "Ford", "Toyota"])),
        (
            CategoricalField::Model,
            sorted(["A4", "A6", "Camry", "Corolla", "F-150", "Mustang", "Prius", "Q5", "RAV4"]),
        ),
        (CategoricalField::FuelType, sorted(["Diesel", "Gasoline", "Hybrid"])),
        (CategoricalField::Transmission, sorted(RAW_TRANSMISSION_LABELS)),
        (
            CategoricalField::Accident,
            sorted(["At least 1 accident or damage reported", "None reported"]),
        ),
    ])
    .unwrap()
}

pub fn ensemble() -> TreeEnsemble {
    TreeEnsemble::from_reader(MODEL_JSON.as_bytes()).unwrap()
}

pub fn context() -> AppContext {
    AppContext::new(
        catalog(),
        encoders(),
        Arc::new(ensemble()),
        TransmissionTaxonomy::standard(),
    )
    .unwrap()
}

/// Request from the reference scenario: 2015 Camry, 50 000 km, 6-speed automatic.
pub fn camry_request() -> PredictionRequest {
    PredictionRequest {
        brand: "Toyota".to_string(),
        model: "Camry".to_string(),
        model_year: 2015,
        milage: 50_000_000.0,
        fuel_type: "Gasoline".to_string(),
        transmission: "6-Speed A/T".to_string(),
        accident: "None reported".to_string(),
    }
}

/// Predictor returning a fixed value and counting invocations.
pub struct CountingPredictor {
    pub value: f64,
    calls: AtomicUsize,
}

impl CountingPredictor {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Predictor for CountingPredictor {
    fn n_features(&self) -> usize {
        7
    }

    fn predict(&self, _features: &[f64]) -> Result<Vec<f64>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![self.value])
    }
}

/// Context backed by a [`CountingPredictor`]; the predictor handle is returned for inspection.
pub fn counting_context(value: f64) -> (AppContext, Arc<CountingPredictor>) {
    let predictor = Arc::new(CountingPredictor::new(value));
    let ctx = AppContext::new(
        catalog(),
        encoders(),
        predictor.clone(),
        TransmissionTaxonomy::standard(),
    )
    .unwrap();
    (ctx, predictor)
}
