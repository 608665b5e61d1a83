//! Process-wide, read-only state.
//!
//! Everything the form and the prediction adapter need is loaded here exactly
//! once and then only borrowed. Nothing in the context is mutated after
//! construction, so it can be shared without locking.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{AccidentHistory, ArtifactPaths, CarCatalog, CategoricalField, FEATURE_NAMES};
use crate::encode::{LabelEncoderSet, UnknownCategory};
use crate::error::AppError;
use crate::models::Predictor;
use crate::taxonomy::TransmissionTaxonomy;

pub struct AppContext {
    catalog: CarCatalog,
    encoders: LabelEncoderSet,
    predictor: Arc<dyn Predictor>,
    taxonomy: TransmissionTaxonomy,
}

impl AppContext {
    /// Assemble a context from already-loaded parts.
    pub fn new(
        catalog: CarCatalog,
        encoders: LabelEncoderSet,
        predictor: Arc<dyn Predictor>,
        taxonomy: TransmissionTaxonomy,
    ) -> Result<Self, AppError> {
        if predictor.n_features() != FEATURE_NAMES.len() {
            return Err(AppError::input(format!(
                "Model expects {} features; the form produces {} ({}).",
                predictor.n_features(),
                FEATURE_NAMES.len(),
                FEATURE_NAMES.join(", ")
            )));
        }
        Ok(Self {
            catalog,
            encoders,
            predictor,
            taxonomy,
        })
    }

    /// Load all artifacts from disk and build the transmission taxonomy.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, AppError> {
        let catalog = crate::io::read_catalog_json(&paths.catalog)?;
        if catalog.is_empty() {
            warn!(path = %paths.catalog.display(), "car catalog has no brands; the form cannot be completed");
        }
        info!(
            path = %paths.catalog.display(),
            brands = catalog.brands().len(),
            models = catalog.model_count(),
            "loaded car catalog"
        );

        let encoders = crate::io::read_encoders_json(&paths.encoders)?;
        info!(path = %paths.encoders.display(), "loaded label encoders");

        let model = crate::io::read_model_json(&paths.model)?;
        let names = model.feature_names();
        if !names.is_empty() && names.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(AppError::input(format!(
                "Model was trained on features [{}], expected [{}].",
                names.join(", "),
                FEATURE_NAMES.join(", ")
            )));
        }
        info!(
            path = %paths.model.display(),
            trees = model.n_trees(),
            "loaded price model"
        );

        let taxonomy = TransmissionTaxonomy::standard();
        for (category, label) in taxonomy.unreachable() {
            warn!(%category, label = label.as_str(), "transmission label has no speed subgroup and cannot be selected");
        }

        let ctx = Self::new(catalog, encoders, Arc::new(model), taxonomy)?;
        for gap in ctx.audit() {
            warn!(field = %gap.field, value = gap.value.as_str(), "selectable value is unknown to the encoder");
        }
        Ok(ctx)
    }

    pub fn catalog(&self) -> &CarCatalog {
        &self.catalog
    }

    pub fn encoders(&self) -> &LabelEncoderSet {
        &self.encoders
    }

    pub fn predictor(&self) -> &dyn Predictor {
        self.predictor.as_ref()
    }

    pub fn taxonomy(&self) -> &TransmissionTaxonomy {
        &self.taxonomy
    }

    /// Values the form can offer that the encoders would reject.
    ///
    /// Any entry here is a guaranteed rejection if the user picks it.
    pub fn audit(&self) -> Vec<UnknownCategory> {
        let mut offered: BTreeSet<(CategoricalField, &str)> = BTreeSet::new();
        offered.extend(self.catalog.brands().into_iter().map(|v| (CategoricalField::Brand, v)));
        offered.extend(self.catalog.all_models().into_iter().map(|v| (CategoricalField::Model, v)));
        offered.extend(
            self.catalog
                .all_fuel_types()
                .into_iter()
                .map(|v| (CategoricalField::FuelType, v)),
        );
        offered.extend(self.taxonomy.labels().map(|v| (CategoricalField::Transmission, v)));
        offered.extend(
            AccidentHistory::ALL
                .into_iter()
                .map(|a| (CategoricalField::Accident, a.canonical())),
        );

        offered
            .into_iter()
            .filter(|(field, value)| !self.encoders.encoder(*field).contains(value))
            .map(|(field, value)| UnknownCategory {
                field,
                value: value.to_string(),
            })
            .collect()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("brands", &self.catalog.brands().len())
            .field("taxonomy_categories", &self.taxonomy.categories().len())
            .field("predictor_features", &self.predictor.n_features())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingPredictor, catalog, context, encoders};

    struct NarrowPredictor;

    impl Predictor for NarrowPredictor {
        fn n_features(&self) -> usize {
            3
        }

        fn predict(&self, _features: &[f64]) -> Result<Vec<f64>, AppError> {
            Ok(vec![0.0])
        }
    }

    #[test]
    fn fixture_context_is_consistent() {
        assert!(context().audit().is_empty());
    }

    #[test]
    fn feature_count_mismatch_is_rejected() {
        let err = AppContext::new(
            catalog(),
            encoders(),
            Arc::new(NarrowPredictor),
            TransmissionTaxonomy::standard(),
        )
        .unwrap_err();
        assert!(err.message().contains("expects 3 features"));
    }

    #[test]
    fn audit_reports_catalog_values_missing_from_encoders() {
        let extended: CarCatalog = serde_json::from_str(
            r#"{"Toyota": {"Gasoline": ["Camry", "Unobtainium3000"]}, "Lada": {"Petrol": ["Niva"]}}"#,
        )
        .unwrap();
        let ctx = AppContext::new(
            extended,
            encoders(),
            Arc::new(CountingPredictor::new(1.0)),
            TransmissionTaxonomy::standard(),
        )
        .unwrap();
        let gaps: Vec<(CategoricalField, String)> =
            ctx.audit().into_iter().map(|g| (g.field, g.value)).collect();
        assert_eq!(
            gaps,
            vec![
                (CategoricalField::Brand, "Lada".to_string()),
                (CategoricalField::Model, "Niva".to_string()),
                (CategoricalField::Model, "Unobtainium3000".to_string()),
                (CategoricalField::FuelType, "Petrol".to_string()),
            ]
        );
    }
}
