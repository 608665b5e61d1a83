//! Label encoding with an explicit unseen-value guard.
//!
//! Each categorical field maps a fixed vocabulary to integer codes. The code of
//! a class is its position in the artifact's class list, which is how a fitted
//! label encoder numbers its (sorted) classes.

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::{CategoricalField, EncodedRecord, PredictionRequest};
use crate::error::AppError;

/// A categorical value the encoder has never seen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} '{value}' not found in training data.", .field.label())]
pub struct UnknownCategory {
    pub field: CategoricalField,
    pub value: String,
}

/// Bijection between one field's known strings and integer codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, u32>,
}

impl LabelEncoder {
    /// Build from classes in code order. Duplicates would break injectivity.
    pub fn new(classes: Vec<String>) -> Result<Self, AppError> {
        let mut codes = HashMap::with_capacity(classes.len());
        for (idx, class) in classes.iter().enumerate() {
            let code = u32::try_from(idx)
                .map_err(|_| AppError::input("Label encoder has too many classes."))?;
            if codes.insert(class.clone(), code).is_some() {
                return Err(AppError::input(format!("Duplicate label encoder class '{class}'.")));
            }
        }
        Ok(Self { classes, codes })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.codes.contains_key(value)
    }

    /// Code for a known value.
    pub fn transform(&self, value: &str) -> Option<u32> {
        self.codes.get(value).copied()
    }

    /// Inverse of [`transform`](Self::transform).
    pub fn inverse(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }
}

/// One encoder per categorical field. Every field is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoderSet {
    brand: LabelEncoder,
    model: LabelEncoder,
    fuel_type: LabelEncoder,
    transmission: LabelEncoder,
    accident: LabelEncoder,
}

impl LabelEncoderSet {
    /// Assemble the set; fails when any field is missing.
    pub fn new(
        encoders: impl IntoIterator<Item = (CategoricalField, LabelEncoder)>,
    ) -> Result<Self, AppError> {
        let mut by_field: HashMap<CategoricalField, LabelEncoder> = encoders.into_iter().collect();
        let mut take = |field: CategoricalField| {
            by_field.remove(&field).ok_or_else(|| {
                AppError::input(format!("Label encoders are missing field '{}'.", field.key()))
            })
        };
        Ok(Self {
            brand: take(CategoricalField::Brand)?,
            model: take(CategoricalField::Model)?,
            fuel_type: take(CategoricalField::FuelType)?,
            transmission: take(CategoricalField::Transmission)?,
            accident: take(CategoricalField::Accident)?,
        })
    }

    pub fn encoder(&self, field: CategoricalField) -> &LabelEncoder {
        match field {
            CategoricalField::Brand => &self.brand,
            CategoricalField::Model => &self.model,
            CategoricalField::FuelType => &self.fuel_type,
            CategoricalField::Transmission => &self.transmission,
            CategoricalField::Accident => &self.accident,
        }
    }

    pub fn encode_value(&self, field: CategoricalField, value: &str) -> Result<u32, UnknownCategory> {
        self.encoder(field)
            .transform(value)
            .ok_or_else(|| UnknownCategory {
                field,
                value: value.to_string(),
            })
    }

    /// Encode every categorical field in [`CategoricalField::ALL`] order.
    ///
    /// Stops at the first unknown value; later fields are not looked at.
    pub fn encode(&self, request: &PredictionRequest) -> Result<EncodedRecord, UnknownCategory> {
        let mut codes = [0u32; 5];
        for (slot, field) in codes.iter_mut().zip(CategoricalField::ALL) {
            *slot = self.encode_value(field, request.categorical(field))?;
        }
        let [brand, model, fuel_type, transmission, accident] = codes;
        Ok(EncodedRecord {
            brand,
            model,
            model_year: request.model_year,
            milage: request.milage,
            fuel_type,
            transmission,
            accident,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{camry_request, encoders};

    #[test]
    fn codes_are_positions() {
        let enc = LabelEncoder::new(vec!["Audi".into(), "BMW".into(), "Toyota".into()]).unwrap();
        assert_eq!(enc.transform("Audi"), Some(0));
        assert_eq!(enc.transform("Toyota"), Some(2));
        assert_eq!(enc.transform("Tesla"), None);
        assert_eq!(enc.inverse(1), Some("BMW"));
    }

    #[test]
    fn encoding_is_injective() {
        let set = encoders();
        for field in CategoricalField::ALL {
            let enc = set.encoder(field);
            let mut seen = std::collections::HashSet::new();
            for class in enc.classes() {
                let code = enc.transform(class).unwrap();
                assert!(seen.insert(code), "{field}: duplicate code {code}");
                assert_eq!(enc.inverse(code), Some(class.as_str()));
            }
        }
    }

    #[test]
    fn duplicate_classes_are_rejected() {
        let err = LabelEncoder::new(vec!["A/T".into(), "A/T".into()]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("Duplicate"));
    }

    #[test]
    fn missing_field_is_rejected() {
        let enc = LabelEncoder::new(vec!["x".into()]).unwrap();
        let err = LabelEncoderSet::new([(CategoricalField::Brand, enc)]).unwrap_err();
        assert!(err.message().contains("'model'"));
    }

    #[test]
    fn encode_passes_numerics_through() {
        let set = encoders();
        let record = set.encode(&camry_request()).unwrap();
        assert_eq!(record.model_year, 2015);
        assert_eq!(record.milage, 50_000_000.0);
        assert_eq!(record.brand, set.encoder(CategoricalField::Brand).transform("Toyota").unwrap());
    }

    #[test]
    fn first_unknown_field_wins() {
        let set = encoders();
        let mut req = camry_request();
        req.model = "Unobtainium3000".to_string();
        req.accident = "Sometimes".to_string();
        let err = set.encode(&req).unwrap_err();
        assert_eq!(
            err,
            UnknownCategory {
                field: CategoricalField::Model,
                value: "Unobtainium3000".to_string(),
            }
        );
        assert_eq!(err.to_string(), "Model 'Unobtainium3000' not found in training data.");
    }
}
