//! Read the label encoder set.
//!
//! Expected shape: `{ "<field>": ["<class 0>", "<class 1>", ...], ... }` with one
//! entry per categorical field. A class's code is its index in the list.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::domain::CategoricalField;
use crate::encode::{LabelEncoder, LabelEncoderSet};
use crate::error::AppError;

/// Read a label encoder JSON file.
pub fn read_encoders_json(path: &Path) -> Result<LabelEncoderSet, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open label encoder JSON '{}': {e}", path.display()))
    })?;
    parse_encoders(BufReader::new(file))
}

pub fn parse_encoders<R: Read>(reader: R) -> Result<LabelEncoderSet, AppError> {
    let mut raw: HashMap<String, Vec<String>> = serde_json::from_reader(reader)
        .map_err(|e| AppError::input(format!("Invalid label encoder JSON: {e}")))?;

    let mut encoders = Vec::with_capacity(CategoricalField::ALL.len());
    for field in CategoricalField::ALL {
        let classes = raw.remove(field.key()).ok_or_else(|| {
            AppError::input(format!("Label encoders are missing field '{}'.", field.key()))
        })?;
        let encoder = LabelEncoder::new(classes)
            .map_err(|e| AppError::input(format!("Label encoder '{}': {e}", field.key())))?;
        debug!(field = field.key(), classes = encoder.len(), "label encoder ready");
        encoders.push((field, encoder));
    }
    for extra in raw.keys() {
        debug!(field = extra.as_str(), "ignoring encoder for unused field");
    }

    LabelEncoderSet::new(encoders)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENCODERS_JSON: &str = r#"{
        "brand": ["Audi", "Toyota"],
        "model": ["A4", "Camry"],
        "fuel_type": ["Gasoline"],
        "transmission": ["6-Speed A/T", "CVT-F"],
        "accident": ["At least 1 accident or damage reported", "None reported"],
        "clean_title": ["Yes"]
    }"#;

    #[test]
    fn codes_follow_list_order() {
        let set = parse_encoders(ENCODERS_JSON.as_bytes()).unwrap();
        let brand = set.encoder(CategoricalField::Brand);
        assert_eq!(brand.transform("Toyota"), Some(1));
        assert_eq!(
            set.encoder(CategoricalField::Accident).transform("None reported"),
            Some(1)
        );
    }

    #[test]
    fn missing_field_is_named() {
        let json = r#"{"brand": ["Audi"], "model": ["A4"], "fuel_type": ["Gasoline"], "accident": []}"#;
        let err = parse_encoders(json.as_bytes()).unwrap_err();
        assert_eq!(err.message(), "Label encoders are missing field 'transmission'.");
    }

    #[test]
    fn duplicate_class_names_the_field() {
        let json = ENCODERS_JSON.replace(r#""fuel_type": ["Gasoline"]"#, r#""fuel_type": ["Gasoline", "Gasoline"]"#);
        let err = parse_encoders(json.as_bytes()).unwrap_err();
        assert!(err.message().starts_with("Label encoder 'fuel_type'"));
    }
}
