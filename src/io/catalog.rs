//! Read the brand → fuel type → model catalog.
//!
//! Expected shape: `{ "<brand>": { "<fuel type>": ["<model>", ...] } }`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::domain::CarCatalog;
use crate::error::AppError;

/// Read a catalog JSON file.
pub fn read_catalog_json(path: &Path) -> Result<CarCatalog, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open catalog JSON '{}': {e}", path.display())))?;
    parse_catalog(BufReader::new(file))
}

pub fn parse_catalog<R: Read>(reader: R) -> Result<CarCatalog, AppError> {
    serde_json::from_reader(reader).map_err(|e| AppError::input(format!("Invalid catalog JSON: {e}")))
}
