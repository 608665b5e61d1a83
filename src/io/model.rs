//! Read the trained price model.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::AppError;
use crate::models::TreeEnsemble;

/// Read a tree-ensemble model JSON export.
pub fn read_model_json(path: &Path) -> Result<TreeEnsemble, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open model JSON '{}': {e}", path.display())))?;
    TreeEnsemble::from_reader(BufReader::new(file))
        .map_err(|e| AppError::input(format!("{} ({})", e, path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_names_the_path() {
        let err = read_model_json(Path::new("does/not/exist/xgb_model.json")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("xgb_model.json"));
    }
}
