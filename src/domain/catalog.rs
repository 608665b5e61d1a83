//! Brand → fuel type → model lookup table.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

/// Read-only catalog of the cars the form can offer.
///
/// `BTreeMap`/`BTreeSet` keep every listing lexicographically sorted, which is
/// the order the form presents them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct CarCatalog {
    brands: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl CarCatalog {
    pub fn brands(&self) -> Vec<&str> {
        self.brands.keys().map(String::as_str).collect()
    }

    /// Fuel types offered for `brand`; empty for an unknown brand.
    pub fn fuel_types(&self, brand: &str) -> Vec<&str> {
        self.brands
            .get(brand)
            .map(|fuels| fuels.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Models offered for `(brand, fuel_type)`; empty when either is unknown.
    pub fn models(&self, brand: &str, fuel_type: &str) -> Vec<&str> {
        self.brands
            .get(brand)
            .and_then(|fuels| fuels.get(fuel_type))
            .map(|models| models.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }

    /// Every distinct fuel type across all brands.
    pub fn all_fuel_types(&self) -> BTreeSet<&str> {
        self.brands
            .values()
            .flat_map(|fuels| fuels.keys().map(String::as_str))
            .collect()
    }

    /// Every distinct model name across all brands and fuel types.
    pub fn all_models(&self) -> BTreeSet<&str> {
        self.brands
            .values()
            .flat_map(|fuels| fuels.values())
            .flat_map(|models| models.iter().map(String::as_str))
            .collect()
    }

    pub fn model_count(&self) -> usize {
        self.brands
            .values()
            .flat_map(|fuels| fuels.values())
            .map(BTreeSet::len)
            .sum()
    }
}
