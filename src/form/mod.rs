//! Dependent-field form state.
//!
//! The form holds the user's current answers and nothing else. Option lists are
//! recomputed from the parents' current values every time they are asked for,
//! so a child field can never show choices that belong to a stale parent.
//!
//! After any change the form re-resolves top-down. A list field whose options
//! are exactly what they were before the change keeps its value; a field whose
//! options changed restarts at the first one (or at nothing, when the list is
//! empty). A value that happens to appear in both old and new lists is not
//! carried over.
//!
//! Every front-end (TUI, line prompt, one-shot command) drives this type.

use crate::domain::{
    AccidentHistory, CarCatalog, MILEAGE_STEP_KM, MODEL_YEAR_MAX, MODEL_YEAR_MIN,
    PredictionRequest, km_to_meters,
};
use crate::error::AppError;
use crate::taxonomy::{TransmissionCategory, TransmissionTaxonomy};

/// List fields that are re-resolved after every change, parents first.
const RESOLVED: [FormField; 6] = [
    FormField::Brand,
    FormField::FuelType,
    FormField::Model,
    FormField::TransmissionType,
    FormField::GearSpeed,
    FormField::Transmission,
];

/// Form fields in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Brand,
    FuelType,
    Model,
    ModelYear,
    Mileage,
    TransmissionType,
    GearSpeed,
    Transmission,
    Accident,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Brand,
        FormField::FuelType,
        FormField::Model,
        FormField::ModelYear,
        FormField::Mileage,
        FormField::TransmissionType,
        FormField::GearSpeed,
        FormField::Transmission,
        FormField::Accident,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Brand => "Brand",
            FormField::FuelType => "Fuel type",
            FormField::Model => "Model",
            FormField::ModelYear => "Model year",
            FormField::Mileage => "Mileage (km)",
            FormField::TransmissionType => "Transmission type",
            FormField::GearSpeed => "Gear speed",
            FormField::Transmission => "Transmission option",
            FormField::Accident => "Accident history",
        }
    }

    /// Numeric fields are typed or stepped; all others pick from a list.
    pub fn is_numeric(self) -> bool {
        matches!(self, FormField::ModelYear | FormField::Mileage)
    }
}

pub struct Form<'c> {
    catalog: &'c CarCatalog,
    taxonomy: &'c TransmissionTaxonomy,
    brand: Option<String>,
    fuel_type: Option<String>,
    model: Option<String>,
    model_year: i32,
    mileage_km: f64,
    category: Option<TransmissionCategory>,
    speed: Option<String>,
    transmission: Option<String>,
    accident: AccidentHistory,
}

impl<'c> Form<'c> {
    /// A form with every list field on its first option and numeric defaults
    /// at their minimum.
    pub fn new(catalog: &'c CarCatalog, taxonomy: &'c TransmissionTaxonomy) -> Self {
        let mut form = Self {
            catalog,
            taxonomy,
            brand: None,
            fuel_type: None,
            model: None,
            model_year: MODEL_YEAR_MIN,
            mileage_km: 0.0,
            category: None,
            speed: None,
            transmission: None,
            accident: AccidentHistory::No,
        };
        form.resolve(&[]);
        form
    }

    pub fn brands(&self) -> Vec<&'c str> {
        self.catalog.brands()
    }

    pub fn fuel_types(&self) -> Vec<&'c str> {
        match &self.brand {
            Some(brand) => self.catalog.fuel_types(brand),
            None => Vec::new(),
        }
    }

    pub fn models(&self) -> Vec<&'c str> {
        match (&self.brand, &self.fuel_type) {
            (Some(brand), Some(fuel)) => self.catalog.models(brand, fuel),
            _ => Vec::new(),
        }
    }

    pub fn transmission_types(&self) -> Vec<TransmissionCategory> {
        self.taxonomy.categories()
    }

    pub fn gear_speeds(&self) -> Vec<&'c str> {
        match self.category {
            Some(category) => self.taxonomy.subgroups(category),
            None => Vec::new(),
        }
    }

    pub fn transmissions(&self) -> Vec<&'c str> {
        match (self.category, &self.speed) {
            (Some(category), Some(speed)) => self
                .taxonomy
                .options(category, speed)
                .iter()
                .map(String::as_str)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Display strings for a list field's current options; empty for numeric fields.
    pub fn options(&self, field: FormField) -> Vec<String> {
        let owned = |v: Vec<&str>| v.into_iter().map(str::to_string).collect();
        match field {
            FormField::Brand => owned(self.brands()),
            FormField::FuelType => owned(self.fuel_types()),
            FormField::Model => owned(self.models()),
            FormField::TransmissionType => self
                .transmission_types()
                .into_iter()
                .map(|c| c.display_name().to_string())
                .collect(),
            FormField::GearSpeed => owned(self.gear_speeds()),
            FormField::Transmission => owned(self.transmissions()),
            FormField::Accident => AccidentHistory::ALL
                .iter()
                .map(|a| a.display_name().to_string())
                .collect(),
            FormField::ModelYear | FormField::Mileage => Vec::new(),
        }
    }

    /// Current value as displayed; `None` when a list field has nothing to offer.
    pub fn value(&self, field: FormField) -> Option<String> {
        match field {
            FormField::Brand => self.brand.clone(),
            FormField::FuelType => self.fuel_type.clone(),
            FormField::Model => self.model.clone(),
            FormField::ModelYear => Some(self.model_year.to_string()),
            FormField::Mileage => Some(format!("{}", self.mileage_km)),
            FormField::TransmissionType => self.category.map(|c| c.display_name().to_string()),
            FormField::GearSpeed => self.speed.clone(),
            FormField::Transmission => self.transmission.clone(),
            FormField::Accident => Some(self.accident.display_name().to_string()),
        }
    }

    pub fn model_year(&self) -> i32 {
        self.model_year
    }

    pub fn mileage_km(&self) -> f64 {
        self.mileage_km
    }

    pub fn accident(&self) -> AccidentHistory {
        self.accident
    }

    /// Set a field from text, as a user would type or pick it.
    ///
    /// List fields only accept a value among their current options.
    pub fn select(&mut self, field: FormField, value: &str) -> Result<(), AppError> {
        match field {
            FormField::ModelYear => {
                let year = value.trim().parse::<i32>().map_err(|_| {
                    AppError::input(format!("Model year must be a whole number, got '{value}'."))
                })?;
                return self.set_model_year(year);
            }
            FormField::Mileage => {
                let km = value.trim().parse::<f64>().map_err(|_| {
                    AppError::input(format!("Mileage must be a number of kilometers, got '{value}'."))
                })?;
                return self.set_mileage_km(km);
            }
            _ => {}
        }

        let options = self.options(field);
        let Some(chosen) = options.into_iter().find(|o| o == value) else {
            return Err(AppError::input(format!(
                "'{value}' is not an available {} for the current selection.",
                field.label().to_lowercase()
            )));
        };
        if field == FormField::Accident {
            self.accident = AccidentHistory::from_display_name(&chosen).unwrap_or_default();
            return Ok(());
        }

        let before = self.offered();
        self.assign(field, Some(chosen));
        self.resolve(&before);
        Ok(())
    }

    /// Move a field by `delta` steps: list fields wrap around their options,
    /// numeric fields move by their step and stay within bounds.
    pub fn step(&mut self, field: FormField, delta: i32) {
        match field {
            FormField::ModelYear => {
                self.model_year = (self.model_year + delta).clamp(MODEL_YEAR_MIN, MODEL_YEAR_MAX);
            }
            FormField::Mileage => {
                self.mileage_km = (self.mileage_km + f64::from(delta) * MILEAGE_STEP_KM).max(0.0);
            }
            _ => {
                let options = self.options(field);
                if options.is_empty() {
                    return;
                }
                let current = self
                    .value(field)
                    .and_then(|v| options.iter().position(|o| *o == v))
                    .unwrap_or(0);
                let len = options.len() as i64;
                let next = (current as i64 + i64::from(delta)).rem_euclid(len) as usize;
                let value = options[next].clone();
                // The value comes from the current options, so this cannot fail.
                let _ = self.select(field, &value);
            }
        }
    }

    pub fn set_model_year(&mut self, year: i32) -> Result<(), AppError> {
        if !(MODEL_YEAR_MIN..=MODEL_YEAR_MAX).contains(&year) {
            return Err(AppError::input(format!(
                "Model year must be between {MODEL_YEAR_MIN} and {MODEL_YEAR_MAX}, got {year}."
            )));
        }
        self.model_year = year;
        Ok(())
    }

    pub fn set_mileage_km(&mut self, km: f64) -> Result<(), AppError> {
        if !(km.is_finite() && km >= 0.0) {
            return Err(AppError::input(format!(
                "Mileage must be a non-negative number of kilometers, got {km}."
            )));
        }
        self.mileage_km = km;
        Ok(())
    }

    pub fn set_accident(&mut self, accident: AccidentHistory) {
        self.accident = accident;
    }

    /// Pick a raw transmission label directly, selecting its type and speed.
    pub fn select_transmission_label(&mut self, label: &str) -> Result<(), AppError> {
        let (category, speed) = self.taxonomy.locate(label).ok_or_else(|| {
            AppError::input(format!(
                "Transmission '{label}' is not selectable. Run `carprice taxonomy` to list options."
            ))
        })?;
        let speed = speed.to_string();
        self.select(FormField::TransmissionType, category.display_name())?;
        self.select(FormField::GearSpeed, &speed)?;
        self.select(FormField::Transmission, label)
    }

    /// Build the request for submission.
    ///
    /// Fails when any list field has no value because its option list is empty.
    pub fn request(&self) -> Result<PredictionRequest, AppError> {
        let missing = |field: FormField| {
            AppError::input(format!(
                "Form incomplete: no {} available.",
                field.label().to_lowercase()
            ))
        };
        Ok(PredictionRequest {
            brand: self.brand.clone().ok_or_else(|| missing(FormField::Brand))?,
            model: self.model.clone().ok_or_else(|| missing(FormField::Model))?,
            model_year: self.model_year,
            milage: km_to_meters(self.mileage_km),
            fuel_type: self.fuel_type.clone().ok_or_else(|| missing(FormField::FuelType))?,
            transmission: self
                .transmission
                .clone()
                .ok_or_else(|| missing(FormField::Transmission))?,
            accident: self.accident.canonical().to_string(),
        })
    }

    /// Current option lists of the re-resolved fields, in [`RESOLVED`] order.
    fn offered(&self) -> Vec<Vec<String>> {
        RESOLVED.iter().map(|field| self.options(*field)).collect()
    }

    fn assign(&mut self, field: FormField, value: Option<String>) {
        match field {
            FormField::Brand => self.brand = value,
            FormField::FuelType => self.fuel_type = value,
            FormField::Model => self.model = value,
            FormField::TransmissionType => {
                self.category = value.as_deref().and_then(TransmissionCategory::from_display_name);
            }
            FormField::GearSpeed => self.speed = value,
            FormField::Transmission => self.transmission = value,
            FormField::ModelYear | FormField::Mileage | FormField::Accident => {}
        }
    }

    /// `before` holds the option lists seen before the change; empty on construction.
    fn resolve(&mut self, before: &[Vec<String>]) {
        for (idx, field) in RESOLVED.into_iter().enumerate() {
            let options = self.options(field);
            let unchanged = before.get(idx).is_some_and(|prev| *prev == options);
            let next = match self.value(field) {
                Some(current) if unchanged && options.contains(&current) => Some(current),
                _ => options.into_iter().next(),
            };
            self.assign(field, next);
        }
    }
}
