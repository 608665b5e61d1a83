//! Plain-text rendering shared by the line-oriented commands and the TUI.

use crate::app::context::AppContext;
use crate::domain::{METERS_PER_KM, PredictionRequest};
use crate::encode::UnknownCategory;
use crate::taxonomy::TransmissionTaxonomy;

pub const CURRENCY_SYMBOL: &str = "₹";

/// `₹` + comma-grouped integer part + two decimals, e.g. `₹123,456.78`.
///
/// Negative values keep their sign after the symbol: `₹-1,234.50`, and
/// `₹-0.00` for a negative value that rounds to zero.
pub fn format_price(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{CURRENCY_SYMBOL}{sign}{}.{frac_part}", group_thousands(int_part))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One line per field, in the order the form asks for them.
pub fn format_request_summary(request: &PredictionRequest) -> String {
    let mut out = String::new();
    let rows = [
        ("Brand", request.brand.clone()),
        ("Fuel type", request.fuel_type.clone()),
        ("Model", request.model.clone()),
        ("Model year", request.model_year.to_string()),
        (
            "Mileage",
            format!("{} km", request.milage / METERS_PER_KM),
        ),
        ("Transmission", request.transmission.clone()),
        ("Accident", request.accident.clone()),
    ];
    for (label, value) in rows {
        out.push_str(&format!("{label:<14} {value}\n"));
    }
    out
}

/// Category → subgroup → labels, then the labels the grouped view cannot reach.
pub fn format_taxonomy(taxonomy: &TransmissionTaxonomy) -> String {
    let mut out = String::new();
    if taxonomy.is_empty() {
        out.push_str("(no transmission options)\n");
    }
    for group in taxonomy.groups() {
        out.push_str(&format!("{}\n", group.category));
        for subgroup in &group.subgroups {
            out.push_str(&format!("  {}\n", subgroup.name));
            for label in &subgroup.options {
                out.push_str(&format!("    {label}\n"));
            }
        }
    }

    let unreachable = taxonomy.unreachable();
    if !unreachable.is_empty() {
        out.push_str("\nNot selectable (no speed subgroup):\n");
        for (category, label) in unreachable {
            out.push_str(&format!("  {label:<24} ({category})\n"));
        }
    }
    out
}

/// Selectable values the encoders do not know.
pub fn format_audit(gaps: &[UnknownCategory]) -> String {
    if gaps.is_empty() {
        return "All selectable values are known to the encoders.\n".to_string();
    }
    let mut out = format!(
        "{} selectable value(s) would be rejected at submission:\n",
        gaps.len()
    );
    for gap in gaps {
        out.push_str(&format!("  {:<13} {}\n", gap.field.key(), gap.value));
    }
    out
}

/// Startup summary printed by `carprice check`.
pub fn format_check(ctx: &AppContext) -> String {
    let catalog = ctx.catalog();
    let taxonomy = ctx.taxonomy();
    let mut out = String::new();
    out.push_str("=== carprice - artifact check ===\n");
    out.push_str(&format!(
        "Catalog: {} brands | {} fuel types | {} models\n",
        catalog.brands().len(),
        catalog.all_fuel_types().len(),
        catalog.all_models().len()
    ));
    out.push_str(&format!(
        "Transmissions: {} selectable | {} not selectable\n",
        taxonomy.labels().count(),
        taxonomy.unreachable().len()
    ));
    out.push_str(&format!("Model features: {}\n", ctx.predictor().n_features()));
    out.push_str(&format_audit(&ctx.audit()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoricalField;
    use crate::testing::{camry_request, context};

    #[test]
    fn price_grouping_and_decimals() {
        assert_eq!(format_price(0.0), "₹0.00");
        assert_eq!(format_price(999.0), "₹999.00");
        assert_eq!(format_price(1000.0), "₹1,000.00");
        assert_eq!(format_price(123456.78), "₹123,456.78");
        assert_eq!(format_price(1234567.0), "₹1,234,567.00");
        assert_eq!(format_price(9.999), "₹10.00");
    }

    #[test]
    fn negative_prices_pass_through() {
        assert_eq!(format_price(-1234.5), "₹-1,234.50");
        assert_eq!(format_price(-0.001), "₹-0.00");
        assert_eq!(format_price(-0.0), "₹0.00");
    }

    #[test]
    fn summary_shows_kilometers() {
        let text = format_request_summary(&camry_request());
        assert!(text.contains("Mileage        50000 km"));
        assert!(text.contains("Accident       None reported"));
    }

    #[test]
    fn taxonomy_listing_includes_unreachable_labels() {
        let text = format_taxonomy(&TransmissionTaxonomy::standard());
        assert!(text.starts_with("Manual\n  5-Speed\n    5-Speed M/T\n"));
        assert!(text.contains("Not selectable (no speed subgroup):"));
        assert!(text.contains("  M/T "));
    }

    #[test]
    fn empty_taxonomy_listing() {
        let text = format_taxonomy(&TransmissionTaxonomy::build::<&str>(&[]));
        assert_eq!(text, "(no transmission options)\n");
    }

    #[test]
    fn audit_listing() {
        assert!(format_audit(&[]).starts_with("All selectable values"));
        let text = format_audit(&[UnknownCategory {
            field: CategoricalField::Model,
            value: "Niva".to_string(),
        }]);
        assert!(text.starts_with("1 selectable value(s)"));
        assert!(text.contains("model         Niva"));
    }

    #[test]
    fn check_summary() {
        let text = format_check(&context());
        assert!(text.contains("Catalog: 3 brands | 3 fuel types | 9 models"));
        assert!(text.contains("Model features: 7"));
    }
}
