//! Raw transmission labels and the ordered substring rules that group them.
//!
//! Rule order is significant: a label matching several rules lands in the first
//! one only. Reordering these tables moves ambiguous labels between groups.

use serde::Serialize;

/// Transmission labels as they appear in the training data, in source order.
pub const RAW_TRANSMISSION_LABELS: [&str; 38] = [
    "6-Speed A/T",
    "8-Speed A/T",
    "A/T",
    "7-Speed A/T",
    "F",
    "Transmission w/Dual Shift Mode",
    "6-Speed M/T",
    "10-Speed A/T",
    "9-Speed A/T",
    "5-Speed A/T",
    "A/T CVT",
    "CVT-F",
    "6-Speed A/T with Auto-Shift",
    "M/T",
    "CVT Transmission",
    "4-Speed A/T",
    "8-Speed A/T with Auto-Shift",
    "8-SPEED AT",
    "5-Speed M/T",
    "Variable",
    "2",
    "A/T, 9-Speed 9G-Tronic",
    "A/T, 8-Speed",
    "A/T, 8-Speed Sport w/Sport & M/T Modes",
    "Auto, 6-Speed w/CmdShft",
    "Transmission Overdrive Switch",
    "A/T, 8-Speed M STEPTRONIC w/Drivelogic, Sport & M/T Modes",
    "7-Speed A/T with Auto-Shift",
    "6-Speed",
    "A/T, 10-Speed",
    "1-Speed A/T",
    "7-Speed M/T",
    "A/T, 7-Speed S tronic Dual-Clutch",
    "M/T, 6-Speed",
    "6-Speed Electronically Controlled A/T with O",
    "6 Speed At/Mt",
    "SCHEDULED FOR OR IN PRODUCTION",
    "8-Speed M/T",
];

/// Top-level transmission grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TransmissionCategory {
    Manual,
    Automatic,
    Cvt,
    Other,
}

/// Category rules in precedence order. `Other` is the fallback and has no rule.
const CATEGORY_RULES: [(TransmissionCategory, &[&str]); 3] = [
    (TransmissionCategory::Manual, &["M/T"]),
    (TransmissionCategory::Automatic, &["A/T", "Auto"]),
    (TransmissionCategory::Cvt, &["CVT", "Variable"]),
];

/// Manual labels in the training data only carry 5 to 8 speeds.
const MANUAL_SPEEDS: [&str; 4] = ["5-Speed", "6-Speed", "7-Speed", "8-Speed"];

// "10-Speed" does not contain "1-Speed", so the tail position of "1-Speed" is
// about presentation order only.
const AUTOMATIC_SPEEDS: [&str; 8] = [
    "4-Speed", "5-Speed", "6-Speed", "7-Speed", "8-Speed", "9-Speed", "10-Speed", "1-Speed",
];

impl TransmissionCategory {
    pub const ALL: [TransmissionCategory; 4] = [
        TransmissionCategory::Manual,
        TransmissionCategory::Automatic,
        TransmissionCategory::Cvt,
        TransmissionCategory::Other,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            TransmissionCategory::Manual => "Manual",
            TransmissionCategory::Automatic => "Automatic",
            TransmissionCategory::Cvt => "CVT",
            TransmissionCategory::Other => "Other",
        }
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(name.trim()))
    }

    /// Speed subgroups in match order, or `None` for a flat category.
    pub fn speed_rules(self) -> Option<&'static [&'static str]> {
        match self {
            TransmissionCategory::Manual => Some(&MANUAL_SPEEDS[..]),
            TransmissionCategory::Automatic => Some(&AUTOMATIC_SPEEDS[..]),
            TransmissionCategory::Cvt | TransmissionCategory::Other => None,
        }
    }

    /// Subgroup names in presentation order.
    pub fn subgroup_names(self) -> &'static [&'static str] {
        match self {
            TransmissionCategory::Manual => &MANUAL_SPEEDS,
            TransmissionCategory::Automatic => &AUTOMATIC_SPEEDS,
            TransmissionCategory::Cvt => &["CVT"],
            TransmissionCategory::Other => &["Other"],
        }
    }
}

impl std::fmt::Display for TransmissionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// First matching category rule, falling back to `Other`.
pub fn classify(label: &str) -> TransmissionCategory {
    CATEGORY_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| label.contains(n)))
        .map(|(category, _)| *category)
        .unwrap_or(TransmissionCategory::Other)
}

/// Subgroup for `label` within `category`.
///
/// Flat categories always return their own name. Speed-split categories return
/// the first matching speed, or `None` when the label carries no speed.
pub fn subgroup_of(category: TransmissionCategory, label: &str) -> Option<&'static str> {
    match category.speed_rules() {
        Some(speeds) => speeds.iter().copied().find(|s| label.contains(s)),
        None => category.subgroup_names().first().copied(),
    }
}
