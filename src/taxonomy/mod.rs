//! Transmission taxonomy: category → subgroup → raw labels.
//!
//! The training data carries ~40 free-text transmission labels. Offering them as
//! one flat list is unusable, so the form narrows the choice in three steps.
//! The taxonomy only regroups existing labels; it never invents one, so every
//! reachable option is a value the transmission encoder knows.
//!
//! Manual and Automatic labels without a speed substring (e.g. plain `"A/T"`)
//! have no subgroup and are therefore not reachable through the grouped view.
//! They are kept in `unreachable()` so callers can report them.

pub mod rules;

pub use rules::{RAW_TRANSMISSION_LABELS, TransmissionCategory, classify, subgroup_of};

/// One subgroup and the labels it offers, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subgroup {
    pub name: String,
    pub options: Vec<String>,
}

/// All non-empty subgroups of one category, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub category: TransmissionCategory,
    pub subgroups: Vec<Subgroup>,
}

/// Immutable grouping built once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransmissionTaxonomy {
    groups: Vec<CategoryGroup>,
    unreachable: Vec<(TransmissionCategory, String)>,
}

impl TransmissionTaxonomy {
    /// Group `labels` by the ordered rules in [`rules`].
    ///
    /// Duplicate labels are kept once. Empty subgroups and categories are
    /// omitted, so an empty input yields an empty taxonomy.
    pub fn build<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut assigned: Vec<(TransmissionCategory, Option<&'static str>, &str)> = Vec::new();
        for label in labels {
            let label = label.as_ref();
            if assigned.iter().any(|(_, _, seen)| *seen == label) {
                continue;
            }
            let category = classify(label);
            assigned.push((category, subgroup_of(category, label), label));
        }

        let mut groups = Vec::new();
        for category in TransmissionCategory::ALL {
            let subgroups: Vec<Subgroup> = category
                .subgroup_names()
                .iter()
                .map(|name| Subgroup {
                    name: (*name).to_string(),
                    options: assigned
                        .iter()
                        .filter(|(c, s, _)| *c == category && *s == Some(*name))
                        .map(|(_, _, label)| (*label).to_string())
                        .collect(),
                })
                .filter(|sub| !sub.options.is_empty())
                .collect();
            if !subgroups.is_empty() {
                groups.push(CategoryGroup { category, subgroups });
            }
        }

        let unreachable = assigned
            .iter()
            .filter(|(_, s, _)| s.is_none())
            .map(|(c, _, label)| (*c, (*label).to_string()))
            .collect();

        Self { groups, unreachable }
    }

    /// Taxonomy over the training-data label list.
    pub fn standard() -> Self {
        Self::build(&RAW_TRANSMISSION_LABELS)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    pub fn categories(&self) -> Vec<TransmissionCategory> {
        self.groups.iter().map(|g| g.category).collect()
    }

    pub fn subgroups(&self, category: TransmissionCategory) -> Vec<&str> {
        self.group(category)
            .map(|g| g.subgroups.iter().map(|s| s.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Labels under `(category, subgroup)`; empty when either is absent.
    pub fn options(&self, category: TransmissionCategory, subgroup: &str) -> &[String] {
        self.group(category)
            .and_then(|g| g.subgroups.iter().find(|s| s.name == subgroup))
            .map(|s| s.options.as_slice())
            .unwrap_or(&[])
    }

    /// Where `label` is reachable, if anywhere.
    pub fn locate(&self, label: &str) -> Option<(TransmissionCategory, &str)> {
        self.groups.iter().find_map(|g| {
            g.subgroups
                .iter()
                .find(|s| s.options.iter().any(|o| o == label))
                .map(|s| (g.category, s.name.as_str()))
        })
    }

    /// Labels classified into a category but absent from all of its subgroups.
    pub fn unreachable(&self) -> &[(TransmissionCategory, String)] {
        &self.unreachable
    }

    /// Every reachable label.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.subgroups.iter())
            .flat_map(|s| s.options.iter().map(String::as_str))
    }

    fn group(&self, category: TransmissionCategory) -> Option<&CategoryGroup> {
        self.groups.iter().find(|g| g.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_categories_in_rule_order() {
        let t = TransmissionTaxonomy::standard();
        assert_eq!(t.categories(), TransmissionCategory::ALL.to_vec());
        assert_eq!(
            t.subgroups(TransmissionCategory::Manual),
            vec!["5-Speed", "6-Speed", "7-Speed", "8-Speed"]
        );
        assert_eq!(
            t.subgroups(TransmissionCategory::Automatic),
            vec![
                "4-Speed", "5-Speed", "6-Speed", "7-Speed", "8-Speed", "9-Speed", "10-Speed",
                "1-Speed"
            ]
        );
        assert_eq!(t.subgroups(TransmissionCategory::Cvt), vec!["CVT"]);
        assert_eq!(t.subgroups(TransmissionCategory::Other), vec!["Other"]);
    }

    #[test]
    fn each_label_has_one_home_or_is_unreachable() {
        let t = TransmissionTaxonomy::standard();
        let mut reachable = 0;
        for label in RAW_TRANSMISSION_LABELS {
            let homes = t.labels().filter(|l| *l == label).count();
            let dropped = t.unreachable().iter().any(|(_, l)| l == label);
            assert!(
                (homes == 1 && !dropped) || (homes == 0 && dropped),
                "label {label:?}: homes={homes} dropped={dropped}"
            );
            reachable += homes;
        }
        assert_eq!(reachable + t.unreachable().len(), RAW_TRANSMISSION_LABELS.len());
    }

    #[test]
    fn speedless_labels_are_reported() {
        let t = TransmissionTaxonomy::standard();
        let dropped: Vec<(TransmissionCategory, &str)> = t
            .unreachable()
            .iter()
            .map(|(c, l)| (*c, l.as_str()))
            .collect();
        assert_eq!(
            dropped,
            vec![
                (TransmissionCategory::Automatic, "A/T"),
                (TransmissionCategory::Automatic, "A/T CVT"),
                (TransmissionCategory::Manual, "M/T"),
            ]
        );
        assert_eq!(t.locate("A/T"), None);
    }

    #[test]
    fn ambiguous_labels_follow_precedence() {
        let t = TransmissionTaxonomy::standard();
        assert_eq!(
            t.locate("A/T, 8-Speed Sport w/Sport & M/T Modes"),
            Some((TransmissionCategory::Manual, "8-Speed"))
        );
        assert_eq!(
            t.locate("6-Speed A/T"),
            Some((TransmissionCategory::Automatic, "6-Speed"))
        );
        assert_eq!(t.locate("Variable"), Some((TransmissionCategory::Cvt, "CVT")));
        assert_eq!(t.locate("6-Speed"), Some((TransmissionCategory::Other, "Other")));
        assert_eq!(
            t.locate("A/T, 10-Speed"),
            Some((TransmissionCategory::Automatic, "10-Speed"))
        );
    }

    #[test]
    fn options_keep_input_order() {
        let t = TransmissionTaxonomy::standard();
        assert_eq!(
            t.options(TransmissionCategory::Automatic, "6-Speed"),
            [
                "6-Speed A/T",
                "6-Speed A/T with Auto-Shift",
                "Auto, 6-Speed w/CmdShft",
                "6-Speed Electronically Controlled A/T with O",
            ]
        );
        assert_eq!(t.options(TransmissionCategory::Cvt, "CVT"), ["CVT-F", "CVT Transmission", "Variable"]);
        assert!(t.options(TransmissionCategory::Manual, "10-Speed").is_empty());
    }

    #[test]
    fn taxonomy_never_invents_labels() {
        let t = TransmissionTaxonomy::standard();
        for label in t.labels() {
            assert!(RAW_TRANSMISSION_LABELS.contains(&label), "{label:?}");
        }
    }

    #[test]
    fn empty_input_gives_empty_taxonomy() {
        let t = TransmissionTaxonomy::build::<&str>(&[]);
        assert!(t.is_empty());
        assert!(t.categories().is_empty());
        assert!(t.subgroups(TransmissionCategory::Manual).is_empty());
        assert!(t.options(TransmissionCategory::Other, "Other").is_empty());
    }

    #[test]
    fn multi_speed_label_lands_in_one_subgroup() {
        let label = "A/T, 8-Speed 9-Speed";
        let t = TransmissionTaxonomy::build(&[label]);
        assert_eq!(t.locate(label), Some((TransmissionCategory::Automatic, "8-Speed")));
        assert_eq!(t.subgroups(TransmissionCategory::Automatic), vec!["8-Speed"]);
        assert_eq!(t.labels().filter(|l| *l == label).count(), 1);
        assert!(t.unreachable().is_empty());
    }

    #[test]
    fn manual_speeds_outside_the_table_are_unreachable() {
        let t = TransmissionTaxonomy::build(&["4-Speed M/T", "10-Speed M/T", "6-Speed M/T"]);
        assert_eq!(t.subgroups(TransmissionCategory::Manual), vec!["6-Speed"]);
        assert_eq!(
            t.unreachable(),
            [
                (TransmissionCategory::Manual, "4-Speed M/T".to_string()),
                (TransmissionCategory::Manual, "10-Speed M/T".to_string()),
            ]
        );
    }

    #[test]
    fn duplicates_are_kept_once() {
        let t = TransmissionTaxonomy::build(&["CVT-F", "CVT-F", "5-Speed M/T"]);
        assert_eq!(t.options(TransmissionCategory::Cvt, "CVT"), ["CVT-F"]);
        assert_eq!(t.categories(), vec![TransmissionCategory::Manual, TransmissionCategory::Cvt]);
    }
}
