//! Client-side list filtering.
//!
//! Filtering is a pure function of the current list snapshot and the filter text. It never
//! reorders the list and never talks to the server.

use crate::resource::Resource;

/// Lower-cased, trimmed search term, or `None` when the text filters nothing.
pub fn search_term(text: &str) -> Option<String> {
    let term = text.trim().to_lowercase();
    if term.is_empty() {
        None
    } else {
        Some(term)
    }
}

/// Case-insensitive substring test against an already lower-cased term.
pub fn field_matches(field: &str, term: &str) -> bool {
    field.to_lowercase().contains(term)
}

/// Same as [`field_matches`] for an optional related field; absent never matches.
pub fn related_matches(field: Option<&str>, term: &str) -> bool {
    field.is_some_and(|f| field_matches(f, term))
}

/// Entities of `items` that match `text`, in their original order.
pub fn apply_filter<R: Resource>(items: &[R::Entity], text: &str) -> Vec<R::Entity> {
    match search_term(text) {
        None => items.to_vec(),
        Some(term) => items
            .iter()
            .filter(|entity| R::matches(entity, &term))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{
        Department, Departments, Diagnosis, Hospital, Hospitals, Patient, Patients,
    };
    use bolnica_types::RecordId;

    fn hospital(id: i64, name: &str, address: &str) -> Hospital {
        Hospital {
            id: RecordId::new(id),
            name: name.into(),
            address: address.into(),
            budget: 1000.0,
        }
    }

    fn hospitals() -> Vec<Hospital> {
        vec![
            hospital(1, "Opšta", "Ulica 1"),
            hospital(2, "Klinički centar", "Pasterova 2"),
            hospital(3, "Dečija bolnica", "Tiršova 10"),
        ]
    }

    #[test]
    fn search_term_ignores_blank_text() {
        assert_eq!(search_term(""), None);
        assert_eq!(search_term("   \t"), None);
        assert_eq!(search_term(" ZoRan "), Some("zoran".to_string()));
    }

    #[test]
    fn blank_filter_returns_list_unchanged() {
        let items = hospitals();
        assert_eq!(apply_filter::<Hospitals>(&items, ""), items);
        assert_eq!(apply_filter::<Hospitals>(&items, "   "), items);
    }

    #[test]
    fn matches_single_hospital_by_name_prefix() {
        let items = vec![hospital(1, "Opšta", "Ulica 1")];
        assert_eq!(apply_filter::<Hospitals>(&items, "opš"), items);
        assert!(apply_filter::<Hospitals>(&items, "xyz").is_empty());
    }

    #[test]
    fn filtering_is_case_insensitive() {
        let items = hospitals();
        let upper = apply_filter::<Hospitals>(&items, "KLINIČKI");
        let lower = apply_filter::<Hospitals>(&items, "klinički");
        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 1);
        assert_eq!(upper[0].id, RecordId::new(2));
    }

    #[test]
    fn filtering_is_idempotent_and_keeps_order() {
        let items = hospitals();
        let once = apply_filter::<Hospitals>(&items, "ova");
        let twice = apply_filter::<Hospitals>(&once, "ova");
        assert_eq!(once, twice);
        let ids: Vec<_> = once.iter().map(|h| h.id.get()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn department_matches_on_hospital_name() {
        let departments = vec![
            Department {
                id: RecordId::new(10),
                name: "Kardiologija".into(),
                location: "Sprat 2".into(),
                hospital: Some(hospital(1, "Opšta", "Ulica 1")),
            },
            Department {
                id: RecordId::new(11),
                name: "Neurologija".into(),
                location: "Sprat 3".into(),
                hospital: None,
            },
        ];

        let found = apply_filter::<Departments>(&departments, "opšta");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, RecordId::new(10));
    }

    #[test]
    fn patient_matches_on_related_names() {
        let patient = Patient {
            id: RecordId::new(5),
            first_name: "Zoran".into(),
            last_name: "Petrović".into(),
            birth_year: 1980,
            insured: true,
            department: None,
            diagnosis: Some(Diagnosis {
                id: RecordId::new(3),
                name: "Grip".into(),
                description: "Virus".into(),
            }),
        };
        let items = vec![patient];

        assert_eq!(apply_filter::<Patients>(&items, "ZORAN").len(), 1);
        assert_eq!(apply_filter::<Patients>(&items, "grip").len(), 1);
        // Description of a related diagnosis is not searched.
        assert!(apply_filter::<Patients>(&items, "virus").is_empty());
    }
}
