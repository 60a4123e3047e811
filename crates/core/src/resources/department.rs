//! Departments (`/odeljenja`), each optionally belonging to a hospital.

use super::hospital::Hospital;
use crate::constants::DEPARTMENTS_PATH;
use crate::filter::{field_matches, related_matches};
use crate::resource::{parse_reference, unknown_field, IdRef, Resource};
use crate::validation::{required, required_text, ValidationErrors};
use crate::AdminResult;
use bolnica_types::{NonEmptyText, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: RecordId,
    #[serde(rename = "naziv")]
    pub name: String,
    #[serde(rename = "lokacija")]
    pub location: String,
    #[serde(rename = "bolnica", default)]
    pub hospital: Option<Hospital>,
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} | {}", self.id, self.name, self.location)?;
        match &self.hospital {
            Some(hospital) => write!(f, " | {}", hospital.name),
            None => write!(f, " | -"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepartmentForm {
    pub name: String,
    pub location: String,
    pub hospital_id: Option<RecordId>,
}

impl fmt::Display for DepartmentForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name        = {}", self.name)?;
        writeln!(f, "location    = {}", self.location)?;
        match self.hospital_id {
            Some(id) => write!(f, "hospital_id = {id}"),
            None => write!(f, "hospital_id ="),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentDto {
    #[serde(rename = "naziv")]
    pub name: NonEmptyText,
    #[serde(rename = "lokacija")]
    pub location: NonEmptyText,
    #[serde(rename = "bolnica")]
    pub hospital: IdRef,
}

pub struct Departments;

impl Resource for Departments {
    type Entity = Department;
    type Form = DepartmentForm;
    type Dto = DepartmentDto;

    const PATH: &'static str = DEPARTMENTS_PATH;
    const NOUN: &'static str = "department";
    const FIELDS: &'static [&'static str] = &["name", "location", "hospital_id"];

    fn id(entity: &Department) -> RecordId {
        entity.id
    }

    fn label(entity: &Department) -> String {
        match &entity.hospital {
            Some(hospital) => format!("{} ({})", entity.name, hospital.name),
            None => entity.name.clone(),
        }
    }

    fn matches(entity: &Department, term: &str) -> bool {
        field_matches(&entity.name, term)
            || field_matches(&entity.location, term)
            || related_matches(entity.hospital.as_ref().map(|h| h.name.as_str()), term)
    }

    fn form_from(entity: &Department) -> DepartmentForm {
        DepartmentForm {
            name: entity.name.clone(),
            location: entity.location.clone(),
            hospital_id: entity.hospital.as_ref().map(|h| h.id),
        }
    }

    fn validate(form: &DepartmentForm) -> Result<DepartmentDto, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", &form.name);
        let location = required_text(&mut errors, "location", &form.location);
        let hospital_id = required(&mut errors, "hospital_id", form.hospital_id);

        let dto = match (name, location, hospital_id) {
            (Some(name), Some(location), Some(hospital_id)) => Some(DepartmentDto {
                name,
                location,
                hospital: hospital_id.into(),
            }),
            _ => None,
        };
        errors.finish(dto)
    }

    fn assign(form: &mut DepartmentForm, field: &str, value: &str) -> AdminResult<()> {
        match field {
            "name" => form.name = value.to_string(),
            "location" => form.location = value.to_string(),
            "hospital_id" => form.hospital_id = parse_reference(field, value)?,
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldIssue;
    use serde_json::json;

    #[test]
    fn reads_expanded_hospital_or_null() {
        let with: Department = serde_json::from_value(json!({
            "id": 2, "naziv": "Kardiologija", "lokacija": "Sprat 2",
            "bolnica": {"id": 1, "naziv": "Opšta", "adresa": "Ulica 1", "budzet": 10}
        }))
        .unwrap();
        assert_eq!(with.hospital.as_ref().map(|h| h.id), Some(RecordId::new(1)));

        let null: Department = serde_json::from_value(json!({
            "id": 3, "naziv": "Hirurgija", "lokacija": "Sprat 1", "bolnica": null
        }))
        .unwrap();
        assert!(null.hospital.is_none());

        let absent: Department = serde_json::from_value(json!({
            "id": 4, "naziv": "Hirurgija", "lokacija": "Sprat 1"
        }))
        .unwrap();
        assert!(absent.hospital.is_none());
    }

    #[test]
    fn dto_sends_hospital_as_id_reference() {
        let form = DepartmentForm {
            name: "Kardiologija".into(),
            location: "Sprat 2".into(),
            hospital_id: Some(RecordId::new(7)),
        };
        let dto = Departments::validate(&form).unwrap();
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({"naziv": "Kardiologija", "lokacija": "Sprat 2", "bolnica": {"id": 7}})
        );
    }

    #[test]
    fn hospital_is_required() {
        let form = DepartmentForm {
            name: "Kardiologija".into(),
            location: "Sprat 2".into(),
            hospital_id: None,
        };
        let errors = Departments::validate(&form).unwrap_err();
        assert_eq!(errors.issue("hospital_id"), Some(&FieldIssue::Required));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn form_from_entity_without_hospital_has_no_reference() {
        let department = Department {
            id: RecordId::new(9),
            name: "Hitna".into(),
            location: "Prizemlje".into(),
            hospital: None,
        };
        assert_eq!(Departments::form_from(&department).hospital_id, None);
    }

    #[test]
    fn assign_hospital_reference() {
        let mut form = DepartmentForm::default();
        Departments::assign(&mut form, "hospital_id", "3").unwrap();
        assert_eq!(form.hospital_id, Some(RecordId::new(3)));
        Departments::assign(&mut form, "hospital_id", " ").unwrap();
        assert_eq!(form.hospital_id, None);
        assert!(Departments::assign(&mut form, "hospital_id", "x").is_err());
    }
}
