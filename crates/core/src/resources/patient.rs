//! Patients (`/pacijenti`), optionally placed in a department and given a diagnosis.

use super::department::Department;
use super::diagnosis::Diagnosis;
use crate::constants::{DEFAULT_BIRTH_YEAR, MIN_BIRTH_YEAR, PATIENTS_PATH};
use crate::filter::{field_matches, related_matches};
use crate::resource::{invalid_value, parse_flag, parse_reference, unknown_field, IdRef, Resource};
use crate::validation::{required, required_in_range, required_text, ValidationErrors};
use crate::AdminResult;
use bolnica_types::{NonEmptyText, RecordId};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: RecordId,
    #[serde(rename = "ime")]
    pub first_name: String,
    #[serde(rename = "prezime")]
    pub last_name: String,
    #[serde(rename = "godiste")]
    pub birth_year: i32,
    #[serde(rename = "zdravstvenoOsiguranje", default)]
    pub insured: bool,
    #[serde(rename = "odeljenje", default)]
    pub department: Option<Department>,
    #[serde(rename = "dijagnoza", default)]
    pub diagnosis: Option<Diagnosis>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} | {} | {}",
            self.id,
            self.full_name(),
            self.birth_year,
            if self.insured { "insured" } else { "uninsured" }
        )?;
        let department = self.department.as_ref().map_or("-", |d| d.name.as_str());
        let diagnosis = self.diagnosis.as_ref().map_or("-", |d| d.name.as_str());
        write!(f, " | {department} | {diagnosis}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatientForm {
    pub first_name: String,
    pub last_name: String,
    pub birth_year: Option<i32>,
    pub insured: bool,
    pub department_id: Option<RecordId>,
    pub diagnosis_id: Option<RecordId>,
}

impl Default for PatientForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            birth_year: Some(DEFAULT_BIRTH_YEAR),
            insured: false,
            department_id: None,
            diagnosis_id: None,
        }
    }
}

impl fmt::Display for PatientForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt<T: fmt::Display>(value: Option<T>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }
        writeln!(f, "first_name    = {}", self.first_name)?;
        writeln!(f, "last_name     = {}", self.last_name)?;
        writeln!(f, "birth_year    = {}", opt(self.birth_year))?;
        writeln!(f, "insured       = {}", self.insured)?;
        writeln!(f, "department_id = {}", opt(self.department_id))?;
        write!(f, "diagnosis_id  = {}", opt(self.diagnosis_id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientDto {
    #[serde(rename = "ime")]
    pub first_name: NonEmptyText,
    #[serde(rename = "prezime")]
    pub last_name: NonEmptyText,
    #[serde(rename = "godiste")]
    pub birth_year: i32,
    #[serde(rename = "zdravstvenoOsiguranje")]
    pub insured: bool,
    #[serde(rename = "odeljenje")]
    pub department: Option<IdRef>,
    #[serde(rename = "dijagnoza")]
    pub diagnosis: Option<IdRef>,
}

pub struct Patients;

/// Validate a patient form against an explicit current year.
pub fn validate_patient_form(
    form: &PatientForm,
    current_year: i32,
) -> Result<PatientDto, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let first_name = required_text(&mut errors, "first_name", &form.first_name);
    let last_name = required_text(&mut errors, "last_name", &form.last_name);
    let birth_year = required_in_range(
        &mut errors,
        "birth_year",
        form.birth_year,
        MIN_BIRTH_YEAR,
        current_year,
    );
    let department_id = required(&mut errors, "department_id", form.department_id);
    let diagnosis_id = required(&mut errors, "diagnosis_id", form.diagnosis_id);

    let dto = match (first_name, last_name, birth_year) {
        (Some(first_name), Some(last_name), Some(birth_year)) => Some(PatientDto {
            first_name,
            last_name,
            birth_year,
            insured: form.insured,
            department: department_id.map(IdRef::from),
            diagnosis: diagnosis_id.map(IdRef::from),
        }),
        _ => None,
    };
    errors.finish(dto)
}

impl Resource for Patients {
    type Entity = Patient;
    type Form = PatientForm;
    type Dto = PatientDto;

    const PATH: &'static str = PATIENTS_PATH;
    const NOUN: &'static str = "patient";
    const FIELDS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "birth_year",
        "insured",
        "department_id",
        "diagnosis_id",
    ];

    fn id(entity: &Patient) -> RecordId {
        entity.id
    }

    fn label(entity: &Patient) -> String {
        entity.full_name()
    }

    fn matches(entity: &Patient, term: &str) -> bool {
        field_matches(&entity.first_name, term)
            || field_matches(&entity.last_name, term)
            || related_matches(entity.department.as_ref().map(|d| d.name.as_str()), term)
            || related_matches(entity.diagnosis.as_ref().map(|d| d.name.as_str()), term)
    }

    fn form_from(entity: &Patient) -> PatientForm {
        PatientForm {
            first_name: entity.first_name.clone(),
            last_name: entity.last_name.clone(),
            birth_year: Some(entity.birth_year),
            insured: entity.insured,
            department_id: entity.department.as_ref().map(|d| d.id),
            diagnosis_id: entity.diagnosis.as_ref().map(|d| d.id),
        }
    }

    fn validate(form: &PatientForm) -> Result<PatientDto, ValidationErrors> {
        validate_patient_form(form, chrono::Local::now().year())
    }

    fn assign(form: &mut PatientForm, field: &str, value: &str) -> AdminResult<()> {
        match field {
            "first_name" => form.first_name = value.to_string(),
            "last_name" => form.last_name = value.to_string(),
            "birth_year" => {
                form.birth_year = if value.trim().is_empty() {
                    None
                } else {
                    Some(
                        value
                            .trim()
                            .parse::<i32>()
                            .map_err(|e| invalid_value(field, e.to_string()))?,
                    )
                }
            }
            "insured" => form.insured = parse_flag(field, value)?,
            "department_id" => form.department_id = parse_reference(field, value)?,
            "diagnosis_id" => form.diagnosis_id = parse_reference(field, value)?,
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

    fn filled_form() -> PatientForm {
        PatientForm {
            first_name: "Zoran".into(),
            last_name: "Petrović".into(),
            birth_year: Some(1980),
            insured: true,
            department_id: Some(RecordId::new(2)),
            diagnosis_id: Some(RecordId::new(3)),
        }
    }

    #[test]
    fn default_form_starts_in_2000_uninsured() {
        let form = PatientForm::default();
        assert_eq!(form.birth_year, Some(2000));
        assert!(!form.insured);
        assert_eq!(form.department_id, None);
        assert_eq!(form.diagnosis_id, None);
    }

    #[test]
    fn dto_shape_matches_server() {
        let dto = validate_patient_form(&filled_form(), 2026).unwrap();
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({
                "ime": "Zoran",
                "prezime": "Petrović",
                "godiste": 1980,
                "zdravstvenoOsiguranje": true,
                "odeljenje": {"id": 2},
                "dijagnoza": {"id": 3}
            })
        );
    }

    #[test]
    fn birth_year_is_bounded_by_current_year() {
        let mut form = filled_form();
        form.birth_year = Some(2027);
        let errors = validate_patient_form(&form, 2026).unwrap_err();
        assert_eq!(errors.issue("birth_year"), Some(&FieldIssue::AboveMax(2026)));

        form.birth_year = Some(1899);
        let errors = validate_patient_form(&form, 2026).unwrap_err();
        assert_eq!(errors.issue("birth_year"), Some(&FieldIssue::BelowMin(1900)));

        form.birth_year = Some(2026);
        assert!(validate_patient_form(&form, 2026).is_ok());
    }

    #[test]
    fn references_are_required() {
        let mut form = filled_form();
        form.department_id = None;
        form.diagnosis_id = None;
        let errors = validate_patient_form(&form, 2026).unwrap_err();
        assert_eq!(errors.issue("department_id"), Some(&FieldIssue::Required));
        assert_eq!(errors.issue("diagnosis_id"), Some(&FieldIssue::Required));
    }

    #[test]
    fn reads_patient_without_relations() {
        let patient: Patient = serde_json::from_value(json!({
            "id": 8, "ime": "Ana", "prezime": "Jović", "godiste": 1999,
            "zdravstvenoOsiguranje": false, "odeljenje": null
        }))
        .unwrap();
        assert!(patient.department.is_none());
        assert!(patient.diagnosis.is_none());
        assert_eq!(Patients::form_from(&patient).department_id, None);
    }

    #[test]
    fn assign_parses_flags_and_years() {
        let mut form = PatientForm::default();
        Patients::assign(&mut form, "insured", "da").unwrap();
        assert!(form.insured);
        Patients::assign(&mut form, "insured", "no").unwrap();
        assert!(!form.insured);
        Patients::assign(&mut form, "birth_year", "1975").unwrap();
        assert_eq!(form.birth_year, Some(1975));
        assert!(Patients::assign(&mut form, "insured", "maybe").is_err());
        assert!(Patients::assign(&mut form, "birth_year", "nineteen").is_err());
    }
}
