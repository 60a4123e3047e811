//! Diagnoses (`/dijagnoze`).

use crate::constants::DIAGNOSES_PATH;
use crate::filter::field_matches;
use crate::resource::{unknown_field, Resource};
use crate::validation::{required_text, ValidationErrors};
use crate::AdminResult;
use bolnica_types::{NonEmptyText, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub id: RecordId,
    #[serde(rename = "naziv")]
    pub name: String,
    #[serde(rename = "opis")]
    pub description: String,
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} | {}", self.id, self.name, self.description)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosisForm {
    pub name: String,
    pub description: String,
}

impl fmt::Display for DiagnosisForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name        = {}", self.name)?;
        write!(f, "description = {}", self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisDto {
    #[serde(rename = "naziv")]
    pub name: NonEmptyText,
    #[serde(rename = "opis")]
    pub description: NonEmptyText,
}

pub struct Diagnoses;

impl Resource for Diagnoses {
    type Entity = Diagnosis;
    type Form = DiagnosisForm;
    type Dto = DiagnosisDto;

    const PATH: &'static str = DIAGNOSES_PATH;
    const NOUN: &'static str = "diagnosis";
    const FIELDS: &'static [&'static str] = &["name", "description"];

    fn id(entity: &Diagnosis) -> RecordId {
        entity.id
    }

    fn label(entity: &Diagnosis) -> String {
        entity.name.clone()
    }

    fn matches(entity: &Diagnosis, term: &str) -> bool {
        field_matches(&entity.name, term) || field_matches(&entity.description, term)
    }

    fn form_from(entity: &Diagnosis) -> DiagnosisForm {
        DiagnosisForm {
            name: entity.name.clone(),
            description: entity.description.clone(),
        }
    }

    fn validate(form: &DiagnosisForm) -> Result<DiagnosisDto, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", &form.name);
        let description = required_text(&mut errors, "description", &form.description);

        let dto = name
            .zip(description)
            .map(|(name, description)| DiagnosisDto { name, description });
        errors.finish(dto)
    }

    fn assign(form: &mut DiagnosisForm, field: &str, value: &str) -> AdminResult<()> {
        match field {
            "name" => form.name = value.to_string(),
            "description" => form.description = value.to_string(),
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }

    fn delete_failed_message(entity: &Diagnosis) -> String {
        format!(
            "Could not delete diagnosis \"{}\"; it may still be assigned to a patient.",
            entity.name
        )
    }
}
