//! Hospitals (`/bolnice`).

use crate::constants::HOSPITALS_PATH;
use crate::filter::field_matches;
use crate::resource::{invalid_value, unknown_field, Resource};
use crate::validation::{required_non_negative, required_text, ValidationErrors};
use crate::AdminResult;
use bolnica_types::{NonEmptyText, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: RecordId,
    #[serde(rename = "naziv")]
    pub name: String,
    #[serde(rename = "adresa")]
    pub address: String,
    #[serde(rename = "budzet")]
    pub budget: f64,
}

impl fmt::Display for Hospital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} | {} | budget {}",
            self.id, self.name, self.address, self.budget
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HospitalForm {
    pub name: String,
    pub address: String,
    pub budget: Option<f64>,
}

impl Default for HospitalForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            budget: Some(0.0),
        }
    }
}

impl fmt::Display for HospitalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name    = {}", self.name)?;
        writeln!(f, "address = {}", self.address)?;
        match self.budget {
            Some(budget) => write!(f, "budget  = {budget}"),
            None => write!(f, "budget  ="),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalDto {
    #[serde(rename = "naziv")]
    pub name: NonEmptyText,
    #[serde(rename = "adresa")]
    pub address: NonEmptyText,
    #[serde(rename = "budzet")]
    pub budget: f64,
}

pub struct Hospitals;

impl Resource for Hospitals {
    type Entity = Hospital;
    type Form = HospitalForm;
    type Dto = HospitalDto;

    const PATH: &'static str = HOSPITALS_PATH;
    const NOUN: &'static str = "hospital";
    const FIELDS: &'static [&'static str] = &["name", "address", "budget"];

    fn id(entity: &Hospital) -> RecordId {
        entity.id
    }

    fn label(entity: &Hospital) -> String {
        entity.name.clone()
    }

    fn matches(entity: &Hospital, term: &str) -> bool {
        field_matches(&entity.name, term) || field_matches(&entity.address, term)
    }

    fn form_from(entity: &Hospital) -> HospitalForm {
        HospitalForm {
            name: entity.name.clone(),
            address: entity.address.clone(),
            budget: Some(entity.budget),
        }
    }

    fn validate(form: &HospitalForm) -> Result<HospitalDto, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", &form.name);
        let address = required_text(&mut errors, "address", &form.address);
        let budget = required_non_negative(&mut errors, "budget", form.budget);

        let dto = match (name, address, budget) {
            (Some(name), Some(address), Some(budget)) => Some(HospitalDto {
                name,
                address,
                budget,
            }),
            _ => None,
        };
        errors.finish(dto)
    }

    fn assign(form: &mut HospitalForm, field: &str, value: &str) -> AdminResult<()> {
        match field {
            "name" => form.name = value.to_string(),
            "address" => form.address = value.to_string(),
            "budget" => {
                form.budget = if value.trim().is_empty() {
                    None
                } else {
                    Some(
                        value
                            .trim()
                            .parse::<f64>()
                            .map_err(|e| invalid_value(field, e.to_string()))?,
                    )
                }
            }
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }
}
