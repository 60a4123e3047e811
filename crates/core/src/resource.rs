//! Per-entity configuration for the generic list controller.

use crate::validation::ValidationErrors;
use crate::{AdminError, AdminResult};
use bolnica_types::RecordId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};

/// One remote collection and everything the generic controller needs to know about it.
///
/// Implementors are zero-sized marker types (`Hospitals`, `Patients`, ...); the controller is
/// instantiated as `ListController<Hospitals>` and so on.
pub trait Resource: Send + Sync + 'static {
    /// Record as read from the server, with related records expanded.
    type Entity: DeserializeOwned + Clone + PartialEq + Debug + Display + Send + Sync + 'static;
    /// Editable form values. `Default` is the empty "create" form.
    type Form: Default + Clone + Debug + Display + Send + Sync + 'static;
    /// Payload sent on create/update.
    type Dto: Serialize + Send;

    /// Collection path below the API base URL.
    const PATH: &'static str;
    /// Human name of one record, used in prompts and messages.
    const NOUN: &'static str;
    /// Field names accepted by [`Resource::assign`].
    const FIELDS: &'static [&'static str];

    fn id(entity: &Self::Entity) -> RecordId;

    /// Short label naming the entity to a user, e.g. in a selection control.
    fn label(entity: &Self::Entity) -> String;

    /// Whether `entity` matches an already trimmed and lower-cased search term.
    fn matches(entity: &Self::Entity, term: &str) -> bool;

    /// Form pre-populated from an existing entity.
    fn form_from(entity: &Self::Entity) -> Self::Form;

    /// Validate the form and shape the payload.
    fn validate(form: &Self::Form) -> Result<Self::Dto, ValidationErrors>;

    /// Set one form field from text input. An empty value clears optional fields.
    fn assign(form: &mut Self::Form, field: &str, value: &str) -> AdminResult<()>;

    fn delete_prompt(entity: &Self::Entity) -> String {
        format!("Delete {} \"{}\"?", Self::NOUN, Self::label(entity))
    }

    fn delete_failed_message(entity: &Self::Entity) -> String {
        format!(
            "Could not delete {} \"{}\"; it is probably still referenced by other records.",
            Self::NOUN,
            Self::label(entity)
        )
    }

    fn save_failed_message() -> String {
        format!("Could not save the {}.", Self::NOUN)
    }
}

pub(crate) fn unknown_field<R: Resource>(field: &str) -> AdminError {
    AdminError::UnknownField {
        field: field.to_string(),
        expected: R::FIELDS.join(", "),
    }
}

pub(crate) fn invalid_value(field: &str, message: impl Into<String>) -> AdminError {
    AdminError::InvalidFieldValue {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Parse an optional record reference; blank clears it.
pub(crate) fn parse_reference(field: &str, value: &str) -> AdminResult<Option<RecordId>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .parse::<RecordId>()
        .map(Some)
        .map_err(|e| invalid_value(field, e.to_string()))
}

/// Parse a yes/no flag the way an operator types it.
pub(crate) fn parse_flag(field: &str, value: &str) -> AdminResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "da" | "1" => Ok(true),
        "false" | "no" | "n" | "ne" | "0" | "" => Ok(false),
        other => Err(invalid_value(field, format!("`{other}` is not yes/no"))),
    }
}

/// `{ "id": n }` reference sent in place of a related record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdRef {
    pub id: RecordId,
}

impl From<RecordId> for IdRef {
    fn from(id: RecordId) -> Self {
        Self { id }
    }
}
