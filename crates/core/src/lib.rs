//! # Bolnica Core
//!
//! Client-side logic for administering the hospital records service.
//!
//! This crate holds everything the front-ends share:
//! - The four resources (hospitals, diagnoses, departments, patients) with their wire shapes,
//!   form rules and text filters
//! - A reloadable, filterable list controller per screen
//! - The REST client for the records service
//!
//! **No presentation concerns**: terminal rendering and argument parsing live in the `bolnica`
//! binaries. Operator interaction goes through the [`Prompter`] trait.

pub mod api;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod filter;
pub mod prompt;
pub mod reference;
pub mod resource;
pub mod resources;
pub mod screens;
pub mod session;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use api::{fetch_all, HttpApi, RecordsApi};
pub use config::{client_config_from_env_value, ClientConfig};
pub use controller::{FilteredView, FormMode, FormState, ListController, Removal, Snapshot, Submitted};
pub use error::{AdminError, AdminResult};
pub use prompt::{AssumeYes, Prompter, SharedLines, TerminalPrompter};
pub use reference::ReferenceList;
pub use resource::Resource;
pub use screens::{ReferenceOptions, Screen, ScreenKind, ScreenOps};
pub use session::Session;
pub use validation::{FieldError, FieldIssue, ValidationErrors};

pub use bolnica_types::{NonEmptyText, RecordId, TextError};
