//! Form validation utilities.
//!
//! Forms are validated locally before any request is made. Each rule records a `FieldError`
//! instead of failing fast so that every invalid field can be shown at once.

use bolnica_types::NonEmptyText;
use std::fmt;

/// What is wrong with a single form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldIssue {
    /// The field has no value (or only whitespace).
    Required,
    /// The value is below the allowed minimum.
    BelowMin(i64),
    /// The value is above the allowed maximum.
    AboveMax(i64),
    /// Infinite or NaN; the wire format has no number for it.
    NotFinite,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub issue: FieldIssue,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.issue {
            FieldIssue::Required => write!(f, "{} is required", self.field),
            FieldIssue::BelowMin(min) => write!(f, "{} must be at least {}", self.field, min),
            FieldIssue::AboveMax(max) => write!(f, "{} must be at most {}", self.field, max),
            FieldIssue::NotFinite => write!(f, "{} must be a finite number", self.field),
        }
    }
}

/// All validation failures of one form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, issue: FieldIssue) {
        self.0.push(FieldError { field, issue });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Issue recorded for `field`, if any.
    pub fn issue(&self, field: &str) -> Option<&FieldIssue> {
        self.0.iter().find(|e| e.field == field).map(|e| &e.issue)
    }

    /// Finish validation: `Ok(value)` when nothing was recorded.
    ///
    /// `value` is only `None` when a rule already recorded the missing field, so an empty error
    /// list together with `None` cannot happen for well-formed validators.
    pub fn finish<T>(self, value: Option<T>) -> Result<T, ValidationErrors> {
        match value {
            Some(value) if self.is_empty() => Ok(value),
            _ => Err(self),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// Required text field: non-blank after trimming.
pub fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
) -> Option<NonEmptyText> {
    match NonEmptyText::new(value) {
        Ok(text) => Some(text),
        Err(_) => {
            errors.push(field, FieldIssue::Required);
            None
        }
    }
}

/// Required value of any kind.
pub fn required<T: Copy>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<T>,
) -> Option<T> {
    if value.is_none() {
        errors.push(field, FieldIssue::Required);
    }
    value
}

/// Required integer within `min..=max`.
pub fn required_in_range(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<i32>,
    min: i32,
    max: i32,
) -> Option<i32> {
    let value = required(errors, field, value)?;
    if value < min {
        errors.push(field, FieldIssue::BelowMin(min.into()));
        return None;
    }
    if value > max {
        errors.push(field, FieldIssue::AboveMax(max.into()));
        return None;
    }
    Some(value)
}

/// Required non-negative amount.
pub fn required_non_negative(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<f64>,
) -> Option<f64> {
    let value = required(errors, field, value)?;
    if !value.is_finite() {
        errors.push(field, FieldIssue::NotFinite);
        return None;
    }
    if value < 0.0 {
        errors.push(field, FieldIssue::BelowMin(0));
        return None;
    }
    Some(value)
}
