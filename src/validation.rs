//! Declarative field checks for inbound payloads.
//!
//! Each request model implements [`Validate`], turning the raw, partially
//! filled payload into the typed value the rest of the service works with.
//! All failing fields are collected so a single 400 lists every problem.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Field name → messages, serialized as a JSON object of string arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Ok(value) when nothing was recorded, the collected errors otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate
///
/// Converts an unchecked request payload into its validated form.
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, ValidationErrors>;
}

// --- Field checks ---
//
// `field` is the JSON key errors are reported under, `label` the display name
// used inside the message.

/// Required string: absent, empty and whitespace-only values all fail.
pub fn required(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: Option<String>,
) -> Option<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Some(value),
        _ => {
            errors.add(field, format!("The {label} field is required."));
            None
        }
    }
}

/// Inclusive integer range check.
pub fn in_range(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: i64,
    min: i64,
    max: i64,
) -> Option<i64> {
    if (min..=max).contains(&value) {
        Some(value)
    } else {
        errors.add(
            field,
            format!("The field {label} must be between {min} and {max}."),
        );
        None
    }
}

/// E-mail shape check. An absent value passes; pair with [`required`] when needed.
pub fn email(errors: &mut ValidationErrors, field: &str, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        if !is_email(value) {
            errors.add(
                field,
                format!("The {label} field is not a valid e-mail address."),
            );
        }
    }
}

/// Minimum character count. An absent value passes.
pub fn min_length(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: Option<&str>,
    min: usize,
) {
    if let Some(value) = value {
        if value.chars().count() < min {
            errors.add(
                field,
                format!(
                    "The field {label} must be a string or array type with a minimum length of '{min}'."
                ),
            );
        }
    }
}

/// Equality between two fields, reported on the first one.
pub fn matches(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: Option<&str>,
    other_label: &str,
    other: Option<&str>,
) {
    if value != other {
        errors.add(field, format!("'{label}' and '{other_label}' do not match."));
    }
}

/// Exactly one `@`, with something on both sides of it.
fn is_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => !local.is_empty() && !domain.is_empty(),
        _ => false,
    }
}
