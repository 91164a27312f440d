//! Contact record model.
//!
//! # Responsibility
//! - Define the name/phone/category record stored by the book.
//! - Validate records and single-field edits with one rule set.
//!
//! # Invariants
//! - Validation never mutates the record.
//! - Phone numbers are exactly `PHONE_DIGITS` ASCII digits, no formatting.
//! - No field holds a line break; each record must stay on one stored line.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Required phone number length.
pub const PHONE_DIGITS: usize = 10;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

/// Stable arena identifier for a contact within one book session.
///
/// Ids are assigned monotonically and never reused, so history entries keep
/// pointing at the same record even after it leaves the visible order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub u64);

impl Display for ContactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Selects the single field changed by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Phone,
    Category,
}

impl ContactField {
    /// Stable lowercase label used in logs and CLI parsing.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Category => "category",
        }
    }

    /// Parses a field label (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "phone" => Some(Self::Phone),
            "category" => Some(Self::Category),
            _ => None,
        }
    }
}

/// Validation failures for contact fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    EmptyName,
    EmptyPhone,
    /// Phone is present but not exactly 10 ASCII digits.
    InvalidPhone(String),
    EmptyCategory,
    /// Field contains `\n` or `\r`.
    LineBreak(ContactField),
}

impl ContactValidationError {
    /// Stable code used in log events; never contains field values.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::EmptyPhone => "empty_phone",
            Self::InvalidPhone(_) => "invalid_phone",
            Self::EmptyCategory => "empty_category",
            Self::LineBreak(_) => "line_break",
        }
    }
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::EmptyPhone => write!(f, "phone cannot be empty"),
            Self::InvalidPhone(value) => write!(
                f,
                "phone number must be exactly {PHONE_DIGITS} digits, got `{value}`"
            ),
            Self::EmptyCategory => write!(f, "category cannot be empty"),
            Self::LineBreak(field) => write!(f, "{} cannot contain line breaks", field.as_str()),
        }
    }
}

impl Error for ContactValidationError {}

/// One contact entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub category: String,
}

impl Contact {
    /// Builds a contact and validates it.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, ContactValidationError> {
        let contact = Self {
            name: name.into(),
            phone: phone.into(),
            category: category.into(),
        };
        contact.validate()?;
        Ok(contact)
    }

    /// Checks every field against the contact rules.
    ///
    /// Empty-field checks run before the phone format check, so an empty
    /// phone reports `EmptyPhone` rather than `InvalidPhone`.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        validate_field(ContactField::Name, &self.name)?;
        validate_field(ContactField::Phone, &self.phone)?;
        validate_field(ContactField::Category, &self.category)?;
        Ok(())
    }

    /// Returns the current value of one field.
    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Phone => &self.phone,
            ContactField::Category => &self.category,
        }
    }

    /// Replaces one field and returns the previous value.
    ///
    /// Callers validate `value` first; this setter does not.
    pub(crate) fn replace_field(&mut self, field: ContactField, value: String) -> String {
        let slot = match field {
            ContactField::Name => &mut self.name,
            ContactField::Phone => &mut self.phone,
            ContactField::Category => &mut self.category,
        };
        std::mem::replace(slot, value)
    }

    /// True if `term` occurs in name, phone or category.
    pub fn contains(&self, term: &str) -> bool {
        self.name.contains(term) || self.phone.contains(term) || self.category.contains(term)
    }
}

/// Validates a single field value with the same rules as a full record.
pub fn validate_field(field: ContactField, value: &str) -> Result<(), ContactValidationError> {
    match field {
        ContactField::Name if value.is_empty() => Err(ContactValidationError::EmptyName),
        ContactField::Category if value.is_empty() => Err(ContactValidationError::EmptyCategory),
        ContactField::Phone if value.is_empty() => Err(ContactValidationError::EmptyPhone),
        _ if value.contains(&['\n', '\r'][..]) => Err(ContactValidationError::LineBreak(field)),
        ContactField::Phone if !is_valid_phone(value) => {
            Err(ContactValidationError::InvalidPhone(value.to_string()))
        }
        _ => Ok(()),
    }
}

/// True when `value` is exactly 10 ASCII digits.
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}
