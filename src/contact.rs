//! Contact record, draft, patch, and field validation.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{self, DEFAULT_CATEGORY, PHONE_MAX_LEN, PHONE_MIN_LEN, TimestampMs};

/// Field-level validation failure raised by construction or update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name was empty or whitespace only.
    #[error("name must not be empty")]
    EmptyName,
    /// Phone length outside the accepted range once separators are removed.
    #[error("phone must have between 7 and 15 characters, got {len}")]
    PhoneLength {
        /// Length after stripping spaces and hyphens.
        len: usize,
    },
    /// Email present but lacking an `@`.
    #[error("email must contain '@': {0:?}")]
    MalformedEmail(String),
}

/// Insert payload used to create a new [`Contact`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactDraft {
    /// Display name.
    pub name: String,
    /// Phone number, also the identity key.
    pub phone: String,
    /// Optional email address.
    pub email: Option<String>,
    /// Optional postal address.
    pub address: Option<String>,
    /// Optional category; blank or absent means [`DEFAULT_CATEGORY`].
    pub category: Option<String>,
}

impl ContactDraft {
    /// Starts a draft with the two mandatory fields.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// Sets the email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the address.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A validated contact.
///
/// Fields are only reachable through accessors so that every instance in
/// circulation has passed validation. Equality and hashing consider the
/// phone alone, since it is the identity key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ContactFields")]
pub struct Contact {
    name: String,
    phone: String,
    email: Option<String>,
    address: Option<String>,
    category: String,
    created_ms: TimestampMs,
    updated_ms: TimestampMs,
}

impl Contact {
    /// Validates `draft` and stamps it with the current wall-clock time.
    pub fn new(draft: ContactDraft) -> Result<Self, ValidationError> {
        Self::new_at(draft, types::now_ms())
    }

    /// Validates `draft` and stamps both timestamps with `ts_ms`.
    pub fn new_at(draft: ContactDraft, ts_ms: TimestampMs) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validate_name(&draft.name)?,
            phone: validate_phone(&draft.phone)?,
            email: validate_email(draft.email.as_deref())?,
            address: clean_optional(draft.address.as_deref()),
            category: clean_category(draft.category.as_deref()),
            created_ms: ts_ms,
            updated_ms: ts_ms,
        })
    }

    /// Trimmed display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Phone as stored, separators included.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Email, if any.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Address, if any.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Category; never blank.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Creation timestamp.
    pub fn created_ms(&self) -> TimestampMs {
        self.created_ms
    }

    /// Last successful modification timestamp.
    pub fn updated_ms(&self) -> TimestampMs {
        self.updated_ms
    }

    pub(crate) fn name_contains(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
    }

    /// Case-insensitive match on text fields, case-sensitive on the phone.
    pub(crate) fn matches_term(&self, term: &str, term_lower: &str) -> bool {
        let contains = |field: &str| field.to_lowercase().contains(term_lower);
        contains(self.name.as_str())
            || self.phone.contains(term)
            || self.email.as_deref().is_some_and(contains)
            || self.address.as_deref().is_some_and(contains)
            || contains(self.category.as_str())
    }
}

/// Unchecked wire shape of [`Contact`]; deserialization validates it.
#[derive(Deserialize)]
struct ContactFields {
    name: String,
    phone: String,
    email: Option<String>,
    address: Option<String>,
    category: String,
    created_ms: TimestampMs,
    updated_ms: TimestampMs,
}

impl TryFrom<ContactFields> for Contact {
    type Error = ValidationError;

    fn try_from(raw: ContactFields) -> Result<Self, Self::Error> {
        let mut contact = Self::new_at(
            ContactDraft {
                name: raw.name,
                phone: raw.phone,
                email: raw.email,
                address: raw.address,
                category: Some(raw.category),
            },
            raw.created_ms,
        )?;
        contact.updated_ms = raw.updated_ms;
        Ok(contact)
    }
}

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.phone == other.phone
    }
}

impl Eq for Contact {}

impl Hash for Contact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.phone.hash(state);
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<25} | {:<15} | {:<12}",
            self.name, self.phone, self.category
        )
    }
}

/// Sparse patch where each `Some` field overwrites the contact value.
///
/// `Some("")` for email or address clears it; a blank category resets it to
/// [`DEFAULT_CATEGORY`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactPatch {
    /// Optional replacement name.
    pub name: Option<String>,
    /// Optional replacement phone; re-keys the contact inside a store.
    pub phone: Option<String>,
    /// Optional replacement email.
    pub email: Option<String>,
    /// Optional replacement address.
    pub address: Option<String>,
    /// Optional replacement category.
    pub category: Option<String>,
}

impl ContactPatch {
    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Validates every present field against `rec` and returns the patched
    /// copy stamped with `ts_ms`. `rec` itself is never touched, so a failure
    /// on any field leaves nothing half-applied.
    pub fn apply_to(&self, rec: &Contact, ts_ms: TimestampMs) -> Result<Contact, ValidationError> {
        let mut next = rec.clone();
        if let Some(v) = &self.name {
            next.name = validate_name(v)?;
        }
        if let Some(v) = &self.phone {
            next.phone = validate_phone(v)?;
        }
        if let Some(v) = &self.email {
            next.email = validate_email(Some(v.as_str()))?;
        }
        if let Some(v) = &self.address {
            next.address = clean_optional(Some(v.as_str()));
        }
        if let Some(v) = &self.category {
            next.category = clean_category(Some(v.as_str()));
        }
        next.updated_ms = ts_ms;
        Ok(next)
    }
}

/// Identity key under the exact policy: surrounding whitespace is dropped,
/// separators are kept.
pub fn phone_key(raw: &str) -> &str {
    raw.trim()
}

fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}

fn validate_phone(raw: &str) -> Result<String, ValidationError> {
    let phone = phone_key(raw);
    let len = phone.chars().filter(|c| *c != ' ' && *c != '-').count();
    if !(PHONE_MIN_LEN..=PHONE_MAX_LEN).contains(&len) {
        return Err(ValidationError::PhoneLength { len });
    }
    Ok(phone.to_string())
}

fn validate_email(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(email) = clean_optional(raw) else {
        return Ok(None);
    };
    if !email.contains('@') {
        return Err(ValidationError::MalformedEmail(email));
    }
    Ok(Some(email))
}

fn clean_optional(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn clean_category(raw: Option<&str>) -> String {
    clean_optional(raw).unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}
