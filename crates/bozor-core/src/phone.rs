//! # Phone Number Validation
//!
//! Accepts exactly two regional shapes:
//!
//! ```text
//! ┌──────────────┬──────────┬────────────┬──────────────┐
//! │ Region       │ Prefix   │ Digits     │ Total length │
//! ├──────────────┼──────────┼────────────┼──────────────┤
//! │ Uzbekistan   │ +998     │ 9          │ 13           │
//! │ Russia       │ +7       │ 10         │ 12           │
//! └──────────────┴──────────┴────────────┴──────────────┘
//! ```
//!
//! The value is checked as typed. Callers strip whitespace first.

use crate::error::{ValidationError, ValidationResult};

/// Field name used when the validator is called standalone.
pub const PHONE_FIELD: &str = "phone_number";

/// Maximum stored length of a phone number column.
pub const PHONE_MAX_LEN: usize = 15;

/// A phone region recognised by [`validate_phone_number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneRegion {
    Uzbekistan,
    Russia,
}

impl PhoneRegion {
    const ALL: [PhoneRegion; 2] = [PhoneRegion::Uzbekistan, PhoneRegion::Russia];

    /// Country prefix including the leading `+`.
    pub const fn prefix(&self) -> &'static str {
        match self {
            PhoneRegion::Uzbekistan => "+998",
            PhoneRegion::Russia => "+7",
        }
    }

    /// Number of subscriber digits following the prefix.
    pub const fn digits(&self) -> usize {
        match self {
            PhoneRegion::Uzbekistan => 9,
            PhoneRegion::Russia => 10,
        }
    }

    fn matches(&self, phone: &str) -> bool {
        match phone.strip_prefix(self.prefix()) {
            Some(rest) => rest.len() == self.digits() && rest.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        }
    }
}

/// Returns the region a phone number belongs to, if it has a valid shape.
pub fn phone_region(phone: &str) -> Option<PhoneRegion> {
    PhoneRegion::ALL.into_iter().find(|region| region.matches(phone))
}

/// Validates a phone number against the accepted regional formats.
///
/// ## Example
/// ```rust
/// use bozor_core::phone::validate_phone_number;
///
/// assert!(validate_phone_number("+998901234567").is_ok());
/// assert!(validate_phone_number("+79991234567").is_ok());
/// assert!(validate_phone_number("+7999123456").is_err());
/// assert!(validate_phone_number(" +998901234567").is_err());
/// ```
pub fn validate_phone_number(phone: &str) -> ValidationResult<()> {
    validate_phone_field(PHONE_FIELD, phone)
}

/// Same as [`validate_phone_number`] but attributes the error to `field`.
pub fn validate_phone_field(field: &str, phone: &str) -> ValidationResult<()> {
    match phone_region(phone) {
        Some(_) => Ok(()),
        None => Err(ValidationError::InvalidPhoneFormat {
            field: field.to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
