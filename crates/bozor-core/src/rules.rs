//! # Entity Validation Rules
//!
//! Per-entity composition of the normalizer, the phone validator and the
//! reference checker. Runs before every insert and every update.
//!
//! ## Composition
//! ```text
//! ┌───────────────┬──────────────────────────────────────┬──────────────┬──────────┐
//! │ Entity        │ Normalized fields                    │ References   │ Formats  │
//! ├───────────────┼──────────────────────────────────────┼──────────────┼──────────┤
//! │ UserProfile   │ username, email, phone (lower, req)  │ -            │ phone,   │
//! │               │ first/last/patronymic (title, opt)   │              │ email    │
//! │ NewUser       │ username, email (lower, req)         │ -            │ email    │
//! │ SellerRequest │ full_name, project_name, address     │ category_id  │ phone    │
//! │ Category      │ name (capitalize, req)               │ -            │ -        │
//! │ SubCategory   │ name (capitalize, req)               │ storage FK   │ -        │
//! │ Ad            │ name, description (capitalize, req)  │ storage FK   │ price,   │
//! │               │                                      │              │ currency │
//! │ Address       │ country, city, district (req)        │ -            │ -        │
//! └───────────────┴──────────────────────────────────────┴──────────────┴──────────┘
//! ```
//!
//! Every field is checked even after an earlier one fails, so callers see
//! all problems of an entity at once. Each field reports only its first
//! failure. Uniqueness is NOT checked here: the storage layer's UNIQUE
//! constraints own it.

use email_address::EmailAddress;

use crate::error::{CheckError, ValidationError, ValidationErrors};
use crate::normalize::{ensure_max_len, normalize_optional, normalize_required, NormalizeOptions};
use crate::phone::validate_phone_field;
use crate::reference::{check_category_reference, CategoryLookup, CATEGORY_FIELD};
use crate::types::{NewAd, NewAddress, NewCategory, NewSellerRequest, NewSubCategory, NewUser, UserProfile};

// =============================================================================
// Column Limits
// =============================================================================

pub const USERNAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;
pub const PERSON_NAME_MAX_LEN: usize = 150;
pub const TITLE_MAX_LEN: usize = 255;
pub const FULL_NAME_MAX_LEN: usize = 255;
pub const PROJECT_NAME_MAX_LEN: usize = 100;
pub const REGION_MAX_LEN: usize = 50;
pub const STREET_MAX_LEN: usize = 100;
pub const HOUSE_NUMBER_MAX_LEN: usize = 10;
pub const POSTAL_CODE_MAX_LEN: usize = 20;
pub const CURRENCY_LEN: usize = 3;

const UNIQUE: NormalizeOptions = NormalizeOptions::new().unique();
const TITLE: NormalizeOptions = NormalizeOptions::new().title();
const CAPITALIZE: NormalizeOptions = NormalizeOptions::new().capitalize();
const PLAIN: NormalizeOptions = NormalizeOptions::new();

// =============================================================================
// Validate Trait
// =============================================================================

/// Whole-entity validation that needs no lookup collaborator.
///
/// Consumes the draft and returns its normalized form, ready to persist.
pub trait Validate: Sized {
    fn validate(self) -> Result<Self, ValidationErrors>;
}

impl Validate for UserProfile {
    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let username = required_text(&mut errors, "username", &self.username, UNIQUE, USERNAME_MAX_LEN);
        let email = email(&mut errors, &self.email);
        let phone_number = phone(&mut errors, "phone_number", &self.phone_number, UNIQUE);
        let first_name = optional_text(&mut errors, "first_name", self.first_name.as_deref(), TITLE, PERSON_NAME_MAX_LEN);
        let last_name = optional_text(&mut errors, "last_name", self.last_name.as_deref(), TITLE, PERSON_NAME_MAX_LEN);
        let patronymic = optional_text(&mut errors, "patronymic", self.patronymic.as_deref(), TITLE, PERSON_NAME_MAX_LEN);

        errors.into_result(UserProfile {
            username: username.unwrap_or_default(),
            email: email.unwrap_or_default(),
            phone_number: phone_number.unwrap_or_default(),
            first_name,
            last_name,
            patronymic,
        })
    }
}

impl Validate for NewUser {
    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let username = required_text(&mut errors, "username", &self.username, UNIQUE, USERNAME_MAX_LEN);
        let email = email(&mut errors, &self.email);
        if self.password_hash.is_empty() {
            errors.push(ValidationError::Required {
                field: "password".to_string(),
            });
        }

        errors.into_result(NewUser {
            username: username.unwrap_or_default(),
            email: email.unwrap_or_default(),
            password_hash: self.password_hash,
        })
    }
}

impl Validate for NewCategory {
    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", &self.name, CAPITALIZE, TITLE_MAX_LEN);

        errors.into_result(NewCategory {
            name: name.unwrap_or_default(),
        })
    }
}

impl Validate for NewSubCategory {
    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", &self.name, CAPITALIZE, TITLE_MAX_LEN);

        errors.into_result(NewSubCategory {
            name: name.unwrap_or_default(),
            category_id: self.category_id,
        })
    }
}

impl Validate for NewAd {
    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(&mut errors, "name", &self.name, CAPITALIZE, TITLE_MAX_LEN);
        let description = errors.check(normalize_required("description", &self.description, CAPITALIZE));
        errors.check(validate_price(self.price));
        let currency = errors.check(normalize_currency(&self.currency));

        errors.into_result(NewAd {
            name: name.unwrap_or_default(),
            description: description.unwrap_or_default(),
            price: self.price,
            currency: currency.unwrap_or_default(),
            ..self
        })
    }
}

impl Validate for NewAddress {
    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let country = required_text(&mut errors, "country", &self.country, PLAIN, REGION_MAX_LEN);
        let city = required_text(&mut errors, "city", &self.city, PLAIN, REGION_MAX_LEN);
        let district = required_text(&mut errors, "district", &self.district, PLAIN, REGION_MAX_LEN);
        let street = optional_text(&mut errors, "street", self.street.as_deref(), PLAIN, STREET_MAX_LEN);
        let building_number = optional_text(&mut errors, "building_number", self.building_number.as_deref(), PLAIN, HOUSE_NUMBER_MAX_LEN);
        let apartment_number = optional_text(&mut errors, "apartment_number", self.apartment_number.as_deref(), PLAIN, HOUSE_NUMBER_MAX_LEN);
        let postal_code = optional_text(&mut errors, "postal_code", self.postal_code.as_deref(), PLAIN, POSTAL_CODE_MAX_LEN);
        let additional_info = errors
            .check(normalize_optional("additional_info", self.additional_info.as_deref(), PLAIN))
            .flatten();

        errors.into_result(NewAddress {
            country: country.unwrap_or_default(),
            city: city.unwrap_or_default(),
            district: district.unwrap_or_default(),
            street,
            building_number,
            apartment_number,
            postal_code,
            additional_info,
        })
    }
}

// =============================================================================
// Seller Request (needs lookup)
// =============================================================================

/// Validates a seller request, including the category reference.
///
/// Field checks and the category check are all reported together. A
/// failing lookup collaborator short-circuits with `CheckError::Lookup`.
pub async fn validate_seller_request<L>(
    request: NewSellerRequest,
    lookup: &L,
) -> Result<NewSellerRequest, CheckError<L::Error>>
where
    L: CategoryLookup + Sync,
{
    let mut errors = ValidationErrors::new();

    let full_name = required_text(&mut errors, "full_name", &request.full_name, PLAIN, FULL_NAME_MAX_LEN);
    let project_name = required_text(&mut errors, "project_name", &request.project_name, PLAIN, PROJECT_NAME_MAX_LEN);
    let phone_number = phone(&mut errors, "phone_number", &request.phone_number, PLAIN);
    let address = errors.check(normalize_required("address", &request.address, PLAIN));

    match check_category_reference(lookup, CATEGORY_FIELD, request.category_id).await {
        Ok(()) => {}
        Err(CheckError::Invalid(missing)) => {
            for err in missing.into_inner() {
                errors.push(err);
            }
        }
        Err(CheckError::Lookup(err)) => return Err(CheckError::Lookup(err)),
    }

    let normalized = NewSellerRequest {
        full_name: full_name.unwrap_or_default(),
        project_name: project_name.unwrap_or_default(),
        category_id: request.category_id,
        phone_number: phone_number.unwrap_or_default(),
        address: address.unwrap_or_default(),
    };
    errors.into_result(normalized).map_err(CheckError::Invalid)
}

// =============================================================================
// Field Rules
// =============================================================================

/// Validates an ad price: finite and not negative.
pub fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "A valid number is required.".to_string(),
        });
    }
    if price < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Trims and upper-cases a currency code, which must be exactly 3 characters.
///
/// ## Example
/// ```rust
/// use bozor_core::rules::normalize_currency;
///
/// assert_eq!(normalize_currency(" uzs ").unwrap(), "UZS");
/// assert!(normalize_currency("SUM1").is_err());
/// ```
pub fn normalize_currency(currency: &str) -> Result<String, ValidationError> {
    let code = normalize_required("currency", currency, PLAIN)?;
    if code.chars().count() != CURRENCY_LEN {
        return Err(ValidationError::InvalidLength {
            field: "currency".to_string(),
            expected: CURRENCY_LEN,
        });
    }
    Ok(code.to_uppercase())
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    options: NormalizeOptions,
    max: usize,
) -> Option<String> {
    let normalized = errors.check(normalize_required(field, value, options))?;
    errors.check(ensure_max_len(field, &normalized, max))?;
    Some(normalized)
}

fn optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    options: NormalizeOptions,
    max: usize,
) -> Option<String> {
    let normalized = errors.check(normalize_optional(field, value, options))??;
    errors.check(ensure_max_len(field, &normalized, max))?;
    Some(normalized)
}

fn email(errors: &mut ValidationErrors, value: &str) -> Option<String> {
    let normalized = required_text(errors, "email", value, UNIQUE, EMAIL_MAX_LEN)?;
    if !EmailAddress::is_valid(&normalized) {
        errors.push(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "Enter a valid email address.".to_string(),
        });
        return None;
    }
    Some(normalized)
}

fn phone(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    options: NormalizeOptions,
) -> Option<String> {
    let normalized = errors.check(normalize_required(field, value, options))?;
    errors.check(validate_phone_field(field, &normalized))?;
    Some(normalized)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::InMemoryCategories;

    fn profile() -> UserProfile {
        UserProfile {
            username: "  Aziz_K ".to_string(),
            email: "AZIZ@Mail.UZ".to_string(),
            phone_number: " +998901234567 ".to_string(),
            first_name: Some("aziz".to_string()),
            last_name: Some("KARIMOV".to_string()),
            patronymic: Some("   ".to_string()),
        }
    }

    fn seller_request(category_id: i64) -> NewSellerRequest {
        NewSellerRequest {
            full_name: " Aziz Karimov ".to_string(),
            project_name: "Aziz Electronics".to_string(),
            category_id,
            phone_number: "+79991234567".to_string(),
            address: " Tashkent, Chilonzor ".to_string(),
        }
    }

    #[test]
    fn test_user_profile_normalized() {
        let user = profile().validate().unwrap();
        assert_eq!(user.username, "aziz_k");
        assert_eq!(user.email, "aziz@mail.uz");
        assert_eq!(user.phone_number, "+998901234567");
        assert_eq!(user.first_name.as_deref(), Some("Aziz"));
        assert_eq!(user.last_name.as_deref(), Some("Karimov"));
        assert_eq!(user.patronymic, None);
    }

    #[test]
    fn test_user_profile_collects_all_errors() {
        let user = UserProfile {
            username: " ".to_string(),
            email: "not-an-email".to_string(),
            phone_number: "+99890123".to_string(),
            first_name: Some("a".repeat(PERSON_NAME_MAX_LEN + 1)),
            ..profile()
        };

        let errors = user.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.has_field("username"));
        assert!(errors.has_field("email"));
        assert!(errors.has_field("phone_number"));
        assert!(errors.has_field("first_name"));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidPhoneFormat { .. })));
    }

    #[test]
    fn test_user_profile_validation_is_idempotent() {
        let once = profile().validate().unwrap();
        let twice = once.clone().validate().unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_new_user_requires_credentials() {
        let user = NewUser {
            username: "Bobur".to_string(),
            email: "Bobur@Mail.Uz".to_string(),
            password_hash: "argon2$...".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(user.username, "bobur");
        assert_eq!(user.email, "bobur@mail.uz");

        let errors = NewUser::default().validate().unwrap_err();
        assert!(errors.has_field("username"));
        assert!(errors.has_field("email"));
        assert!(errors.has_field("password"));
    }

    #[test]
    fn test_category_and_sub_category_capitalized() {
        let category = NewCategory {
            name: "  home APPLIANCES ".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(category.name, "Home appliances");

        let sub = NewSubCategory {
            name: "washing machines".to_string(),
            category_id: Some(1),
        }
        .validate()
        .unwrap();
        assert_eq!(sub.name, "Washing machines");
        assert_eq!(sub.category_id, Some(1));

        assert!(NewCategory::default().validate().is_err());
    }

    #[test]
    fn test_ad_rules() {
        let ad = NewAd {
            name: "iphone 13".to_string(),
            description: "barely USED, with box".to_string(),
            price: 650.0,
            currency: "usd".to_string(),
            sub_category_id: Some(3),
            address_id: None,
            seller_id: 7,
        }
        .validate()
        .unwrap();
        assert_eq!(ad.name, "Iphone 13");
        assert_eq!(ad.description, "Barely used, with box");
        assert_eq!(ad.currency, "USD");
        assert_eq!(ad.seller_id, 7);

        let errors = NewAd {
            price: -1.0,
            currency: "SOUM".to_string(),
            ..NewAd::default()
        }
        .validate()
        .unwrap_err();
        assert!(errors.has_field("name"));
        assert!(errors.has_field("description"));
        assert!(errors.has_field("price"));
        assert!(errors.has_field("currency"));
    }

    #[test]
    fn test_price_rules() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(19.99).is_ok());
        assert!(validate_price(-0.01).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn test_address_rules() {
        let address = NewAddress {
            country: " Uzbekistan ".to_string(),
            city: "Tashkent".to_string(),
            district: "Yunusabad".to_string(),
            street: Some("  ".to_string()),
            postal_code: Some(" 100000 ".to_string()),
            ..NewAddress::default()
        }
        .validate()
        .unwrap();
        assert_eq!(address.country, "Uzbekistan");
        assert_eq!(address.street, None);
        assert_eq!(address.postal_code.as_deref(), Some("100000"));

        let errors = NewAddress {
            building_number: Some("12345678901".to_string()),
            ..NewAddress::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.has_field("building_number"));
    }

    #[tokio::test]
    async fn test_seller_request_valid() {
        let categories: InMemoryCategories = [1].into_iter().collect();

        let request = validate_seller_request(seller_request(1), &categories)
            .await
            .unwrap();
        assert_eq!(request.full_name, "Aziz Karimov");
        assert_eq!(request.address, "Tashkent, Chilonzor");
        assert_eq!(request.phone_number, "+79991234567");
    }

    #[tokio::test]
    async fn test_seller_request_unknown_category() {
        let categories = InMemoryCategories::new();

        let err = validate_seller_request(seller_request(42), &categories)
            .await
            .unwrap_err();
        let CheckError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors.iter().next(),
            Some(ValidationError::ReferenceNotFound { id: 42, .. })
        ));
    }

    #[tokio::test]
    async fn test_seller_request_reports_fields_and_category_together() {
        let categories = InMemoryCategories::new();
        let request = NewSellerRequest {
            phone_number: "+7 999 123 45 67".to_string(),
            project_name: String::new(),
            ..seller_request(5)
        };

        let err = validate_seller_request(request, &categories).await.unwrap_err();
        let CheckError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert!(errors.has_field("phone_number"));
        assert!(errors.has_field("project_name"));
        assert!(errors.has_field("category_id"));
    }
}
