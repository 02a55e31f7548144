//! # Domain Types
//!
//! Entities of the classifieds marketplace, plus the `New*` drafts that
//! arrive from callers before validation.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Category 1 ──── * SubCategory 1 ──── * Ad * ──── 1 Address             │
//! │     ▲                                    │ *                            │
//! │     ┆ category_id (checked at intake)    │                              │
//! │     ┆                                    ▼ 1                            │
//! │  SellerRequest 1 ──────────────── 1 User (role = seller)                │
//! │                                          │                              │
//! │                           Ad 1 ──── * Photo (cascade)                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Seller Shape
//! A seller is a [`User`] whose `role` is [`Role::Seller`]. Project details
//! live on the approved [`SellerRequest`] linked through `seller_request_id`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Role
// =============================================================================

/// What a user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Seller,
    #[default]
    User,
}

impl Role {
    /// Sellers and admins may publish ads.
    pub const fn can_post_ads(&self) -> bool {
        matches!(self, Role::Seller | Role::Admin)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Seller => "seller",
            Role::User => "user",
        }
    }
}

// =============================================================================
// Seller Request Status
// =============================================================================

/// Review state of a [`SellerRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

// =============================================================================
// Address
// =============================================================================

/// A postal address shared by ads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Address {
    pub id: i64,
    pub country: String,
    pub city: String,
    pub district: String,
    pub street: Option<String>,
    pub building_number: Option<String>,
    pub apartment_number: Option<String>,
    pub postal_code: Option<String>,
    pub additional_info: Option<String>,
}

impl Address {
    /// `"country, city, district"` for listings.
    pub fn short_display(&self) -> String {
        format!("{}, {}, {}", self.country, self.city, self.district)
    }
}

/// Address fields as submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewAddress {
    pub country: String,
    pub city: String,
    pub district: String,
    pub street: Option<String>,
    pub building_number: Option<String>,
    pub apartment_number: Option<String>,
    pub postal_code: Option<String>,
    pub additional_info: Option<String>,
}

// =============================================================================
// Category / SubCategory
// =============================================================================

/// Top-level ad category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Number of ads under this category's sub-categories.
    pub ads_count: u32,
    /// Stored icon path (see [`crate::uploads::category_icon_path`]).
    pub icon: Option<String>,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ads_count)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCategory {
    pub name: String,
}

/// Second-level category. Detached (`category_id = None`) when its parent is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SubCategory {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSubCategory {
    pub name: String,
    pub category_id: Option<i64>,
}

// =============================================================================
// Ad / Photo
// =============================================================================

/// A classified ad posted by a seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Ad {
    pub id: i64,
    /// URL-safe identifier, unique across ads.
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// ISO 4217 code, e.g. `UZS`.
    pub currency: String,
    pub sub_category_id: Option<i64>,
    pub address_id: Option<i64>,
    pub seller_id: Option<i64>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewAd {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    pub sub_category_id: Option<i64>,
    pub address_id: Option<i64>,
    pub seller_id: i64,
}

/// A photo attached to an ad. Deleted together with the ad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Photo {
    pub id: i64,
    /// Stored path (see [`crate::uploads::ad_photo_path`]).
    pub photo: String,
    pub ad_id: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// User
// =============================================================================

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,
    /// Lowercase, unique.
    pub username: String,
    /// Lowercase, unique.
    pub email: String,
    /// Never leaves the backend.
    #[serde(skip)]
    #[ts(skip)]
    pub password_hash: String,
    /// Unique once set. Absent right after registration.
    pub phone_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub patronymic: Option<String>,
    /// Stored path (see [`crate::uploads::avatar_path`]).
    pub avatar: Option<String>,
    pub role: Role,
    pub seller_request_id: Option<i64>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// First, last and patronymic joined by spaces, skipping absent parts.
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.last_name, &self.patronymic]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_seller(&self) -> bool {
        self.role == Role::Seller
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User: {}, {} | {}",
            self.username,
            self.email,
            self.phone_number.as_deref().unwrap_or("-")
        )
    }
}

/// Registration intake: credentials only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(skip)]
    #[ts(skip)]
    pub password_hash: String,
}

/// Full profile, validated on every persist after registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub patronymic: Option<String>,
}

// =============================================================================
// Seller Request
// =============================================================================

/// A user's application to become a seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SellerRequest {
    pub id: i64,
    pub full_name: String,
    pub project_name: String,
    /// Checked at intake only. May dangle after the category is deleted.
    pub category_id: i64,
    pub phone_number: String,
    pub address: String,
    pub status: RequestStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSellerRequest {
    pub full_name: String,
    pub project_name: String,
    pub category_id: i64,
    pub phone_number: String,
    pub address: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: 1,
            username: "aziz".to_string(),
            email: "aziz@mail.uz".to_string(),
            password_hash: "hash".to_string(),
            phone_number: Some("+998901234567".to_string()),
            first_name: Some("Aziz".to_string()),
            last_name: Some("Karimov".to_string()),
            patronymic: None,
            avatar: None,
            role: Role::User,
            seller_request_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_role_default_and_permissions() {
        assert_eq!(Role::default(), Role::User);
        assert!(!Role::User.can_post_ads());
        assert!(Role::Seller.can_post_ads());
        assert!(Role::Admin.can_post_ads());
    }

    #[test]
    fn test_request_status_default() {
        assert_eq!(RequestStatus::default(), RequestStatus::Pending);
    }

    #[test]
    fn test_user_full_name_skips_absent_parts() {
        let mut u = user();
        assert_eq!(u.full_name(), "Aziz Karimov");

        u.patronymic = Some("Akmalovich".to_string());
        assert_eq!(u.full_name(), "Aziz Karimov Akmalovich");
    }

    #[test]
    fn test_user_display() {
        assert_eq!(user().to_string(), "User: aziz, aziz@mail.uz | +998901234567");
    }

    #[test]
    fn test_user_password_not_serialized() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn test_address_and_category_display() {
        let address = Address {
            id: 1,
            country: "Uzbekistan".to_string(),
            city: "Tashkent".to_string(),
            district: "Yunusabad".to_string(),
            street: None,
            building_number: None,
            apartment_number: None,
            postal_code: None,
            additional_info: None,
        };
        assert_eq!(address.short_display(), "Uzbekistan, Tashkent, Yunusabad");

        let category = Category {
            id: 1,
            name: "Electronics".to_string(),
            ads_count: 3,
            icon: None,
        };
        assert_eq!(category.to_string(), "Electronics: 3");
    }
}
