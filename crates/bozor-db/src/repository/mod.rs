//! # Repository Module
//!
//! Database repository implementations for Bozor.
//!
//! ## validate → persist
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  caller draft (NewAd, UserProfile, ...)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  bozor-core rules ── errors ──► DbError::Validation   (no SQL ran)      │
//! │       │ normalized draft                                                │
//! │       ▼                                                                 │
//! │  INSERT / UPDATE (one transaction when several tables change)           │
//! │       │                                                                 │
//! │       ├── UNIQUE failed ──► DbError::UniqueViolation                    │
//! │       ▼                                                                 │
//! │  stored entity                                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`AddressRepository`] - Postal addresses
//! - [`CategoryRepository`] - Categories, icons, and the category lookup
//! - [`SubCategoryRepository`] - Sub-categories
//! - [`UserRepository`] - Registration and profiles
//! - [`SellerRequestRepository`] - Seller applications and their review
//! - [`AdRepository`] - Ads, slugs, counters and photos

pub mod ad;
pub mod address;
pub mod category;
pub mod seller_request;
pub mod sub_category;
pub mod user;

pub use ad::AdRepository;
pub use address::AddressRepository;
pub use category::CategoryRepository;
pub use seller_request::SellerRequestRepository;
pub use sub_category::SubCategoryRepository;
pub use user::UserRepository;
