//! # bozor-core: Validation & Normalization for Bozor
//!
//! Pure rules that decide whether marketplace input is well-formed, how it is
//! canonicalized, and whether its references resolve, before anything is
//! persisted.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bozor Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            API layer (outside this workspace)                   │   │
//! │  │     register, submit seller request, post ad, ...               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bozor-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ normalize │  │   phone   │  │ reference │  │   rules   │  │   │
//! │  │   │ trim/case │  │ +998 / +7 │  │ category  │  │ per-entity│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO LOGGING • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bozor-db (Database Layer)                    │   │
//! │  │        SQLite, migrations, repositories, UNIQUE constraints     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities and their `New*` drafts
//! - [`error`] - Field-attributed validation errors
//! - [`normalize`] - Trim/case normalization (FieldNormalizer)
//! - [`phone`] - Regional phone format check
//! - [`reference`] - Category existence check over a lookup trait
//! - [`rules`] - Per-entity composition of the above
//! - [`uploads`] - Stored file naming and ad slugs
//!
//! ## Example Usage
//!
//! ```rust
//! use bozor_core::rules::Validate;
//! use bozor_core::types::NewCategory;
//!
//! let category = NewCategory { name: "  real ESTATE ".to_string() }
//!     .validate()
//!     .unwrap();
//!
//! assert_eq!(category.name, "Real estate");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod normalize;
pub mod phone;
pub mod reference;
pub mod rules;
pub mod types;
pub mod uploads;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CheckError, ValidationError, ValidationErrors, ValidationResult};
pub use normalize::{normalize_field, normalize_json_field, NormalizeOptions};
pub use phone::validate_phone_number;
pub use reference::{category_exists, CategoryLookup, InMemoryCategories};
pub use rules::{validate_seller_request, Validate};
pub use types::*;
