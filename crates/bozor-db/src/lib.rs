//! # bozor-db: Database Layer for Bozor
//!
//! SQLite persistence for the marketplace. Every write goes through the
//! `bozor-core` rules first; the schema owns uniqueness.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bozor Data Flow                                  │
//! │                                                                         │
//! │  API handler (submit seller request, post ad, ...)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bozor-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (validate →  │    │  (embedded)  │  │   │
//! │  │   │               │◄───│   persist)    │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │ failure                       │   │
//! │  │                         DbError ──► Rejection                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (BOZOR_DATABASE_PATH)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and repository access
//! - [`migrations`] - Embedded database migrations
//! - [`config`] - Environment configuration
//! - [`error`] - Database error types
//! - [`rejection`] - Serializable failure responses
//! - [`repository`] - One repository per entity
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bozor_db::{Database, MarketConfig};
//!
//! let config = MarketConfig::load()?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let request = db.seller_requests().submit(user_id, draft).await?;
//! db.seller_requests().approve(request.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod rejection;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, MarketConfig};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use rejection::{ErrorCode, Rejection};

// Repository re-exports for convenience
pub use repository::{
    AdRepository, AddressRepository, CategoryRepository, SellerRequestRepository,
    SubCategoryRepository, UserRepository,
};
