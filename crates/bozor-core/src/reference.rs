//! # Reference Existence Checks
//!
//! The only cross-entity rule in the core: a foreign category id must point
//! at an existing Category when the referring record is validated.
//!
//! Storage answers the question through [`CategoryLookup`]. This module never
//! performs I/O itself; `bozor-db` implements the trait over SQLite and tests
//! use [`InMemoryCategories`].

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::future::Future;

use crate::error::{CheckError, ValidationError};

/// Field name used by [`category_exists`].
pub const CATEGORY_FIELD: &str = "category_id";

/// Answers "does a Category with this id exist".
pub trait CategoryLookup {
    type Error: std::error::Error + Send + Sync + 'static;

    fn category_exists(&self, id: i64) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

/// Confirms that `id` refers to an existing Category.
///
/// ## Returns
/// * `Ok(())` - category exists
/// * `Err(CheckError::Invalid)` - `ReferenceNotFound` on `category_id`
/// * `Err(CheckError::Lookup)` - the collaborator failed
pub async fn category_exists<L>(lookup: &L, id: i64) -> Result<(), CheckError<L::Error>>
where
    L: CategoryLookup + Sync,
{
    check_category_reference(lookup, CATEGORY_FIELD, id).await
}

/// Same as [`category_exists`] but attributes a miss to `field`.
pub async fn check_category_reference<L>(
    lookup: &L,
    field: &str,
    id: i64,
) -> Result<(), CheckError<L::Error>>
where
    L: CategoryLookup + Sync,
{
    let found = lookup
        .category_exists(id)
        .await
        .map_err(CheckError::Lookup)?;

    if !found {
        return Err(ValidationError::ReferenceNotFound {
            field: field.to_string(),
            entity: "Category".to_string(),
            id,
        }
        .into());
    }

    Ok(())
}

// =============================================================================
// In-Memory Lookup
// =============================================================================

/// A fixed set of category ids, for tests and offline validation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCategories {
    ids: BTreeSet<i64>,
}

impl InMemoryCategories {
    pub fn new() -> Self {
        InMemoryCategories::default()
    }

    pub fn insert(&mut self, id: i64) {
        self.ids.insert(id);
    }

    pub fn remove(&mut self, id: i64) {
        self.ids.remove(&id);
    }
}

impl FromIterator<i64> for InMemoryCategories {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        InMemoryCategories {
            ids: iter.into_iter().collect(),
        }
    }
}

impl CategoryLookup for InMemoryCategories {
    type Error = Infallible;

    fn category_exists(&self, id: i64) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        let found = self.ids.contains(&id);
        async move { Ok(found) }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
