//! # Category Repository
//!
//! Top-level categories, their icons, and the storage-backed
//! [`CategoryLookup`] the validation core consults.
//!
//! `ads_count` is maintained by [`crate::repository::AdRepository`] and
//! [`crate::repository::SubCategoryRepository`]; this repository never
//! writes it.

use std::future::Future;

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bozor_core::uploads::category_icon_path;
use bozor_core::{Category, CategoryLookup, NewCategory, Validate};

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Validates (capitalizes) the name and stores a new category.
    pub async fn create(&self, category: NewCategory) -> DbResult<Category> {
        let category = category.validate()?;

        let id = sqlx::query("INSERT INTO categories (name) VALUES (?1)")
            .bind(&category.name)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        debug!(id, name = %category.name, "Category created");

        self.fetch(id).await
    }

    /// Renames a category. The name is validated exactly as on create.
    pub async fn update(&self, id: i64, category: NewCategory) -> DbResult<Category> {
        let category = category.validate()?;

        let result = sqlx::query("UPDATE categories SET name = ?1 WHERE id = ?2")
            .bind(&category.name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        self.fetch(id).await
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// All categories, alphabetically.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }

    /// Deletes a category.
    ///
    /// Its sub-categories are detached, not deleted. Seller requests that
    /// named it keep the now dangling id.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        debug!(id, "Category deleted");
        Ok(())
    }

    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(found != 0)
    }

    /// Records the stored icon path for an uploaded file name.
    pub async fn set_icon(&self, id: i64, filename: &str) -> DbResult<Category> {
        let path = category_icon_path(id, filename)?;

        let result = sqlx::query("UPDATE categories SET icon = ?1 WHERE id = ?2")
            .bind(&path)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        debug!(id, icon = %path, "Category icon set");
        self.fetch(id).await
    }

    async fn fetch(&self, id: i64) -> DbResult<Category> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id))
    }
}

impl CategoryLookup for CategoryRepository {
    type Error = DbError;

    fn category_exists(&self, id: i64) -> impl Future<Output = Result<bool, DbError>> + Send {
        self.exists(id)
    }
}
