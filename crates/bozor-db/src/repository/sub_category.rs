//! # SubCategory Repository
//!
//! The parent reference is a storage foreign key: an unknown `category_id`
//! surfaces as [`DbError::ForeignKeyViolation`].
//!
//! A category's `ads_count` covers the ads of all its sub-categories, so
//! re-parenting or deleting a sub-category moves that many ads off the old
//! parent (and onto the new one) in the same transaction.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use bozor_core::{NewSubCategory, SubCategory, Validate};

#[derive(Debug, Clone)]
pub struct SubCategoryRepository {
    pool: SqlitePool,
}

impl SubCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SubCategoryRepository { pool }
    }

    pub async fn create(&self, sub_category: NewSubCategory) -> DbResult<SubCategory> {
        let sub_category = sub_category.validate()?;

        let id = sqlx::query("INSERT INTO sub_categories (name, category_id) VALUES (?1, ?2)")
            .bind(&sub_category.name)
            .bind(sub_category.category_id)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        debug!(id, category_id = ?sub_category.category_id, "SubCategory created");

        self.fetch(id).await
    }

    /// Renames or re-parents a sub-category.
    pub async fn update(&self, id: i64, sub_category: NewSubCategory) -> DbResult<SubCategory> {
        let sub_category = sub_category.validate()?;

        let mut tx = self.pool.begin().await?;

        let previous = parent_of(&mut *tx, id).await?;

        sqlx::query("UPDATE sub_categories SET name = ?1, category_id = ?2 WHERE id = ?3")
            .bind(&sub_category.name)
            .bind(sub_category.category_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if previous != sub_category.category_id {
            let ads = ads_in(&mut *tx, id).await?;
            move_ads_count(&mut *tx, previous, -ads).await?;
            move_ads_count(&mut *tx, sub_category.category_id, ads).await?;
        }

        tx.commit().await?;

        self.fetch(id).await
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<SubCategory>> {
        let sub_category =
            sqlx::query_as::<_, SubCategory>("SELECT * FROM sub_categories WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(sub_category)
    }

    pub async fn list_for_category(&self, category_id: i64) -> DbResult<Vec<SubCategory>> {
        let sub_categories = sqlx::query_as::<_, SubCategory>(
            "SELECT * FROM sub_categories WHERE category_id = ?1 ORDER BY name, id",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sub_categories)
    }

    /// Deletes a sub-category. Its ads remain, uncategorized, and leave
    /// the parent's counter.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let parent = parent_of(&mut *tx, id).await?;
        let ads = ads_in(&mut *tx, id).await?;

        sqlx::query("DELETE FROM sub_categories WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        move_ads_count(&mut *tx, parent, -ads).await?;

        tx.commit().await?;

        debug!(id, ads, "SubCategory deleted");
        Ok(())
    }

    async fn fetch(&self, id: i64) -> DbResult<SubCategory> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("SubCategory", id))
    }
}

async fn parent_of(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<i64>> {
    sqlx::query_scalar::<_, Option<i64>>("SELECT category_id FROM sub_categories WHERE id = ?1")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DbError::not_found("SubCategory", id))
}

async fn ads_in(conn: &mut SqliteConnection, id: i64) -> DbResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ads WHERE sub_category_id = ?1")
        .bind(id)
        .fetch_one(conn)
        .await?;

    Ok(count)
}

/// Shifts a category's counter by `delta`, never below zero.
async fn move_ads_count(
    conn: &mut SqliteConnection,
    category_id: Option<i64>,
    delta: i64,
) -> DbResult<()> {
    let Some(category_id) = category_id else {
        return Ok(());
    };
    if delta == 0 {
        return Ok(());
    }

    sqlx::query("UPDATE categories SET ads_count = MAX(ads_count + ?1, 0) WHERE id = ?2")
        .bind(delta)
        .bind(category_id)
        .execute(conn)
        .await?;

    Ok(())
}
