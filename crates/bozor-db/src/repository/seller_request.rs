//! # SellerRequest Repository
//!
//! ## Review Flow
//! ```text
//! User (role = user)
//!   │ submit(user_id, draft)     validate fields + category exists
//!   ▼
//! SellerRequest (pending) ◄──── users.seller_request_id
//!   │
//!   ├── approve ──► approved, linked user role = seller   (one transaction)
//!   └── reject  ──► rejected, user may submit again
//! ```
//!
//! Eligibility is checked again inside the submit transaction, and the
//! user's link only moves if it still points where the check saw it.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::CategoryRepository;
use bozor_core::{
    validate_seller_request, NewSellerRequest, RequestStatus, Role, SellerRequest, ValidationError,
};

#[derive(Debug, Clone)]
pub struct SellerRequestRepository {
    pool: SqlitePool,
}

impl SellerRequestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SellerRequestRepository { pool }
    }

    /// Files a seller application for `user_id`.
    ///
    /// ## Errors
    /// - `NotFound` when the user does not exist
    /// - `Validation` with `NotAllowed` on `user` when the user can already
    ///   post ads or has a pending request
    /// - `Validation` with the field errors, including `category_id` when
    ///   the category does not exist; nothing is inserted
    pub async fn submit(&self, user_id: i64, request: NewSellerRequest) -> DbResult<SellerRequest> {
        {
            let mut conn = self.pool.acquire().await?;
            ensure_can_apply(&mut *conn, user_id).await?;
        }

        let categories = CategoryRepository::new(self.pool.clone());
        let request = validate_seller_request(request, &categories).await?;

        let mut tx = self.pool.begin().await?;

        let current = ensure_can_apply(&mut *tx, user_id).await?;

        let id = sqlx::query(
            r#"
            INSERT INTO seller_requests (
                full_name, project_name, category_id, phone_number, address, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&request.full_name)
        .bind(&request.project_name)
        .bind(request.category_id)
        .bind(&request.phone_number)
        .bind(&request.address)
        .bind(RequestStatus::Pending)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        link_to_user(&mut *tx, user_id, id, current).await?;

        tx.commit().await?;

        info!(id, user_id, category_id = request.category_id, "Seller request submitted");

        self.fetch(id).await
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<SellerRequest>> {
        let request =
            sqlx::query_as::<_, SellerRequest>("SELECT * FROM seller_requests WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(request)
    }

    /// Approves a pending request and promotes the linked user to seller.
    pub async fn approve(&self, id: i64) -> DbResult<SellerRequest> {
        let mut tx = self.pool.begin().await?;

        mark_reviewed(&mut tx, id, RequestStatus::Approved).await?;

        let promoted = sqlx::query("UPDATE users SET role = ?1, updated_at = ?2 WHERE seller_request_id = ?3")
            .bind(Role::Seller)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if promoted.rows_affected() == 0 {
            return Err(DbError::not_found("User for SellerRequest", id));
        }

        tx.commit().await?;

        info!(id, "Seller request approved");
        self.fetch(id).await
    }

    /// Rejects a pending request. The user keeps the `user` role.
    pub async fn reject(&self, id: i64) -> DbResult<SellerRequest> {
        let mut tx = self.pool.begin().await?;
        mark_reviewed(&mut tx, id, RequestStatus::Rejected).await?;
        tx.commit().await?;

        debug!(id, "Seller request rejected");
        self.fetch(id).await
    }

    async fn fetch(&self, id: i64) -> DbResult<SellerRequest> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("SellerRequest", id))
    }
}

/// Checks that `user_id` may file a request and returns its current link.
async fn ensure_can_apply(conn: &mut SqliteConnection, user_id: i64) -> DbResult<Option<i64>> {
    let (role, current) =
        sqlx::query_as::<_, (Role, Option<i64>)>("SELECT role, seller_request_id FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| DbError::not_found("User", user_id))?;

    if role.can_post_ads() {
        return Err(not_allowed("This user can already post ads."));
    }

    if let Some(current) = current {
        let status =
            sqlx::query_scalar::<_, RequestStatus>("SELECT status FROM seller_requests WHERE id = ?1")
                .bind(current)
                .fetch_optional(&mut *conn)
                .await?;

        if status == Some(RequestStatus::Pending) {
            return Err(not_allowed("A seller request is already pending review."));
        }
    }

    Ok(current)
}

/// Points the user at `request_id`, only if the link is still `expected`.
async fn link_to_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    request_id: i64,
    expected: Option<i64>,
) -> DbResult<()> {
    let result = sqlx::query(
        "UPDATE users SET seller_request_id = ?1, updated_at = ?2 WHERE id = ?3 AND seller_request_id IS ?4",
    )
    .bind(request_id)
    .bind(Utc::now())
    .bind(user_id)
    .bind(expected)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_allowed("A seller request is already pending review."));
    }

    Ok(())
}

async fn mark_reviewed(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    id: i64,
    status: RequestStatus,
) -> DbResult<()> {
    let result = sqlx::query("UPDATE seller_requests SET status = ?1 WHERE id = ?2 AND status = ?3")
        .bind(status)
        .bind(id)
        .bind(RequestStatus::Pending)
        .execute(&mut **tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("SellerRequest (pending)", id));
    }

    Ok(())
}

fn not_allowed(reason: &str) -> DbError {
    ValidationError::NotAllowed {
        field: "user".to_string(),
        reason: reason.to_string(),
    }
    .into()
}
