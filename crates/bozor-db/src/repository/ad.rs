//! # Ad Repository
//!
//! ## Category Counter
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create  ─► INSERT ad ─► categories.ads_count + 1   ┐                   │
//! │  update  ─► UPDATE ad ─► old - 1, new + 1           ├ one transaction   │
//! │  delete  ─► DELETE ad ─► MAX(ads_count - 1, 0)      ┘                   │
//! │                                                                         │
//! │  The category is reached through the ad's sub-category.                 │
//! │  Photos go with the ad (ON DELETE CASCADE).                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use bozor_core::uploads::{ad_photo_path, unique_slug};
use bozor_core::{Ad, NewAd, Photo, Role, Validate, ValidationError};

#[derive(Debug, Clone)]
pub struct AdRepository {
    pool: SqlitePool,
}

impl AdRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AdRepository { pool }
    }

    /// Validates and publishes an ad.
    ///
    /// ## Errors
    /// - `Validation` for field errors, an unknown seller (`seller_id`) or a
    ///   seller whose role cannot post ads (`seller`)
    /// - `ForeignKeyViolation` for an unknown sub-category or address
    pub async fn create(&self, ad: NewAd) -> DbResult<Ad> {
        let ad = ad.validate()?;
        self.ensure_can_post(ad.seller_id).await?;

        let slug = unique_slug(&ad.name);
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO ads (
                slug, name, description, price, currency,
                sub_category_id, address_id, seller_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            "#,
        )
        .bind(&slug)
        .bind(&ad.name)
        .bind(&ad.description)
        .bind(ad.price)
        .bind(&ad.currency)
        .bind(ad.sub_category_id)
        .bind(ad.address_id)
        .bind(ad.seller_id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        adjust_ads_count(&mut *tx, ad.sub_category_id, 1).await?;

        tx.commit().await?;

        info!(id, slug = %slug, seller_id = ad.seller_id, "Ad created");

        self.fetch(id).await
    }

    /// Replaces the editable fields of an ad. Slug and seller never change.
    pub async fn update(&self, id: i64, ad: NewAd) -> DbResult<Ad> {
        let ad = ad.validate()?;
        let existing = self.fetch(id).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE ads SET
                name = ?1,
                description = ?2,
                price = ?3,
                currency = ?4,
                sub_category_id = ?5,
                address_id = ?6,
                updated_at = ?7
            WHERE id = ?8
            "#,
        )
        .bind(&ad.name)
        .bind(&ad.description)
        .bind(ad.price)
        .bind(&ad.currency)
        .bind(ad.sub_category_id)
        .bind(ad.address_id)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if existing.sub_category_id != ad.sub_category_id {
            adjust_ads_count(&mut *tx, existing.sub_category_id, -1).await?;
            adjust_ads_count(&mut *tx, ad.sub_category_id, 1).await?;
        }

        tx.commit().await?;

        debug!(id, "Ad updated");
        self.fetch(id).await
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Ad>> {
        let ad = sqlx::query_as::<_, Ad>("SELECT * FROM ads WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ad)
    }

    pub async fn get_by_slug(&self, slug: &str) -> DbResult<Option<Ad>> {
        let ad = sqlx::query_as::<_, Ad>("SELECT * FROM ads WHERE slug = ?1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(ad)
    }

    /// A seller's ads, newest first.
    pub async fn list_for_seller(&self, seller_id: i64) -> DbResult<Vec<Ad>> {
        let ads = sqlx::query_as::<_, Ad>(
            "SELECT * FROM ads WHERE seller_id = ?1 ORDER BY created_at DESC, id DESC",
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ads)
    }

    /// Deletes an ad and its photos, decrementing the category counter.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let sub_category_id: Option<i64> =
            sqlx::query_scalar::<_, Option<i64>>("SELECT sub_category_id FROM ads WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DbError::not_found("Ad", id))?;

        sqlx::query("DELETE FROM ads WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        adjust_ads_count(&mut *tx, sub_category_id, -1).await?;

        tx.commit().await?;

        info!(id, "Ad deleted");
        Ok(())
    }

    /// Attaches a photo, stored under the ad's seller directory.
    pub async fn add_photo(&self, ad_id: i64, filename: &str) -> DbResult<Photo> {
        let ad = self.fetch(ad_id).await?;
        let seller_id = ad.seller_id.ok_or_else(|| {
            DbError::from(ValidationError::NotAllowed {
                field: "ad_id".to_string(),
                reason: "This ad no longer has a seller.".to_string(),
            })
        })?;

        let path = ad_photo_path(seller_id, filename)?;

        let id = sqlx::query("INSERT INTO photos (photo, ad_id, created_at) VALUES (?1, ?2, ?3)")
            .bind(&path)
            .bind(ad_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        debug!(id, ad_id, photo = %path, "Photo added");

        let photo = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(photo)
    }

    pub async fn photos(&self, ad_id: i64) -> DbResult<Vec<Photo>> {
        let photos = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE ad_id = ?1 ORDER BY id")
            .bind(ad_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(photos)
    }

    async fn ensure_can_post(&self, seller_id: i64) -> DbResult<()> {
        let role = sqlx::query_scalar::<_, Role>("SELECT role FROM users WHERE id = ?1")
            .bind(seller_id)
            .fetch_optional(&self.pool)
            .await?;

        match role {
            None => Err(ValidationError::ReferenceNotFound {
                field: "seller_id".to_string(),
                entity: "User".to_string(),
                id: seller_id,
            }
            .into()),
            Some(role) if !role.can_post_ads() => Err(ValidationError::NotAllowed {
                field: "seller".to_string(),
                reason: "Only sellers can post ads.".to_string(),
            }
            .into()),
            Some(_) => Ok(()),
        }
    }

    async fn fetch(&self, id: i64) -> DbResult<Ad> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Ad", id))
    }
}

/// Moves the counter of the category owning `sub_category_id` by `delta`, never below zero.
async fn adjust_ads_count(
    conn: &mut SqliteConnection,
    sub_category_id: Option<i64>,
    delta: i64,
) -> DbResult<()> {
    let Some(sub_category_id) = sub_category_id else {
        return Ok(());
    };

    sqlx::query(
        r#"
        UPDATE categories
        SET ads_count = MAX(ads_count + ?1, 0)
        WHERE id = (SELECT category_id FROM sub_categories WHERE id = ?2)
        "#,
    )
    .bind(delta)
    .bind(sub_category_id)
    .execute(conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use bozor_core::{
        Category, NewAd, NewCategory, NewSellerRequest, NewSubCategory, NewUser, SubCategory, User,
        ValidationError,
    };

    struct Fixture {
        db: Database,
        seller: User,
        category: Category,
        sub_category: SubCategory,
    }

    async fn register(db: &Database, username: &str) -> User {
        db.users()
            .register(NewUser {
                username: username.to_string(),
                email: format!("{username}@mail.uz"),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category = db
            .categories()
            .create(NewCategory {
                name: "Transport".to_string(),
            })
            .await
            .unwrap();
        let sub_category = db
            .sub_categories()
            .create(NewSubCategory {
                name: "Cars".to_string(),
                category_id: Some(category.id),
            })
            .await
            .unwrap();

        let user = register(&db, "jasur").await;
        let request = db
            .seller_requests()
            .submit(
                user.id,
                NewSellerRequest {
                    full_name: "Jasur Toshev".to_string(),
                    project_name: "Jasur Auto".to_string(),
                    category_id: category.id,
                    phone_number: "+998971234567".to_string(),
                    address: "Bukhara".to_string(),
                },
            )
            .await
            .unwrap();
        db.seller_requests().approve(request.id).await.unwrap();
        let seller = db.users().get_by_id(user.id).await.unwrap().unwrap();

        Fixture {
            db,
            seller,
            category,
            sub_category,
        }
    }

    fn draft(f: &Fixture) -> NewAd {
        NewAd {
            name: "chevrolet COBALT 2021".to_string(),
            description: "one owner".to_string(),
            price: 11500.0,
            currency: "usd".to_string(),
            sub_category_id: Some(f.sub_category.id),
            address_id: None,
            seller_id: f.seller.id,
        }
    }

    async fn ads_count(f: &Fixture) -> u32 {
        f.db.categories()
            .get_by_id(f.category.id)
            .await
            .unwrap()
            .unwrap()
            .ads_count
    }

    #[tokio::test]
    async fn test_create_counts_and_slugs() {
        let f = fixture().await;

        let ad = f.db.ads().create(draft(&f)).await.unwrap();
        assert_eq!(ad.name, "Chevrolet cobalt 2021");
        assert_eq!(ad.description, "One owner");
        assert_eq!(ad.currency, "USD");
        assert!(ad.slug.starts_with("chevrolet-cobalt-2021-"));
        assert_eq!(ads_count(&f).await, 1);

        let twin = f.db.ads().create(draft(&f)).await.unwrap();
        assert_ne!(ad.slug, twin.slug);
        assert_eq!(ads_count(&f).await, 2);

        let found = f.db.ads().get_by_slug(&ad.slug).await.unwrap().unwrap();
        assert_eq!(found.id, ad.id);
        assert_eq!(f.db.ads().list_for_seller(f.seller.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_plain_users_cannot_post() {
        let f = fixture().await;
        let buyer = register(&f.db, "buyer").await;

        let err = f
            .db
            .ads()
            .create(NewAd {
                seller_id: buyer.id,
                ..draft(&f)
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.validation_errors().and_then(|e| e.iter().next()),
            Some(ValidationError::NotAllowed { field, .. }) if field == "seller"
        ));

        let err = f
            .db
            .ads()
            .create(NewAd {
                seller_id: 999,
                ..draft(&f)
            })
            .await
            .unwrap_err();
        assert!(err.validation_errors().unwrap().has_field("seller_id"));
        assert_eq!(ads_count(&f).await, 0);
    }

    #[tokio::test]
    async fn test_invalid_ad_not_stored() {
        let f = fixture().await;

        let err = f
            .db
            .ads()
            .create(NewAd {
                price: -5.0,
                currency: "so'm".to_string(),
                ..draft(&f)
            })
            .await
            .unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert!(errors.has_field("price"));
        assert!(errors.has_field("currency"));

        assert!(f.db.ads().list_for_seller(f.seller.id).await.unwrap().is_empty());
        assert_eq!(ads_count(&f).await, 0);
    }

    #[tokio::test]
    async fn test_update_moves_counter() {
        let f = fixture().await;
        let other = f
            .db
            .categories()
            .create(NewCategory {
                name: "Parts".to_string(),
            })
            .await
            .unwrap();
        let tyres = f
            .db
            .sub_categories()
            .create(NewSubCategory {
                name: "Tyres".to_string(),
                category_id: Some(other.id),
            })
            .await
            .unwrap();

        let ad = f.db.ads().create(draft(&f)).await.unwrap();

        let moved = f
            .db
            .ads()
            .update(
                ad.id,
                NewAd {
                    name: "Winter tyres".to_string(),
                    sub_category_id: Some(tyres.id),
                    ..draft(&f)
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.slug, ad.slug);
        assert_eq!(moved.name, "Winter tyres");

        assert_eq!(ads_count(&f).await, 0);
        let other = f.db.categories().get_by_id(other.id).await.unwrap().unwrap();
        assert_eq!(other.ads_count, 1);
    }

    #[tokio::test]
    async fn test_delete_cascades_photos_and_floors_counter() {
        let f = fixture().await;
        let ad = f.db.ads().create(draft(&f)).await.unwrap();

        let photo = f.db.ads().add_photo(ad.id, "front.jpg").await.unwrap();
        assert_eq!(
            photo.photo,
            format!("uploads/user_{}/ad_photos/front.jpg", f.seller.id)
        );
        f.db.ads().add_photo(ad.id, "back.jpg").await.unwrap();
        let err = f.db.ads().add_photo(ad.id, "camera/").await.unwrap_err();
        assert!(err.validation_errors().unwrap().has_field("filename"));
        assert_eq!(f.db.ads().photos(ad.id).await.unwrap().len(), 2);

        // Counter drifted to zero outside the repository
        sqlx::query("UPDATE categories SET ads_count = 0")
            .execute(f.db.pool())
            .await
            .unwrap();

        f.db.ads().delete(ad.id).await.unwrap();
        assert_eq!(ads_count(&f).await, 0);
        assert!(f.db.ads().photos(ad.id).await.unwrap().is_empty());
        assert!(matches!(
            f.db.ads().delete(ad.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_sub_category_rejected_by_storage() {
        let f = fixture().await;

        let err = f
            .db
            .ads()
            .create(NewAd {
                sub_category_id: Some(777),
                ..draft(&f)
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(f.db.ads().list_for_seller(f.seller.id).await.unwrap().is_empty());
    }
}
