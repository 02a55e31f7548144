//! # Address Repository
//!
//! Postal addresses referenced by ads. Deleting one detaches its ads.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bozor_core::{Address, NewAddress, Validate};

#[derive(Debug, Clone)]
pub struct AddressRepository {
    pool: SqlitePool,
}

impl AddressRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AddressRepository { pool }
    }

    /// Validates and stores an address.
    pub async fn create(&self, address: NewAddress) -> DbResult<Address> {
        let address = address.validate()?;

        let id = sqlx::query(
            r#"
            INSERT INTO addresses (
                country, city, district, street,
                building_number, apartment_number, postal_code, additional_info
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&address.country)
        .bind(&address.city)
        .bind(&address.district)
        .bind(&address.street)
        .bind(&address.building_number)
        .bind(&address.apartment_number)
        .bind(&address.postal_code)
        .bind(&address.additional_info)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!(id, "Address created");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Address", id))
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Address>> {
        let address = sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(address)
    }

    /// Deletes an address. Ads pointing at it keep existing with no address.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Address", id));
        }

        debug!(id, "Address deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use bozor_core::NewAddress;

    #[tokio::test]
    async fn test_create_and_delete_address() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.addresses();

        let address = repo
            .create(NewAddress {
                country: " Uzbekistan ".to_string(),
                city: "Tashkent".to_string(),
                district: "Mirobod".to_string(),
                street: Some("".to_string()),
                ..NewAddress::default()
            })
            .await
            .unwrap();

        assert_eq!(address.country, "Uzbekistan");
        assert_eq!(address.street, None);
        assert_eq!(address.short_display(), "Uzbekistan, Tashkent, Mirobod");

        repo.delete(address.id).await.unwrap();
        assert!(repo.get_by_id(address.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(address.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_address_not_stored() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = db.addresses().create(NewAddress::default()).await.unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert!(errors.has_field("country"));
        assert!(errors.has_field("city"));
        assert!(errors.has_field("district"));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM addresses")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
