//! # Seed Data Generator
//!
//! Populates the category tree for development.
//!
//! ## Usage
//! ```bash
//! # Uses BOZOR_DATABASE_PATH (default ./bozor.db)
//! cargo run -p bozor-db --bin seed
//!
//! # More output
//! RUST_LOG=bozor_db=debug cargo run -p bozor-db --bin seed
//! ```
//!
//! Every row goes through the validating repositories, so names are
//! stored capitalized exactly as user input would be.

use bozor_core::{NewCategory, NewSubCategory};
use bozor_db::{Database, MarketConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Categories and their sub-categories.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Transport",
        &["Cars", "Motorcycles", "Trucks", "Spare parts", "Tyres and wheels"],
    ),
    (
        "Real estate",
        &["Apartments", "Houses", "Land", "Commercial property", "Rent"],
    ),
    (
        "Electronics",
        &["Mobile phones", "Laptops", "Tablets", "TV and audio", "Cameras"],
    ),
    (
        "Home and garden",
        &["Furniture", "Appliances", "Kitchenware", "Garden tools"],
    ),
    (
        "Fashion",
        &["Men's clothing", "Women's clothing", "Shoes", "Watches", "Bags"],
    ),
    (
        "Kids",
        &["Toys", "Strollers", "Children's clothing", "School supplies"],
    ),
    ("Pets", &["Dogs", "Cats", "Birds", "Pet supplies"]),
    ("Services", &["Repair", "Cleaning", "Tutoring", "Transport services"]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = MarketConfig::load()?;
    info!(path = %config.database_path.display(), "Seeding database");

    let db = Database::new(config.db_config()).await?;

    let existing = db.categories().list().await?;
    if !existing.is_empty() {
        warn!(
            count = existing.len(),
            "Database already has categories, skipping seed. Delete the database file to regenerate."
        );
        return Ok(());
    }

    let mut sub_total = 0usize;

    for (name, subs) in CATEGORIES {
        let category = db
            .categories()
            .create(NewCategory {
                name: name.to_string(),
            })
            .await?;

        for sub in subs.iter() {
            db.sub_categories()
                .create(NewSubCategory {
                    name: sub.to_string(),
                    category_id: Some(category.id),
                })
                .await?;
            sub_total += 1;
        }

        info!(id = category.id, name = %category.name, subs = subs.len(), "Category seeded");
    }

    info!(
        categories = CATEGORIES.len(),
        sub_categories = sub_total,
        "Seed complete"
    );

    db.close().await;
    Ok(())
}
