//! Seed the catalog (and optionally shopper profiles) from a YAML file.
//!
//! Used for local development and demo environments. Existing rows are
//! updated in place: categories and products are matched by name
//! (case-insensitive), profiles by user ID.
//!
//! # File Format
//!
//! ```yaml
//! categories:
//!   - name: Fruits
//!     description: Fresh seasonal fruit
//! products:
//!   - name: Apples
//!     price: "120.00"
//!     unit: kg
//!     stock: 30
//!     category: Fruits
//! profiles:
//!   - user_id: 6f1c8a52-3d43-4f4e-9d0e-3c2b6f0f8a11
//!     full_name: Asha Rao
//!     phone: "+91 98450 00000"
//!     address: 12 MG Road, Bengaluru
//! ```

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use super::{ConnectError, connect};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Could not read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Seed file has {0} validation error(s)")]
    Invalid(usize),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Top-level seed file.
#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
    #[serde(default)]
    pub profiles: Vec<SeedProfile>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    /// Decimal string, e.g. "120.00".
    pub price: String,
    pub unit: String,
    #[serde(default)]
    pub stock: i64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedProfile {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Counts of rows written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub products: usize,
    pub profiles: usize,
}

/// Seed the database from a YAML file.
///
/// The file is parsed and validated before connecting, and every row is
/// written in one transaction.
///
/// # Errors
///
/// Returns an error if the file is missing or invalid, or a database
/// operation fails.
pub async fn run(file_path: &str, dry_run: bool) -> Result<SeedSummary, SeedError> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SeedError::FileNotFound(file_path.to_string()));
    }

    info!(path = %file_path, "Loading seed file");
    let content = tokio::fs::read_to_string(path).await?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;

    let errors = validate(&seed);
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    info!(
        categories = seed.categories.len(),
        products = seed.products.len(),
        profiles = seed.profiles.len(),
        "Seed file is valid"
    );

    if dry_run {
        info!("Dry run, nothing written");
        return Ok(SeedSummary::default());
    }

    let pool = connect().await?;
    let summary = write(&pool, &seed).await?;
    info!(?summary, "Seeding complete!");
    Ok(summary)
}

/// Check a seed file for problems that the database would reject or that
/// would make product matching ambiguous.
#[must_use]
pub fn validate(seed: &SeedFile) -> Vec<String> {
    let mut errors = Vec::new();

    let mut category_names = HashSet::new();
    for category in &seed.categories {
        if category.name.trim().is_empty() {
            errors.push("category with empty name".to_string());
        } else if !category_names.insert(category.name.trim().to_lowercase()) {
            errors.push(format!("duplicate category: {}", category.name));
        }
    }

    let mut product_names = HashSet::new();
    for product in &seed.products {
        let name = product.name.trim();
        if name.is_empty() {
            errors.push("product with empty name".to_string());
            continue;
        }
        if !product_names.insert(name.to_lowercase()) {
            errors.push(format!("duplicate product: {name}"));
        }
        match product.price.trim().parse::<Decimal>() {
            Ok(price) if price.is_sign_negative() => {
                errors.push(format!("{name}: price must not be negative"));
            }
            Ok(_) => {}
            Err(_) => errors.push(format!("{name}: invalid price {:?}", product.price)),
        }
        if product.stock < 0 || i32::try_from(product.stock).is_err() {
            errors.push(format!("{name}: stock out of range ({})", product.stock));
        }
        if product.unit.trim().is_empty() {
            errors.push(format!("{name}: unit is required"));
        }
        if let Some(category) = &product.category {
            if !category_names.contains(&category.trim().to_lowercase()) {
                errors.push(format!("{name}: unknown category {category}"));
            }
        }
    }

    let mut user_ids = HashSet::new();
    for profile in &seed.profiles {
        if !user_ids.insert(profile.user_id) {
            errors.push(format!("duplicate profile: {}", profile.user_id));
        }
    }

    errors
}

async fn write(pool: &PgPool, seed: &SeedFile) -> Result<SeedSummary, SeedError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for category in &seed.categories {
        sqlx::query(
            "INSERT INTO categories (name, description, image_url)
             VALUES ($1, $2, $3)
             ON CONFLICT (name) DO UPDATE
                SET description = EXCLUDED.description, image_url = EXCLUDED.image_url",
        )
        .bind(category.name.trim())
        .bind(&category.description)
        .bind(&category.image_url)
        .execute(&mut *tx)
        .await?;
        summary.categories += 1;
    }

    for product in &seed.products {
        // Validated above
        let price: Decimal = product.price.trim().parse().unwrap_or_default();
        let stock = i32::try_from(product.stock).unwrap_or_default();

        let updated = sqlx::query(
            "UPDATE products
             SET price = $2, unit = $3, stock_quantity = $4, description = $5, image_url = $6,
                 category_id = (SELECT id FROM categories WHERE lower(name) = lower($7))
             WHERE lower(name) = lower($1)",
        )
        .bind(product.name.trim())
        .bind(price)
        .bind(product.unit.trim())
        .bind(stock)
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(product.category.as_deref().map(str::trim))
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            sqlx::query(
                "INSERT INTO products
                    (name, price, unit, stock_quantity, description, image_url, category_id)
                 VALUES ($1, $2, $3, $4, $5, $6,
                         (SELECT id FROM categories WHERE lower(name) = lower($7)))",
            )
            .bind(product.name.trim())
            .bind(price)
            .bind(product.unit.trim())
            .bind(stock)
            .bind(&product.description)
            .bind(&product.image_url)
            .bind(product.category.as_deref().map(str::trim))
            .execute(&mut *tx)
            .await?;
        }
        summary.products += 1;
    }

    for profile in &seed.profiles {
        sqlx::query(
            "INSERT INTO profiles (id, full_name, phone, address)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE
                SET full_name = EXCLUDED.full_name,
                    phone = EXCLUDED.phone,
                    address = EXCLUDED.address,
                    updated_at = NOW()",
        )
        .bind(profile.user_id)
        .bind(&profile.full_name)
        .bind(&profile.phone)
        .bind(&profile.address)
        .execute(&mut *tx)
        .await?;
        summary.profiles += 1;
    }

    tx.commit().await?;
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
categories:
  - name: Fruits
  - name: Dairy
products:
  - name: Apples
    price: "120.00"
    unit: kg
    stock: 30
    category: Fruits
  - name: Milk
    price: "60"
    unit: litre
    stock: 20
    category: dairy
profiles:
  - user_id: 6f1c8a52-3d43-4f4e-9d0e-3c2b6f0f8a11
    full_name: Asha Rao
    phone: "+91 98450 00000"
    address: 12 MG Road, Bengaluru
"#;

    #[test]
    fn test_sample_is_valid() {
        let seed: SeedFile = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(seed.products.len(), 2);
        assert!(validate(&seed).is_empty());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let seed: SeedFile = serde_yaml::from_str("categories: []").unwrap();
        assert!(seed.products.is_empty());
        assert!(seed.profiles.is_empty());
    }

    #[test]
    fn test_validation_errors() {
        let seed: SeedFile = serde_yaml::from_str(
            r#"
categories:
  - name: Fruits
products:
  - name: Apples
    price: "-1"
    unit: kg
  - name: apples
    price: "abc"
    unit: ""
    stock: -4
    category: Bakery
"#,
        )
        .unwrap();

        let errors = validate(&seed);
        assert!(errors.iter().any(|e| e.contains("price must not be negative")));
        assert!(errors.iter().any(|e| e.contains("duplicate product")));
        assert!(errors.iter().any(|e| e.contains("invalid price")));
        assert!(errors.iter().any(|e| e.contains("stock out of range")));
        assert!(errors.iter().any(|e| e.contains("unit is required")));
        assert!(errors.iter().any(|e| e.contains("unknown category")));
    }
}
