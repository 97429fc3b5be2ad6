//! Catalog resources
//!
//! Timestamps are storage bookkeeping: they drive keyset pagination but are
//! never serialized to clients. They are still accepted on input so seed
//! files can carry them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Records that can be paginated by creation time
pub trait Timestamped {
    /// Creation instant used as the pagination key
    fn created_at(&self) -> DateTime<Utc>;
}

/// A product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub updated_at: DateTime<Utc>,
}

impl Timestamped for Category {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A product listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "categoryID")]
    pub category_id: Uuid,
    pub price: f64,
    pub quantity: i32,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub updated_at: DateTime<Utc>,
}

impl Timestamped for Product {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Initial records for the in-memory repositories
///
/// ```json
/// { "categories": [ ... ], "products": [ ... ] }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl SeedData {
    /// Read seed data from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|source| Error::Seed {
            path: path.display().to_string(),
            source,
        })
    }
}
