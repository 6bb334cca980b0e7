//! Tour-package catalog persisted as one JSON array in the blob store.
//!
//! Every mutation reads the stored collection, changes a copy, and writes the
//! whole collection back in a single `set`. Nothing is cached, so a rejected
//! write leaves both the store and later reads exactly as they were.

pub mod document;
pub mod models;
pub mod seed;

use std::sync::Arc;

use thiserror::Error;

use crate::db::blob_store::{BlobError, BlobStore};

pub use document::{BlockBody, BlockField, BlockKind, ContentBlock, Direction, Document};
pub use models::{Category, TourPackage};

/// Blob store key holding the serialized catalog.
pub const STORAGE_KEY: &str = "safeko_products_v2";

/// Filter value that selects every package.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Storage full: {needed} bytes needed, capacity is {capacity}")]
    StorageFull { needed: u64, capacity: u64 },

    #[error("Storage error: {0}")]
    Backend(BlobError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<BlobError> for CatalogError {
    fn from(err: BlobError) -> Self {
        match err {
            BlobError::StorageFull { needed, capacity } => {
                CatalogError::StorageFull { needed, capacity }
            }
            other => CatalogError::Backend(other),
        }
    }
}

#[derive(Clone)]
pub struct CatalogStore {
    blobs: Arc<dyn BlobStore>,
}

impl CatalogStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// All packages in storage order. An empty store is seeded with the
    /// reference catalog; unreadable data falls back to the reference
    /// catalog without overwriting what is stored.
    pub fn list(&self) -> Result<Vec<TourPackage>, CatalogError> {
        match self.load() {
            Err(CatalogError::Serialization(e)) => {
                tracing::error!("Stored catalog is unreadable, using defaults: {}", e);
                Ok(seed::default_packages())
            }
            other => other,
        }
    }

    /// `"all"` returns everything; otherwise an exact category match.
    /// Packages without a category match no named filter.
    pub fn list_by_category(&self, category: &str) -> Result<Vec<TourPackage>, CatalogError> {
        let packages = self.list()?;
        if category == ALL_CATEGORIES {
            return Ok(packages);
        }
        Ok(packages
            .into_iter()
            .filter(|p| p.category.map(Category::as_str) == Some(category))
            .collect())
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<TourPackage>, CatalogError> {
        Ok(self.list()?.into_iter().find(|p| p.id == id))
    }

    /// Replace the package with the same id in place, or append it.
    /// Fails without writing when the stored catalog cannot be read.
    pub fn upsert(&self, package: &TourPackage) -> Result<(), CatalogError> {
        let mut packages = self.load()?;
        match packages.iter_mut().find(|p| p.id == package.id) {
            Some(existing) => *existing = package.clone(),
            None => packages.push(package.clone()),
        }
        self.write(&packages)?;
        tracing::debug!("Saved package {}", package.id);
        Ok(())
    }

    /// Remove the package with `id`; absent ids are not an error.
    pub fn delete(&self, id: &str) -> Result<(), CatalogError> {
        let mut packages = self.load()?;
        packages.retain(|p| p.id != id);
        self.write(&packages)?;
        tracing::debug!("Deleted package {}", id);
        Ok(())
    }

    /// Strict read used before every write. Seeds an empty store, but a
    /// stored value that does not parse is an error.
    fn load(&self) -> Result<Vec<TourPackage>, CatalogError> {
        match self.blobs.get(STORAGE_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => {
                let defaults = seed::default_packages();
                match self.write(&defaults) {
                    Ok(()) => tracing::info!("Seeded catalog with {} packages", defaults.len()),
                    Err(e) => tracing::warn!("Could not persist default catalog: {}", e),
                }
                Ok(defaults)
            }
        }
    }

    fn write(&self, packages: &[TourPackage]) -> Result<(), CatalogError> {
        let bytes = serde_json::to_vec(packages)?;
        self.blobs.set(STORAGE_KEY, &bytes)?;
        Ok(())
    }
}
