use std::sync::Arc;

use safeko::admin::editor::new_package;
use safeko::catalog::{CatalogError, CatalogStore, STORAGE_KEY};
use safeko::db;
use safeko::db::blob_store::{BlobStore, SqliteBlobStore};
use tempfile::TempDir;

fn open(dir: &TempDir, capacity: u64) -> (Arc<SqliteBlobStore>, CatalogStore) {
    let db_path = dir.path().join("test.db");
    let pool = db::create_pool(&db_path).expect("Failed to create test database");
    db::run_migrations(&pool).expect("Failed to run migrations");
    let blobs = Arc::new(SqliteBlobStore::new(pool, capacity));
    (blobs.clone(), CatalogStore::new(blobs))
}

#[test]
fn seeded_catalog_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let (blobs, catalog) = open(&temp_dir, 1024 * 1024);
        assert!(blobs.get(STORAGE_KEY).unwrap().is_none());
        assert_eq!(catalog.list().unwrap().len(), 6);
        assert!(blobs.get(STORAGE_KEY).unwrap().is_some());
    }

    let (_, catalog) = open(&temp_dir, 1024 * 1024);
    let ids: Vec<String> = catalog.list().unwrap().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn edits_and_deletes_are_persisted_in_place() {
    let temp_dir = TempDir::new().unwrap();

    {
        let (_, catalog) = open(&temp_dir, 1024 * 1024);
        let mut dmz = catalog.get_by_id("2").unwrap().unwrap();
        dmz.title = "DMZ Sunrise Tour".to_string();
        catalog.upsert(&dmz).unwrap();
        catalog.delete("3").unwrap();
    }

    let (_, catalog) = open(&temp_dir, 1024 * 1024);
    let packages = catalog.list().unwrap();
    assert_eq!(packages.len(), 5);
    // Updated entries keep their position
    assert_eq!(packages[1].id, "2");
    assert_eq!(packages[1].title, "DMZ Sunrise Tour");
    assert!(catalog.get_by_id("3").unwrap().is_none());
}

#[test]
fn oversized_write_leaves_stored_catalog_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let (blobs, catalog) = open(&temp_dir, 64 * 1024);
    catalog.list().unwrap();
    let before = blobs.get(STORAGE_KEY).unwrap();

    let mut package = new_package();
    package.image_url = format!("data:image/png;base64,{}", "A".repeat(100_000));
    let err = catalog.upsert(&package).unwrap_err();
    assert!(matches!(err, CatalogError::StorageFull { .. }));

    assert_eq!(blobs.get(STORAGE_KEY).unwrap(), before);
    assert!(catalog.get_by_id(&package.id).unwrap().is_none());
}
