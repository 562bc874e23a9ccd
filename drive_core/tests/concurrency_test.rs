use drive_core::{
    config::DatabaseConfig, get_database_pool, run_migrations, AppError, CreateFileRequest,
    FileLifecycleManager, FileRecordStore, MemoryFileStore, SqliteFileRepository,
};
use futures_util::future::join_all;
use std::sync::Arc;
use tempfile::TempDir;

async fn sqlite_store() -> (Arc<dyn FileRecordStore>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}?mode=rwc", temp_dir.path().join("drive.db").display());

    let pool = get_database_pool(&DatabaseConfig::for_url(url)).await.unwrap();
    run_migrations(pool.clone()).await.unwrap();

    (Arc::new(SqliteFileRepository::new(pool)), temp_dir)
}

fn report(name: &str) -> CreateFileRequest {
    CreateFileRequest {
        name: name.to_string(),
        organization_id: Some("org_42".to_string()),
        storage_ref: format!("ref-{}", name),
        content_type: "text/csv".to_string(),
    }
}

async fn concurrent_deletions_settle(manager: FileLifecycleManager) {
    let record = manager.create_file(report("shared")).await.unwrap();

    let (first, second) = tokio::join!(
        manager.request_deletion(record.id),
        manager.request_deletion(record.id)
    );
    assert!(first.is_ok());
    assert!(second.is_ok());

    let results = join_all((0..16).map(|_| manager.request_deletion(record.id))).await;
    assert!(results.iter().all(|r| r.is_ok()));

    let files = manager.list_files("org_42").await.unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].marked_for_deletion);
}

async fn concurrent_uploads_all_recorded(manager: FileLifecycleManager) {
    let results = join_all((0..20).map(|i| manager.create_file(report(&format!("f{}", i))))).await;
    assert!(results.iter().all(|r| r.is_ok()));

    let files = manager.list_files("org_42").await.unwrap();
    assert_eq!(files.len(), 20);
}

#[tokio::test]
async fn test_concurrent_deletions_sqlite() {
    let (store, _dir) = sqlite_store().await;
    concurrent_deletions_settle(FileLifecycleManager::with_default_issuer(store)).await;
}

#[tokio::test]
async fn test_concurrent_deletions_memory() {
    let store = Arc::new(MemoryFileStore::new());
    concurrent_deletions_settle(FileLifecycleManager::with_default_issuer(store)).await;
}

#[tokio::test]
async fn test_concurrent_uploads_sqlite() {
    let (store, _dir) = sqlite_store().await;
    concurrent_uploads_all_recorded(FileLifecycleManager::with_default_issuer(store)).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_uploads_memory_multi_thread() {
    let manager = FileLifecycleManager::with_default_issuer(Arc::new(MemoryFileStore::new()));

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.create_file(report(&format!("f{}", i))).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(manager.list_files("org_42").await.unwrap().len(), 20);
}

#[tokio::test]
async fn test_unknown_id_deletion_leaves_store_untouched() {
    let (store, _dir) = sqlite_store().await;
    let manager = FileLifecycleManager::with_default_issuer(store);

    let result = manager.request_deletion(uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(manager.list_files("org_42").await.unwrap().is_empty());
}
