//! Common test utilities and helpers.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use roster::api;
use roster::config::Config;
use roster::db::{self, DbPool, PoolConfig};
use roster::services::{DiskPhotoStorage, PhotoStorage};
use roster::{AppState, Error, Result};
use tempfile::TempDir;

/// Prefix every photo URL starts with in tests.
pub const UPLOADS_BASE_URL: &str = "http://localhost/uploads";

/// Disk storage that counts successful writes.
pub struct CountingStorage {
    inner: DiskPhotoStorage,
    writes: AtomicUsize,
}

impl CountingStorage {
    pub fn new(root: &Path) -> Self {
        Self {
            inner: DiskPhotoStorage::new(root),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PhotoStorage for CountingStorage {
    async fn write_file(&self, name: &str, data: &[u8]) -> Result<()> {
        self.inner.write_file(name, data).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Storage that always fails, as a full or read-only disk would.
pub struct FailingStorage;

#[async_trait]
impl PhotoStorage for FailingStorage {
    async fn write_file(&self, _name: &str, _data: &[u8]) -> Result<()> {
        Err(Error::Storage("No space left on device".into()))
    }
}

/// Create a test database with the schema applied.
pub async fn setup_test_db() -> DbPool {
    let pool = db::create_pool_with_config(":memory:", PoolConfig::test())
        .await
        .expect("Failed to create test database");
    db::initialize_schema(&pool)
        .await
        .expect("Failed to initialize schema");
    pool
}

/// State wired to a fresh database, a temporary uploads directory and the
/// given photo backend.
pub async fn build_test_state(
    uploads: &TempDir,
    photos: Arc<dyn PhotoStorage>,
) -> (AppState, DbPool) {
    let pool = setup_test_db().await;
    let mut storage = Config::ephemeral(uploads.path()).storage;
    storage.uploads_base_url = UPLOADS_BASE_URL.to_string();

    let state = AppState::with_storage(pool.clone(), storage, photos);
    (state, pool)
}

/// Everything a test needs to drive the HTTP surface.
pub struct TestApp {
    pub server: TestServer,
    pub pool: DbPool,
    pub storage: Arc<CountingStorage>,
    pub uploads: TempDir,
}

/// Build a test router backed by counting disk storage.
pub async fn build_test_app() -> TestApp {
    let uploads = tempfile::tempdir().expect("Failed to create uploads dir");
    let storage = Arc::new(CountingStorage::new(uploads.path()));
    let (state, pool) = build_test_state(&uploads, storage.clone()).await;

    TestApp {
        server: server_for(state),
        pool,
        storage,
        uploads,
    }
}

/// Build a test router whose photo writes always fail.
pub async fn build_failing_app() -> (TestServer, DbPool, TempDir) {
    let uploads = tempfile::tempdir().expect("Failed to create uploads dir");
    let (state, pool) = build_test_state(&uploads, Arc::new(FailingStorage)).await;
    (server_for(state), pool, uploads)
}

fn server_for(state: AppState) -> TestServer {
    let app = Router::new()
        .merge(api::routes(&state))
        .with_state(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Multipart form with the three text fields.
pub fn student_form(student_id: &str, name: &str, address: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("studentId", student_id.to_string())
        .add_text("studentName", name.to_string())
        .add_text("studentAddress", address.to_string())
}

/// A photo file part.
pub fn photo_part(filename: &str, data: &[u8]) -> Part {
    Part::bytes(data.to_vec())
        .file_name(filename.to_string())
        .mime_type("image/jpeg")
}

/// Request path of a photo URL produced under [`UPLOADS_BASE_URL`].
pub fn photo_path(photo_url: &str) -> String {
    let name = photo_url
        .strip_prefix(UPLOADS_BASE_URL)
        .expect("photo URL uses the test base URL");
    format!("/uploads{}", name)
}
