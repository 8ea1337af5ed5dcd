//! Application state for Roster.
//!
//! Contains the shared state that is passed to all handlers. The database
//! pool is created once here and handed to the services that need it.

use std::sync::Arc;

use crate::config::{Config, StorageConfig};
use crate::db::DbPool;
use crate::services::{DiskPhotoStorage, PhotoIngestService, PhotoStorage, StudentService};
use crate::Result;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,
    /// Student record service.
    pub students: StudentService,
    /// Upload directory and limits, used for static serving.
    pub storage: StorageConfig,
}

impl AppState {
    /// Create a new application state, opening the database and the
    /// uploads directory described by `config`.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = crate::db::init_pool(&config.database.path).await?;
        crate::db::initialize_schema(&db).await?;

        let disk = DiskPhotoStorage::new(&config.storage.uploads_path);
        disk.ensure_root().await?;

        Ok(Self::with_storage(db, config.storage.clone(), Arc::new(disk)))
    }

    /// Assemble state around an existing pool and photo backend.
    pub fn with_storage(
        db: DbPool,
        storage: StorageConfig,
        photos: Arc<dyn PhotoStorage>,
    ) -> Self {
        let ingest = Arc::new(PhotoIngestService::new(
            photos,
            &storage.uploads_base_url,
            storage.max_upload_size,
        ));
        let students = StudentService::new(db.clone(), ingest);

        Self {
            db,
            students,
            storage,
        }
    }
}
