//! Service layer for Roster.
//!
//! Contains the business logic behind the HTTP routes:
//! - PhotoStorage (where uploaded bytes land)
//! - PhotoIngest (stored name and public URL for an upload)
//! - Student (record lifecycle)

mod ingest;
mod photo_storage;
mod students;

pub use ingest::{sanitize_filename, storage_name, PhotoIngestService};
pub use photo_storage::{DiskPhotoStorage, PhotoStorage};
pub use students::StudentService;
