//! Photo ingestion.
//!
//! Turns an uploaded file into a stored file plus the absolute URL that
//! serves it. Stored names look like `{unix_millis}-{nanoid}-{original}` so
//! repeated uploads of the same filename never collide.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::PhotoStorage;
use crate::models::PhotoUpload;
use crate::{Error, Result};

/// Longest sanitized filename kept in a storage name.
const MAX_NAME_LEN: usize = 100;

/// Service that stores uploaded photos and derives their public URLs.
#[derive(Clone)]
pub struct PhotoIngestService {
    storage: Arc<dyn PhotoStorage>,
    base_url: String,
    max_size: usize,
}

impl PhotoIngestService {
    /// Create a new ingest service. Stored names are published under
    /// `base_url`.
    pub fn new(storage: Arc<dyn PhotoStorage>, base_url: &str, max_size: usize) -> Self {
        Self {
            storage,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_size,
        }
    }

    /// Store the upload and return its photo URL.
    pub async fn ingest(&self, upload: &PhotoUpload) -> Result<String> {
        if upload.size() > self.max_size {
            return Err(Error::FileTooLarge {
                max_size: self.max_size,
            });
        }

        let name = storage_name(&upload.filename);
        self.storage.write_file(&name, &upload.data).await?;

        let url = self.photo_url(&name);
        debug!(
            original = %upload.filename,
            content_type = upload.content_type.as_deref().unwrap_or("unknown"),
            url = %url,
            "Ingested photo"
        );

        Ok(url)
    }

    /// Public URL of a stored name.
    pub fn photo_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(name))
    }
}

/// Generate a collision-resistant storage name for an uploaded file.
pub fn storage_name(original: &str) -> String {
    format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        nanoid::nanoid!(8),
        sanitize_filename(original)
    )
}

/// Reduce a client filename to a safe single path component.
///
/// Keeps the final path segment, replaces anything outside
/// `[A-Za-z0-9._-]` with `_` and keeps at most the last
/// [`MAX_NAME_LEN`] characters so the extension survives.
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: Vec<char> = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let start = cleaned.len().saturating_sub(MAX_NAME_LEN);
    let cleaned: String = cleaned[start..].iter().collect();

    if cleaned.trim_matches('.').is_empty() {
        "photo".to_string()
    } else {
        cleaned
    }
}
