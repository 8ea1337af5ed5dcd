//! Student service for record lifecycle management.
//!
//! Sequences photo ingestion and store writes. A photo is always ingested
//! before the store is touched, so a failed ingest never mutates a record.
//! The reverse does not hold: a store failure after a successful ingest
//! leaves the stored file in place, as do deletes and photo replacements.

use std::sync::Arc;

use tracing::{debug, info};

use super::PhotoIngestService;
use crate::db::{self, CreateStudent, DbPool, Student};
use crate::models::{new_id, StudentForm};
use crate::{Error, Result};

/// Service for managing student records.
#[derive(Clone)]
pub struct StudentService {
    db: DbPool,
    photos: Arc<PhotoIngestService>,
}

impl StudentService {
    /// Create a new student service.
    pub fn new(db: DbPool, photos: Arc<PhotoIngestService>) -> Self {
        Self { db, photos }
    }

    /// List every student.
    pub async fn list(&self) -> Result<Vec<Student>> {
        db::list_students(&self.db).await
    }

    /// Get a student by key.
    pub async fn get(&self, id: &str) -> Result<Student> {
        db::get_student(&self.db, id).await
    }

    /// Create a student from a submission.
    ///
    /// The photo is mandatory. Missing fields and already-taken student IDs
    /// are rejected before the photo is written; the store's unique index
    /// still settles races between concurrent creates.
    pub async fn create(&self, form: StudentForm) -> Result<Student> {
        let photo = form
            .photo
            .ok_or_else(|| Error::Validation("studentPhoto is required".into()))?;
        let fields = form.fields.into_create()?;

        if db::get_student_by_student_id(&self.db, &fields.student_id)
            .await?
            .is_some()
        {
            return Err(Error::Validation(format!(
                "studentId '{}' already exists",
                fields.student_id
            )));
        }

        let photo_url = self.photos.ingest(&photo).await?;

        let student = db::create_student(
            &self.db,
            CreateStudent {
                id: new_id(),
                student_id: fields.student_id,
                student_name: fields.student_name,
                student_address: fields.student_address,
                student_photo: photo_url,
            },
        )
        .await?;

        info!(id = %student.id, student_id = %student.student_id, "Created student");

        Ok(student)
    }

    /// Update a student from a submission.
    ///
    /// Only the fields present in the form change. The photo reference is
    /// replaced only when a new photo was uploaded.
    pub async fn update(&self, id: &str, form: StudentForm) -> Result<Student> {
        let update = form.fields.into_update();
        update.validate()?;

        // Unknown keys fail before any photo is stored
        let current = db::get_student(&self.db, id).await?;

        if let Some(student_id) = update.student_id.as_deref() {
            if student_id != current.student_id
                && db::get_student_by_student_id(&self.db, student_id)
                    .await?
                    .is_some()
            {
                return Err(Error::Validation(format!(
                    "studentId '{}' already exists",
                    student_id
                )));
            }
        }

        let photo_url = match &form.photo {
            Some(photo) => Some(self.photos.ingest(photo).await?),
            None => None,
        };
        let update = db::UpdateStudent {
            student_photo: photo_url,
            ..update
        };

        if update.is_empty() {
            debug!(id = %id, "Update carried no changes");
            return Ok(current);
        }

        let student = db::update_student(&self.db, id, update).await?;

        info!(id = %student.id, student_id = %student.student_id, "Updated student");

        Ok(student)
    }

    /// Delete a student, returning its last state.
    pub async fn delete(&self, id: &str) -> Result<Student> {
        let student = db::delete_student(&self.db, id).await?;

        info!(id = %student.id, student_id = %student.student_id, "Deleted student");

        Ok(student)
    }

    /// Number of stored students.
    pub async fn count(&self) -> Result<i64> {
        db::count_students(&self.db).await
    }
}
