//! Student database queries.
//!
//! Students are keyed by a store-assigned `id` and carry a user-facing
//! `student_id` that is unique across the table. Every write is a single
//! statement, so a failed write never leaves a partial row behind.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbPool;

// ============================================================================
// Types
// ============================================================================

/// Student record from the database.
///
/// Serializes with the field names the browser client expects
/// (`_id`, `studentId`, `studentPhoto`, ...).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub student_address: String,
    /// Absolute URL of the stored photo.
    pub student_photo: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a new student.
#[derive(Debug, Clone)]
pub struct CreateStudent {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub student_address: String,
    pub student_photo: String,
}

impl CreateStudent {
    /// Every field is required and must be non-blank.
    pub fn validate(&self) -> Result<()> {
        require_field("id", &self.id)?;
        require_field("studentId", &self.student_id)?;
        require_field("studentName", &self.student_name)?;
        require_field("studentAddress", &self.student_address)?;
        require_field("studentPhoto", &self.student_photo)
    }
}

/// Input for updating a student. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateStudent {
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub student_address: Option<String>,
    pub student_photo: Option<String>,
}

impl UpdateStudent {
    /// Present fields must be non-blank; the stored values they replace
    /// already are, so the merged record stays valid.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("studentId", &self.student_id),
            ("studentName", &self.student_name),
            ("studentAddress", &self.student_address),
            ("studentPhoto", &self.student_photo),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                require_field(name, value)?;
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.student_id.is_none()
            && self.student_name.is_none()
            && self.student_address.is_none()
            && self.student_photo.is_none()
    }
}

pub(crate) fn require_field(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} is required", name)));
    }
    Ok(())
}

/// Map a write failure, turning `student_id` collisions into validation errors.
fn map_write_error(err: sqlx::Error, student_id: Option<&str>) -> Error {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            Error::Validation(format!(
                "studentId '{}' already exists",
                student_id.unwrap_or_default()
            ))
        }
        _ => Error::Store(err),
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Create a new student.
pub async fn create_student(pool: &DbPool, input: CreateStudent) -> Result<Student> {
    input.validate()?;

    sqlx::query_as::<_, Student>(
        r#"
        INSERT INTO students (id, student_id, student_name, student_address, student_photo)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&input.id)
    .bind(&input.student_id)
    .bind(&input.student_name)
    .bind(&input.student_address)
    .bind(&input.student_photo)
    .fetch_one(pool)
    .await
    .map_err(|e| map_write_error(e, Some(&input.student_id)))
}

/// Get a student by ID.
///
/// Any string is accepted; one that matches no row is `NotFound`.
pub async fn get_student(pool: &DbPool, id: &str) -> Result<Student> {
    sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("student {}", id)))
}

/// Get a student by its user-facing student ID.
pub async fn get_student_by_student_id(
    pool: &DbPool,
    student_id: &str,
) -> Result<Option<Student>> {
    sqlx::query_as::<_, Student>("SELECT * FROM students WHERE student_id = ?")
        .bind(student_id)
        .fetch_optional(pool)
        .await
        .map_err(Error::Store)
}

/// List all students in insertion order.
pub async fn list_students(pool: &DbPool) -> Result<Vec<Student>> {
    sqlx::query_as::<_, Student>("SELECT * FROM students ORDER BY rowid")
        .fetch_all(pool)
        .await
        .map_err(Error::Store)
}

/// Count all students.
pub async fn count_students(pool: &DbPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM students")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Update a student, applying only the fields present in `input`.
pub async fn update_student(pool: &DbPool, id: &str, input: UpdateStudent) -> Result<Student> {
    input.validate()?;

    sqlx::query_as::<_, Student>(
        r#"
        UPDATE students SET
            student_id = COALESCE(?, student_id),
            student_name = COALESCE(?, student_name),
            student_address = COALESCE(?, student_address),
            student_photo = COALESCE(?, student_photo),
            updated_at = datetime('now')
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&input.student_id)
    .bind(&input.student_name)
    .bind(&input.student_address)
    .bind(&input.student_photo)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_write_error(e, input.student_id.as_deref()))?
    .ok_or_else(|| Error::NotFound(format!("student {}", id)))
}

/// Delete a student by ID, returning its last state.
/// Note: the photo file it references is left in place.
pub async fn delete_student(pool: &DbPool, id: &str) -> Result<Student> {
    sqlx::query_as::<_, Student>("DELETE FROM students WHERE id = ? RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("student {}", id)))
}
