//! Students Routes
//!
//! CRUD operations for student records. Create and update take
//! multipart/form-data so a photo can travel with the text fields.
//!
//! Routes:
//! - GET /api/students - List all students
//! - POST /api/students - Create a student (photo required)
//! - GET /api/students/:id - Get a student
//! - PUT /api/students/:id - Update a student (photo optional)
//! - DELETE /api/students/:id - Delete a student

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::Student;
use crate::models::{PhotoUpload, StudentForm};
use crate::{AppState, Error, Result};

/// Multipart field carrying the photo file.
pub const PHOTO_FIELD: &str = "studentPhoto";

/// Build student routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route(
            "/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
}

// ============================================================================
// Response Types
// ============================================================================

/// Delete response, echoing the removed record.
#[derive(Debug, Serialize)]
pub struct DeleteStudentResponse {
    pub message: String,
    pub student: Student,
}

// ============================================================================
// Handlers
// ============================================================================

/// List all students.
///
/// GET /api/students
#[axum::debug_handler]
async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>> {
    let students = state.students.list().await?;
    Ok(Json(students))
}

/// Create a student.
///
/// POST /api/students
///
/// Fields: `studentId`, `studentName`, `studentAddress` and a
/// `studentPhoto` file.
#[axum::debug_handler]
async fn create_student(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Student>)> {
    let form = read_form(multipart, state.storage.max_upload_size).await?;
    let student = state.students.create(form).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// Get a student.
///
/// GET /api/students/:id
#[axum::debug_handler]
async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>> {
    let student = state.students.get(&id).await?;
    Ok(Json(student))
}

/// Update a student.
///
/// PUT /api/students/:id
///
/// Any subset of the text fields may be sent. Without a `studentPhoto`
/// file the stored photo is kept.
#[axum::debug_handler]
async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Student>> {
    let form = read_form(multipart, state.storage.max_upload_size).await?;
    let student = state.students.update(&id, form).await?;
    Ok(Json(student))
}

/// Delete a student.
///
/// DELETE /api/students/:id
#[axum::debug_handler]
async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteStudentResponse>> {
    let student = state.students.delete(&id).await?;
    Ok(Json(DeleteStudentResponse {
        message: "Student deleted successfully".into(),
        student,
    }))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse a create/update submission.
///
/// A `studentPhoto` part without a filename is a text field and is ignored;
/// one with an empty filename and no content is an empty file input.
async fn read_form(mut multipart: Multipart, max_upload_size: usize) -> Result<StudentForm> {
    let mut form = StudentForm::default();
    let map_err = |e: MultipartError| multipart_error(e, max_upload_size);

    while let Some(field) = multipart.next_field().await.map_err(map_err)? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            PHOTO_FIELD => {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(map_err)?;

                let upload = PhotoUpload {
                    filename,
                    content_type,
                    data,
                };
                if !upload.is_blank() {
                    form.photo = Some(upload);
                }
            }
            "studentId" => form.fields.student_id = Some(read_text(field, map_err).await?),
            "studentName" => form.fields.student_name = Some(read_text(field, map_err).await?),
            "studentAddress" => {
                form.fields.student_address = Some(read_text(field, map_err).await?)
            }
            _ => continue,
        }
    }

    Ok(form)
}

async fn read_text(
    field: Field<'_>,
    map_err: impl Fn(MultipartError) -> Error,
) -> Result<String> {
    let text = field.text().await.map_err(map_err)?;
    Ok(text.trim().to_string())
}

/// Bodies over the configured limit surface as `FileTooLarge`; anything
/// else wrong with the body is a validation error.
fn multipart_error(err: MultipartError, max_upload_size: usize) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::FileTooLarge {
            max_size: max_upload_size,
        }
    } else {
        Error::Validation(format!("Malformed multipart body: {}", err.body_text()))
    }
}
