//! Student submission models.

use axum::body::Bytes;

use crate::db::{require_field, UpdateStudent};
use crate::Result;

/// An uploaded photo as received from the client.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    /// Filename supplied by the client, unsanitized.
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl PhotoUpload {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            data: data.into(),
        }
    }

    /// A file input left empty still submits a part, with no filename and
    /// no content.
    pub fn is_blank(&self) -> bool {
        self.filename.is_empty() && self.data.is_empty()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Text fields of a submission. Absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFields {
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    pub student_address: Option<String>,
}

/// Fields required to create a student, all present and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFields {
    pub student_id: String,
    pub student_name: String,
    pub student_address: String,
}

impl StudentFields {
    /// Require every field for a create.
    pub fn into_create(self) -> Result<CreateFields> {
        Ok(CreateFields {
            student_id: required("studentId", self.student_id)?,
            student_name: required("studentName", self.student_name)?,
            student_address: required("studentAddress", self.student_address)?,
        })
    }

    /// Build a partial update of the text fields. The photo reference is
    /// left unset; only an ingested upload fills it in.
    pub fn into_update(self) -> UpdateStudent {
        UpdateStudent {
            student_id: self.student_id,
            student_name: self.student_name,
            student_address: self.student_address,
            student_photo: None,
        }
    }
}

fn required(name: &str, value: Option<String>) -> Result<String> {
    let value = value.unwrap_or_default();
    require_field(name, &value)?;
    Ok(value)
}

/// A parsed create/update submission.
#[derive(Debug, Clone, Default)]
pub struct StudentForm {
    pub fields: StudentFields,
    pub photo: Option<PhotoUpload>,
}
