//! Data models for Roster.
//!
//! Request-side types: the fields and photo carried by a create or update
//! submission. Stored records live in [`crate::db::Student`].

mod student;

pub use student::*;

use uuid::Uuid;

/// Generate a new record key. Keys are random v4 UUIDs and never reused.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
