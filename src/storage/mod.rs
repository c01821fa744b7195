//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite file with tables:
//! - students(student_id, name, email)
//! - internships(internship_id, student_id, company_name, duration, feedback, msme_digitalized)
//! - feedback(feedback_id, student_id, rating, comments)

pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteStore, DbStats};
