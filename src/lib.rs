//! # Kyra - Internship Journey Tracker
//!
//! Tracks student internship records on top of a single local SQLite file.
//!
//! Kyra provides:
//! - Student registration keyed by email
//! - Internship and feedback logging
//! - Aggregate metrics across all internships
//! - PDF report export and per-student progress charts

pub mod model;
pub mod storage;
pub mod repository;
pub mod report;
pub mod journey;
pub mod app;
pub mod ui;
pub mod output;
pub mod config;


// Re-exports for convenient access
pub use model::{Feedback, InternshipSummary, Metrics, NewInternship, ReportRow, Student, StudentView};
pub use storage::SqliteStore;
pub use repository::{Outcome, Reporter, Repository};
pub use app::AppContext;

/// Result type alias for Kyra operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Kyra operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("Image encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Invalid rating: {0}")]
    InvalidRating(String),
}

impl From<genpdf::error::Error> for Error {
    fn from(err: genpdf::error::Error) -> Self {
        Error::Document(err.to_string())
    }
}
