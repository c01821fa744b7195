//! Repository - the operation boundary used by front ends
//!
//! Wraps `SqliteStore` and applies the error policy: any engine failure is
//! logged, handed to the `Reporter` as a user-facing message and turned
//! into a benign `Outcome`. Nothing here panics or propagates an error.

use crate::model::{Feedback, Metrics, NewInternship, ReportRow, StudentView};
use crate::storage::SqliteStore;
use crate::{output, ui, Error};

/// Result of a repository operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation succeeded
    Ok(T),
    /// A referenced student could not be resolved
    NotFound,
    /// The storage engine failed; carries the engine's message
    StorageError(String),
}

impl<T> Outcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::NotFound)
    }

    pub fn is_storage_error(&self) -> bool {
        matches!(self, Outcome::StorageError(_))
    }

    /// Convert into an `Option`, discarding the failure kind
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::StorageError(detail) => Outcome::StorageError(detail),
        }
    }

    /// The value, or `T::default()` for either failure kind
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.ok().unwrap_or_default()
    }
}

/// Receives user-facing failure messages.
pub trait Reporter {
    fn report_error(&self, message: &str);
}

/// Prints failures to stderr through the themed console output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report_error(&self, message: &str) {
        if !output::is_quiet() {
            ui::error(message);
        }
    }
}

/// Repository over a borrowed store
pub struct Repository<'a> {
    store: &'a SqliteStore,
    reporter: &'a dyn Reporter,
}

impl<'a> Repository<'a> {
    /// Create a new repository
    pub fn new(store: &'a SqliteStore, reporter: &'a dyn Reporter) -> Self {
        Self { store, reporter }
    }

    /// Register a student. An already-registered email is a successful no-op.
    pub fn register(&self, name: &str, email: &str) -> Outcome<()> {
        match self.store.insert_student(name, email) {
            Ok(inserted) => {
                tracing::debug!(email, inserted, "register");
                Outcome::Ok(())
            }
            Err(e) => self.storage_failure("Error registering student", e),
        }
    }

    /// Log an internship for the student registered under `email`.
    ///
    /// Returns the new internship id.
    pub fn log_internship(
        &self,
        email: &str,
        company: &str,
        duration: &str,
        feedback_note: Option<&str>,
        msme_digitalized: u32,
    ) -> Outcome<i64> {
        let mut internship = NewInternship::new(company, duration).with_msme_digitalized(msme_digitalized);
        internship.feedback = feedback_note.map(str::to_string);

        match self.store.log_internship(email, &internship) {
            Ok(Some(id)) => {
                tracing::debug!(email, internship_id = id, "log_internship");
                Outcome::Ok(id)
            }
            Ok(None) => {
                tracing::warn!(email, "log_internship: student not found");
                self.reporter.report_error("Student email not found.");
                Outcome::NotFound
            }
            Err(e) => self.storage_failure("Error logging internship", e),
        }
    }

    /// Store a feedback entry for an already-resolved student id.
    ///
    /// Returns the new feedback id.
    pub fn log_feedback(&self, student_id: i64, rating: i64, comments: Option<&str>) -> Outcome<i64> {
        match self.store.insert_feedback(student_id, rating, comments) {
            Ok(id) => {
                tracing::debug!(student_id, rating, feedback_id = id, "log_feedback");
                Outcome::Ok(id)
            }
            Err(e) => self.storage_failure("Error logging feedback", e),
        }
    }

    /// Look up a student and their internships by email
    pub fn fetch_student(&self, email: &str) -> Outcome<StudentView> {
        match self.store.student_view(email) {
            Ok(Some(view)) => Outcome::Ok(view),
            Ok(None) => Outcome::NotFound,
            Err(e) => self.storage_failure("Error fetching student data", e),
        }
    }

    /// Feedback entries of a student, unmodified
    pub fn fetch_feedback(&self, student_id: i64) -> Outcome<Vec<Feedback>> {
        match self.store.feedback_for_student(student_id) {
            Ok(entries) => Outcome::Ok(entries),
            Err(e) => self.storage_failure("Error fetching feedback", e),
        }
    }

    /// All internships joined with their students
    pub fn fetch_reports(&self) -> Outcome<Vec<ReportRow>> {
        match self.store.report_rows() {
            Ok(rows) => Outcome::Ok(rows),
            Err(e) => self.storage_failure("Error fetching reports", e),
        }
    }

    /// Aggregate metrics over all internships
    pub fn fetch_metrics(&self) -> Outcome<Metrics> {
        match self.store.metrics() {
            Ok(metrics) => Outcome::Ok(metrics),
            Err(e) => self.storage_failure("Error fetching metrics", e),
        }
    }

    fn storage_failure<T>(&self, context: &str, err: Error) -> Outcome<T> {
        let detail = match &err {
            Error::Storage(inner) => inner.to_string(),
            other => other.to_string(),
        };
        tracing::error!("{}: {}", context, detail);
        self.reporter.report_error(&format!("{}: {}", context, detail));
        Outcome::StorageError(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingReporter {
        messages: RefCell<Vec<String>>,
    }

    impl Reporter for RecordingReporter {
        fn report_error(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    #[test]
    fn test_register_twice_keeps_one_student() {
        let store = SqliteStore::open_in_memory().unwrap();
        let reporter = RecordingReporter::default();
        let repo = Repository::new(&store, &reporter);

        assert!(repo.register("Asha", "a@x.com").is_ok());
        assert!(repo.register("Asha", "a@x.com").is_ok());

        assert_eq!(store.count_students().unwrap(), 1);
        assert!(reporter.messages.borrow().is_empty());
    }

    #[test]
    fn test_log_internship_unregistered_email() {
        let store = SqliteStore::open_in_memory().unwrap();
        let reporter = RecordingReporter::default();
        let repo = Repository::new(&store, &reporter);

        let outcome = repo.log_internship("ghost@x.com", "Acme", "3 months", Some("ok"), 2);

        assert_eq!(outcome, Outcome::NotFound);
        assert_eq!(store.count_internships().unwrap(), 0);
        assert_eq!(reporter.messages.borrow().as_slice(), ["Student email not found."]);
    }

    #[test]
    fn test_log_then_fetch_student() {
        let store = SqliteStore::open_in_memory().unwrap();
        let reporter = RecordingReporter::default();
        let repo = Repository::new(&store, &reporter);
        repo.register("Asha", "a@x.com");

        assert!(repo.log_internship("a@x.com", "Acme", "3 months", Some("ok"), 2).is_ok());

        let view = repo.fetch_student("a@x.com").ok().unwrap();
        assert_eq!(view.name, "Asha");
        assert_eq!(view.internships.len(), 1);
        let entry = &view.internships[0];
        assert_eq!(
            (entry.company_name.as_str(), entry.duration.as_str(), entry.feedback.as_deref(), entry.msme_digitalized),
            ("Acme", "3 months", Some("ok"), 2)
        );
    }

    #[test]
    fn test_fetch_student_not_found_is_silent() {
        let store = SqliteStore::open_in_memory().unwrap();
        let reporter = RecordingReporter::default();
        let repo = Repository::new(&store, &reporter);

        assert!(repo.fetch_student("nobody@x.com").is_not_found());
        assert!(reporter.messages.borrow().is_empty());
    }

    #[test]
    fn test_metrics_on_empty_store() {
        let store = SqliteStore::open_in_memory().unwrap();
        let reporter = RecordingReporter::default();
        let repo = Repository::new(&store, &reporter);

        let metrics = repo.fetch_metrics().ok().unwrap();
        assert_eq!(
            metrics,
            Metrics { total_internships: 0, total_msmes: 0, certifications_issued: 0 }
        );
        assert!(repo.fetch_reports().ok().unwrap().is_empty());
    }

    #[test]
    fn test_metrics_count_distinct_students() {
        let store = SqliteStore::open_in_memory().unwrap();
        let reporter = RecordingReporter::default();
        let repo = Repository::new(&store, &reporter);
        repo.register("Asha", "a@x.com");
        repo.register("Ben", "b@x.com");
        repo.log_internship("a@x.com", "Acme", "3 months", None, 3);
        repo.log_internship("a@x.com", "Bolt", "2 months", None, 4);
        repo.log_internship("b@x.com", "Acme", "1 month", None, 5);

        let metrics = repo.fetch_metrics().ok().unwrap();
        assert_eq!(metrics.total_internships, 3);
        assert_eq!(metrics.total_msmes, 12);
        assert_eq!(metrics.certifications_issued, 2);
    }

    #[test]
    fn test_log_feedback_stored_unmodified() {
        let store = SqliteStore::open_in_memory().unwrap();
        let reporter = RecordingReporter::default();
        let repo = Repository::new(&store, &reporter);

        // Neither the student id nor the rating range is validated.
        let id = repo.log_feedback(999, 11, Some("Great mentor!\nThanks")).ok().unwrap();

        let stored = store.get_feedback(id).unwrap().unwrap();
        assert_eq!(stored.student_id, 999);
        assert_eq!(stored.rating, 11);
        assert_eq!(stored.comments.as_deref(), Some("Great mentor!\nThanks"));

        let entries = repo.fetch_feedback(999).ok().unwrap();
        assert_eq!(entries, vec![stored]);
    }

    #[test]
    fn test_storage_errors_become_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracking.db");
        let store = SqliteStore::open(&path).unwrap();
        let reporter = RecordingReporter::default();
        let repo = Repository::new(&store, &reporter);
        repo.register("Asha", "a@x.com");

        let other = rusqlite::Connection::open(&path).unwrap();
        other.execute("DROP TABLE internships", []).unwrap();
        drop(other);

        assert!(repo.fetch_reports().is_storage_error());
        assert!(repo.fetch_metrics().is_storage_error());
        assert_eq!(repo.fetch_metrics().unwrap_or_default(), Metrics::default());
        assert!(repo.log_internship("a@x.com", "Acme", "3 months", None, 1).is_storage_error());

        let messages = reporter.messages.borrow();
        assert!(messages[0].starts_with("Error fetching reports: "));
        assert!(messages[1].starts_with("Error fetching metrics: "));
        assert!(messages.iter().any(|m| m.starts_with("Error logging internship: ")));
    }
}
