//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params, OptionalExtension};
use crate::Result;
use crate::model::{Feedback, InternshipSummary, Metrics, NewInternship, ReportRow, Student, StudentView};
use super::schema;

/// SQLite-backed storage for students, internships and feedback.
///
/// Every public operation runs as its own unit of work: writes open a
/// transaction on the shared handle and commit before returning, so no
/// call depends on state left behind by a previous one.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        tracing::debug!("Opened tracking database at {}", path.display());
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema. Safe to run on every start.
    pub fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Close the underlying connection, surfacing any error from the engine
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }

    // ========== Student Operations ==========

    /// Insert a student unless the email is already registered.
    ///
    /// Returns `true` when a new row was created.
    pub fn insert_student(&self, name: &str, email: &str) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO students (name, email) VALUES (?1, ?2)",
            params![name, email],
        )?;
        tx.commit()?;
        Ok(inserted > 0)
    }

    /// Get a student by email
    pub fn find_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        find_student(&self.conn, email).map_err(Into::into)
    }

    /// Count all students
    pub fn count_students(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Resolve a student and their internships in one read.
    pub fn student_view(&self, email: &str) -> Result<Option<StudentView>> {
        let tx = self.conn.unchecked_transaction()?;
        let Some(student) = find_student(&tx, email)? else {
            return Ok(None);
        };
        let internships = internships_for(&tx, student.student_id)?;
        tx.commit()?;

        Ok(Some(StudentView {
            student_id: student.student_id,
            name: student.name,
            email: student.email,
            internships,
        }))
    }

    // ========== Internship Operations ==========

    /// Resolve `email` and insert an internship for that student.
    ///
    /// Returns the new internship id, or `None` if no student has that
    /// email. Lookup and insert share one transaction.
    pub fn log_internship(&self, email: &str, internship: &NewInternship) -> Result<Option<i64>> {
        let tx = self.conn.unchecked_transaction()?;
        let Some(student) = find_student(&tx, email)? else {
            return Ok(None);
        };
        let id = insert_internship(&tx, student.student_id, internship)?;
        tx.commit()?;
        Ok(Some(id))
    }

    /// Count all internships
    pub fn count_internships(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM internships", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Feedback Operations ==========

    /// Insert a feedback entry exactly as given.
    ///
    /// Neither the student id nor the rating range is checked.
    pub fn insert_feedback(&self, student_id: i64, rating: i64, comments: Option<&str>) -> Result<i64> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO feedback (student_id, rating, comments) VALUES (?1, ?2, ?3)",
            params![student_id, rating, comments],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    /// Get a feedback entry by id
    pub fn get_feedback(&self, feedback_id: i64) -> Result<Option<Feedback>> {
        self.conn
            .query_row(
                "SELECT feedback_id, student_id, rating, comments FROM feedback WHERE feedback_id = ?1",
                [feedback_id],
                |row| self.row_to_feedback(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// All feedback left by a student, oldest first
    pub fn feedback_for_student(&self, student_id: i64) -> Result<Vec<Feedback>> {
        let mut stmt = self.conn.prepare(
            "SELECT feedback_id, student_id, rating, comments FROM feedback WHERE student_id = ?1 ORDER BY feedback_id"
        )?;

        let entries = stmt
            .query_map([student_id], |row| self.row_to_feedback(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }

    /// Count all feedback entries
    pub fn count_feedback(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Helper to convert a row to Feedback
    fn row_to_feedback(&self, row: &rusqlite::Row) -> rusqlite::Result<Feedback> {
        Ok(Feedback {
            feedback_id: row.get(0)?,
            student_id: row.get(1)?,
            rating: row.get(2)?,
            comments: row.get(3)?,
        })
    }

    // ========== Reporting ==========

    /// Every internship joined with its student.
    ///
    /// Ordered by student, then internship insertion, so exported
    /// reports are reproducible.
    pub fn report_rows(&self) -> Result<Vec<ReportRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT s.name, s.email, i.company_name, i.duration, i.feedback, i.msme_digitalized
            FROM students s
            JOIN internships i ON s.student_id = i.student_id
            ORDER BY s.student_id, i.internship_id
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                let msme: Option<u32> = row.get(5)?;
                Ok(ReportRow {
                    name: row.get(0)?,
                    email: row.get(1)?,
                    company_name: row.get(2)?,
                    duration: row.get(3)?,
                    feedback: row.get(4)?,
                    msme_digitalized: msme.unwrap_or(0),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    /// Aggregate metrics computed in a single read
    pub fn metrics(&self) -> Result<Metrics> {
        let (total, msmes, students): (i64, i64, i64) = self.conn.query_row(
            r#"
            SELECT COUNT(*), COALESCE(SUM(msme_digitalized), 0), COUNT(DISTINCT student_id)
            FROM internships
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(Metrics {
            total_internships: total as u64,
            total_msmes: msmes as u64,
            certifications_issued: students as u64,
        })
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            students: self.count_students()?,
            internships: self.count_internships()?,
            feedback: self.count_feedback()?,
        })
    }
}

fn find_student(conn: &Connection, email: &str) -> rusqlite::Result<Option<Student>> {
    conn.query_row(
        "SELECT student_id, name, email FROM students WHERE email = ?1",
        [email],
        |row| {
            Ok(Student {
                student_id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
            })
        },
    )
    .optional()
}

fn insert_internship(conn: &Connection, student_id: i64, internship: &NewInternship) -> rusqlite::Result<i64> {
    conn.execute(
        r#"
        INSERT INTO internships (student_id, company_name, duration, feedback, msme_digitalized)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            student_id,
            internship.company_name,
            internship.duration,
            internship.feedback,
            internship.msme_digitalized,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn internships_for(conn: &Connection, student_id: i64) -> rusqlite::Result<Vec<InternshipSummary>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT company_name, duration, feedback, msme_digitalized
        FROM internships WHERE student_id = ?1
        ORDER BY internship_id
        "#,
    )?;

    let internships = stmt
        .query_map([student_id], |row| {
            let msme: Option<u32> = row.get(3)?;
            Ok(InternshipSummary {
                company_name: row.get(0)?,
                duration: row.get(1)?,
                feedback: row.get(2)?,
                msme_digitalized: msme.unwrap_or(0),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(internships)
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DbStats {
    pub students: usize,
    pub internships: usize,
    pub feedback: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Students: {}", self.students)?;
        writeln!(f, "  Internships: {}", self.internships)?;
        writeln!(f, "  Feedback: {}", self.feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> NewInternship {
        NewInternship::new("Acme", "3 months")
            .with_feedback("ok")
            .with_msme_digitalized(2)
    }

    #[test]
    fn test_schema_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert_student("Asha", "a@x.com").unwrap();

        store.initialize_schema().unwrap();
        store.initialize_schema().unwrap();

        assert_eq!(store.count_students().unwrap(), 1);
    }

    #[test]
    fn test_insert_student_ignores_duplicate_email() {
        let store = SqliteStore::open_in_memory().unwrap();

        assert!(store.insert_student("Asha", "a@x.com").unwrap());
        assert!(!store.insert_student("Someone Else", "a@x.com").unwrap());

        assert_eq!(store.count_students().unwrap(), 1);
        let student = store.find_student_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(student.name, "Asha");
    }

    #[test]
    fn test_ids_are_never_reused() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert_student("Asha", "a@x.com").unwrap();
        let first = store.find_student_by_email("a@x.com").unwrap().unwrap();

        store.conn.execute("DELETE FROM students", []).unwrap();
        store.insert_student("Ben", "b@x.com").unwrap();
        let second = store.find_student_by_email("b@x.com").unwrap().unwrap();

        assert!(second.student_id > first.student_id);
    }

    #[test]
    fn test_log_internship_unknown_email_writes_nothing() {
        let store = SqliteStore::open_in_memory().unwrap();

        let result = store.log_internship("ghost@x.com", &acme()).unwrap();

        assert!(result.is_none());
        assert_eq!(store.count_internships().unwrap(), 0);
    }

    #[test]
    fn test_student_view_keeps_insertion_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert_student("Asha", "a@x.com").unwrap();
        store.log_internship("a@x.com", &acme()).unwrap().unwrap();
        store
            .log_internship("a@x.com", &NewInternship::new("Bolt", "6 weeks").with_msme_digitalized(7))
            .unwrap()
            .unwrap();

        let view = store.student_view("a@x.com").unwrap().unwrap();
        let companies: Vec<_> = view.internships.iter().map(|i| i.company_name.as_str()).collect();
        assert_eq!(companies, vec!["Acme", "Bolt"]);
        assert_eq!(view.internships[1].feedback, None);
        assert_eq!(view.total_msmes(), 9);
    }

    #[test]
    fn test_student_view_missing() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.student_view("nobody@x.com").unwrap().is_none());
    }

    #[test]
    fn test_feedback_crud() {
        let store = SqliteStore::open_in_memory().unwrap();

        let id = store.insert_feedback(42, 9, Some("  spaced  ")).unwrap();

        let stored = store.get_feedback(id).unwrap().unwrap();
        assert_eq!(stored.student_id, 42);
        assert_eq!(stored.rating, 9);
        assert_eq!(stored.comments.as_deref(), Some("  spaced  "));
        assert_eq!(store.feedback_for_student(42).unwrap().len(), 1);
    }

    #[test]
    fn test_metrics_and_report_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert_student("Asha", "a@x.com").unwrap();
        store.insert_student("Ben", "b@x.com").unwrap();
        store.log_internship("b@x.com", &NewInternship::new("Bolt", "1 month").with_msme_digitalized(5)).unwrap();
        store.log_internship("a@x.com", &acme()).unwrap();

        let metrics = store.metrics().unwrap();
        assert_eq!(metrics.total_internships, 2);
        assert_eq!(metrics.total_msmes, 7);
        assert_eq!(metrics.certifications_issued, 2);

        let rows = store.report_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].email, "a@x.com");
        assert_eq!(rows[1].company_name, "Bolt");

        let stats = store.stats().unwrap();
        assert_eq!(stats.students, 2);
        assert_eq!(stats.internships, 2);
        assert_eq!(stats.feedback, 0);
    }
}
