//! Database schema definitions

/// SQL to create the students table
pub const CREATE_STUDENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    student_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL
)
"#;

/// SQL to create the internships table
pub const CREATE_INTERNSHIPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS internships (
    internship_id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER,
    company_name TEXT NOT NULL,
    duration TEXT NOT NULL,
    feedback TEXT,
    msme_digitalized INTEGER DEFAULT 0,
    FOREIGN KEY (student_id) REFERENCES students (student_id)
)
"#;

/// SQL to create the feedback table
pub const CREATE_FEEDBACK_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS feedback (
    feedback_id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER,
    rating INTEGER,
    comments TEXT,
    FOREIGN KEY (student_id) REFERENCES students (student_id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_internships_student ON internships(student_id)",
    "CREATE INDEX IF NOT EXISTS idx_feedback_student ON feedback(student_id)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_STUDENTS_TABLE,
        CREATE_INTERNSHIPS_TABLE,
        CREATE_FEEDBACK_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
