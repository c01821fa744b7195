//! Record types for the tracker
//!
//! Three stored entities, all keyed by engine-assigned integer ids:
//! - `Student`: a registered individual, unique by email
//! - `Internship`: one logged work engagement belonging to a student
//! - `Feedback`: one rating/comment submission belonging to a student
//!
//! Plus the read-side views handed to the front end: `StudentView`,
//! `InternshipSummary`, `ReportRow` and `Metrics`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A registered student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Engine-assigned identifier, stable for the student's lifetime
    pub student_id: i64,
    /// Display name
    pub name: String,
    /// Natural key; unique across all students
    pub email: String,
}

/// Input for logging an internship, before the owning student is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInternship {
    pub company_name: String,
    /// Free text, e.g. "3 months"
    pub duration: String,
    pub feedback: Option<String>,
    /// Number of small businesses brought online during the internship
    pub msme_digitalized: u32,
}

impl NewInternship {
    /// Create an internship entry with no feedback note and a zero count
    pub fn new(company_name: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            duration: duration.into(),
            feedback: None,
            msme_digitalized: 0,
        }
    }

    /// Set the feedback note
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    /// Set the digitalized count
    pub fn with_msme_digitalized(mut self, count: u32) -> Self {
        self.msme_digitalized = count;
        self
    }
}

/// An internship as shown on a student's progress view.
///
/// Identifier and owning-student columns are deliberately not part of
/// the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternshipSummary {
    pub company_name: String,
    pub duration: String,
    pub feedback: Option<String>,
    pub msme_digitalized: u32,
}

/// A student together with their internships in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentView {
    pub student_id: i64,
    pub name: String,
    pub email: String,
    pub internships: Vec<InternshipSummary>,
}

impl StudentView {
    /// Total small businesses digitalized across all of the student's internships
    pub fn total_msmes(&self) -> u64 {
        self.internships.iter().map(|i| u64::from(i.msme_digitalized)).sum()
    }
}

/// A stored feedback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback_id: i64,
    pub student_id: i64,
    /// Expected 1-5 but stored as given
    pub rating: i64,
    pub comments: Option<String>,
}

/// One internship joined with its owning student's name and email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub name: String,
    pub email: String,
    pub company_name: String,
    pub duration: String,
    pub feedback: Option<String>,
    pub msme_digitalized: u32,
}

impl ReportRow {
    /// The single text line this row occupies in the exported report
    pub fn report_line(&self) -> String {
        format!(
            "Name: {}, Email: {}, Company: {}, Duration: {}, Feedback: {}, MSMEs Digitalized: {}",
            self.name,
            self.email,
            self.company_name,
            self.duration,
            self.feedback.as_deref().unwrap_or(""),
            self.msme_digitalized,
        )
    }
}

/// Aggregates over the internships table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_internships: u64,
    /// Sum of digitalized counts; zero when there are no internships
    pub total_msmes: u64,
    /// Distinct students with at least one internship
    pub certifications_issued: u64,
}

impl std::fmt::Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Internships Completed: {}", self.total_internships)?;
        writeln!(f, "MSMEs Supported: {}", self.total_msmes)?;
        write!(f, "Certifications Issued: {}", self.certifications_issued)
    }
}

/// Emoji scale offered as an alternative to a star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmojiRating {
    Happy,
    Neutral,
    Sad,
}

impl EmojiRating {
    /// The numeric rating stored for this emoji
    pub fn rating(&self) -> i64 {
        match self {
            EmojiRating::Happy => 5,
            EmojiRating::Neutral => 3,
            EmojiRating::Sad => 1,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            EmojiRating::Happy => "😊",
            EmojiRating::Neutral => "🙂",
            EmojiRating::Sad => "😔",
        }
    }

    pub fn all() -> &'static [EmojiRating] {
        &[EmojiRating::Happy, EmojiRating::Neutral, EmojiRating::Sad]
    }
}

impl FromStr for EmojiRating {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "😊" | "happy" => Ok(EmojiRating::Happy),
            "🙂" | "neutral" | "ok" => Ok(EmojiRating::Neutral),
            "😔" | "sad" => Ok(EmojiRating::Sad),
            _ => Err(Error::InvalidRating(format!("Unknown emoji rating: {}", s))),
        }
    }
}

impl std::fmt::Display for EmojiRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.emoji())
    }
}
