use crate::model::{InternshipSummary, Metrics, ReportRow};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
struct ReportTableRow<'a> {
    #[tabled(rename = "Name")]
    name: &'a str,
    #[tabled(rename = "Email")]
    email: &'a str,
    #[tabled(rename = "Company")]
    company: &'a str,
    #[tabled(rename = "Duration")]
    duration: &'a str,
    #[tabled(rename = "Feedback")]
    feedback: &'a str,
    #[tabled(rename = "MSMEs")]
    msmes: u32,
}

#[derive(Tabled)]
struct InternshipTableRow<'a> {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Company")]
    company: &'a str,
    #[tabled(rename = "Duration")]
    duration: &'a str,
    #[tabled(rename = "Feedback")]
    feedback: &'a str,
    #[tabled(rename = "MSMEs")]
    msmes: u32,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn metrics_table(metrics: &Metrics) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Internships Completed", &metrics.total_internships.to_string());
    builder.add_row("MSMEs Supported", &metrics.total_msmes.to_string());
    builder.add_row("Certifications Issued", &metrics.certifications_issued.to_string());
    builder.build()
}

pub fn report_table(rows: &[ReportRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let rows = rows.iter().map(|r| ReportTableRow {
        name: &r.name,
        email: &r.email,
        company: &r.company_name,
        duration: &r.duration,
        feedback: r.feedback.as_deref().unwrap_or(""),
        msmes: r.msme_digitalized,
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn internship_table(internships: &[InternshipSummary]) -> String {
    if internships.is_empty() {
        return String::new();
    }

    let rows = internships.iter().enumerate().map(|(i, r)| InternshipTableRow {
        index: i + 1,
        company: &r.company_name,
        duration: &r.duration,
        feedback: r.feedback.as_deref().unwrap_or(""),
        msmes: r.msme_digitalized,
    });
    Table::new(rows).with(Style::rounded()).to_string()
}
