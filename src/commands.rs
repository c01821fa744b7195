use std::path::Path;

use crate::{emit_success, OutputMode};
use kyra::journey::{greeting, Progress};
use kyra::model::EmojiRating;
use kyra::report::{self, ChartFont, DocumentSettings};
use kyra::ui::{self, badge, header, info, metric, section, success, Icons};
use kyra::{AppContext, Outcome};

pub fn run_register(ctx: &AppContext, output_mode: OutputMode, name: &str, email: &str) -> anyhow::Result<bool> {
    if name.trim().is_empty() || email.trim().is_empty() {
        ui::error("Fill in all required fields.");
        return Ok(false);
    }

    let registered = ctx.repository().register(name, email).is_ok();
    if registered {
        if output_mode.is_human() {
            success(&format!("Welcome aboard, {}!", name));
        } else {
            emit_success(output_mode, "register", serde_json::json!({ "name": name, "email": email }))?;
        }
    }
    Ok(registered)
}

pub fn run_log_internship(
    ctx: &AppContext,
    output_mode: OutputMode,
    email: &str,
    company: &str,
    duration: &str,
    feedback: Option<&str>,
    msmes: u32,
) -> anyhow::Result<bool> {
    if email.trim().is_empty() || company.trim().is_empty() || duration.trim().is_empty() {
        ui::error("Fill in all required fields.");
        return Ok(false);
    }

    match ctx.repository().log_internship(email, company, duration, feedback, msmes) {
        Outcome::Ok(id) => {
            if output_mode.is_human() {
                success("Internship logged successfully!");
            } else {
                emit_success(output_mode, "log-internship", serde_json::json!({ "internship_id": id }))?;
            }
            Ok(true)
        }
        Outcome::NotFound | Outcome::StorageError(_) => Ok(false),
    }
}

pub fn run_feedback(
    ctx: &AppContext,
    output_mode: OutputMode,
    email: &str,
    rating: Option<i64>,
    emoji: Option<&str>,
    comments: Option<&str>,
) -> anyhow::Result<bool> {
    let repo = ctx.repository();
    let student = match repo.fetch_student(email) {
        Outcome::Ok(student) => student,
        Outcome::NotFound => {
            ui::warn("Enter a registered email to share feedback.");
            return Ok(false);
        }
        Outcome::StorageError(_) => return Ok(false),
    };

    // Star rating defaults to the middle of the scale.
    let rating = match emoji {
        Some(e) => e.parse::<EmojiRating>()?.rating(),
        None => rating.unwrap_or(3),
    };

    match repo.log_feedback(student.student_id, rating, comments) {
        Outcome::Ok(id) => {
            if output_mode.is_human() {
                success("Thank you for your feedback!");
            } else {
                emit_success(
                    output_mode,
                    "feedback",
                    serde_json::json!({ "feedback_id": id, "rating": rating }),
                )?;
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

pub fn run_progress(
    ctx: &AppContext,
    output_mode: OutputMode,
    settings: &DocumentSettings,
    email: &str,
    chart_path: Option<&Path>,
) -> anyhow::Result<bool> {
    let repo = ctx.repository();
    let student = match repo.fetch_student(email) {
        Outcome::Ok(student) => student,
        Outcome::NotFound => {
            ui::warn(&format!("No student registered with {}", email));
            return Ok(false);
        }
        Outcome::StorageError(_) => return Ok(false),
    };

    let progress = Progress::for_student(&student);
    let chart = match ChartFont::open(&settings.regular_font_path()) {
        Ok(font) => report::render_labelled_chart(&student.internships, &font)?,
        Err(e) => {
            tracing::debug!("Chart labels skipped: {}", e);
            report::render_chart(&student.internships)?
        }
    };
    if let (Some(path), Some(chart)) = (chart_path, &chart) {
        std::fs::write(path, &chart.png)?;
    }

    if !output_mode.is_human() {
        let feedback = repo.fetch_feedback(student.student_id).unwrap_or_default();
        emit_success(
            output_mode,
            "progress",
            serde_json::json!({
                "student": student,
                "progress": progress,
                "feedback": feedback,
                "chart": chart.as_ref().map(|c| c.data_uri()),
            }),
        )?;
        return Ok(true);
    }

    header(&greeting(&student));
    section(&format!("{} Your Progress", Icons::STATS));
    if student.internships.is_empty() {
        info("Internships", "No internships logged yet.");
        return Ok(true);
    }

    info("Internship Completion", &format!("{}%", progress.completion_percent));
    for b in &progress.badges {
        badge(b.icon(), b.label());
    }
    println!("{}", ui::internship_table(&student.internships));
    if let (Some(path), Some(_)) = (chart_path, &chart) {
        info("Chart saved to", &path.display().to_string());
    }
    Ok(true)
}

pub fn run_metrics(ctx: &AppContext, output_mode: OutputMode) -> anyhow::Result<bool> {
    // A failed read has already been reported; show zeros like an empty store.
    let metrics = ctx.repository().fetch_metrics().unwrap_or_default();

    if output_mode.is_human() {
        section(&format!("{} Dashboard", Icons::STAR));
        metric("Internships Completed", metrics.total_internships);
        metric("MSMEs Supported", metrics.total_msmes);
        metric("Certifications Issued", metrics.certifications_issued);
        println!();
        println!("{}", ui::metrics_table(&metrics));
    } else {
        emit_success(output_mode, "metrics", serde_json::to_value(metrics)?)?;
    }
    Ok(true)
}

pub fn run_report(
    ctx: &AppContext,
    output_mode: OutputMode,
    settings: &DocumentSettings,
    output: &Path,
    link: bool,
) -> anyhow::Result<bool> {
    let rows = match ctx.repository().fetch_reports() {
        Outcome::Ok(rows) => rows,
        _ => return Ok(false),
    };

    let Some(pdf) = report::render_document(&rows, settings)? else {
        if output_mode.is_human() {
            info("Report", "No report data available yet.");
        } else {
            emit_success(output_mode, "report", serde_json::json!({ "rows": 0 }))?;
        }
        return Ok(true);
    };

    std::fs::write(output, &pdf)?;
    tracing::info!("Wrote {} bytes to {}", pdf.len(), output.display());

    if output_mode.is_human() {
        section(&format!("{} Generate Report", Icons::FILE));
        println!("{}", ui::report_table(&rows));
        success(&format!("{} Report saved to {}", Icons::DOWNLOAD, output.display()));
        if link {
            println!("{}", report::document::download_link(&pdf));
        }
    } else {
        emit_success(
            output_mode,
            "report",
            serde_json::json!({
                "rows": rows.len(),
                "path": output.display().to_string(),
                "bytes": pdf.len(),
            }),
        )?;
    }
    Ok(true)
}

pub fn run_stats(ctx: &AppContext, output_mode: OutputMode) -> anyhow::Result<bool> {
    let stats = ctx.store().stats()?;
    if output_mode.is_human() {
        let location = ctx
            .database_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string());
        println!("{} Kyra Statistics ({})", Icons::DATABASE, location);
        println!("------------------------------------");
        println!("{}", stats);
    } else {
        emit_success(
            output_mode,
            "stats",
            serde_json::json!({
                "students": stats.students,
                "internships": stats.internships,
                "feedback": stats.feedback,
            }),
        )?;
    }
    Ok(true)
}
