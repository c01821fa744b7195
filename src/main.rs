//! Kyra CLI - your internship journey mentor on the command line

mod commands;

use clap::{Parser, Subcommand};
use kyra::config::{self, KyraConfig};
use kyra::AppContext;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "kyra")]
#[command(version)]
#[command(about = "Kyra - track student internships, feedback and impact")]
#[command(long_about = r#"
Kyra guides students through their internship journey:
  • Register: create your profile
  • Log internships: track your experiences
  • Progress: see your growth, badges and charts
  • Feedback: help improve Kyra
  • Report: export every logged internship as a PDF

Example usage:
  kyra register --name "Asha Rao" --email asha@example.com
  kyra log-internship --email asha@example.com --company Acme --duration "3 months" --msmes 2
  kyra progress --email asha@example.com --chart progress.png
  kyra report --output internship_report.pdf
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file (defaults to kyra.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a kyra.toml with the given settings
    Init {
        /// Database path to record in the config
        #[arg(long)]
        db_path: Option<String>,

        /// Directory holding the report fonts
        #[arg(long)]
        fonts_dir: Option<String>,

        /// Font family file prefix, e.g. LiberationSans
        #[arg(long)]
        font_family: Option<String>,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Register a student (re-registering an email is a no-op)
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,
    },

    /// Log an internship for a registered student
    LogInternship {
        /// Student email
        #[arg(short, long)]
        email: String,

        /// Company name
        #[arg(long)]
        company: String,

        /// Duration, e.g. "3 months"
        #[arg(long)]
        duration: String,

        /// Free-text feedback on the internship
        #[arg(short, long)]
        feedback: Option<String>,

        /// Number of MSMEs digitalized
        #[arg(short, long, default_value = "0")]
        msmes: u32,
    },

    /// Share feedback on your experience
    Feedback {
        /// Student email
        #[arg(short, long)]
        email: String,

        /// Star rating, 1-5
        #[arg(short, long, conflicts_with = "emoji")]
        rating: Option<i64>,

        /// Emoji scale instead of stars: 😊/happy, 🙂/neutral, 😔/sad
        #[arg(long)]
        emoji: Option<String>,

        /// Comments
        #[arg(long)]
        comments: Option<String>,
    },

    /// Show a student's progress, badges and internships
    Progress {
        /// Student email
        #[arg(short, long)]
        email: String,

        /// Write the progress chart PNG here
        #[arg(long)]
        chart: Option<PathBuf>,
    },

    /// Show aggregate metrics across all students
    Metrics,

    /// Generate the PDF report of all internships
    Report {
        /// Output PDF path
        #[arg(short, long, default_value = "internship_report.pdf")]
        output: PathBuf,

        /// Also print an HTML download link with the PDF inlined
        #[arg(long)]
        link: bool,
    },

    /// Show database statistics
    Stats,
}

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

/// Print a JSON success envelope for `command`
pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if output_mode == OutputMode::Json {
        let envelope = serde_json::json!({
            "ok": true,
            "command": command,
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);

    if let Commands::Init { db_path, fonts_dir, font_family, force } = &cli.command {
        let new_config = KyraConfig {
            database: db_path.clone(),
            fonts_dir: fonts_dir.clone(),
            font_family: font_family.clone(),
        };
        config::write_config(&config_path, &new_config, *force)?;
        if output_mode.is_human() {
            kyra::ui::success(&format!("Wrote {}", config_path.display()));
        } else {
            emit_success(output_mode, "init", serde_json::json!({ "path": config_path.display().to_string() }))?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let loaded = config::load_config(Some(&config_path))?;
    let database = config::resolve_database_path(cli.database.as_deref(), loaded.as_ref())?;
    config::ensure_db_dir(&database)?;
    let settings = loaded.unwrap_or_default().document_settings();

    // Schema setup failing is fatal; everything after reports and carries on.
    let ctx = AppContext::open(&database)?;

    let succeeded = match &cli.command {
        Commands::Init { .. } => true,
        Commands::Register { name, email } => commands::run_register(&ctx, output_mode, name, email)?,
        Commands::LogInternship { email, company, duration, feedback, msmes } => commands::run_log_internship(
            &ctx,
            output_mode,
            email,
            company,
            duration,
            feedback.as_deref(),
            *msmes,
        )?,
        Commands::Feedback { email, rating, emoji, comments } => commands::run_feedback(
            &ctx,
            output_mode,
            email,
            *rating,
            emoji.as_deref(),
            comments.as_deref(),
        )?,
        Commands::Progress { email, chart } => commands::run_progress(&ctx, output_mode, &settings, email, chart.as_deref())?,
        Commands::Metrics => commands::run_metrics(&ctx, output_mode)?,
        Commands::Report { output, link } => commands::run_report(&ctx, output_mode, &settings, output, *link)?,
        Commands::Stats => commands::run_stats(&ctx, output_mode)?,
    };

    ctx.close()?;

    Ok(if succeeded { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
