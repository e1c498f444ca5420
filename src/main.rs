use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use clap::{Parser, Subcommand};

mod detail;
mod models;
mod naming;
mod query;
mod report;
mod store;

use models::{SessionSummary, SettingsModel};
use store::SessionStore;

#[derive(Parser)]
#[command(name = "session-stats")]
#[command(about = "Study session alert log and statistics for FocusWatch", long_about = None)]
struct Cli {
    /// Override the data directory (defaults to the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a completed session to the summary log
    Record {
        #[arg(long)]
        subject: String,
        /// Session date, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Start time, defaults to now
        #[arg(long)]
        start: Option<NaiveTime>,
        /// Duration in minutes, defaults to the configured session length
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        alerts: u32,
    },
    /// Import summaries from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// List per-session alert series for a subject and date
    Query {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        date: NaiveDate,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// List configured subjects
    Subjects,
    /// Write realistic sample session data
    Seed,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let store = match cli.data_dir {
        Some(dir) => SessionStore::with_dir(dir),
        None => SessionStore::new()?,
    };

    match cli.command {
        Commands::Record {
            subject,
            date,
            start,
            duration,
            alerts,
        } => {
            let settings = load_settings_or_empty(&store);
            let now = Local::now();
            let summary = SessionSummary {
                date: date.unwrap_or_else(|| now.date_naive()),
                start_time: start
                    .unwrap_or_else(|| now.time().with_nanosecond(0).unwrap_or_else(|| now.time())),
                subject,
                session_duration_minutes: duration.unwrap_or(settings.session_duration_minutes),
                total_alert_count: alerts,
            };
            store.append_summary(&summary)?;
            println!(
                "Recorded {} session on {} with {} alerts.",
                summary.subject, summary.date, summary.total_alert_count
            );
        }
        Commands::Import { csv } => {
            let inserted = store.import_summaries(&csv)?;
            println!("Inserted {inserted} summaries from {}.", csv.display());
        }
        Commands::Query { subject, date } => {
            let series = query::query_by_combined(&store.detail_dir(), &subject, date)?;
            if series.is_empty() {
                println!("No session data available for selected filters.");
                return Ok(());
            }

            println!("Sessions for {} on {}:", subject, date);
            for entry in series.iter() {
                println!(
                    "- {}: {} samples, peak {:.0} alerts",
                    entry.label,
                    entry.samples.minutes.len(),
                    report::peak_alert_count(entry)
                );
            }
        }
        Commands::Report { subject, date, out } => {
            let summaries = store.load_summaries()?;
            let selected = report::select_summaries(&summaries, &subject, date);
            let series = query::query_by_combined(&store.detail_dir(), &subject, date)?;
            let contents = report::build_report(&subject, date, &selected, &series);
            std::fs::write(&out, contents)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Subjects => {
            let settings = load_settings_or_empty(&store);
            if settings.subjects.is_empty() {
                println!("No subjects configured.");
            } else {
                for subject in settings.subjects.iter() {
                    println!("- {subject}");
                }
            }
        }
        Commands::Seed => {
            seed(&store)?;
            println!("Sample session data written.");
        }
    }

    Ok(())
}

/// Settings problems must never block session work; fall back to an empty
/// subject list and keep going.
fn load_settings_or_empty(store: &SessionStore) -> SettingsModel {
    match store.load_settings() {
        Ok(settings) => settings,
        Err(err) => {
            log::warn!("failed to load settings, continuing without subjects: {err}");
            SettingsModel {
                subjects: Vec::new(),
                ..SettingsModel::default()
            }
        }
    }
}

fn seed(store: &SessionStore) -> anyhow::Result<()> {
    let sessions: Vec<(&str, NaiveDate, NaiveTime, u32, Vec<(f64, f64)>)> = vec![
        (
            "Math",
            NaiveDate::from_ymd_opt(2026, 2, 2).context("invalid date")?,
            NaiveTime::from_hms_opt(9, 30, 0).context("invalid time")?,
            25,
            vec![
                (0.0, 0.0),
                (5.0, 0.0),
                (10.0, 1.0),
                (15.0, 1.0),
                (20.0, 2.0),
                (25.0, 2.0),
            ],
        ),
        (
            "Math",
            NaiveDate::from_ymd_opt(2026, 2, 2).context("invalid date")?,
            NaiveTime::from_hms_opt(19, 0, 0).context("invalid time")?,
            25,
            vec![(0.0, 0.0), (5.0, 1.0), (10.0, 1.0), (15.0, 1.0)],
        ),
        (
            "Science",
            NaiveDate::from_ymd_opt(2026, 2, 3).context("invalid date")?,
            NaiveTime::from_hms_opt(14, 15, 0).context("invalid time")?,
            50,
            vec![
                (0.0, 0.0),
                (10.0, 0.0),
                (20.0, 2.0),
                (30.0, 3.0),
                (40.0, 4.0),
                (50.0, 4.0),
            ],
        ),
    ];

    for (subject, date, start_time, duration, samples) in sessions {
        store.write_detail_file(date, start_time, subject, &samples)?;

        let total_alert_count = samples.last().map(|(_, alerts)| *alerts as u32).unwrap_or(0);
        store.append_summary(&SessionSummary {
            date,
            start_time,
            subject: subject.to_string(),
            session_duration_minutes: duration,
            total_alert_count,
        })?;
    }

    store.save_settings(&SettingsModel::default())?;

    Ok(())
}
