//! Output helpers for the `honkytonk` command.

use clap::ValueEnum;
use honkytonk_core::models::{Channel, SyncJobKind, SyncRun, SyncStatus};
use honkytonk_sync::SyncError;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Which jobs `honkytonk sync` runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SyncTarget {
    Videos,
    Chart,
    Top30,
    News,
    All,
}

impl SyncTarget {
    pub fn kinds(&self) -> Vec<SyncJobKind> {
        match self {
            SyncTarget::Videos => vec![SyncJobKind::Videos],
            SyncTarget::Chart => vec![SyncJobKind::Chart],
            SyncTarget::Top30 => vec![SyncJobKind::Top30],
            SyncTarget::News => vec![SyncJobKind::News],
            SyncTarget::All => SyncJobKind::ALL.to_vec(),
        }
    }
}

/// One job's result as printed by `honkytonk sync`.
#[derive(Debug, Serialize)]
pub struct SyncOutcome {
    pub job: SyncJobKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<SyncRun>,
    /// Set when the job could not start (e.g. already running)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncOutcome {
    pub fn new(job: SyncJobKind, result: Result<SyncRun, SyncError>) -> Self {
        match result {
            Ok(run) => Self {
                job,
                run: Some(run),
                error: None,
            },
            Err(e) => Self {
                job,
                run: None,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn failed(&self) -> bool {
        match &self.run {
            Some(run) => run.status == SyncStatus::Failed,
            None => true,
        }
    }
}

/// Truncate to `max_chars` characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn run_row(job: &str, run: Option<&SyncRun>, error: Option<&str>) -> String {
    match run {
        Some(run) => format!(
            "{:<8} {:<8} {:>8} {:>9} {:>8}  {:<20} {}",
            job,
            run.status.as_str(),
            run.items_fetched,
            run.items_inserted,
            run.items_skipped,
            run.finished_at.format("%Y-%m-%d %H:%M:%S"),
            truncate_string(run.error.as_deref().unwrap_or(""), 60),
        ),
        None => format!(
            "{:<8} {:<8} {:>8} {:>9} {:>8}  {:<20} {}",
            job,
            "-",
            "-",
            "-",
            "-",
            "-",
            truncate_string(error.unwrap_or("never run"), 60),
        ),
    }
}

fn run_header() -> String {
    format!(
        "{:<8} {:<8} {:>8} {:>9} {:>8}  {:<20} {}\n{}",
        "JOB",
        "STATUS",
        "FETCHED",
        "INSERTED",
        "SKIPPED",
        "FINISHED (UTC)",
        "ERROR",
        "-".repeat(100)
    )
}

pub fn sync_outcomes_table(outcomes: &[SyncOutcome]) -> String {
    let mut lines = vec![run_header()];
    for outcome in outcomes {
        lines.push(run_row(
            outcome.job.as_str(),
            outcome.run.as_ref(),
            outcome.error.as_deref(),
        ));
    }
    lines.join("\n")
}

/// Latest run per job, with a placeholder row for jobs that never ran.
pub fn status_table(latest: &[SyncRun]) -> String {
    let mut lines = vec![run_header()];
    for kind in SyncJobKind::ALL {
        let run = latest.iter().find(|r| r.job == kind);
        lines.push(run_row(kind.as_str(), run, None));
    }
    lines.join("\n")
}

pub fn channels_table(channels: &[Channel]) -> String {
    if channels.is_empty() {
        return "No channels registered.".to_string();
    }

    let mut lines = vec![
        format!(
            "{:<24} {:<30} {:<20} {:<8} {}",
            "CHANNEL ID", "NAME", "HANDLE", "CATEGORY", "ACTIVE"
        ),
        "-".repeat(92),
    ];
    for channel in channels {
        lines.push(format!(
            "{:<24} {:<30} {:<20} {:<8} {}",
            channel.channel_id,
            truncate_string(&channel.name, 30),
            truncate_string(channel.handle.as_deref().unwrap_or("-"), 20),
            channel.category.as_str(),
            if channel.is_active { "yes" } else { "no" },
        ));
    }
    lines.join("\n")
}

/// Logs go to stderr so `--format json` output stays parseable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("honkytonk=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
