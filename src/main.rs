use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::{AggregationConfig, PairKeying, Recency, UpcomingOrder};
use crate::error::RecordError;
use crate::matching::MatchReview;
use crate::models::MeetingRecord;
use crate::sessions::SessionView;

mod aggregate;
mod config;
mod db;
mod error;
mod loader;
mod matching;
mod models;
mod notifications;
mod report;
mod risk;
mod sessions;
#[cfg(test)]
mod test_support;

#[derive(Parser)]
#[command(name = "mentorship-metrics")]
#[command(about = "Engagement metrics for a mentorship programme", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("source")
        .args(["from_json", "from_csv"])
        .multiple(false)
))]
struct SourceArgs {
    /// Read meetings from a JSON export instead of Postgres
    #[arg(long)]
    from_json: Option<PathBuf>,
    /// Read meetings from a CSV export instead of Postgres
    #[arg(long)]
    from_csv: Option<PathBuf>,
    /// Give up on the database fetch after this many seconds
    #[arg(long, default_value_t = config::DEFAULT_FETCH_TIMEOUT.as_secs())]
    fetch_timeout_secs: u64,
}

#[derive(Args)]
struct AggregateArgs {
    /// Reference date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    now: Option<NaiveDate>,
    /// Identify pairs by display name instead of profile id
    #[arg(long)]
    key_by_name: bool,
    /// Sort upcoming sessions soonest first before truncating
    #[arg(long)]
    soonest_first: bool,
    /// Derive mentor last-active and status from session history
    #[arg(long)]
    computed_recency: bool,
    #[arg(long, default_value_t = config::DEFAULT_UPCOMING_LIMIT)]
    upcoming: usize,
    /// Days without a session before a pair counts as at risk
    #[arg(
        long,
        default_value_t = config::DEFAULT_AT_RISK_WINDOW_DAYS,
        value_parser = clap::value_parser!(i64).range(1..=config::MAX_AT_RISK_WINDOW_DAYS)
    )]
    at_risk_days: i64,
}

impl AggregateArgs {
    fn config(&self) -> AggregationConfig {
        AggregationConfig {
            pair_keying: if self.key_by_name {
                PairKeying::DisplayName
            } else {
                PairKeying::Identity
            },
            upcoming_order: if self.soonest_first {
                UpcomingOrder::Soonest
            } else {
                UpcomingOrder::Input
            },
            recency: if self.computed_recency {
                Recency::Computed
            } else {
                Recency::Fixed
            },
            upcoming_limit: self.upcoming,
            at_risk_window_days: self.at_risk_days,
            ..AggregationConfig::default()
        }
    }

    fn now(&self) -> NaiveDate {
        self.now.unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Upcoming,
    Past,
}

impl From<ViewArg> for SessionView {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Upcoming => SessionView::Upcoming,
            ViewArg::Past => SessionView::Past,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load sample profiles and meetings
    Seed,
    /// Import meetings from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print headline metrics and upcoming sessions
    Metrics {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        aggregation: AggregateArgs,
        /// Print the full aggregate as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        aggregation: AggregateArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// List one mentor's or mentee's sessions
    Sessions {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        person: Uuid,
        #[arg(long, value_enum, default_value = "upcoming")]
        view: ViewArg,
        /// Reference date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        now: Option<NaiveDate>,
    },
    /// List notifications, undated ones first
    Notifications {
        /// Read notifications from a JSON export instead of Postgres
        #[arg(long)]
        from_json: Option<PathBuf>,
        /// Only show notifications addressed to this profile (plus broadcasts)
        #[arg(long)]
        person: Option<Uuid>,
        #[arg(long, default_value_t = config::DEFAULT_FETCH_TIMEOUT.as_secs())]
        fetch_timeout_secs: u64,
    },
    /// Review the proposed mentor/mentee matches
    #[command(group(
        ArgGroup::new("decision")
            .args(["approve", "approve_all"])
            .multiple(false)
    ))]
    Matches {
        #[arg(long)]
        approve: Option<String>,
        #[arg(long)]
        approve_all: bool,
        /// Print the proposals as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::InitDb => {
            let pool = connect().await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect().await?;
            let inserted = db::seed(&pool).await?;
            println!("Seed data inserted ({inserted} new meetings).");
        }
        Commands::Import { csv } => {
            let (records, rejected) = loader::parse_records(loader::read_csv(&csv)?);
            let pool = connect().await?;
            let inserted = db::import_records(&pool, &records).await?;
            println!(
                "Inserted {inserted} meetings from {} ({} rows skipped).",
                csv.display(),
                rejected.len()
            );
        }
        Commands::Metrics {
            source,
            aggregation,
            json,
        } => {
            let (records, rejected) = load_records(&source).await?;
            let metrics = aggregate::aggregate(&records, aggregation.now(), &aggregation.config());

            if json {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                print!("{}", report::render_summary(&metrics));
                if !rejected.is_empty() {
                    println!("{} malformed rows were skipped.", rejected.len());
                }
            }
        }
        Commands::Report {
            source,
            aggregation,
            out,
        } => {
            let (records, rejected) = load_records(&source).await?;
            let now = aggregation.now();
            let metrics = aggregate::aggregate(&records, now, &aggregation.config());
            let report = report::build_report(&source_label(&source), now, &metrics, rejected.len());
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Sessions {
            source,
            person,
            view,
            now,
        } => {
            let (records, _) = load_records(&source).await?;
            let today = now.unwrap_or_else(|| chrono::Local::now().date_naive());
            let mine = sessions::sessions_for(&records, person);
            let shown = sessions::filter_view(&mine, today, view.into());

            if shown.is_empty() {
                println!("No sessions found for this view.");
                return Ok(());
            }

            for meeting in shown {
                println!(
                    "- {} at {}: {} <-> {} ({})",
                    sessions::format_date(meeting.session_date),
                    sessions::format_time(meeting.session_time),
                    meeting.mentor_name().unwrap_or("(unassigned)"),
                    meeting.mentee_name().unwrap_or("(unassigned)"),
                    meeting.topics
                );
            }

            let per_mentee = aggregate::sessions_per_mentee(&mine);
            let mut roster: Vec<_> = per_mentee.into_iter().collect();
            roster.sort();
            println!();
            println!("Sessions per mentee:");
            for (name, count) in roster {
                println!("- {name}: {count}");
            }
        }
        Commands::Notifications {
            from_json,
            person,
            fetch_timeout_secs,
        } => {
            let mut shown = match from_json {
                Some(path) => notifications::for_recipient(notifications::read_json(&path)?, person),
                None => {
                    let pool = connect().await?;
                    let timeout = Duration::from_secs(fetch_timeout_secs);
                    tokio::time::timeout(timeout, db::fetch_notifications(&pool, person))
                        .await
                        .map_err(|_| {
                            anyhow::anyhow!("notification fetch timed out after {}s", timeout.as_secs())
                        })??
                }
            };
            notifications::sort_for_display(&mut shown);
            print!("{}", notifications::render(&shown));
        }
        Commands::Matches {
            approve,
            approve_all,
            json,
        } => {
            let mut review = MatchReview::generate();
            if let Some(id) = approve {
                review.approve(&id)?;
            } else if approve_all {
                review.approve_all();
            }

            if json {
                println!("{}", serde_json::to_string_pretty(review.proposals())?);
                return Ok(());
            }

            for proposal in review.proposals() {
                println!(
                    "- {} {} -> {} score {:.1} ({:?}){}",
                    proposal.id,
                    proposal.mentor.name,
                    proposal.mentee.name,
                    proposal.compatibility_score,
                    proposal.band(),
                    if proposal.approved { " approved" } else { "" }
                );
            }
            println!("{} proposals awaiting approval.", review.pending_count());
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mentorship_metrics=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn connect() -> anyhow::Result<PgPool> {
    let database_url = config::database_url()?;
    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")
}

fn source_label(source: &SourceArgs) -> String {
    match (&source.from_json, &source.from_csv) {
        (Some(path), _) | (_, Some(path)) => path.display().to_string(),
        _ => "Postgres".to_string(),
    }
}

/// Loads one snapshot of meetings. A failed or timed-out database fetch
/// aborts the refresh; nothing is aggregated from partial data.
async fn load_records(
    source: &SourceArgs,
) -> anyhow::Result<(Vec<MeetingRecord>, Vec<RecordError>)> {
    if let Some(path) = &source.from_json {
        return Ok(loader::parse_records(loader::read_json(path)?));
    }
    if let Some(path) = &source.from_csv {
        return Ok(loader::parse_records(loader::read_csv(path)?));
    }

    let pool = connect().await?;
    let timeout = Duration::from_secs(source.fetch_timeout_secs);
    match tokio::time::timeout(timeout, db::fetch_meetings(&pool)).await {
        Ok(result) => {
            let records = result?;
            info!(count = records.len(), "loaded meetings from Postgres");
            Ok((records, Vec::new()))
        }
        Err(_) => {
            warn!(?timeout, "meeting fetch timed out");
            anyhow::bail!(
                "meeting fetch timed out after {}s; metrics were not refreshed",
                timeout.as_secs()
            )
        }
    }
}
