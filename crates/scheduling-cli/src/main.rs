//! `meetings` CLI: book meetings and analyze availability against a calendar file.
//!
//! The calendar is a JSON snapshot of participants and meetings. Commands that
//! change it only write it back when `--save` is given.
//!
//! ## Usage
//!
//! ```sh
//! # Book a meeting for two participants and persist it
//! meetings --data calendar.json schedule --title "Planning" \
//!     --start 2026-03-10T14:00:00Z --end 2026-03-10T15:00:00Z -p ID1 -p ID2 --save
//!
//! # Free one-hour slots over a day
//! meetings --data calendar.json slots -p ID1 -p ID2 \
//!     --start 2026-03-10T00:00:00Z --end 2026-03-11T00:00:00Z
//!
//! # Conflict report as text
//! meetings --data calendar.json analyze -p ID1 -p ID2 --summary
//!
//! # Working window for a timezone label
//! meetings window UTC+9:00
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use scheduling_engine::working_hours::window_for;
use scheduling_engine::{
    AnalysisRequest, CalendarSnapshot, EngineConfig, FixedClock, InMemoryStore, MeetingId,
    Participant, ParticipantId, ScheduleRequest, ScheduleResponse, SchedulingEngine,
    TimeZoneOffset,
};

/// Exit status for a request the engine refused.
const EXIT_REJECTED: u8 = 2;

#[derive(Parser)]
#[command(name = "meetings", version, about = "Meeting scheduling across timezones")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Calendar snapshot (JSON). Required by every command except `window`.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Engine configuration (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pin "now" instead of reading the system clock
    #[arg(long, global = true, value_parser = parse_instant)]
    now: Option<DateTime<Utc>>,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and book a meeting
    Schedule {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, value_parser = parse_instant)]
        start: DateTime<Utc>,
        #[arg(long, value_parser = parse_instant)]
        end: DateTime<Utc>,
        /// Participant id (repeatable)
        #[arg(short = 'p', long = "participant")]
        participants: Vec<Uuid>,
        /// Write the updated calendar back on success
        #[arg(long)]
        save: bool,
    },
    /// List free slots common to a group
    Slots {
        #[arg(short = 'p', long = "participant")]
        participants: Vec<Uuid>,
        #[arg(long, value_parser = parse_instant)]
        start: DateTime<Utc>,
        #[arg(long, value_parser = parse_instant)]
        end: DateTime<Utc>,
        /// Slot length in minutes
        #[arg(long, default_value_t = 60)]
        duration: i64,
    },
    /// Report working-hours overlap, conflicts and suggested slots
    Analyze {
        #[arg(short = 'p', long = "participant")]
        participants: Vec<Uuid>,
        #[arg(long, value_parser = parse_instant)]
        from: Option<DateTime<Utc>>,
        #[arg(long, value_parser = parse_instant)]
        to: Option<DateTime<Utc>>,
        /// Check this proposed start (with --meeting-end) instead of scanning the range
        #[arg(long, value_parser = parse_instant, requires = "meeting_end")]
        meeting_start: Option<DateTime<Utc>>,
        #[arg(long, value_parser = parse_instant, requires = "meeting_start")]
        meeting_end: Option<DateTime<Utc>>,
        /// Slot length in minutes for suggestions
        #[arg(long)]
        duration: Option<i64>,
        /// Print only the text summary
        #[arg(long)]
        summary: bool,
    },
    /// Show the UTC working window for a timezone label
    Window {
        timezone: String,
        /// Day to compute the window for (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a meeting
    Delete {
        id: Uuid,
        /// Write the updated calendar back
        #[arg(long)]
        save: bool,
    },
    /// List meetings in the calendar
    List,
}

#[derive(Serialize)]
struct WindowReport {
    timezone: String,
    offset: String,
    offset_minutes: i64,
    date: NaiveDate,
    local_working_hours: &'static str,
    utc_working_hours: String,
    crosses_midnight: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let now = cli.now.unwrap_or_else(Utc::now);
    let config = load_config(cli.config.as_deref())?;
    debug!(?config, %now, "starting");

    if let Commands::Window { timezone, date } = &cli.command {
        let date = date.unwrap_or_else(|| now.date_naive());
        let offset = TimeZoneOffset::parse(timezone);
        let window = window_for(&Participant::new("", timezone.as_str()), date);
        print_json(&WindowReport {
            timezone: timezone.clone(),
            offset: offset.to_string(),
            offset_minutes: offset.minutes(),
            date,
            local_working_hours: scheduling_engine::working_hours::LOCAL_WORKING_HOURS,
            utc_working_hours: window.utc_display(),
            crosses_midnight: window.crosses_midnight,
        })?;
        return Ok(ExitCode::SUCCESS);
    }

    let data = cli
        .data
        .as_deref()
        .context("--data <FILE> is required for this command")?;
    let store = load_snapshot(data)?;
    let engine = SchedulingEngine::with_clock(store, FixedClock(now)).with_config(config);

    match cli.command {
        Commands::Schedule {
            title,
            start,
            end,
            participants,
            save,
        } => {
            let outcome = engine
                .schedule_meeting(ScheduleRequest {
                    title,
                    start,
                    end,
                    participant_ids: participant_ids(&participants),
                })
                .await
                .context("Failed to schedule meeting")?;

            print_json(&ScheduleResponse::from(&outcome))?;
            if !outcome.is_success() {
                return Ok(ExitCode::from(EXIT_REJECTED));
            }
            if save {
                save_snapshot(data, &engine.store().snapshot())?;
            }
        }
        Commands::Slots {
            participants,
            start,
            end,
            duration,
        } => {
            let slots = engine
                .find_available_slots(&participant_ids(&participants), start, end, duration)
                .await
                .context("Failed to search for slots")?;
            print_json(&slots)?;
        }
        Commands::Analyze {
            participants,
            from,
            to,
            meeting_start,
            meeting_end,
            duration,
            summary,
        } => {
            let report = engine
                .analyze_conflicts(AnalysisRequest {
                    participant_ids: participant_ids(&participants),
                    start_date: from,
                    end_date: to,
                    meeting_start,
                    meeting_end,
                    duration_minutes: duration,
                })
                .await
                .context("Failed to analyze conflicts")?;

            if summary {
                println!("{}", report.summary);
            } else {
                print_json(&report)?;
            }
        }
        Commands::Delete { id, save } => {
            let deleted = engine
                .delete_meeting(MeetingId(id))
                .await
                .context("Failed to delete meeting")?;
            print_json(&serde_json::json!({ "id": id, "deleted": deleted }))?;
            if !deleted {
                return Ok(ExitCode::from(EXIT_REJECTED));
            }
            if save {
                save_snapshot(data, &engine.store().snapshot())?;
            }
        }
        Commands::List => {
            let meetings = engine.list_meetings().await.context("Failed to list meetings")?;
            print_json(&meetings)?;
        }
        Commands::Window { .. } => {}
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Accept RFC 3339, or a bare `YYYY-MM-DDTHH:MM[:SS]` read as UTC.
fn parse_instant(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid time '{}': expected RFC 3339, e.g. 2026-03-10T14:00:00Z", raw))
}

fn participant_ids(raw: &[Uuid]) -> Vec<ParticipantId> {
    raw.iter().copied().map(ParticipantId).collect()
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config: {}", path.display()))
}

fn load_snapshot(path: &Path) -> Result<InMemoryStore> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read calendar: {}", path.display()))?;
    let snapshot: CalendarSnapshot = serde_json::from_str(&text)
        .with_context(|| format!("Invalid calendar JSON: {}", path.display()))?;
    InMemoryStore::from_snapshot(snapshot)
        .with_context(|| format!("Invalid calendar data: {}", path.display()))
}

fn save_snapshot(path: &Path, snapshot: &CalendarSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize calendar")?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write calendar: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
