//! `avail` CLI — register availability and find the slots a group has in common.
//!
//! ## Usage
//!
//! ```sh
//! # Register two users
//! avail add-user --name Asha --email asha@example.com --tz Asia/Kolkata
//! avail add-user --name Ben --email ben@example.com --tz UTC
//!
//! # Every Monday 09:00-17:00 in the user's own timezone
//! avail add-general --user 1 --day monday --start 09:00 --end 17:00
//!
//! # Replace Wednesday 18 March with a shorter window
//! avail add-custom --user 1 --date 18-03-2026 --start 10:00 --end 12:00
//!
//! # Book an event
//! avail add-schedule --user 2 --date 16-03-2026 --start 10:00 --end 11:00 --description Standup
//!
//! # Common slots for users 1 and 2, rendered in UTC
//! avail common --users 1,2 --start 16-03-2026 --end 20-03-2026 --tz UTC
//! ```
//!
//! The store location comes from `--store` or `AVAIL_STORE` (a `.env` file is
//! honoured). Log verbosity follows `RUST_LOG`.

mod store;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use availability_engine::format::{parse_date, parse_time};
use availability_engine::model::{NewUser, UserId};
use availability_engine::repository::{AvailabilityRepository, MemoryRepository};
use availability_engine::{
    compute_common_availability, create_custom_availability, create_general_availability,
    create_schedule, register_user, today_in, AvailabilityError, CommonAvailabilityQuery,
    CustomAvailabilityRequest, EngineConfig, GeneralAvailabilityRequest, ScheduleRequest,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "avail",
    version,
    about = "Register availability and compute common free slots"
)]
struct Cli {
    /// JSON file holding users, availability and bookings
    #[arg(
        long,
        env = "AVAIL_STORE",
        default_value = "availability.json",
        global = true
    )]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a user
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Default IANA timezone (e.g. "Asia/Kolkata")
        #[arg(long = "tz")]
        time_zone: String,
    },
    /// Add recurring weekly availability
    AddGeneral {
        #[arg(long)]
        user: UserId,
        /// Weekday name, any case (e.g. "monday")
        #[arg(long)]
        day: String,
        /// Local start time, HH:MM
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        /// Local end time, HH:MM
        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,
        /// Timezone of the times given (defaults to the user's)
        #[arg(long = "tz")]
        time_zone: Option<String>,
        /// Date whose UTC offset is applied, dd-mm-yyyy (defaults to today in that timezone)
        #[arg(long, value_parser = parse_date)]
        reference_date: Option<NaiveDate>,
    },
    /// Add availability for one date, replacing that day's weekly availability
    AddCustom {
        #[arg(long)]
        user: UserId,
        /// dd-mm-yyyy
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,
        #[arg(long = "tz")]
        time_zone: Option<String>,
    },
    /// Book an event
    AddSchedule {
        #[arg(long)]
        user: UserId,
        /// dd-mm-yyyy
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,
        #[arg(long = "tz")]
        time_zone: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Compute the slots all given users have in common
    Common {
        /// Comma-separated user ids
        #[arg(long, value_delimiter = ',', required = true)]
        users: Vec<UserId>,
        /// First date, dd-mm-yyyy
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,
        /// Last date (inclusive), dd-mm-yyyy
        #[arg(long, value_parser = parse_date)]
        end: NaiveDate,
        /// Timezone the slots are rendered in
        #[arg(long = "tz")]
        time_zone: String,
        /// Leave out slots that overlap a booking
        #[arg(long, env = "AVAIL_EXCLUDE_BOOKED_SLOTS")]
        exclude_booked_slots: bool,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

/// Client errors are shown verbatim; anything else is logged in full and
/// reported without detail.
fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<AvailabilityError>() {
        Some(client) if client.is_client_error() => {
            eprintln!("Error [{}]: {}", client.code().as_str(), client);
            ExitCode::from(2)
        }
        _ => {
            error!(error = ?err, "command failed");
            eprintln!("Error: internal error");
            ExitCode::FAILURE
        }
    }
}

/// Today where the request's local times apply: its own zone, else the
/// user's default. Unresolvable zones fall back to UTC and are reported by the
/// write itself.
fn today_for(repo: &MemoryRepository, request: &GeneralAvailabilityRequest) -> Result<NaiveDate> {
    let zone = match &request.time_zone {
        Some(zone) => Some(zone.clone()),
        None => repo
            .find_user(request.user_id)
            .map_err(AvailabilityError::from)?
            .map(|user| user.time_zone),
    };
    Ok(zone
        .and_then(|zone| today_in(&zone).ok())
        .unwrap_or_else(|| Utc::now().date_naive()))
}

fn run(cli: Cli) -> Result<()> {
    let mut repo = store::load(&cli.store)?;

    let output: Value = match cli.command {
        Commands::AddUser {
            name,
            email,
            time_zone,
        } => {
            let user = register_user(
                &mut repo,
                NewUser {
                    name,
                    email,
                    time_zone,
                },
            )?;
            store::save(&cli.store, &repo)?;
            info!(user_id = user.id, "user registered");
            serde_json::to_value(user)?
        }
        Commands::AddGeneral {
            user,
            day,
            start,
            end,
            time_zone,
            reference_date,
        } => {
            let request = GeneralAvailabilityRequest {
                user_id: user,
                day,
                start_time: start,
                end_time: end,
                time_zone,
            };
            let reference = match reference_date {
                Some(date) => date,
                None => today_for(&repo, &request)?,
            };
            let stored = create_general_availability(&mut repo, &request, reference)?;
            store::save(&cli.store, &repo)?;
            serde_json::to_value(stored)?
        }
        Commands::AddCustom {
            user,
            date,
            start,
            end,
            time_zone,
        } => {
            let request = CustomAvailabilityRequest {
                user_id: user,
                date,
                start_time: start,
                end_time: end,
                time_zone,
            };
            let stored = create_custom_availability(&mut repo, &request)?;
            store::save(&cli.store, &repo)?;
            serde_json::to_value(stored)?
        }
        Commands::AddSchedule {
            user,
            date,
            start,
            end,
            time_zone,
            description,
        } => {
            let request = ScheduleRequest {
                user_id: user,
                date,
                start_time: start,
                end_time: end,
                time_zone,
                description,
            };
            let stored = create_schedule(&mut repo, &request)?;
            store::save(&cli.store, &repo)?;
            serde_json::to_value(stored)?
        }
        Commands::Common {
            users,
            start,
            end,
            time_zone,
            exclude_booked_slots,
        } => {
            let query = CommonAvailabilityQuery {
                user_ids: users,
                start_date: start,
                end_date: end,
                timezone: time_zone,
            };
            let config = EngineConfig {
                exclude_booked_slots,
            };
            let result = compute_common_availability(&repo, &query, &config)?;
            serde_json::to_value(&result)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
