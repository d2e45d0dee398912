//! Helpers shared by the subcommands: configuration, database access,
//! argument parsing and output.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, ValueEnum};
use serde::Serialize;

use bookings::config::OutputFormat;
use bookings::database::{default_data_dir, DATABASE_FILE};
use bookings::stay::parse_date;
use bookings::{
    Config, ConfigBuilder, Database, DatabaseConfig, ReservationWorkflow, RoomId, SessionToken,
    SqliteSessionStore, StayRange,
};

use crate::error::CliError;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the configured lock wait (in seconds).
    pub busy_timeout: Option<u64>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

/// Check-in and check-out dates.
#[derive(Args, Debug, Clone)]
pub struct StayArgs {
    /// First night, as YYYY-MM-DD or MM/DD/YYYY
    #[arg(long, value_name = "DATE")]
    pub start: String,

    /// Check-out date, as YYYY-MM-DD or MM/DD/YYYY
    #[arg(long, value_name = "DATE")]
    pub end: String,
}

impl StayArgs {
    /// Parses both dates into a stay.
    pub fn stay(&self) -> Result<StayRange, CliError> {
        let start = parse_date("start_date", &self.start)?;
        let end = parse_date("end_date", &self.end)?;
        Ok(StayRange::new(start, end).map_err(bookings::Error::from)?)
    }
}

/// The guest session a workflow command acts on.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Session token identifying the guest
    #[arg(long, value_name = "TOKEN", env = "BOOKINGS_SESSION")]
    pub session: String,
}

impl SessionArgs {
    /// Validates the token.
    pub fn token(&self) -> Result<SessionToken, CliError> {
        Ok(SessionToken::new(self.session.as_str())?)
    }
}

/// Output format selected on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum FormatArg {
    /// Plain text
    Human,
    /// JSON
    Json,
}

/// Picks the output format: flag, then configuration, then human.
pub fn resolve_format(flag: Option<FormatArg>, config: &Config) -> OutputFormat {
    match flag {
        Some(FormatArg::Human) => OutputFormat::Human,
        Some(FormatArg::Json) => OutputFormat::Json,
        None => config.output_format.unwrap_or_default(),
    }
}

/// Parses a room identifier argument.
pub fn parse_room(value: &str) -> Result<RoomId, CliError> {
    Ok(value.parse::<RoomId>().map_err(bookings::Error::from)?)
}

/// Resolve the data directory from global options or the default.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => default_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load hierarchical configuration.
///
/// The user config is read from the resolved data directory.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;
    ConfigBuilder::new()
        .with_data_dir(data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Builds the database configuration for this invocation.
pub fn database_config(
    global: &GlobalOptions,
    config: &Config,
) -> Result<DatabaseConfig, CliError> {
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE);
    let busy_timeout = global
        .busy_timeout
        .map_or_else(|| config.lock_wait(), Duration::from_secs);

    let mut db_config = DatabaseConfig::new(db_path).with_busy_timeout(busy_timeout);
    if global.disable_autoinit || config.disable_autoinit == Some(true) {
        db_config = db_config.without_auto_create();
    }
    Ok(db_config)
}

/// Open database with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_config = database_config(global, config)?;
    log::debug!("opening database at {}", db_config.path.display());
    Database::open(db_config).map_err(CliError::from)
}

/// Runs one workflow step for `session` against the on-disk store.
pub fn with_workflow<T>(
    global: &GlobalOptions,
    session: &SessionArgs,
    step: impl FnOnce(
        &mut ReservationWorkflow<'_, Database, SqliteSessionStore>,
        &Config,
    ) -> Result<T, CliError>,
) -> Result<T, CliError> {
    let token = session.token()?;
    let config = load_configuration(global)?;
    let mut db = open_database(global, &config)?;
    let sessions = db.session_store()?;
    let mut workflow =
        ReservationWorkflow::new(&mut db, &sessions, token, config.workflow_settings());
    step(&mut workflow, &config)
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: std::time::SystemTime) -> String {
    use chrono::{DateTime, Utc};
    let dt: DateTime<Utc> = ts.into();
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Shorten a path for display.
///
/// If the path is within the home directory, show it as ~/...
/// Otherwise, show the full path.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
