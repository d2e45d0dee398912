//! Common test utilities for CLI integration tests.
//!
//! Every command runs with an isolated data directory and with its working
//! directory inside the temp dir, so no project or user configuration leaks
//! in from the machine running the tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Variables read by the CLI or the config layer.
const ENV_VARS: &[&str] = &[
    "BOOKINGS_DATA_DIR",
    "BOOKINGS_BUSY_TIMEOUT",
    "BOOKINGS_SESSION",
    "BOOKINGS_SESSION_TTL_MINUTES",
    "BOOKINGS_MAXIMUM_LOCK_WAIT_SECONDS",
    "BOOKINGS_BOOKING_TIMEOUT_SECONDS",
    "BOOKINGS_MIN_FIRST_NAME_LENGTH",
    "BOOKINGS_DISABLE_AUTOINIT",
    "BOOKINGS_OUTPUT_FORMAT",
    "BOOKINGS_LOG_MODE",
];

/// Test environment with isolated data directory.
pub struct TestEnv {
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the bookings data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment. The data directory is not created.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("bookings-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// Create an environment and run `init --seed` in it.
    pub fn seeded() -> Self {
        let env = Self::new();
        env.command().args(["init", "--seed"]).assert().success();
        env
    }

    /// A command without `--data-dir`.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("bookings").expect("Failed to find bookings binary");
        cmd.current_dir(&self.temp_path);
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// A command with this environment's data directory.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Run a workflow subcommand for `session`.
    pub fn step(&self, subcommand: &str, session: &str, args: &[&str]) -> Command {
        let mut cmd = self.command();
        cmd.arg(subcommand).args(["--session", session]).args(args);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Path of the database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("bookings.db")
    }

    /// Write a file relative to the temp dir.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Count rows in a table directly.
    pub fn count_rows(&self, table: &str) -> i64 {
        let conn = rusqlite::Connection::open(self.db_path()).expect("Failed to open database");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("Failed to count rows")
    }

    /// Run a command and parse its stdout as JSON.
    pub fn json(&self, mut cmd: Command) -> serde_json::Value {
        let output = cmd.output().expect("Failed to run command");
        serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
            panic!(
                "stdout was not JSON ({e}): {}",
                String::from_utf8_lossy(&output.stdout)
            )
        })
    }

    /// Walk `session` up to a staged draft for `room` with complete details.
    pub fn stage_booking(&self, session: &str, room: &str, start: &str, end: &str) {
        self.step("book-room", session, &["--room", room, "--start", start, "--end", end])
            .assert()
            .success();
        self.step(
            "details",
            session,
            &[
                "--first-name",
                "Tal",
                "--last-name",
                "Drori",
                "--email",
                "tal@drori.com",
                "--phone",
                "555-0100",
            ],
        )
        .assert()
        .success();
    }
}
