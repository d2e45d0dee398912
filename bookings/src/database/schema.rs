//! Database schema definitions and SQL constants.
//!
//! Dates are stored as ISO-8601 text, which orders correctly as text, so
//! the overlap predicate `start_date < :end AND :start < end_date` can be
//! evaluated directly in SQL. Timestamps are Unix epoch seconds; session
//! expiry uses milliseconds.

/// Current schema version for the database.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Key/value metadata, including the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// Bookable rooms. Seeded out of band.
pub const CREATE_ROOMS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS rooms (
        id INTEGER PRIMARY KEY CHECK (id > 0),
        room_name TEXT NOT NULL CHECK (length(room_name) > 0),
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// Guest reservations.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        room_id INTEGER NOT NULL REFERENCES rooms(id),
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        processed INTEGER NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        CHECK (start_date < end_date)
    )";

/// Date spans during which a room cannot be booked. The single source of
/// truth for availability.
pub const CREATE_RESTRICTIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS restrictions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        room_id INTEGER NOT NULL REFERENCES rooms(id),
        reservation_id INTEGER REFERENCES reservations(id),
        restriction_kind TEXT NOT NULL
            CHECK (restriction_kind IN ('reservation', 'owner-block')),
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        CHECK (start_date < end_date)
    )";

/// Staged workflow state keyed by session token.
pub const CREATE_SESSIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS sessions (
        token TEXT NOT NULL,
        key TEXT NOT NULL,
        value TEXT NOT NULL,
        expires_at INTEGER NOT NULL,
        PRIMARY KEY (token, key)
    )";

/// Aborts any restriction insert that overlaps an existing restriction on
/// the same room.
pub const CREATE_NO_OVERLAP_TRIGGER: &str = r"
    CREATE TRIGGER IF NOT EXISTS restrictions_no_overlap
    BEFORE INSERT ON restrictions
    FOR EACH ROW
    WHEN EXISTS (
        SELECT 1 FROM restrictions
        WHERE room_id = NEW.room_id
          AND start_date < NEW.end_date
          AND NEW.start_date < end_date
    )
    BEGIN
        SELECT RAISE(ABORT, 'overlapping restriction');
    END";

/// Message raised by [`CREATE_NO_OVERLAP_TRIGGER`].
pub const OVERLAP_TRIGGER_MESSAGE: &str = "overlapping restriction";

/// Speeds up the overlap predicate.
pub const CREATE_RESTRICTIONS_ROOM_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_restrictions_room_dates ON restrictions(room_id, start_date, end_date)";

/// Speeds up reservation lookups by room.
pub const CREATE_RESERVATIONS_ROOM_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_room ON reservations(room_id)";

/// Speeds up purging expired sessions.
pub const CREATE_SESSIONS_EXPIRY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Checks whether the metadata table exists yet.
pub const METADATA_TABLE_EXISTS: &str =
    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'metadata'";
