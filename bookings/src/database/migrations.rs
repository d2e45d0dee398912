//! Schema initialization and version checks.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_METADATA_TABLE, CREATE_NO_OVERLAP_TRIGGER, CREATE_RESERVATIONS_ROOM_INDEX,
    CREATE_RESERVATIONS_TABLE, CREATE_RESTRICTIONS_ROOM_INDEX, CREATE_RESTRICTIONS_TABLE,
    CREATE_ROOMS_TABLE, CREATE_SESSIONS_EXPIRY_INDEX, CREATE_SESSIONS_TABLE,
    CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION, METADATA_TABLE_EXISTS, SELECT_SCHEMA_VERSION,
};

/// Creates all tables, indices and the overlap trigger, and records the
/// schema version.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use bookings::database::migrations::{get_schema_version, initialize_schema};
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// assert_eq!(get_schema_version(&conn).unwrap(), 1);
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in [
        CREATE_METADATA_TABLE,
        CREATE_ROOMS_TABLE,
        CREATE_RESERVATIONS_TABLE,
        CREATE_RESTRICTIONS_TABLE,
        CREATE_SESSIONS_TABLE,
        CREATE_RESTRICTIONS_ROOM_INDEX,
        CREATE_RESERVATIONS_ROOM_INDEX,
        CREATE_SESSIONS_EXPIRY_INDEX,
        CREATE_NO_OVERLAP_TRIGGER,
    ] {
        conn.execute(statement, [])?;
    }

    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;
    log::debug!("initialized schema version {CURRENT_SCHEMA_VERSION}");
    Ok(())
}

/// Reads the schema version. Returns 0 for an uninitialized database.
///
/// # Errors
///
/// Returns an error if the query fails or the stored version is not a
/// number.
pub fn get_schema_version(conn: &Connection) -> Result<u32> {
    let tables: i64 = conn.query_row(METADATA_TABLE_EXISTS, [], |row| row.get(0))?;
    if tables == 0 {
        return Ok(0);
    }

    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| row.get::<_, String>(0)) {
        Ok(value) => value.parse::<u32>().map_err(|e| Error::DatabaseCorruption {
            details: format!("schema version '{value}' is not a number: {e}"),
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Initializes a fresh database or verifies an existing one.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] if the stored version differs
/// from [`CURRENT_SCHEMA_VERSION`], or an error if initialization fails.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        initialize_schema(conn)?;
    } else if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }

    Ok(())
}
