//! Practice database facade.
//!
//! `PracticeDb` is the single entry point the presentation layer calls for
//! accounts, patients, conditions, recalls and appointments. It owns the
//! one SQLite connection for its whole lifetime; the connection is released
//! by `close` (reporting any error) or on drop.
//!
//! Lookups that assume the row exists fail with `DatabaseError::NotFound`.
//! Duplicate-detecting inserts fail soft: they return `false` or
//! `Added::Duplicate` so the caller can show a message.

mod appointments;
mod conditions;
mod patients;
mod recalls;
mod users;

use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use zeroize::Zeroizing;

use crate::config;
use crate::crypto::{generate_bootstrap_secret, hash_password};
use crate::db::{self, DatabaseError};
use crate::models::dates::{date_storable, MAX_STORABLE_YEAR, MIN_STORABLE_YEAR};

/// Outcome of an insert guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Added {
    New(i64),
    Duplicate,
}

impl Added {
    pub fn id(self) -> Option<i64> {
        match self {
            Self::New(id) => Some(id),
            Self::Duplicate => None,
        }
    }

    pub fn is_duplicate(self) -> bool {
        matches!(self, Self::Duplicate)
    }
}

/// Credential generated for the first administrator of a fresh database.
/// Shown to the operator once; the account must change it at first use.
pub struct BootstrapAdmin {
    pub username: String,
    pub password: Zeroizing<String>,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub struct PracticeDb {
    conn: Connection,
    bootstrap: Option<BootstrapAdmin>,
}

impl PracticeDb {
    /// Open (or create) the practice database at `path`.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = db::open_database(path)?;
        tracing::info!(path = %path.display(), "Practice database opened");
        Self::from_connection(conn)
    }

    /// Fresh in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::from_connection(db::open_memory_database()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        let bootstrap = seed_bootstrap_admin(&conn)?;
        Ok(Self { conn, bootstrap })
    }

    /// The bootstrap credential, if this open created it. Yields it once.
    pub fn take_bootstrap_admin(&mut self) -> Option<BootstrapAdmin> {
        self.bootstrap.take()
    }

    /// Release the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> Result<(), DatabaseError> {
        self.conn.close().map_err(|(_, e)| DatabaseError::Sqlite(e))?;
        tracing::info!("Practice database closed");
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Create the administrator account when the users table is empty.
fn seed_bootstrap_admin(conn: &Connection) -> Result<Option<BootstrapAdmin>, DatabaseError> {
    if db::count_users(conn)? > 0 {
        return Ok(None);
    }

    let password = generate_bootstrap_secret();
    let hashed = hash_password(&password, config::DEFAULT_HASH_METHOD);
    match db::insert_user(
        conn,
        config::BOOTSTRAP_USERNAME,
        config::BOOTSTRAP_FULL_NAME,
        &hashed,
        true,
    ) {
        Ok(id) => {
            tracing::warn!(user_id = id, "Bootstrap administrator created; password change required");
            Ok(Some(BootstrapAdmin {
                username: config::BOOTSTRAP_USERNAME.to_string(),
                password,
            }))
        }
        // Another process seeded first.
        Err(e) if e.is_duplicate() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Reject empty or whitespace-only required fields.
pub(crate) fn require(field: &str, value: &str) -> Result<(), DatabaseError> {
    if value.trim().is_empty() {
        return Err(DatabaseError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Reject dates whose year would not store as four digits.
pub(crate) fn require_storable(field: &str, value: NaiveDate) -> Result<(), DatabaseError> {
    if !date_storable(value) {
        return Err(DatabaseError::Validation(format!(
            "{field} must fall between years {MIN_STORABLE_YEAR} and {MAX_STORABLE_YEAR}"
        )));
    }
    Ok(())
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
