//! Repository layer: entity-scoped database operations.
//!
//! Plain functions over a borrowed `Connection`; the `PracticeDb` facade
//! owns the connection and decides transaction boundaries.

mod appointment;
mod condition;
mod patient;
mod patient_condition;
mod recall;
mod user;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::ffi;

use super::DatabaseError;

// Re-export all public items from sub-modules
pub use appointment::*;
pub use condition::*;
pub use patient::*;
pub use patient_condition::*;
pub use recall::*;
pub use user::*;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ═══════════════════════════════════════════════════════════
// Row helpers
// ═══════════════════════════════════════════════════════════

/// Extension trait to convert NotFound into None.
pub(crate) trait OptionalRow<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalRow<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// UNIQUE or PRIMARY KEY violation: the row already exists.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// FOREIGN KEY violation: the referenced row does not exist.
pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid date '{value}': {e}")))
}

pub(crate) fn parse_datetime(value: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid timestamp '{value}': {e}")))
}
