use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use super::{is_foreign_key_violation, parse_datetime, OptionalRow, DATETIME_FORMAT};
use crate::db::DatabaseError;
use crate::models::Appointment;

pub fn insert_appointment(
    conn: &Connection,
    patient_id: i64,
    starts_at: NaiveDateTime,
    duration_minutes: u32,
    reason: Option<&str>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (patient_id, starts_at, duration_minutes, reason)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            patient_id,
            starts_at.format(DATETIME_FORMAT).to_string(),
            duration_minutes,
            reason,
        ],
    )
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            DatabaseError::not_found("Patient", patient_id)
        } else {
            e.into()
        }
    })?;
    Ok(conn.last_insert_rowid())
}

pub fn get_appointment(conn: &Connection, id: i64) -> Result<Option<Appointment>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_id, starts_at, duration_minutes, reason
             FROM appointments WHERE id = ?1",
            params![id],
            read_row,
        )
        .optional()?;

    row.map(appointment_from_row).transpose()
}

/// A patient's appointments, earliest first.
pub fn list_appointments_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, starts_at, duration_minutes, reason
         FROM appointments WHERE patient_id = ?1
         ORDER BY starts_at ASC, id ASC",
    )?;

    let rows = stmt
        .query_map(params![patient_id], read_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(appointment_from_row).collect()
}

type AppointmentRow = (i64, i64, String, u32, Option<String>);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn appointment_from_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    let (id, patient_id, starts_at, duration_minutes, reason) = row;
    Ok(Appointment {
        id,
        patient_id,
        starts_at: parse_datetime(&starts_at)?,
        duration_minutes,
        reason,
    })
}
