use rusqlite::{params, Connection};

use super::is_foreign_key_violation;
use crate::db::DatabaseError;
use crate::models::PatientCondition;

/// Link a condition to a patient. Idempotent: returns `false` when the
/// pair was already linked.
pub fn attach_condition(
    conn: &Connection,
    patient_id: i64,
    condition_id: i64,
) -> Result<bool, DatabaseError> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO patient_conditions (patient_id, condition_id) VALUES (?1, ?2)",
            params![patient_id, condition_id],
        )
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DatabaseError::not_found("Patient or Condition", format!("{patient_id}/{condition_id}"))
            } else {
                e.into()
            }
        })?;
    Ok(inserted > 0)
}

pub fn list_conditions_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<PatientCondition>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT patient_id, condition_id FROM patient_conditions WHERE patient_id = ?1",
    )?;

    let rows = stmt
        .query_map(params![patient_id], |row| {
            Ok(PatientCondition {
                patient_id: row.get(0)?,
                condition_id: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Condition names linked to a patient, alphabetical.
pub fn list_condition_names_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT c.name
         FROM patient_conditions pc
         JOIN conditions c ON c.id = pc.condition_id
         WHERE pc.patient_id = ?1
         ORDER BY c.name ASC",
    )?;

    let rows = stmt
        .query_map(params![patient_id], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}
