use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use super::{is_foreign_key_violation, parse_date, OptionalRow};
use crate::db::DatabaseError;
use crate::models::enums::RecallMethod;
use crate::models::*;

pub fn insert_recall(
    conn: &Connection,
    patient_id: i64,
    due_date: NaiveDate,
    method: RecallMethod,
    reason: &str,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO recalls (patient_id, due_date, method, reason) VALUES (?1, ?2, ?3, ?4)",
        params![patient_id, due_date.to_string(), method.as_str(), reason],
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

/// A recall with the owning patient's name and telephone number.
pub fn get_recall_detail(conn: &Connection, id: i64) -> Result<Option<RecallDetail>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.patient_id, r.due_date, r.method, r.reason, p.name, p.tel_num
         FROM recalls r
         JOIN patients p ON p.id = r.patient_id
         WHERE r.id = ?1",
    )?;

    let row = stmt.query_row(params![id], read_detail_row).optional()?;
    row.map(detail_from_row).transpose()
}

/// Remove one recall. The patient id must match the recall's owner, so a
/// stale or mismatched pair deletes nothing and reports `NotFound`.
pub fn delete_recall(conn: &Connection, recall_id: i64, patient_id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM recalls WHERE id = ?1 AND patient_id = ?2",
        params![recall_id, patient_id],
    )?;
    if deleted == 0 {
        return Err(DatabaseError::not_found("Recall", recall_id));
    }
    Ok(())
}

pub fn list_recalls_for_patient(conn: &Connection, patient_id: i64) -> Result<Vec<Recall>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, due_date, method, reason
         FROM recalls WHERE patient_id = ?1
         ORDER BY due_date ASC, id ASC",
    )?;

    let rows = stmt
        .query_map(params![patient_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, patient_id, due_date, method, reason)| recall_from_parts(id, patient_id, &due_date, &method, reason))
        .collect()
}

/// Recalls due on or before `date`, earliest first.
pub fn list_recalls_due(conn: &Connection, date: NaiveDate) -> Result<Vec<RecallDetail>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.patient_id, r.due_date, r.method, r.reason, p.name, p.tel_num
         FROM recalls r
         JOIN patients p ON p.id = r.patient_id
         WHERE r.due_date <= ?1
         ORDER BY r.due_date ASC, r.id ASC",
    )?;

    let rows = stmt
        .query_map(params![date.to_string()], read_detail_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(detail_from_row).collect()
}

type DetailRow = (i64, i64, String, String, String, String, String);

fn read_detail_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DetailRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn detail_from_row(row: DetailRow) -> Result<RecallDetail, DatabaseError> {
    let (id, patient_id, due_date, method, reason, patient_name, patient_tel_num) = row;
    Ok(RecallDetail {
        recall: recall_from_parts(id, patient_id, &due_date, &method, reason)?,
        patient_name,
        patient_tel_num,
    })
}

fn recall_from_parts(
    id: i64,
    patient_id: i64,
    due_date: &str,
    method: &str,
    reason: String,
) -> Result<Recall, DatabaseError> {
    Ok(Recall {
        id,
        patient_id,
        due_date: parse_date(due_date)?,
        method: RecallMethod::from_str(method)?,
        reason,
    })
}
