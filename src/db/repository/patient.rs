use rusqlite::{params, Connection};

use super::{is_unique_violation, parse_date, OptionalRow};
use crate::db::DatabaseError;
use crate::models::*;

/// Insert a patient. An NHS number already on file surfaces as
/// `DuplicateExists`; no row is written in that case.
pub fn insert_patient(conn: &Connection, patient: &NewPatient) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (name, address, tel_num, date_of_birth, nhs_number, email)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            patient.name,
            patient.address,
            patient.tel_num,
            patient.date_of_birth.to_string(),
            patient.nhs_number,
            patient.email,
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            DatabaseError::duplicate("Patient", &patient.nhs_number)
        } else {
            e.into()
        }
    })?;
    Ok(conn.last_insert_rowid())
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, address, tel_num, date_of_birth, nhs_number, email
         FROM patients WHERE id = ?1",
    )?;

    let row = stmt
        .query_row(params![id], |row| {
            Ok(PatientRow {
                id: row.get(0)?,
                name: row.get(1)?,
                address: row.get(2)?,
                tel_num: row.get(3)?,
                date_of_birth: row.get(4)?,
                nhs_number: row.get(5)?,
                email: row.get(6)?,
            })
        })
        .optional()?;

    row.map(patient_from_row).transpose()
}

pub fn get_patient_id_by_nhs_number(
    conn: &Connection,
    nhs_number: &str,
) -> Result<Option<i64>, DatabaseError> {
    let id = conn
        .query_row(
            "SELECT id FROM patients WHERE nhs_number = ?1",
            params![nhs_number],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(id)
}

/// All patients ordered by name then NHS number.
pub fn list_patient_summaries(conn: &Connection) -> Result<Vec<PatientSummary>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, nhs_number, name FROM patients
         ORDER BY name ASC, nhs_number ASC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(PatientSummary {
                id: row.get(0)?,
                nhs_number: row.get(1)?,
                name: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

struct PatientRow {
    id: i64,
    name: String,
    address: String,
    tel_num: String,
    date_of_birth: String,
    nhs_number: String,
    email: Option<String>,
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: row.id,
        name: row.name,
        address: row.address,
        tel_num: row.tel_num,
        date_of_birth: parse_date(&row.date_of_birth)?,
        nhs_number: row.nhs_number,
        email: row.email,
    })
}
