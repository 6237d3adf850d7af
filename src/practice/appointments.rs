use chrono::NaiveDateTime;

use super::{now, require_storable, PracticeDb};
use crate::db::{self, DatabaseError};
use crate::models::dates::datetime_in_future;
use crate::models::Appointment;

fn validate_slot(starts_at: NaiveDateTime, duration_minutes: u32) -> Result<(), DatabaseError> {
    require_storable("Appointment start", starts_at.date())?;
    if !datetime_in_future(starts_at, now()) {
        return Err(DatabaseError::Validation("Appointment must start in the future".into()));
    }
    if duration_minutes == 0 {
        return Err(DatabaseError::Validation("Appointment duration must be positive".into()));
    }
    Ok(())
}

impl PracticeDb {
    pub fn create_appointment(
        &self,
        patient_id: i64,
        starts_at: NaiveDateTime,
        duration_minutes: u32,
        reason: Option<&str>,
    ) -> Result<i64, DatabaseError> {
        validate_slot(starts_at, duration_minutes)?;
        let reason = reason.filter(|r| !r.trim().is_empty());

        let id = db::insert_appointment(self.conn(), patient_id, starts_at, duration_minutes, reason)?;
        tracing::info!(appointment_id = id, patient_id, "Appointment booked");
        Ok(id)
    }

    /// Book an appointment for a recall and remove that recall, atomically.
    /// The recall's reason carries over to the appointment.
    pub fn convert_recall_to_appointment(
        &self,
        recall_id: i64,
        patient_id: i64,
        starts_at: NaiveDateTime,
        duration_minutes: u32,
    ) -> Result<i64, DatabaseError> {
        validate_slot(starts_at, duration_minutes)?;

        let tx = self.conn().unchecked_transaction()?;
        let detail = db::get_recall_detail(&tx, recall_id)?
            .filter(|d| d.recall.patient_id == patient_id)
            .ok_or_else(|| DatabaseError::not_found("Recall", recall_id))?;

        let appointment_id = db::insert_appointment(
            &tx,
            patient_id,
            starts_at,
            duration_minutes,
            Some(detail.recall.reason.as_str()),
        )?;
        db::delete_recall(&tx, recall_id, patient_id)?;
        tx.commit()?;

        tracing::info!(recall_id, appointment_id, patient_id, "Recall converted to appointment");
        Ok(appointment_id)
    }

    pub fn get_appointment(&self, id: i64) -> Result<Appointment, DatabaseError> {
        db::get_appointment(self.conn(), id)?.ok_or_else(|| DatabaseError::not_found("Appointment", id))
    }

    /// A patient's appointments, earliest first.
    pub fn list_appointments_for_patient(&self, patient_id: i64) -> Result<Vec<Appointment>, DatabaseError> {
        db::list_appointments_for_patient(self.conn(), patient_id)
    }
}
