use chrono::NaiveDate;

use super::{require, require_storable, today, PracticeDb};
use crate::db::{self, DatabaseError};
use crate::models::dates::date_in_past;
use crate::models::enums::RecallMethod;
use crate::models::{Recall, RecallDetail};

impl PracticeDb {
    /// Schedule a follow-up contact. Due dates before today are rejected.
    pub fn create_recall(
        &self,
        patient_id: i64,
        due_date: NaiveDate,
        method: RecallMethod,
        reason: &str,
    ) -> Result<i64, DatabaseError> {
        require("Reason", reason)?;
        require_storable("Due date", due_date)?;
        if date_in_past(due_date, today()) {
            return Err(DatabaseError::Validation("Recall due date is in the past".into()));
        }

        let id = db::insert_recall(self.conn(), patient_id, due_date, method, reason)?;
        tracing::info!(recall_id = id, patient_id, method = method.as_str(), "Recall created");
        Ok(id)
    }

    /// A recall with the patient's name and telephone number.
    pub fn get_recall(&self, id: i64) -> Result<RecallDetail, DatabaseError> {
        db::get_recall_detail(self.conn(), id)?.ok_or_else(|| DatabaseError::not_found("Recall", id))
    }

    /// Remove one recall. `patient_id` must own it; other recalls for the
    /// same patient are left alone.
    pub fn delete_recall(&self, recall_id: i64, patient_id: i64) -> Result<(), DatabaseError> {
        db::delete_recall(self.conn(), recall_id, patient_id)?;
        tracing::info!(recall_id, patient_id, "Recall deleted");
        Ok(())
    }

    pub fn list_recalls_for_patient(&self, patient_id: i64) -> Result<Vec<Recall>, DatabaseError> {
        db::list_recalls_for_patient(self.conn(), patient_id)
    }

    /// Recalls due on or before `on_or_before`, earliest first.
    pub fn list_recalls_due(&self, on_or_before: NaiveDate) -> Result<Vec<RecallDetail>, DatabaseError> {
        db::list_recalls_due(self.conn(), on_or_before)
    }
}
