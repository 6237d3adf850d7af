use super::{require, Added, PracticeDb};
use crate::db::{self, DatabaseError};
use crate::models::PatientCondition;

impl PracticeDb {
    /// Add a catalog entry. `Added::Duplicate` when the name exists.
    pub fn add_condition(&self, name: &str) -> Result<Added, DatabaseError> {
        require("Condition", name)?;
        match db::insert_condition(self.conn(), name, None) {
            Ok(id) => {
                tracing::info!(condition_id = id, "Condition added");
                Ok(Added::New(id))
            }
            Err(e) if e.is_duplicate() => Ok(Added::Duplicate),
            Err(e) => Err(e),
        }
    }

    pub fn condition_exists(&self, name: &str) -> Result<bool, DatabaseError> {
        db::condition_exists(self.conn(), name)
    }

    pub fn condition_name(&self, id: i64) -> Result<String, DatabaseError> {
        db::get_condition(self.conn(), id)?
            .map(|c| c.name)
            .ok_or_else(|| DatabaseError::not_found("Condition", id))
    }

    pub fn condition_id(&self, name: &str) -> Result<i64, DatabaseError> {
        db::get_condition_id(self.conn(), name)?
            .ok_or_else(|| DatabaseError::not_found("Condition", name))
    }

    /// Catalog names, alphabetical.
    pub fn list_conditions(&self) -> Result<Vec<String>, DatabaseError> {
        db::list_condition_names(self.conn())
    }

    /// Link a condition to a patient. Attaching an existing pair is a no-op
    /// and returns `false`.
    pub fn attach_condition(&self, patient_id: i64, condition_id: i64) -> Result<bool, DatabaseError> {
        let attached = db::attach_condition(self.conn(), patient_id, condition_id)?;
        if attached {
            tracing::info!(patient_id, condition_id, "Condition attached");
        } else {
            tracing::debug!(patient_id, condition_id, "Condition already attached");
        }
        Ok(attached)
    }

    /// Attach by name, adding the name to the catalog on first use.
    /// Returns the condition id. Nothing is written if the patient is unknown.
    pub fn attach_condition_by_name(&self, patient_id: i64, name: &str) -> Result<i64, DatabaseError> {
        require("Condition", name)?;

        let tx = self.conn().unchecked_transaction()?;
        let condition_id = db::find_or_create_condition(&tx, name)?;
        let attached = db::attach_condition(&tx, patient_id, condition_id)?;
        tx.commit()?;

        if attached {
            tracing::info!(patient_id, condition_id, "Condition attached");
        }
        Ok(condition_id)
    }

    pub fn list_conditions_for_patient(&self, patient_id: i64) -> Result<Vec<PatientCondition>, DatabaseError> {
        db::list_conditions_for_patient(self.conn(), patient_id)
    }

    pub fn condition_names_for_patient(&self, patient_id: i64) -> Result<Vec<String>, DatabaseError> {
        db::list_condition_names_for_patient(self.conn(), patient_id)
    }
}
