use super::{require, require_storable, today, Added, PracticeDb};
use crate::db::{self, DatabaseError};
use crate::models::dates::date_in_future;
use crate::models::{NewPatient, Patient, PatientSummary};

impl PracticeDb {
    /// Register a patient. `Added::Duplicate` means the NHS number is
    /// already on file and nothing was written.
    pub fn add_patient(&self, patient: &NewPatient) -> Result<Added, DatabaseError> {
        require("Name", &patient.name)?;
        require("NHS number", &patient.nhs_number)?;
        require_storable("Date of birth", patient.date_of_birth)?;
        if date_in_future(patient.date_of_birth, today()) {
            return Err(DatabaseError::Validation("Date of birth is in the future".into()));
        }

        match db::insert_patient(self.conn(), patient) {
            Ok(id) => {
                tracing::info!(patient_id = id, "Patient added");
                Ok(Added::New(id))
            }
            Err(e) if e.is_duplicate() => {
                tracing::warn!("Patient not added: NHS number already registered");
                Ok(Added::Duplicate)
            }
            Err(e) => Err(e),
        }
    }

    pub fn get_patient(&self, id: i64) -> Result<Patient, DatabaseError> {
        db::get_patient(self.conn(), id)?.ok_or_else(|| DatabaseError::not_found("Patient", id))
    }

    pub fn patient_id_by_nhs_number(&self, nhs_number: &str) -> Result<i64, DatabaseError> {
        db::get_patient_id_by_nhs_number(self.conn(), nhs_number)?
            .ok_or_else(|| DatabaseError::not_found("Patient", nhs_number))
    }

    /// Every patient, ordered by name then NHS number.
    pub fn list_patients(&self) -> Result<Vec<PatientSummary>, DatabaseError> {
        db::list_patient_summaries(self.conn())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use crate::db::DatabaseError;
    use crate::models::NewPatient;
    use crate::practice::{today, Added, PracticeDb};

    fn practice() -> PracticeDb {
        PracticeDb::open_in_memory().unwrap()
    }

    fn new_patient(name: &str, nhs_number: &str) -> NewPatient {
        NewPatient {
            name: name.into(),
            address: "10 Downing Street".into(),
            tel_num: "020 7925 0918".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1964, 6, 19).unwrap(),
            nhs_number: nhs_number.into(),
            email: None,
        }
    }

    #[test]
    fn add_then_fetch_by_id_and_nhs_number() {
        let db = practice();
        let id = db.add_patient(&new_patient("Boris", "123 456 7890")).unwrap().id().unwrap();

        assert_eq!(db.get_patient(id).unwrap().name, "Boris");
        assert_eq!(db.patient_id_by_nhs_number("123 456 7890").unwrap(), id);
    }

    #[test]
    fn second_add_with_same_nhs_number_is_duplicate() {
        let db = practice();
        assert!(matches!(db.add_patient(&new_patient("First", "999")).unwrap(), Added::New(_)));
        assert_eq!(db.add_patient(&new_patient("Second", "999")).unwrap(), Added::Duplicate);

        let matching: Vec<_> = db
            .list_patients()
            .unwrap()
            .into_iter()
            .filter(|p| p.nhs_number == "999")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].name, "First");
    }

    #[test]
    fn list_is_sorted_by_name_then_identifier() {
        let db = practice();
        db.add_patient(&new_patient("B", "111")).unwrap();
        db.add_patient(&new_patient("A", "222")).unwrap();

        let labels: Vec<String> = db.list_patients().unwrap().iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["222 - A", "111 - B"]);
    }

    #[test]
    fn list_is_restartable() {
        let db = practice();
        db.add_patient(&new_patient("A", "1")).unwrap();
        let first = db.list_patients().unwrap();
        let second = db.list_patients().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_patient_lookups_are_not_found() {
        let db = practice();
        assert!(db.get_patient(1).unwrap_err().is_not_found());
        assert!(db.patient_id_by_nhs_number("000").unwrap_err().is_not_found());
    }

    #[test]
    fn required_fields_validated() {
        let db = practice();
        assert!(matches!(db.add_patient(&new_patient("", "1")), Err(DatabaseError::Validation(_))));
        assert!(matches!(db.add_patient(&new_patient("A", " ")), Err(DatabaseError::Validation(_))));
        assert!(db.list_patients().unwrap().is_empty());
    }

    #[test]
    fn future_date_of_birth_rejected() {
        let db = practice();
        let mut p = new_patient("Not Born", "1");
        p.date_of_birth = today() + Duration::days(1);
        assert!(matches!(db.add_patient(&p), Err(DatabaseError::Validation(_))));

        p.date_of_birth = today();
        assert!(db.add_patient(&p).unwrap().id().is_some());
    }

    #[test]
    fn negative_year_of_birth_rejected() {
        let db = practice();
        let mut p = new_patient("Ancient", "1");
        p.date_of_birth = NaiveDate::from_ymd_opt(-1, 6, 1).unwrap();
        assert!(matches!(db.add_patient(&p), Err(DatabaseError::Validation(_))));
        assert!(db.list_patients().unwrap().is_empty());
    }
}
