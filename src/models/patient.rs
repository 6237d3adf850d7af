use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub tel_num: String,
    pub date_of_birth: NaiveDate,
    pub nhs_number: String,
    pub email: Option<String>,
}

/// Demographics for a patient not yet persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub address: String,
    pub tel_num: String,
    pub date_of_birth: NaiveDate,
    pub nhs_number: String,
    pub email: Option<String>,
}

/// One line of the patient picker, displayed as `"<nhs number> - <name>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: i64,
    pub nhs_number: String,
    pub name: String,
}

impl fmt::Display for PatientSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.nhs_number, self.name)
    }
}
