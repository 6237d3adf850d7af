use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::RecallMethod;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recall {
    pub id: i64,
    pub patient_id: i64,
    pub due_date: NaiveDate,
    pub method: RecallMethod,
    pub reason: String,
}

/// A recall joined with the contact details needed to action it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecallDetail {
    pub recall: Recall,
    pub patient_name: String,
    pub patient_tel_num: String,
}
