use serde::{Deserialize, Serialize};

use super::enums::HashMethod;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub password_hash_method: HashMethod,
    pub full_name: String,
    /// Set on the bootstrap account until its first password change.
    pub must_change_password: bool,
}
