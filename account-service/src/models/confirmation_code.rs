use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Short-lived secret emailed to prove ownership of an address before the
/// account is activated. Valid for six hours from `created_at`; the boundary
/// is inclusive, so a code created exactly six hours ago is already expired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationCode {
    #[serde(rename = "_id")]
    pub id: String,
    pub code: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl ConfirmationCode {
    pub fn new(code: String, email: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code,
            email,
            created_at,
        }
    }
}
