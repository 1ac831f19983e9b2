use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::users::{Status, User};

/// One row of the team listing. Username and password hash stay server-side.
#[derive(Debug, Serialize)]
pub struct TeamMember {
    pub id: i64,
    pub full_name: String,
    pub status: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for TeamMember {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            full_name: u.full_name,
            status: u.status.label(),
            updated_at: u.updated_at,
        }
    }
}

/// Request body for `PATCH /me/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Status,
}
