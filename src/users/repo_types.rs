use std::{fmt, str::FromStr};

use serde::Deserialize;
use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;

/// Availability of a team member. Stored as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, sqlx::Type)]
#[serde(try_from = "i64")]
#[repr(i32)]
pub enum Status {
    Working = 0,
    WorkingRemotely = 1,
    OnVacation = 2,
    BusinessTrip = 3,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid status code {0}, expected one of 0, 1, 2, 3")]
pub struct InvalidStatus(pub i64);

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Working,
        Status::WorkingRemotely,
        Status::OnVacation,
        Status::BusinessTrip,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Working => "Working",
            Status::WorkingRemotely => "Working Remotely",
            Status::OnVacation => "On Vacation",
            Status::BusinessTrip => "Business Trip",
        }
    }
}

impl TryFrom<i64> for Status {
    type Error = InvalidStatus;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Status::ALL
            .into_iter()
            .find(|s| i64::from(s.code()) == code)
            .ok_or(InvalidStatus(code))
    }
}

impl FromStr for Status {
    type Err = InvalidStatus;

    /// Parses the integer code form used in query strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().parse::<i64>().map_err(|_| InvalidStatus(-1))?;
        Status::try_from(code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,      // login name, never listed
    pub password_hash: String, // Argon2 PHC string, never exposed
    pub full_name: String,
    pub status: Status,
    pub updated_at: OffsetDateTime,
}

/// Fields supplied when provisioning a user.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub full_name: &'a str,
    pub status: Status,
}
