//! Offline user provisioning used by the `presence-admin` binary.

use tracing::info;

use crate::auth::password::hash_password;
use crate::users::{NewUser, SqliteUserRepository, Status, User};

pub const DEFAULT_PASSWORD: &str = "password123";

/// (username, full name, initial status)
pub const DEFAULT_TEAM: [(&str, &str, Status); 5] = [
    ("samc", "Sam Cooke", Status::Working),
    ("afranklin", "Aretha Franklin", Status::WorkingRemotely),
    ("kingluther", "Luther Vandross", Status::OnVacation),
    ("gknight", "Gladys Knight", Status::BusinessTrip),
    ("otis", "Otis Redding", Status::Working),
];

#[derive(Debug)]
pub enum SeedOutcome {
    Seeded(Vec<User>),
    AlreadyPopulated(i64),
}

/// Insert `DEFAULT_TEAM` unless the table already has rows.
pub async fn seed_default_team(repo: &SqliteUserRepository) -> anyhow::Result<SeedOutcome> {
    let existing = repo.count().await?;
    if existing > 0 {
        info!(existing, "users table not empty, skipping seed");
        return Ok(SeedOutcome::AlreadyPopulated(existing));
    }

    let mut created = Vec::with_capacity(DEFAULT_TEAM.len());
    for (username, full_name, status) in DEFAULT_TEAM {
        created.push(add_user(repo, username, DEFAULT_PASSWORD, full_name, status).await?);
    }
    Ok(SeedOutcome::Seeded(created))
}

pub async fn add_user(
    repo: &SqliteUserRepository,
    username: &str,
    password: &str,
    full_name: &str,
    status: Status,
) -> anyhow::Result<User> {
    anyhow::ensure!(!username.trim().is_empty(), "username must not be empty");
    anyhow::ensure!(!password.is_empty(), "password must not be empty");
    anyhow::ensure!(!full_name.trim().is_empty(), "full name must not be empty");

    let password_hash = hash_password(password)?;
    let user = repo
        .create(NewUser {
            username,
            password_hash: &password_hash,
            full_name,
            status,
        })
        .await?;
    info!(user_id = user.id, username = %user.username, status = %user.status, "user created");
    Ok(user)
}
