use anyhow::Context;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use time::OffsetDateTime;

use crate::users::repo_types::{NewUser, Status, User};

const USER_COLUMNS: &str = "id, username, password_hash, full_name, status, updated_at";

/// The operations request handlers need from the user store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by exact (case-sensitive) username.
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;

    /// All users ordered by full name. `Some(statuses)` keeps only rows whose
    /// status is in the set; an empty set matches nothing.
    async fn list(&self, statuses: Option<&[Status]>) -> anyhow::Result<Vec<User>>;

    /// Overwrite status and `updated_at`. `None` if the row no longer exists.
    async fn update_status(
        &self,
        id: i64,
        status: Status,
        at: OffsetDateTime,
    ) -> anyhow::Result<Option<User>>;
}

#[derive(Clone)]
pub struct SqliteUserRepository {
    db: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert a new user. Provisioning only; no endpoint calls this.
    pub async fn create(&self, new: NewUser<'_>) -> anyhow::Result<User> {
        let res = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, password_hash, full_name, status, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new.username)
        .bind(new.password_hash)
        .bind(new.full_name)
        .bind(new.status)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                anyhow::bail!("username {:?} already exists", new.username)
            }
            Err(e) => Err(e).context("insert user"),
        }
    }

    pub async fn count(&self) -> anyhow::Result<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await
            .context("count users")?;
        Ok(n)
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    async fn list(&self, statuses: Option<&[Status]>) -> anyhow::Result<Vec<User>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {USER_COLUMNS} FROM users"));
        if let Some(statuses) = statuses {
            if statuses.is_empty() {
                return Ok(Vec::new());
            }
            qb.push(" WHERE status IN (");
            let mut sep = qb.separated(", ");
            for status in statuses {
                sep.push_bind(*status);
            }
            sep.push_unseparated(")");
        }
        qb.push(" ORDER BY full_name ASC, id ASC");

        let users = qb
            .build_query_as::<User>()
            .fetch_all(&self.db)
            .await
            .context("list users")?;
        Ok(users)
    }

    async fn update_status(
        &self,
        id: i64,
        status: Status,
        at: OffsetDateTime,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET status = ?, updated_at = ?
             WHERE id = ?
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(status)
        .bind(at)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("update user status")?;
        Ok(user)
    }
}
