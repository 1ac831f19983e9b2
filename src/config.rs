use anyhow::Context;
use axum::http::HeaderValue;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://team_presence.db?mode=rwc";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
const DEFAULT_TTL_MINUTES: i64 = 30;
/// One week.
pub const MAX_TTL_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<HeaderValue>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());

        let secret = get("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .context("JWT_SECRET must be set to a non-empty value")?;
        let jwt = JwtConfig {
            secret,
            issuer: get("JWT_ISSUER").unwrap_or_else(|| "team-presence".into()),
            audience: get("JWT_AUDIENCE").unwrap_or_else(|| "team-presence-dashboard".into()),
            ttl_minutes: ttl_minutes(get("JWT_TTL_MINUTES"))?,
        };

        let host = get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match get("APP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("APP_PORT is not a valid port: {raw}"))?,
            None => 8000,
        };

        let cors_origins = cors_origins(
            &get("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into()),
        )?;

        Ok(Self {
            database_url,
            host,
            port,
            cors_origins,
            jwt,
        })
    }
}

/// Unparsable values fall back to the default; numbers outside
/// `1..=MAX_TTL_MINUTES` are refused.
fn ttl_minutes(raw: Option<String>) -> anyhow::Result<i64> {
    let Some(minutes) = raw.and_then(|v| v.trim().parse::<i64>().ok()) else {
        return Ok(DEFAULT_TTL_MINUTES);
    };
    anyhow::ensure!(
        (1..=MAX_TTL_MINUTES).contains(&minutes),
        "JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {minutes}"
    );
    Ok(minutes)
}

/// Comma separated list of exact origins. Credentials are allowed on CORS
/// responses, so the `*` wildcard cannot be used.
fn cors_origins(raw: &str) -> anyhow::Result<Vec<HeaderValue>> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|origin| {
            anyhow::ensure!(
                origin != "*",
                "CORS_ALLOWED_ORIGINS cannot contain \"*\"; list each origin explicitly"
            );
            HeaderValue::from_str(origin)
                .with_context(|| format!("CORS_ALLOWED_ORIGINS has an invalid origin: {origin}"))
        })
        .collect()
}
