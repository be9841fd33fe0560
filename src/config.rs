use anyhow::Context;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

use crate::expenses::dto::to_cents;

/// Upper bound for `JWT_TTL_MINUTES`, one hundred years.
pub const MAX_TTL_MINUTES: i64 = 100 * 366 * 24 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Unset means tokens never expire.
    pub ttl_minutes: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// `DATABASE_URL` wins over the discrete `DB_*` parts.
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return url.parse().context("parse DATABASE_URL");
        }
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    pub spending_limit: Decimal,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL").ok(),
            host: std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".into()),
            port: parse_var("DB_PORT")?.unwrap_or(5432),
            user: std::env::var("DB_USER").unwrap_or_else(|_| "postgres".into()),
            password: std::env::var("DB_PASSWORD").unwrap_or_default(),
            name: std::env::var("DB_NAME").unwrap_or_else(|_| "expenses".into()),
            max_connections: parse_var("DB_MAX_CONNECTIONS")?.unwrap_or(10),
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            ttl_minutes: check_ttl_minutes(parse_var("JWT_TTL_MINUTES")?)?,
        };
        let port = match parse_var("APP_PORT")? {
            Some(p) => p,
            None => parse_var("PORT")?.unwrap_or(5000),
        };
        Ok(Self {
            database,
            jwt,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            spending_limit: check_spending_limit(
                parse_var("SPENDING_LIMIT")?.unwrap_or(Decimal::new(1_264_500, 2)),
            )?,
        })
    }
}

fn check_ttl_minutes(ttl: Option<i64>) -> anyhow::Result<Option<i64>> {
    match ttl {
        Some(m) if !(1..=MAX_TTL_MINUTES).contains(&m) => Err(anyhow::anyhow!(
            "JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {m}"
        )),
        ttl => Ok(ttl),
    }
}

/// Limits are whole cents and not negative.
fn check_spending_limit(limit: Decimal) -> anyhow::Result<Decimal> {
    if limit.is_sign_negative() && !limit.is_zero() {
        anyhow::bail!("SPENDING_LIMIT must not be negative, got {limit}");
    }
    Ok(to_cents(limit))
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid {name}={raw:?}: {e}")),
        Err(_) => Ok(None),
    }
}
