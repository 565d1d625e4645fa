use std::{env, fmt::Display, net::SocketAddr, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::utils::error::{AppError, AppResult};

const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub storage: StorageBackend,
    pub mongo_uri: String,
    pub db_name: String,
    pub cors_origin: Option<String>,
    /// Token signing key. Left unset, token operations fail closed per request.
    pub jwt_secret: Option<String>,
    pub jwt_expires_in: Duration,
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([0, 0, 0, 0], 4000)),
            storage: StorageBackend::Mongo,
            mongo_uri: "mongodb://localhost:27017".to_string(),
            db_name: "polls".to_string(),
            cors_origin: None,
            jwt_secret: None,
            jwt_expires_in: DEFAULT_TOKEN_LIFETIME,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let defaults = Config::default();

        let jwt_expires_in = match optional("JWT_EXPIRES_IN") {
            Some(raw) => parse_expiry(&raw).ok_or_else(|| {
                AppError::ConfigurationError(format!("Invalid JWT_EXPIRES_IN value: {raw}"))
            })?,
            None => defaults.jwt_expires_in,
        };

        let bcrypt_cost: u32 = try_load("BCRYPT_COST", defaults.bcrypt_cost)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(AppError::ConfigurationError(format!(
                "BCRYPT_COST must be between 4 and 31, got {bcrypt_cost}"
            )));
        }

        let jwt_secret = optional("JWT_SECRET");
        if jwt_secret.is_none() {
            warn!("JWT_SECRET not set, login and protected routes will fail");
        }

        Ok(Self {
            server_addr: try_load("SERVER_ADDR", defaults.server_addr)?,
            storage: try_load("STORAGE_BACKEND", defaults.storage)?,
            mongo_uri: optional("MONGO_URI").unwrap_or(defaults.mongo_uri),
            db_name: optional("DB_NAME").unwrap_or(defaults.db_name),
            cors_origin: optional("CORS_ORIGIN"),
            jwt_secret,
            jwt_expires_in,
            bcrypt_cost,
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn try_load<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    match optional(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| AppError::ConfigurationError(format!("Invalid {key} value: {e}"))),
        None => {
            info!("{key} not set, using default: {default:?}");
            Ok(default)
        }
    }
}

/// Parses token lifetimes such as `3600`, `90s`, `30m`, `12h`, `7d` or `2w`.
/// A bare number counts seconds.
pub fn parse_expiry(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);

    let amount: u64 = digits.parse().ok()?;
    let seconds = match unit.trim() {
        "" | "s" => amount,
        "m" => amount.checked_mul(60)?,
        "h" => amount.checked_mul(60 * 60)?,
        "d" => amount.checked_mul(24 * 60 * 60)?,
        "w" => amount.checked_mul(7 * 24 * 60 * 60)?,
        _ => return None,
    };

    (seconds > 0).then(|| Duration::from_secs(seconds))
}
