use crate::utils::error::AppError;
use std::env;
use std::ops::RangeInclusive;

const JWT_TTL_HOURS: RangeInclusive<i64> = 1..=8760;
const BCRYPT_COST: RangeInclusive<u32> = 4..=31;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub users_collection: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub cors_origin: String,
}

impl AppConfig {
    /// Reads configuration from the environment; call `dotenv()` first.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let text = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        let mongodb_uri = text("MONGODB_URI", "mongodb://localhost:27017");
        let database_name = var("MONGODB_DATABASE")
            .or_else(|| database_from_uri(&mongodb_uri))
            .unwrap_or_else(|| "trip_planner".to_string());

        Ok(Self {
            host: text("HOST", "0.0.0.0"),
            port: parse_var(&var, "PORT", 8080)?,
            mongodb_uri,
            database_name,
            users_collection: text("USERS_COLLECTION", "users"),
            jwt_secret: text("JWT_SECRET", "default-secret-change-me"),
            jwt_issuer: text("JWT_ISSUER", "itinerary-service"),
            jwt_audience: text("JWT_AUDIENCE", "itinerary-api"),
            jwt_ttl_hours: in_range("JWT_TTL_HOURS", parse_var(&var, "JWT_TTL_HOURS", 24)?, JWT_TTL_HOURS)?,
            bcrypt_cost: in_range(
                "BCRYPT_COST",
                parse_var(&var, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
                BCRYPT_COST,
            )?,
            cors_origin: text("CORS_ORIGIN", "http://localhost:3000"),
        })
    }

    /// Connection string with any `user:password@` part masked, for logging.
    pub fn redacted_mongodb_uri(&self) -> String {
        redact_uri(&self.mongodb_uri)
    }
}

fn parse_var<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError> {
    match var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::InvalidRequest(format!("{} has an invalid value: '{}'", name, raw))),
        None => Ok(default),
    }
}

fn in_range<T>(name: &str, value: T, range: RangeInclusive<T>) -> Result<T, AppError>
where
    T: PartialOrd + std::fmt::Display,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(AppError::InvalidRequest(format!(
            "{} must be between {} and {}, got {}",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}

/// Database name from the path segment of a connection string, if any.
fn database_from_uri(uri: &str) -> Option<String> {
    let rest = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
    let (_, path) = rest.split_once('/')?;
    let name = path.split('?').next().unwrap_or("");
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn redact_uri(uri: &str) -> String {
    let (scheme, rest) = match uri.split_once("://") {
        Some((scheme, rest)) => (format!("{}://", scheme), rest),
        None => (String::new(), uri),
    };
    let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{}***@{}", scheme, &rest[at + 1..]),
        None => uri.to_string(),
    }
}
