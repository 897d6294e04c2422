use crate::dotenv;
use crate::error::Error;

pub static DATABASE_URL: &str = "DATABASE_URL";
pub static JWT_SECRET: &str = "JWT_SECRET";
pub static BIND_HOST: &str = "BIND_HOST";
pub static BIND_PORT: &str = "BIND_PORT";
pub static DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_host: String,
    pub bind_port: u16,
    pub max_connections: u32,
}

impl Config {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).filter(|v| !v.is_empty()).ok_or_else(|| Error::ServerError(format!("environment variable {} not been set", key)));
        Ok(Config {
            database_url: required(DATABASE_URL)?,
            jwt_secret: required(JWT_SECRET)?,
            bind_host: lookup(BIND_HOST).unwrap_or_else(|| "0.0.0.0".into()),
            bind_port: lookup(BIND_PORT).map(|v| v.parse::<u16>()).transpose()?.unwrap_or(8000),
            max_connections: lookup(DATABASE_MAX_CONNECTIONS).map(|v| v.parse::<u32>()).transpose()?.unwrap_or(5),
        })
    }
}
