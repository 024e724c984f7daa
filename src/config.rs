use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub debug_key: String,
    pub bind_addr: String,
    pub cors_origin: String,
    pub run_migrations: bool,
    pub balance_cache_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let debug_key = env::var("DEBUG_KEY")
            .map_err(|_| "DEBUG_KEY must be set".to_string())?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let cors_origin = env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:4200".to_string());

        let run_migrations = match env::var("RUN_MIGRATIONS") {
            Ok(value) => parse_flag(&value)?,
            Err(_) => true,
        };

        let balance_cache_ttl = match env::var("BALANCE_CACHE_TTL_SECS") {
            Ok(value) => value
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| format!("BALANCE_CACHE_TTL_SECS must be a number of seconds, got '{}'", value))?,
            Err(_) => Duration::from_secs(300),
        };

        Ok(Self {
            database_url,
            debug_key,
            bind_addr,
            cors_origin,
            run_migrations,
            balance_cache_ttl,
        })
    }
}

fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("RUN_MIGRATIONS must be true or false, got '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Ok(true));
        assert_eq!(parse_flag(" off "), Ok(false));
        assert!(parse_flag("maybe").is_err());
    }
}
