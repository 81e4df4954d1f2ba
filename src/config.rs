use crate::error::AppError;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MATCH_COUNT: usize = 10;
pub const MAX_MATCH_COUNT: usize = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub region: String,
    pub data_dir: PathBuf,
    pub match_count: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("RIOT_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let region = env::var("RIOT_REGION").unwrap_or_else(|_| "na1".to_string());

        let data_dir = match env::var("LEAGUE_ROASTER_HOME") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".league_roaster"),
        };

        let match_count = match env::var("LEAGUE_ROASTER_MATCHES") {
            Ok(raw) => parse_match_count(&raw)?,
            Err(_) => DEFAULT_MATCH_COUNT,
        };

        Ok(Config {
            api_key,
            region,
            data_dir,
            match_count,
        })
    }

    /// The key is only needed by commands that talk to Riot.
    pub fn require_api_key(&self) -> Result<&str, AppError> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::ConfigError("RIOT_API_KEY not found in .env file".to_string())
        })
    }
}

fn parse_match_count(raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<usize>() {
        Ok(count) if (1..=MAX_MATCH_COUNT).contains(&count) => Ok(count),
        _ => Err(AppError::ConfigError(format!(
            "LEAGUE_ROASTER_MATCHES must be between 1 and {}, got '{}'",
            MAX_MATCH_COUNT, raw
        ))),
    }
}
