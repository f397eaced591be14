// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Number of entries returned by the leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

/// User id recorded on results submitted without an active session.
pub const ANONYMOUS_USER_ID: &str = "anonymous";

/// Owner id of the built-in sample quizzes.
pub const SYSTEM_USER_ID: &str = "system";

/// Bounds accepted for a quiz time limit, in minutes.
pub const MIN_TIME_LIMIT_MINUTES: u32 = 1;
pub const MAX_TIME_LIMIT_MINUTES: u32 = 120;

/// Time limit and point value pre-filled for new quizzes and questions.
pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 10;
pub const DEFAULT_QUESTION_POINTS: u32 = 10;

/// Upper bound on the points a single question may carry.
pub const MAX_QUESTION_POINTS: u32 = 1000;

const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub port: u16,
    pub log_dir: String,
    /// Browser origins allowed to call the API.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://quiz.db?mode=rwc".to_string());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let log_dir = env::var("LOG_DIR")
            .unwrap_or_else(|_| "logs".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|origins| parse_origins(&origins))
            .unwrap_or_else(|_| default_origins());

        Self {
            database_url,
            rust_log,
            port,
            log_dir,
            cors_origins,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            rust_log: "info".to_string(),
            port: 3000,
            log_dir: "logs".to_string(),
            cors_origins: default_origins(),
        }
    }
}

fn default_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()
}

/// Splits a comma-separated origin list, dropping empty entries.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" https://quiz.example.com ,,http://localhost:8080"),
            vec!["https://quiz.example.com", "http://localhost:8080"]
        );
        assert!(parse_origins(" , ").is_empty());
    }

    #[test]
    fn test_default_allows_dev_server() {
        let config = Config::default();
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.cors_origins[0], "http://localhost:5173");
    }
}
