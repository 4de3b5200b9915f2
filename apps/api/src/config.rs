use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on entries per repeatable section accepted by the layout endpoints.
    pub max_blocks_per_section: usize,
    /// Allowed page-count gap between print planning and preview measurement.
    pub consistency_tolerance_pages: usize,
    /// Idle time after which a preview session is evicted.
    pub preview_session_ttl_secs: u64,
    /// Upper bound on open preview sessions; the least recently used is evicted beyond it.
    pub max_preview_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            max_blocks_per_section: 100,
            consistency_tolerance_pages: 1,
            preview_session_ttl_secs: 1800,
            max_preview_sessions: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            max_blocks_per_section: parse_env(
                "MAX_BLOCKS_PER_SECTION",
                defaults.max_blocks_per_section,
            )
            .context("MAX_BLOCKS_PER_SECTION must be a non-negative integer")?,
            consistency_tolerance_pages: parse_env(
                "CONSISTENCY_TOLERANCE_PAGES",
                defaults.consistency_tolerance_pages,
            )
            .context("CONSISTENCY_TOLERANCE_PAGES must be a non-negative integer")?,
            preview_session_ttl_secs: parse_env(
                "PREVIEW_SESSION_TTL_SECS",
                defaults.preview_session_ttl_secs,
            )
            .context("PREVIEW_SESSION_TTL_SECS must be a non-negative integer")?,
            max_preview_sessions: parse_env("MAX_PREVIEW_SESSIONS", defaults.max_preview_sessions)
                .context("MAX_PREVIEW_SESSIONS must be a non-negative integer")?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value {raw:?} for environment variable '{key}'")),
        Err(_) => Ok(default),
    }
}
