//! Configuration management for the crawlers.
//!
//! Credentials and endpoints come from environment variables, optionally
//! loaded from `.env` files. Nothing here is global mutable state: each job
//! reads the values it needs once and hands an explicit config value to the
//! constructor of every provider client it builds.
//!
//! Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`tunecrawl/.env`)
//! 4. Defaults for endpoints, paths and match parameters

use std::{env, path::PathBuf};

use crate::{errors::ConfigError, pipeline::similarity::SimilarityMetric};

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_GENIUS_API_URL: &str = "https://api.genius.com";
pub const DEFAULT_LASTFM_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.8;

/// Loads `.env` files from the working directory and the local data
/// directory.
///
/// Missing files are fine; already set variables are never overwritten.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let _ = dotenv::dotenv();

    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Location of the per-user `.env` file.
///
/// - Linux: `~/.local/share/tunecrawl/.env`
/// - macOS: `~/Library/Application Support/tunecrawl/.env`
/// - Windows: `%LOCALAPPDATA%/tunecrawl/.env`
pub fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tunecrawl/.env");
    path
}

#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_url: String,
    pub token_url: String,
}

#[derive(Debug, Clone)]
pub struct GeniusConfig {
    pub token: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct LastfmConfig {
    pub api_key: String,
    pub api_url: String,
}

#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    pub threshold: f64,
    pub metric: SimilarityMetric,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            metric: SimilarityMetric::Gestalt,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathConfig {
    /// Where input files such as `unique_tracks.csv` live.
    pub data_path: PathBuf,
    /// Where job output is written.
    pub output_path: PathBuf,
}

/// Spotify client credentials and endpoints.
///
/// Requires `SPOTIFY_API_AUTH_CLIENT_ID` and `SPOTIFY_API_AUTH_CLIENT_SECRET`.
pub fn spotify() -> Result<SpotifyConfig, ConfigError> {
    Ok(SpotifyConfig {
        client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
        client_secret: required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
        api_url: optional("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
        token_url: optional("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
    })
}

/// Genius bearer token and endpoint. Requires `GENIUS_API_TOKEN`.
pub fn genius() -> Result<GeniusConfig, ConfigError> {
    Ok(GeniusConfig {
        token: required("GENIUS_API_TOKEN")?,
        api_url: optional("GENIUS_API_URL", DEFAULT_GENIUS_API_URL),
    })
}

/// Last.fm API key and endpoint. Requires `LASTFM_API_KEY`.
pub fn lastfm() -> Result<LastfmConfig, ConfigError> {
    Ok(LastfmConfig {
        api_key: required("LASTFM_API_KEY")?,
        api_url: optional("LASTFM_API_URL", DEFAULT_LASTFM_API_URL),
    })
}

/// Similarity threshold and metric used for reconciliation.
///
/// Reads `MATCH_THRESHOLD` (default 0.8) and `MATCH_METRIC` (default
/// `gestalt`).
pub fn matching() -> Result<MatchConfig, ConfigError> {
    let threshold = match env::var("MATCH_THRESHOLD") {
        Ok(value) => parse_threshold(&value).ok_or(ConfigError::Invalid {
            var: "MATCH_THRESHOLD",
            value,
        })?,
        Err(_) => DEFAULT_MATCH_THRESHOLD,
    };

    let metric = match env::var("MATCH_METRIC") {
        Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
            var: "MATCH_METRIC",
            value,
        })?,
        Err(_) => SimilarityMetric::Gestalt,
    };

    Ok(MatchConfig { threshold, metric })
}

/// Input and output directories (`TUNECRAWL_DATA_PATH`,
/// `TUNECRAWL_OUTPUT_PATH`).
pub fn paths() -> PathConfig {
    PathConfig {
        data_path: PathBuf::from(optional("TUNECRAWL_DATA_PATH", "data")),
        output_path: PathBuf::from(optional("TUNECRAWL_OUTPUT_PATH", "output_data")),
    }
}

/// Parses a similarity threshold; only values in `[0, 1]` are accepted.
pub fn parse_threshold(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|t| (0.0..=1.0).contains(t))
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(var)),
    }
}

fn optional(var: &str, default: &str) -> String {
    env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_accepts_unit_interval() {
        assert_eq!(parse_threshold("0.8"), Some(0.8));
        assert_eq!(parse_threshold(" 1 "), Some(1.0));
        assert_eq!(parse_threshold("0"), Some(0.0));
    }

    #[test]
    fn threshold_rejects_out_of_range_and_garbage() {
        assert_eq!(parse_threshold("1.5"), None);
        assert_eq!(parse_threshold("-0.1"), None);
        assert_eq!(parse_threshold("high"), None);
    }

    #[test]
    fn default_match_config_mirrors_historic_behaviour() {
        let cfg = MatchConfig::default();
        assert_eq!(cfg.threshold, 0.8);
        assert_eq!(cfg.metric, SimilarityMetric::Gestalt);
    }
}
