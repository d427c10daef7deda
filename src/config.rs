//! Configuration management for the Festival Lineup Playlist CLI.
//!
//! This module handles loading configuration values from environment variables
//! and `.env` files. The values are collected once at startup into a [`Config`]
//! that is passed by reference to everything that talks to Spotify and is
//! never mutated afterwards.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use thiserror::Error;

const DEFAULT_SCOPE: &str =
    "user-library-read playlist-modify-public playlist-modify-private user-read-recently-played";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Variable holding the default lineup document.
pub const LINEUP_URL_VAR: &str = "FESTIVAL_LINEUP_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Read-only runtime configuration.
///
/// Built once per process run by [`Config::from_env`]. Optional values fall
/// back to CLI flags at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the OAuth callback server binds to, e.g. `127.0.0.1:8888`.
    pub server_addr: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    /// Playlist used when `--playlist` is not given.
    pub playlist_id: Option<String>,
    /// Lineup document used when `--url` is not given.
    pub lineup_url: Option<String>,
    /// IANA timezone applied to naive history bounds when `--timezone` is not given.
    pub default_timezone: Option<String>,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// Call [`load_env`] first so that values from the `.env` file are visible.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first required variable that
    /// is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| non_empty(lookup(key));
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            server_addr: required("SERVER_ADDRESS")?,
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            redirect_uri: required("SPOTIFY_API_REDIRECT_URI")?,
            scope: optional("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url: optional("SPOTIFY_API_AUTH_URL")
                .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: optional("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: optional("SPOTIFY_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            playlist_id: optional("SPOTIFY_PLAYLIST_ID"),
            lineup_url: optional(LINEUP_URL_VAR),
            default_timezone: optional("DEFAULT_TIMEZONE"),
        })
    }
}

/// The default lineup URL on its own.
///
/// `lineupcli lineup` talks to no Spotify endpoint, so it reads this without
/// requiring the credentials [`Config::from_env`] insists on.
pub fn lineup_url_from_env() -> Option<String> {
    non_empty(env::var(LINEUP_URL_VAR).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `lineupcli/.env`.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/lineupcli/.env`
/// - macOS: `~/Library/Application Support/lineupcli/.env`
/// - Windows: `%LOCALAPPDATA%/lineupcli/.env`
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - The `.env` file cannot be read or parsed
///
/// Variables already present in the process environment are not overridden,
/// so a missing file is not fatal for callers that export them directly.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("lineupcli/.env");
    path
}
