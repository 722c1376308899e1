//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): SQLite connection string, defaults to `sqlite://game_library.db?mode=rwc`
/// - `SERVER_HOST` (optional): bind address, defaults to 127.0.0.1
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `API_TOKEN` (optional): when set, `/api/v1` routes require `Authorization: Bearer <token>`
/// - `METADATA_CLIENT_ID` / `METADATA_CLIENT_SECRET` (optional): credentials for the metadata API
/// - `METADATA_BASE_URL` (optional): metadata API root, defaults to IGDB v4
/// - `METADATA_TOKEN_URL` (optional): OAuth token endpoint, defaults to Twitch
/// - `METADATA_TIMEOUT_SECS` (optional): per-request timeout, defaults to 10
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_host")]
    pub server_host: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default)]
    pub api_token: Option<String>,

    #[serde(default)]
    pub metadata_client_id: Option<String>,

    #[serde(default)]
    pub metadata_client_secret: Option<String>,

    #[serde(default = "default_metadata_base_url")]
    pub metadata_base_url: String,

    #[serde(default = "default_metadata_token_url")]
    pub metadata_token_url: String,

    #[serde(default = "default_metadata_timeout")]
    pub metadata_timeout_secs: u64,
}

fn default_database_url() -> String {
    "sqlite://game_library.db?mode=rwc".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_metadata_base_url() -> String {
    "https://api.igdb.com/v4".to_string()
}

fn default_metadata_token_url() -> String {
    "https://id.twitch.tv/oauth2/token".to_string()
}

fn default_metadata_timeout() -> u64 {
    10
}

/// Credentials needed to talk to the metadata API.
#[derive(Debug, Clone)]
pub struct MetadataSettings {
    pub client_id: String,
    pub client_secret: String,
    pub base_url: String,
    pub token_url: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values cannot be parsed into expected types
    /// (e.g., a non-numeric SERVER_PORT).
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }

    /// Metadata settings, present only when both client id and secret are configured
    /// and non-blank.
    pub fn metadata(&self) -> Option<MetadataSettings> {
        let client_id = non_blank(self.metadata_client_id.as_deref())?;
        let client_secret = non_blank(self.metadata_client_secret.as_deref())?;

        Some(MetadataSettings {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            base_url: self.metadata_base_url.clone(),
            token_url: self.metadata_token_url.clone(),
            timeout_secs: self.metadata_timeout_secs,
        })
    }

    /// The configured access token, ignoring an empty `API_TOKEN=`.
    pub fn api_token(&self) -> Option<&str> {
        non_blank(self.api_token.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(vars: &[(&str, &str)]) -> Config {
        envy::from_iter::<_, Config>(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = parse(&[]);

        assert_eq!(config.database_url, "sqlite://game_library.db?mode=rwc");
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 3000);
        assert!(config.api_token().is_none());
        assert!(config.metadata().is_none());
        assert_eq!(config.metadata_timeout_secs, 10);
    }

    #[test]
    fn metadata_requires_both_credentials() {
        let only_id = parse(&[("METADATA_CLIENT_ID", "abc")]);
        assert!(only_id.metadata().is_none());

        let blank_secret = parse(&[
            ("METADATA_CLIENT_ID", "abc"),
            ("METADATA_CLIENT_SECRET", "  "),
        ]);
        assert!(blank_secret.metadata().is_none());

        let both = parse(&[
            ("METADATA_CLIENT_ID", "abc"),
            ("METADATA_CLIENT_SECRET", "shh"),
            ("METADATA_BASE_URL", "http://localhost:9000/v4"),
        ]);
        let settings = both.metadata().unwrap();
        assert_eq!(settings.client_id, "abc");
        assert_eq!(settings.client_secret, "shh");
        assert_eq!(settings.base_url, "http://localhost:9000/v4");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let result = envy::from_iter::<_, Config>(vec![(
            "SERVER_PORT".to_string(),
            "not-a-port".to_string(),
        )]);
        assert!(result.is_err());
    }
}
