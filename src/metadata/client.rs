//! Game search against the metadata API.

use std::time::Duration;

use reqwest::StatusCode;
use url::Url;

use super::{
    MetadataError,
    matching,
    models::{GAME_FIELDS, MetadataGame},
    token::TokenProvider,
};
use crate::config::MetadataSettings;

/// Default number of search results requested.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Upper bound accepted by the API for a single page.
const MAX_SEARCH_LIMIT: u32 = 50;

#[derive(Debug)]
pub struct MetadataClient {
    http: reqwest::Client,
    games_url: Url,
    tokens: TokenProvider,
}

impl MetadataClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl` if the base or token URL does not parse
    /// - `Http` if the HTTP client cannot be constructed
    pub fn new(settings: &MetadataSettings) -> Result<Self, MetadataError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Url::parse(&settings.token_url)
            .map_err(|e| MetadataError::InvalidUrl(format!("{}: {}", settings.token_url, e)))?;

        let mut base = Url::parse(&settings.base_url)
            .map_err(|e| MetadataError::InvalidUrl(format!("{}: {}", settings.base_url, e)))?;
        // Url::join replaces the last segment unless the base ends with a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let games_url = base
            .join("games")
            .map_err(|e| MetadataError::InvalidUrl(e.to_string()))?;

        let tokens = TokenProvider::new(
            http.clone(),
            settings.token_url.clone(),
            settings.client_id.clone(),
            settings.client_secret.clone(),
        );

        Ok(Self {
            http,
            games_url,
            tokens,
        })
    }

    /// Search games by name, in the API's relevance order.
    ///
    /// A 401 response drops the cached token and the request is retried once
    /// with a fresh one.
    pub async fn search(&self, name: &str, limit: u32) -> Result<Vec<MetadataGame>, MetadataError> {
        let body = search_query(name, limit);

        let mut retried = false;
        loop {
            let token = self.tokens.access_token().await?;
            let response = self
                .http
                .post(self.games_url.clone())
                .header("Client-ID", self.tokens.client_id())
                .bearer_auth(&token)
                .header("Accept", "application/json")
                .body(body.clone())
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED && !retried {
                tracing::warn!("Metadata API rejected access token, refreshing and retrying");
                self.tokens.invalidate().await;
                retried = true;
                continue;
            }
            if !status.is_success() {
                return Err(MetadataError::Status(status.as_u16()));
            }

            let games: Vec<MetadataGame> = response
                .json()
                .await
                .map_err(|e| MetadataError::Decode(e.to_string()))?;

            tracing::debug!("Metadata search for {:?} returned {} results", name, games.len());
            return Ok(games);
        }
    }

    /// Search and keep the result whose name is closest to `name`.
    pub async fn find_best(&self, name: &str) -> Result<Option<MetadataGame>, MetadataError> {
        let mut games = self.search(name, DEFAULT_SEARCH_LIMIT).await?;
        let names: Vec<&str> = games.iter().map(|g| g.name.as_str()).collect();

        match matching::best_match(name, &names) {
            Some((index, distance)) => {
                tracing::info!(
                    "Matched {:?} to {:?} (distance {})",
                    name,
                    games[index].name,
                    distance
                );
                Ok(Some(games.swap_remove(index)))
            }
            None => Ok(None),
        }
    }
}

/// Apicalypse body for a name search.
fn search_query(name: &str, limit: u32) -> String {
    let escaped = name.trim().replace('\\', "\\\\").replace('"', "\\\"");
    let limit = limit.clamp(1, MAX_SEARCH_LIMIT);
    format!("search \"{escaped}\"; fields {GAME_FIELDS}; limit {limit};")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::mock_server::{MockMetadataServer, Rejection};

    #[test]
    fn search_query_escapes_quotes_and_clamps_limit() {
        let query = search_query(" Say \"Hi\" \\ ", 500);
        assert!(query.starts_with("search \"Say \\\"Hi\\\" \\\\\"; fields "));
        assert!(query.ends_with("limit 50;"));
        assert!(search_query("x", 0).ends_with("limit 1;"));
    }

    #[test]
    fn base_url_without_trailing_slash_keeps_version_segment() {
        let settings = MetadataSettings {
            client_id: "id".into(),
            client_secret: "secret".into(),
            base_url: "https://api.example.com/v4".into(),
            token_url: "https://auth.example.com/token".into(),
            timeout_secs: 5,
        };
        let client = MetadataClient::new(&settings).unwrap();
        assert_eq!(client.games_url.as_str(), "https://api.example.com/v4/games");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let settings = MetadataSettings {
            client_id: "id".into(),
            client_secret: "secret".into(),
            base_url: "not a url".into(),
            token_url: "https://auth.example.com/token".into(),
            timeout_secs: 5,
        };
        assert!(matches!(
            MetadataClient::new(&settings),
            Err(MetadataError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn token_is_fetched_once_and_reused() {
        let server = MockMetadataServer::start(Rejection::Never).await;
        let client = MetadataClient::new(&server.settings()).unwrap();

        let first = client.search("Hades", 5).await.unwrap();
        let second = client.search("Celeste", 5).await.unwrap();

        assert!(!first.is_empty());
        assert!(!second.is_empty());
        assert_eq!(server.token_requests(), 1);
        assert_eq!(server.search_requests(), 2);
        assert!(server.last_body().contains("search \"Celeste\";"));
        assert_eq!(server.last_client_id().as_deref(), Some("test-client"));
    }

    #[tokio::test]
    async fn unauthorized_response_refreshes_token_and_retries_once() {
        let server = MockMetadataServer::start(Rejection::FirstToken).await;
        let client = MetadataClient::new(&server.settings()).unwrap();

        let games = client.search("Hades", 5).await.unwrap();

        assert_eq!(games[0].name, "Hades");
        assert_eq!(server.token_requests(), 2);
        assert_eq!(server.search_requests(), 2);
    }

    #[tokio::test]
    async fn persistent_unauthorized_gives_up_after_one_retry() {
        let server = MockMetadataServer::start(Rejection::Always).await;
        let client = MetadataClient::new(&server.settings()).unwrap();

        let err = client.search("Hades", 5).await.unwrap_err();

        assert!(matches!(err, MetadataError::Status(401)));
        assert_eq!(server.search_requests(), 2);
        assert_eq!(server.token_requests(), 2);
    }

    #[tokio::test]
    async fn find_best_picks_closest_name() {
        let server = MockMetadataServer::start(Rejection::Never).await;
        let client = MetadataClient::new(&server.settings()).unwrap();

        let best = client.find_best("hades").await.unwrap().unwrap();
        assert_eq!(best.name, "Hades");
        assert_eq!(best.id, 113112);
    }

    #[tokio::test]
    async fn unknown_title_yields_no_match() {
        let server = MockMetadataServer::start(Rejection::Never).await;
        let client = MetadataClient::new(&server.settings()).unwrap();

        assert!(client.find_best("zzz-nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn token_endpoint_failure_surfaces_as_token_error() {
        let server = MockMetadataServer::start(Rejection::Never).await;
        let mut settings = server.settings();
        settings.client_secret = "wrong".into();
        let client = MetadataClient::new(&settings).unwrap();

        let err = client.search("Hades", 5).await.unwrap_err();
        assert!(matches!(err, MetadataError::Token(_)));
        assert_eq!(server.search_requests(), 0);
    }
}
