//! Bearer token acquisition and caching for the metadata API.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use super::{MetadataError, models::TokenResponse};

/// Tokens are refreshed this long before the server-side expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

/// Client-credentials token source with an in-memory cache.
///
/// The cache sits behind an async mutex held across the refresh request, so
/// concurrent callers wait for one refresh instead of each fetching a token.
#[derive(Debug)]
pub struct TokenProvider {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cached: Mutex::new(None),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Current access token, fetching a new one if none is cached or it is about to expire.
    pub async fn access_token(&self) -> Result<String, MetadataError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
            tracing::debug!("Metadata access token expired, refreshing");
        }

        let fresh = self.fetch().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    /// Drop the cached token; the next `access_token` call fetches a new one.
    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }

    async fn fetch(&self) -> Result<CachedToken, MetadataError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Token endpoint returned {}", status);
            return Err(MetadataError::Token(format!(
                "token endpoint returned {}",
                status.as_u16()
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| MetadataError::Decode(e.to_string()))?;

        if body.access_token.is_empty() {
            return Err(MetadataError::Token("empty access token".to_string()));
        }
        if let Some(kind) = body.token_type.as_deref() {
            if !kind.eq_ignore_ascii_case("bearer") {
                tracing::warn!("Unexpected token type {:?}, using it as a bearer token", kind);
            }
        }

        tracing::info!("Obtained metadata access token valid for {}s", body.expires_in);

        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(EXPIRY_MARGIN);
        Ok(CachedToken {
            access_token: body.access_token,
            refresh_at: Instant::now() + lifetime,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::task::JoinSet;

    use super::*;
    use crate::metadata::mock_server::{MockMetadataServer, Rejection};

    fn provider(server: &MockMetadataServer) -> TokenProvider {
        let settings = server.settings();
        TokenProvider::new(
            reqwest::Client::new(),
            settings.token_url,
            settings.client_id,
            settings.client_secret,
        )
    }

    #[tokio::test]
    async fn token_inside_the_expiry_margin_is_refetched() {
        let server = MockMetadataServer::start_with_expiry(Rejection::Never, 30).await;
        let tokens = provider(&server);

        assert_eq!(tokens.access_token().await.unwrap(), "token-1");
        assert_eq!(tokens.access_token().await.unwrap(), "token-2");
        assert_eq!(server.token_requests(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_fetch() {
        let server = MockMetadataServer::start(Rejection::Never).await;
        let tokens = Arc::new(provider(&server));

        let mut callers = JoinSet::new();
        for _ in 0..8 {
            let tokens = tokens.clone();
            callers.spawn(async move { tokens.access_token().await });
        }

        while let Some(result) = callers.join_next().await {
            assert_eq!(result.unwrap().unwrap(), "token-1");
        }
        assert_eq!(server.token_requests(), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_a_new_token() {
        let server = MockMetadataServer::start(Rejection::Never).await;
        let tokens = provider(&server);

        assert_eq!(tokens.access_token().await.unwrap(), "token-1");
        assert_eq!(tokens.access_token().await.unwrap(), "token-1");

        tokens.invalidate().await;

        assert_eq!(tokens.access_token().await.unwrap(), "token-2");
        assert_eq!(server.token_requests(), 2);
    }
}
