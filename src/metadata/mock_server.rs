//! In-process stand-in for the metadata API and its token endpoint.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;

use crate::config::MetadataSettings;

const CLIENT_ID: &str = "test-client";
const CLIENT_SECRET: &str = "test-secret";

/// Which bearer tokens the games endpoint turns away with 401.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rejection {
    #[default]
    Never,
    /// Only the first token ever issued, as if it had been revoked.
    FirstToken,
    Always,
}

#[derive(Default)]
struct Recorded {
    tokens_issued: AtomicUsize,
    searches: AtomicUsize,
    last_body: Mutex<String>,
    last_client_id: Mutex<Option<String>>,
    rejection: Rejection,
    expires_in: u64,
}

pub struct MockMetadataServer {
    addr: SocketAddr,
    recorded: Arc<Recorded>,
}

impl MockMetadataServer {
    /// Start on an ephemeral port, issuing tokens valid for an hour.
    pub async fn start(rejection: Rejection) -> Self {
        Self::start_with_expiry(rejection, 3600).await
    }

    pub async fn start_with_expiry(rejection: Rejection, expires_in: u64) -> Self {
        let recorded = Arc::new(Recorded {
            rejection,
            expires_in,
            ..Default::default()
        });

        let app = Router::new()
            .route("/oauth2/token", post(issue_token))
            .route("/v4/games", post(search_games))
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, recorded }
    }

    pub fn settings(&self) -> MetadataSettings {
        MetadataSettings {
            client_id: CLIENT_ID.to_string(),
            client_secret: CLIENT_SECRET.to_string(),
            base_url: format!("http://{}/v4", self.addr),
            token_url: format!("http://{}/oauth2/token", self.addr),
            timeout_secs: 5,
        }
    }

    pub fn token_requests(&self) -> usize {
        self.recorded.tokens_issued.load(Ordering::SeqCst)
    }

    pub fn search_requests(&self) -> usize {
        self.recorded.searches.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> String {
        self.recorded.last_body.lock().unwrap().clone()
    }

    pub fn last_client_id(&self) -> Option<String> {
        self.recorded.last_client_id.lock().unwrap().clone()
    }
}

async fn issue_token(
    State(recorded): State<Arc<Recorded>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let valid = form.get("client_id").map(String::as_str) == Some(CLIENT_ID)
        && form.get("client_secret").map(String::as_str) == Some(CLIENT_SECRET)
        && form.get("grant_type").map(String::as_str) == Some("client_credentials");
    if !valid {
        return (StatusCode::BAD_REQUEST, "invalid client").into_response();
    }

    let n = recorded.tokens_issued.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({
        "access_token": format!("token-{n}"),
        "expires_in": recorded.expires_in,
        "token_type": "bearer"
    }))
    .into_response()
}

async fn search_games(
    State(recorded): State<Arc<Recorded>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    recorded.searches.fetch_add(1, Ordering::SeqCst);
    *recorded.last_body.lock().unwrap() = body.clone();
    *recorded.last_client_id.lock().unwrap() = headers
        .get("Client-ID")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let auth = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let rejected = match recorded.rejection {
        Rejection::Never => false,
        Rejection::FirstToken => auth == "Bearer token-1",
        Rejection::Always => true,
    };
    if rejected || !auth.starts_with("Bearer token-") {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    if body.contains("zzz-nothing") {
        return Json(json!([])).into_response();
    }

    Json(catalog()).into_response()
}

fn catalog() -> serde_json::Value {
    json!([
        {
            "id": 113113,
            "name": "Hades II",
            "first_release_date": 1715126400,
            "genres": [{ "name": "Role-playing (RPG)" }]
        },
        {
            "id": 113112,
            "name": "Hades",
            "summary": "Defy the god of the dead.",
            "first_release_date": 1600300800,
            "cover": { "url": "//images.igdb.com/igdb/image/upload/t_thumb/co39vc.jpg" },
            "genres": [{ "name": "Role-playing (RPG)" }, { "name": "Indie" }],
            "game_modes": [{ "name": "Single player" }]
        },
        {
            "id": 119171,
            "name": "It Takes Two",
            "summary": "A co-op adventure.",
            "first_release_date": 1616716800,
            "genres": [{ "name": "Adventure" }],
            "game_modes": [{ "name": "Co-operative" }, { "name": "Split screen" }],
            "multiplayer_modes": [
                { "onlinecoop": true, "offlinecoop": true, "onlinemax": 2, "offlinemax": 2 }
            ]
        }
    ])
}
