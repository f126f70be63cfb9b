use crate::auth::Session;
use crate::leaderboard::SortKey;
use crate::query::{Direction, Select};
use crate::registration::ProfileImage;
use crate::{NewPlayer, Player, Tournament, TournamentStatus};
use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const PLAYERS_TABLE: &str = "players";
pub const TOURNAMENTS_TABLE: &str = "tournaments";
pub const PROFILE_IMAGE_BUCKET: &str = "player-images";

/// Row cap for the leaderboard. Tournaments are listed without one.
pub const LEADERBOARD_LIMIT: usize = 50;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Project root, e.g. `https://abcd.supabase.co`. No trailing slash needed.
    pub base_url: String,
    pub anon_key: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            anon_key: anon_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Client for the hosted backend: REST rows, auth and file storage.
#[derive(Debug, Clone)]
pub struct CricketApi {
    client: Client,
    config: ApiConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error for {1}: {0}")]
    Network(#[source] reqwest::Error, String),
    /// Non-success status. `message` is what the backend said, suitable for
    /// showing to the user as-is.
    #[error("{message}")]
    Backend { status: u16, message: String, url: String },
    #[error("Parse error for {1}: {0}")]
    Parsing(#[source] reqwest::Error, String),
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Error: {0}")]
    Other(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend refused the credentials themselves, as opposed to being
    /// unreachable or failing.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.status(), Some(400 | 401 | 403))
    }
}

impl CricketApi {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("crictui/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    /// Top players by the chosen metric, best first, capped at
    /// [`LEADERBOARD_LIMIT`] rows.
    pub async fn fetch_leaderboard(
        &self,
        sort: SortKey,
        session: Option<&Session>,
    ) -> ApiResult<Vec<Player>> {
        let query = Select::from(PLAYERS_TABLE)
            .order(sort.column(), Direction::Descending)
            .limit(LEADERBOARD_LIMIT);
        self.select(&query, session).await
    }

    /// Every tournament, earliest start first.
    pub async fn fetch_tournaments(&self, session: Option<&Session>) -> ApiResult<Vec<Tournament>> {
        let query = Select::from(TOURNAMENTS_TABLE).order("start_date", Direction::Ascending);
        self.select(&query, session).await
    }

    pub async fn fetch_upcoming_tournaments(
        &self,
        limit: usize,
        session: Option<&Session>,
    ) -> ApiResult<Vec<Tournament>> {
        let query = Select::from(TOURNAMENTS_TABLE)
            .eq("status", TournamentStatus::Upcoming.as_str())
            .order("start_date", Direction::Ascending)
            .limit(limit);
        self.select(&query, session).await
    }

    /// The player profile owned by an account. An account without a profile
    /// yields `Ok(None)`.
    pub async fn fetch_player_for_user(
        &self,
        user_id: &str,
        session: Option<&Session>,
    ) -> ApiResult<Option<Player>> {
        let query = Select::from(PLAYERS_TABLE).eq("user_id", user_id).limit(1);
        let rows: Vec<Player> = self.select(&query, session).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert_player(&self, session: &Session, player: &NewPlayer) -> ApiResult<Player> {
        let url = self.rest_url(PLAYERS_TABLE);
        debug!("inserting player profile for {}", player.user_id);
        let request = self
            .authorized(self.client.post(&url), Some(session))
            .header("Prefer", "return=representation")
            .json(player);
        let rows: Vec<Player> = self.send(request, &url).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ApiError::Other("player insert returned no rows".into()))
    }

    /// Upload a profile picture under `profiles/` and return its public URL.
    pub async fn upload_profile_image(
        &self,
        session: &Session,
        image: &ProfileImage,
        timestamp_ms: i64,
    ) -> ApiResult<String> {
        let path = image.storage_path(&session.user.id, timestamp_ms);
        let url = format!(
            "{}/storage/v1/object/{PROFILE_IMAGE_BUCKET}/{path}",
            self.config.base_url
        );
        debug!("uploading profile image to {path}");
        let request = self
            .authorized(self.client.post(&url), Some(session))
            .header("Content-Type", image.content_type)
            .body(image.bytes.clone());
        let _: serde_json::Value = self.send(request, &url).await?;
        Ok(self.public_url(&path))
    }

    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{PROFILE_IMAGE_BUCKET}/{path}",
            self.config.base_url
        )
    }

    async fn select<T: DeserializeOwned>(
        &self,
        query: &Select,
        session: Option<&Session>,
    ) -> ApiResult<Vec<T>> {
        let url = self.rest_url(&query.to_path());
        debug!("select {}", query.table());
        let request = self.authorized(self.client.get(&url), session);
        self.send(request, &url).await
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{path}", self.config.base_url)
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.base_url)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Attach the project key and a bearer token: the session's access token
    /// when signed in, the anon key otherwise.
    pub(crate) fn authorized(&self, request: RequestBuilder, session: Option<&Session>) -> RequestBuilder {
        let token = session
            .map(|s| s.access_token.as_str())
            .unwrap_or(self.config.anon_key.as_str());
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
            .timeout(self.config.timeout)
    }

    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> ApiResult<T> {
        self.execute(request, url)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }

    /// Send and check the status, leaving the body to the caller.
    pub(crate) async fn execute(&self, request: RequestBuilder, url: &str) -> ApiResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Backend {
            status: status.as_u16(),
            message: backend_message(status.canonical_reason(), &body),
            url: url.to_owned(),
        })
    }
}

/// Pull a human readable message out of an error body. The REST, auth and
/// storage services each use a different field for it.
fn backend_message(reason: Option<&str>, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|value| {
        ["message", "error_description", "msg", "error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_owned))
    });

    from_json
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                reason.unwrap_or("request failed").to_owned()
            } else {
                trimmed.to_owned()
            }
        })
}
