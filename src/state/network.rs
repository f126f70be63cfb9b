use crate::state::messages::{NetworkRequest, NetworkResponse};
use chrono::{DateTime, TimeDelta, Utc};
use cricket_api::auth::{Session, SignUpOutcome};
use cricket_api::client::{ApiError, ApiResult, CricketApi};
use cricket_api::registration::{PlayerDraft, ProfileImage};
use futures_util::future::{AbortHandle, Abortable};
use log::{debug, error, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

/// Upcoming tournaments shown on the dashboard.
pub const DASHBOARD_UPCOMING: usize = 3;

/// Access tokens this close to expiry are renewed before use.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Requests in the same slot replace each other: only the newest one may
/// deliver a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Session,
    Leaderboard,
    Tournaments,
    Dashboard,
    Registration,
}

impl NetworkRequest {
    pub fn slot(&self) -> Slot {
        match self {
            NetworkRequest::RestoreSession { .. }
            | NetworkRequest::SignIn { .. }
            | NetworkRequest::SignUp { .. }
            | NetworkRequest::SignOut { .. } => Slot::Session,
            NetworkRequest::LoadLeaderboard { .. } => Slot::Leaderboard,
            NetworkRequest::LoadTournaments { .. } => Slot::Tournaments,
            NetworkRequest::LoadDashboard { .. } => Slot::Dashboard,
            NetworkRequest::RegisterPlayer { .. } => Slot::Registration,
        }
    }

    /// The session an authenticated request carries.
    fn session(&self) -> Option<&Session> {
        match self {
            NetworkRequest::LoadLeaderboard { session, .. }
            | NetworkRequest::LoadTournaments { session }
            | NetworkRequest::LoadDashboard { session } => session.as_ref(),
            NetworkRequest::RegisterPlayer { session, .. } => Some(session),
            _ => None,
        }
    }

    /// Swap the carried session. `None` turns reads anonymous; a registration
    /// keeps what it has.
    fn replace_session(&mut self, fresh: Option<Session>) {
        match self {
            NetworkRequest::LoadLeaderboard { session, .. }
            | NetworkRequest::LoadTournaments { session }
            | NetworkRequest::LoadDashboard { session } => *session = fresh,
            NetworkRequest::RegisterPlayer { session, .. } => {
                if let Some(fresh) = fresh {
                    *session = fresh;
                }
            }
            _ => {}
        }
    }
}

enum Freshness {
    Current(Session),
    Refreshed(Session),
    Rejected { refresh_token: String },
    Unreachable,
}

/// Renews access tokens that are about to lapse. Refreshes run one at a time
/// so concurrent requests share the rotated token instead of spending the
/// same refresh token twice.
#[derive(Clone, Default)]
struct SessionKeeper {
    latest: Arc<tokio::sync::Mutex<Option<Session>>>,
}

impl SessionKeeper {
    async fn ensure_fresh(&self, client: &CricketApi, session: &Session, now: DateTime<Utc>) -> Freshness {
        let deadline = now + TimeDelta::seconds(EXPIRY_MARGIN_SECS);
        if !session.is_expired(deadline) {
            return Freshness::Current(session.clone());
        }

        let mut latest = self.latest.lock().await;
        if let Some(newer) = latest.as_ref()
            && newer.user.id == session.user.id
            && !newer.is_expired(deadline)
        {
            return Freshness::Current(newer.clone());
        }

        match client.refresh_session(&session.refresh_token).await {
            Ok(fresh) => {
                debug!("renewed access token for {}", fresh.user.id);
                *latest = Some(fresh.clone());
                Freshness::Refreshed(fresh)
            }
            Err(e) if e.is_auth_rejection() => {
                warn!("session for {} was refused on renewal: {e}", session.user.id);
                Freshness::Rejected { refresh_token: session.refresh_token.clone() }
            }
            Err(e) => {
                warn!("could not renew session for {}: {e}", session.user.id);
                Freshness::Unreachable
            }
        }
    }

    /// Put a usable session into `request`. Returns the session change the UI
    /// has to learn about, if any.
    async fn prepare(
        &self,
        client: &CricketApi,
        request: &mut NetworkRequest,
    ) -> Option<NetworkResponse> {
        let session = request.session()?.clone();
        match self.ensure_fresh(client, &session, Utc::now()).await {
            Freshness::Current(current) => {
                request.replace_session(Some(current));
                None
            }
            Freshness::Refreshed(fresh) => {
                request.replace_session(Some(fresh.clone()));
                Some(NetworkResponse::SessionRefreshed { session: fresh })
            }
            Freshness::Rejected { refresh_token } => {
                request.replace_session(None);
                Some(NetworkResponse::SessionExpired { refresh_token })
            }
            Freshness::Unreachable => None,
        }
    }
}

struct InFlight {
    generation: u64,
    abort: AbortHandle,
}

#[derive(Clone, Default)]
struct Slots {
    in_flight: Arc<Mutex<HashMap<Slot, InFlight>>>,
}

impl Slots {
    /// Register `generation` as the newest request in `slot`, aborting the
    /// one it replaces.
    fn begin(&self, slot: Slot, generation: u64, abort: AbortHandle) {
        let previous = self.lock().insert(slot, InFlight { generation, abort });
        if let Some(previous) = previous {
            debug!("{slot:?} request {} superseded by {generation}", previous.generation);
            previous.abort.abort();
        }
    }

    /// True if `generation` is still the newest request in `slot`. Clears the
    /// slot when it is.
    fn finish(&self, slot: Slot, generation: u64) -> bool {
        let mut in_flight = self.lock();
        if in_flight.get(&slot).is_some_and(|f| f.generation == generation) {
            in_flight.remove(&slot);
            true
        } else {
            false
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Slot, InFlight>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Spinner shared by all in-flight requests; spins while any is running.
#[derive(Clone)]
struct Spinner {
    active: Arc<AtomicUsize>,
    responses: mpsc::Sender<NetworkResponse>,
}

impl Spinner {
    async fn start(&self) {
        if self.active.fetch_add(1, Ordering::SeqCst) > 0 {
            return;
        }

        let mut loading_state = LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let active = self.active.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if active.load(Ordering::SeqCst) == 0 {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop(&self, is_ok: bool) {
        if self.active.fetch_sub(1, Ordering::SeqCst) != 1 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

pub struct NetworkWorker {
    client: Arc<CricketApi>,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    slots: Slots,
    spinner: Spinner,
    keeper: SessionKeeper,
    next_generation: u64,
}

impl NetworkWorker {
    pub fn new(
        client: CricketApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: Arc::new(client),
            requests,
            spinner: Spinner { active: Arc::new(AtomicUsize::new(0)), responses: responses.clone() },
            responses,
            slots: Slots::default(),
            keeper: SessionKeeper::default(),
            next_generation: 0,
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.dispatch(request);
        }
        debug!("network request channel closed");
    }

    /// Run `request` on its own task. Whatever was still running in the same
    /// slot is aborted, and a response that loses the race is dropped. A
    /// session renewal is always delivered, even for a superseded request.
    fn dispatch(&mut self, mut request: NetworkRequest) {
        let slot = request.slot();
        self.next_generation += 1;
        let generation = self.next_generation;

        let (abort, registration) = AbortHandle::new_pair();
        self.slots.begin(slot, generation, abort);

        let client = self.client.clone();
        let keeper = self.keeper.clone();
        let slots = self.slots.clone();
        let spinner = self.spinner.clone();
        let responses = self.responses.clone();

        tokio::spawn(async move {
            spinner.start().await;
            if let Some(update) = keeper.prepare(&client, &mut request).await
                && let Err(e) = responses.send(update).await
            {
                error!("Failed to send session update: {e}");
            }
            let outcome = Abortable::new(handle_request(&client, request), registration).await;
            let current = slots.finish(slot, generation);

            match outcome {
                Ok(response) if current => {
                    spinner.stop(!matches!(response, NetworkResponse::Error { .. })).await;
                    if let Err(e) = responses.send(response).await {
                        error!("Failed to send network response: {e}");
                    }
                }
                Ok(_) => {
                    debug!("dropping stale {slot:?} response {generation}");
                    spinner.stop(true).await;
                }
                Err(_) => {
                    debug!("{slot:?} request {generation} aborted");
                    spinner.stop(true).await;
                }
            }
        });
    }
}

/// Reads degrade to empty data and only log; mutations report the backend's
/// message so the user can correct and retry.
async fn handle_request(client: &CricketApi, request: NetworkRequest) -> NetworkResponse {
    match request {
        NetworkRequest::RestoreSession { session } => restore_session(client, session).await,
        NetworkRequest::SignIn { email, password } => match client.sign_in(&email, &password).await {
            Ok(session) => NetworkResponse::SignedIn { session },
            Err(e) => failed("sign in", e),
        },
        NetworkRequest::SignUp { email, password } => match client.sign_up(&email, &password).await {
            Ok(SignUpOutcome::SignedIn(session)) => NetworkResponse::SignedIn { session },
            Ok(SignUpOutcome::ConfirmationRequired { email }) => NetworkResponse::Notice {
                message: format!("Check {email} for a confirmation link, then sign in."),
            },
            Err(e) => failed("sign up", e),
        },
        NetworkRequest::SignOut { session } => {
            if let Err(e) = client.sign_out(&session).await {
                warn!("sign out was not acknowledged: {e}");
            }
            NetworkResponse::SignedOut
        }
        NetworkRequest::LoadLeaderboard { sort, session } => {
            let players = client
                .fetch_leaderboard(sort, session.as_ref())
                .await
                .unwrap_or_else(|e| {
                    error!("Error fetching leaderboard: {e}");
                    Vec::new()
                });
            NetworkResponse::LeaderboardLoaded { sort, players }
        }
        NetworkRequest::LoadTournaments { session } => {
            let tournaments = client.fetch_tournaments(session.as_ref()).await.unwrap_or_else(|e| {
                error!("Error fetching tournaments: {e}");
                Vec::new()
            });
            NetworkResponse::TournamentsLoaded { tournaments }
        }
        NetworkRequest::LoadDashboard { session } => load_dashboard(client, session).await,
        NetworkRequest::RegisterPlayer { session, draft, image_path } => {
            register_player(client, session, draft, image_path).await
        }
    }
}

fn failed(action: &str, err: ApiError) -> NetworkResponse {
    error!("{action} failed: {err}");
    NetworkResponse::Error { message: err.to_string() }
}

async fn restore_session(client: &CricketApi, session: Session) -> NetworkResponse {
    match client.refresh_session(&session.refresh_token).await {
        Ok(session) => NetworkResponse::SessionRestored { session: Some(session) },
        Err(e) if e.is_auth_rejection() => {
            warn!("saved session for {} was refused: {e}", session.user.id);
            NetworkResponse::SessionRestored { session: None }
        }
        Err(e) => {
            warn!("could not reach the server to restore {}: {e}", session.user.id);
            NetworkResponse::SessionRestoreFailed { session }
        }
    }
}

async fn load_dashboard(client: &CricketApi, session: Option<Session>) -> NetworkResponse {
    let upcoming = async {
        client
            .fetch_upcoming_tournaments(DASHBOARD_UPCOMING, session.as_ref())
            .await
            .unwrap_or_else(|e| {
                error!("Error fetching tournaments: {e}");
                Vec::new()
            })
    };
    let player = async {
        let session = session.as_ref()?;
        client
            .fetch_player_for_user(&session.user.id, Some(session))
            .await
            .unwrap_or_else(|e| {
                error!("Error fetching player data: {e}");
                None
            })
    };

    let (upcoming, player) = tokio::join!(upcoming, player);
    NetworkResponse::DashboardLoaded { player, upcoming }
}

async fn register_player(
    client: &CricketApi,
    session: Session,
    draft: PlayerDraft,
    image_path: Option<PathBuf>,
) -> NetworkResponse {
    let profile_image = match image_path {
        Some(path) => match upload_image(client, &session, &path).await {
            Ok(url) => Some(url),
            Err(e) => {
                error!("Error uploading {}: {e}", path.display());
                return NetworkResponse::Error { message: format!("Image upload failed: {e}") };
            }
        },
        None => None,
    };

    let new_player = draft.into_new_player(&session.user.id, profile_image);
    match client.insert_player(&session, &new_player).await {
        Ok(player) => NetworkResponse::PlayerRegistered { player },
        Err(e) => failed("player registration", e),
    }
}

async fn upload_image(client: &CricketApi, session: &Session, path: &Path) -> ApiResult<String> {
    let image = ProfileImage::from_path(path)?;
    client
        .upload_profile_image(session, &image, Utc::now().timestamp_millis())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_api::auth::AuthUser;
    use cricket_api::client::ApiConfig;
    use cricket_api::leaderboard::SortKey;
    use cricket_api::registration::RegistrationForm;
    use cricket_api::PlayerType;
    use futures_util::future::abortable;
    use mockito::{Matcher, Server};

    fn session() -> Session {
        Session {
            access_token: "t".into(),
            refresh_token: "r".into(),
            expires_at: None,
            user: AuthUser { id: "u1".into(), email: Some("asha@example.com".into()) },
        }
    }

    fn draft() -> PlayerDraft {
        let mut form = RegistrationForm {
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
            age: "24".into(),
            ..RegistrationForm::default()
        };
        form.set_player_type(PlayerType::Batter);
        form.cycle_batting_style(true);
        form.validate().unwrap()
    }

    #[tokio::test]
    async fn test_newer_request_aborts_older_in_same_slot() {
        let slots = Slots::default();
        let (first, first_abort) = abortable(std::future::pending::<()>());
        let (second, second_abort) = abortable(async {});

        slots.begin(Slot::Leaderboard, 1, first_abort);
        slots.begin(Slot::Leaderboard, 2, second_abort);

        assert!(first.await.is_err());
        assert!(second.await.is_ok());
        assert!(!slots.finish(Slot::Leaderboard, 1));
        assert!(slots.finish(Slot::Leaderboard, 2));
        assert!(!slots.finish(Slot::Leaderboard, 2));
    }

    #[tokio::test]
    async fn test_slots_are_independent() {
        let slots = Slots::default();
        let (board, board_abort) = abortable(async {});
        let (list, list_abort) = abortable(async {});

        slots.begin(Slot::Leaderboard, 1, board_abort);
        slots.begin(Slot::Tournaments, 2, list_abort);

        assert!(board.await.is_ok());
        assert!(list.await.is_ok());
        assert!(slots.finish(Slot::Leaderboard, 1));
        assert!(slots.finish(Slot::Tournaments, 2));
    }

    #[test]
    fn test_request_slots() {
        let sign_in = NetworkRequest::SignIn { email: "a".into(), password: "b".into() };
        assert_eq!(sign_in.slot(), Slot::Session);
        assert_eq!(NetworkRequest::SignOut { session: session() }.slot(), Slot::Session);
        let board = NetworkRequest::LoadLeaderboard { sort: SortKey::StrikeRate, session: None };
        assert_eq!(board.slot(), Slot::Leaderboard);
        assert_eq!(NetworkRequest::LoadDashboard { session: None }.slot(), Slot::Dashboard);
    }

    #[tokio::test]
    async fn test_failed_fetch_degrades_to_empty() {
        let mut server = Server::new_async().await;
        let _players = server
            .mock("GET", "/rest/v1/players")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"message":"boom"}"#)
            .create_async()
            .await;
        let client = CricketApi::new(ApiConfig::new(server.url(), "k"));

        let request = NetworkRequest::LoadLeaderboard { sort: SortKey::WicketsTaken, session: None };
        match handle_request(&client, request).await {
            NetworkResponse::LeaderboardLoaded { sort, players } => {
                assert_eq!(sort, SortKey::WicketsTaken);
                assert!(players.is_empty());
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dashboard_without_session_skips_profile() {
        let mut server = Server::new_async().await;
        let _tournaments = server
            .mock("GET", "/rest/v1/tournaments")
            .match_query(Matcher::UrlEncoded("limit".into(), "3".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let players = server
            .mock("GET", "/rest/v1/players")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let client = CricketApi::new(ApiConfig::new(server.url(), "k"));

        let response = handle_request(&client, NetworkRequest::LoadDashboard { session: None }).await;
        assert!(matches!(
            response,
            NetworkResponse::DashboardLoaded { player: None, ref upcoming } if upcoming.is_empty()
        ));
        players.assert_async().await;
    }

    #[tokio::test]
    async fn test_mutation_failure_surfaces_message() {
        let mut server = Server::new_async().await;
        let _insert = server
            .mock("POST", "/rest/v1/players")
            .with_status(409)
            .with_body(r#"{"message":"duplicate key value violates unique constraint"}"#)
            .create_async()
            .await;
        let client = CricketApi::new(ApiConfig::new(server.url(), "k"));

        let request = NetworkRequest::RegisterPlayer { session: session(), draft: draft(), image_path: None };
        match handle_request(&client, request).await {
            NetworkResponse::Error { message } => {
                assert_eq!(message, "duplicate key value violates unique constraint")
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreadable_image_aborts_registration() {
        let mut server = Server::new_async().await;
        let insert = server.mock("POST", "/rest/v1/players").expect(0).create_async().await;
        let client = CricketApi::new(ApiConfig::new(server.url(), "k"));

        let request = NetworkRequest::RegisterPlayer {
            session: session(),
            draft: draft(),
            image_path: Some(PathBuf::from("/definitely/not/here.png")),
        };
        let response = handle_request(&client, request).await;
        assert!(
            matches!(response, NetworkResponse::Error { ref message } if message.starts_with("Image upload failed"))
        );
        insert.assert_async().await;
    }

    #[tokio::test]
    async fn test_expired_refresh_clears_session() {
        let mut server = Server::new_async().await;
        let _refresh = server
            .mock("POST", "/auth/v1/token")
            .match_query(Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()))
            .with_status(400)
            .with_body(r#"{"error_description":"Invalid Refresh Token"}"#)
            .create_async()
            .await;
        let client = CricketApi::new(ApiConfig::new(server.url(), "k"));

        let response = handle_request(&client, NetworkRequest::RestoreSession { session: session() }).await;
        assert!(matches!(response, NetworkResponse::SessionRestored { session: None }));
    }

    fn expired_session() -> Session {
        Session { access_token: "stale".into(), expires_at: Some(1), ..session() }
    }

    const RENEWED_TOKEN: &str = r#"{
        "access_token": "fresh",
        "refresh_token": "r2",
        "expires_in": 3600,
        "user": {"id": "u1", "email": "asha@example.com"}
    }"#;

    #[tokio::test]
    async fn test_unreachable_backend_keeps_saved_session() {
        let client = CricketApi::new(ApiConfig::new("http://127.0.0.1:1", "k"));

        let response = handle_request(&client, NetworkRequest::RestoreSession { session: session() }).await;
        match response {
            NetworkResponse::SessionRestoreFailed { session: kept } => assert_eq!(kept, session()),
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_expiring_session_is_renewed_before_request() {
        let mut server = Server::new_async().await;
        let refresh = server
            .mock("POST", "/auth/v1/token")
            .match_query(Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()))
            .with_status(200)
            .with_body(RENEWED_TOKEN)
            .expect(1)
            .create_async()
            .await;
        let tournaments = server
            .mock("GET", "/rest/v1/tournaments")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer fresh")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let client = CricketApi::new(ApiConfig::new(server.url(), "k"));

        let (request_tx, request_rx) = mpsc::channel(8);
        let (response_tx, mut response_rx) = mpsc::channel(64);
        let worker = tokio::spawn(NetworkWorker::new(client, request_rx, response_tx).run());

        request_tx
            .send(NetworkRequest::LoadTournaments { session: Some(expired_session()) })
            .await
            .unwrap();

        let mut delivered = Vec::new();
        while let Some(response) = response_rx.recv().await {
            if matches!(response, NetworkResponse::LoadingStateChanged { .. }) {
                continue;
            }
            let done = matches!(response, NetworkResponse::TournamentsLoaded { .. });
            delivered.push(response);
            if done {
                break;
            }
        }
        assert!(matches!(
            &delivered[..],
            [NetworkResponse::SessionRefreshed { session }, NetworkResponse::TournamentsLoaded { .. }]
                if session.access_token == "fresh" && session.refresh_token == "r2"
        ));
        refresh.assert_async().await;
        tournaments.assert_async().await;
        worker.abort();
    }

    #[tokio::test]
    async fn test_renewal_is_shared_between_requests() {
        let mut server = Server::new_async().await;
        let refresh = server
            .mock("POST", "/auth/v1/token")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(RENEWED_TOKEN)
            .expect(1)
            .create_async()
            .await;
        let client = CricketApi::new(ApiConfig::new(server.url(), "k"));
        let keeper = SessionKeeper::default();

        let mut board = NetworkRequest::LoadLeaderboard {
            sort: SortKey::RunsScored,
            session: Some(expired_session()),
        };
        let mut dashboard = NetworkRequest::LoadDashboard { session: Some(expired_session()) };

        assert!(matches!(
            keeper.prepare(&client, &mut board).await,
            Some(NetworkResponse::SessionRefreshed { .. })
        ));
        assert!(keeper.prepare(&client, &mut dashboard).await.is_none());
        assert_eq!(dashboard.session().map(|s| s.access_token.as_str()), Some("fresh"));
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_refused_renewal_turns_reads_anonymous() {
        let mut server = Server::new_async().await;
        let _refresh = server
            .mock("POST", "/auth/v1/token")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error_description":"Invalid Refresh Token"}"#)
            .create_async()
            .await;
        let client = CricketApi::new(ApiConfig::new(server.url(), "k"));
        let keeper = SessionKeeper::default();

        let mut request = NetworkRequest::LoadTournaments { session: Some(expired_session()) };
        let update = keeper.prepare(&client, &mut request).await;
        assert!(matches!(update, Some(NetworkResponse::SessionExpired { ref refresh_token }) if refresh_token == "r"));
        assert!(request.session().is_none());
    }

    #[tokio::test]
    async fn test_current_session_goes_out_untouched() {
        let server = Server::new_async().await;
        let client = CricketApi::new(ApiConfig::new(server.url(), "k"));
        let keeper = SessionKeeper::default();

        let mut request = NetworkRequest::LoadDashboard { session: Some(session()) };
        assert!(keeper.prepare(&client, &mut request).await.is_none());
        assert_eq!(request.session(), Some(&session()));
    }

    #[tokio::test]
    async fn test_worker_delivers_response() {
        let mut server = Server::new_async().await;
        let _tournaments = server
            .mock("GET", "/rest/v1/tournaments")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let client = CricketApi::new(ApiConfig::new(server.url(), "k"));

        let (request_tx, request_rx) = mpsc::channel(8);
        let (response_tx, mut response_rx) = mpsc::channel(64);
        let worker = tokio::spawn(NetworkWorker::new(client, request_rx, response_tx).run());

        request_tx.send(NetworkRequest::LoadTournaments { session: None }).await.unwrap();

        let mut delivered = None;
        while let Some(response) = response_rx.recv().await {
            if !matches!(response, NetworkResponse::LoadingStateChanged { .. }) {
                delivered = Some(response);
                break;
            }
        }
        assert!(matches!(
            delivered,
            Some(NetworkResponse::TournamentsLoaded { ref tournaments }) if tournaments.is_empty()
        ));
        worker.abort();
    }
}
