use crate::state::network::LoadingState;
use cricket_api::auth::Session;
use cricket_api::leaderboard::SortKey;
use cricket_api::registration::PlayerDraft;
use cricket_api::{Player, Tournament};
use crossterm::event::KeyEvent;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// Trade a persisted session's refresh token for a fresh one.
    RestoreSession { session: Session },
    SignIn { email: String, password: String },
    SignUp { email: String, password: String },
    SignOut { session: Session },
    LoadLeaderboard { sort: SortKey, session: Option<Session> },
    LoadTournaments { session: Option<Session> },
    /// Own profile (when signed in) plus the next few upcoming tournaments.
    LoadDashboard { session: Option<Session> },
    RegisterPlayer {
        session: Session,
        draft: PlayerDraft,
        image_path: Option<PathBuf>,
    },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// `None` when the backend refused the stored session.
    SessionRestored { session: Option<Session> },
    /// The backend could not be reached; the stored session is still good.
    SessionRestoreFailed { session: Session },
    /// An expiring access token was swapped before a request went out.
    SessionRefreshed { session: Session },
    /// The refresh token was refused while renewing an expiring session.
    SessionExpired { refresh_token: String },
    SignedIn { session: Session },
    SignedOut,
    LeaderboardLoaded { sort: SortKey, players: Vec<Player> },
    TournamentsLoaded { tournaments: Vec<Tournament> },
    DashboardLoaded { player: Option<Player>, upcoming: Vec<Tournament> },
    PlayerRegistered { player: Player },
    Notice { message: String },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    Tick,
}
