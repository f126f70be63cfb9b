use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AccountMode, AppState, NoticeKind};
use crate::state::messages::NetworkRequest;
use crate::state::session::SessionStore;
use cricket_api::auth::Session;
use cricket_api::leaderboard::SortKey;
use cricket_api::{Player, Tournament};
use log::{error, info};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Dashboard,
    Tournaments,
    Leaderboard,
    Register,
    Account,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    store: SessionStore,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let store = SessionStore::new(settings.session_file.clone());
        Self { state: AppState::new(), settings, store }
    }

    /// What to fetch right after start: resume a saved session (the
    /// dashboard follows once it resolves) and load the public boards.
    pub fn startup_requests(&self) -> Vec<NetworkRequest> {
        let first = match self.stored_session() {
            Some(session) => NetworkRequest::RestoreSession { session },
            None => NetworkRequest::LoadDashboard { session: None },
        };
        vec![first, self.leaderboard_request(), self.tournaments_request()]
    }

    fn stored_session(&self) -> Option<Session> {
        self.store.load().unwrap_or_else(|e| {
            error!("Discarding saved session: {e:#}");
            self.forget_stored_session();
            None
        })
    }

    fn forget_stored_session(&self) {
        if let Err(e) = self.store.clear() {
            error!("Could not remove saved session: {e:#}");
        }
    }

    fn remember_session(&self, session: &Session) {
        if let Err(e) = self.store.save(session) {
            error!("Could not save session to {}: {e:#}", self.store.path().display());
        }
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_session_restored(&mut self, session: Option<Session>) -> Vec<NetworkRequest> {
        match session {
            Some(session) => {
                info!("session restored for {}", session.user.id);
                self.remember_session(&session);
                self.start_session(session);
            }
            None => {
                self.forget_stored_session();
                self.state.notify(NoticeKind::Info, "Your session has expired. Please sign in again.");
            }
        }
        vec![self.dashboard_request()]
    }

    /// The backend was unreachable at start. Keep the saved session and carry
    /// on with it; the worker renews the token once the server answers.
    pub fn on_session_restore_failed(&mut self, session: Session) -> Vec<NetworkRequest> {
        info!("resuming saved session for {} without the server", session.user.id);
        self.start_session(session);
        self.state.notify(NoticeKind::Error, "Could not reach the server. Press r to retry.");
        vec![self.dashboard_request()]
    }

    /// Adopt a renewed token for the account that is still signed in.
    pub fn on_session_refreshed(&mut self, session: Session) {
        let Some(current) = self.state.session.as_ref() else {
            return;
        };
        if current.user.id != session.user.id {
            return;
        }
        self.remember_session(&session);
        self.state.session = Some(session);
    }

    /// The backend refused to renew the session. Ignored when the user has
    /// signed in again since that request left.
    pub fn on_session_expired(&mut self, refresh_token: String) -> Vec<NetworkRequest> {
        let matches = self
            .state
            .session
            .as_ref()
            .is_some_and(|s| s.refresh_token == refresh_token);
        if !matches {
            return Vec::new();
        }
        self.state.session = None;
        self.forget_stored_session();
        self.state.dashboard = Default::default();
        self.state.registration.reset(None);
        self.state.notify(NoticeKind::Info, "Your session has expired. Please sign in again.");
        vec![self.dashboard_request()]
    }

    pub fn on_signed_in(&mut self, session: Session) -> Vec<NetworkRequest> {
        self.remember_session(&session);
        let who = session.user.email.clone().unwrap_or_else(|| session.user.id.clone());
        self.start_session(session);
        self.state.account.password.clear();
        self.state.account.pending = false;
        self.state.account.editing = false;
        self.state.notify(NoticeKind::Success, format!("Signed in as {who}"));
        self.update_tab(MenuItem::Dashboard);
        vec![self.dashboard_request()]
    }

    pub fn on_signed_out(&mut self) -> Vec<NetworkRequest> {
        self.state.notify(NoticeKind::Info, "Signed out");
        vec![self.dashboard_request()]
    }

    pub fn on_leaderboard_loaded(&mut self, sort: SortKey, players: Vec<Player>) {
        self.state.leaderboard.load(sort, players);
    }

    pub fn on_tournaments_loaded(&mut self, tournaments: Vec<Tournament>) {
        self.state.tournaments.load(tournaments);
    }

    pub fn on_dashboard_loaded(&mut self, player: Option<Player>, upcoming: Vec<Tournament>) {
        self.state.dashboard.player = player;
        self.state.dashboard.upcoming = upcoming;
        self.state.dashboard.loaded = true;
    }

    pub fn on_player_registered(&mut self, player: Player) -> Vec<NetworkRequest> {
        info!("player profile {} created", player.id);
        self.state.dashboard.player = Some(player);
        let email = self.state.user_email().map(str::to_owned);
        self.state.registration.reset(email.as_deref());
        self.state.notify(NoticeKind::Success, "Player profile created successfully!");
        self.update_tab(MenuItem::Dashboard);
        vec![self.leaderboard_request()]
    }

    pub fn on_notice(&mut self, message: String) {
        self.state.account.pending = false;
        self.state.notify(NoticeKind::Info, message);
    }

    /// A mutation failed. Forms stay as they were so the user can retry.
    pub fn on_error(&mut self, message: String) {
        self.state.account.pending = false;
        self.state.registration.submitting = false;
        self.state.notify(NoticeKind::Error, message);
    }

    fn start_session(&mut self, session: Session) {
        self.state.registration.reset(session.user.email.as_deref());
        self.state.dashboard = Default::default();
        self.state.session = Some(session);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.stop_editing();
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    /// Re-fetch whatever the active tab shows.
    pub fn refresh(&self) -> Option<NetworkRequest> {
        match self.state.active_tab {
            MenuItem::Dashboard => Some(self.dashboard_request()),
            MenuItem::Leaderboard => Some(self.leaderboard_request()),
            MenuItem::Tournaments => Some(self.tournaments_request()),
            MenuItem::Register | MenuItem::Account | MenuItem::Help => None,
        }
    }

    fn dashboard_request(&self) -> NetworkRequest {
        NetworkRequest::LoadDashboard { session: self.state.session.clone() }
    }

    fn leaderboard_request(&self) -> NetworkRequest {
        NetworkRequest::LoadLeaderboard {
            sort: self.state.leaderboard.sort,
            session: self.state.session.clone(),
        }
    }

    fn tournaments_request(&self) -> NetworkRequest {
        NetworkRequest::LoadTournaments { session: self.state.session.clone() }
    }

    // -----------------------------------------------------------------------
    // Leaderboard
    // -----------------------------------------------------------------------

    pub fn leaderboard_cycle_sort(&mut self, forward: bool) -> NetworkRequest {
        self.state.leaderboard.cycle_sort(forward);
        self.leaderboard_request()
    }

    // -----------------------------------------------------------------------
    // Text entry
    // -----------------------------------------------------------------------

    pub fn start_editing(&mut self) {
        match self.state.active_tab {
            MenuItem::Tournaments => self.state.tournaments.editing = true,
            MenuItem::Register => {
                let registration = &mut self.state.registration;
                if registration.is_editable(registration.focus) {
                    registration.editing = true;
                }
            }
            MenuItem::Account if self.state.session.is_none() => self.state.account.editing = true,
            _ => {}
        }
    }

    pub fn stop_editing(&mut self) {
        self.state.tournaments.editing = false;
        self.state.registration.editing = false;
        self.state.account.editing = false;
    }

    pub fn type_char(&mut self, c: char) {
        match self.state.active_tab {
            MenuItem::Tournaments => self.state.tournaments.push_char(c),
            MenuItem::Register => self.state.registration.push_char(c),
            MenuItem::Account => self.state.account.focused_text().push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.state.active_tab {
            MenuItem::Tournaments => self.state.tournaments.pop_char(),
            MenuItem::Register => self.state.registration.pop_char(),
            MenuItem::Account => {
                self.state.account.focused_text().pop();
            }
            _ => {}
        }
    }

    /// Move to the next field while typing, staying in edit mode when that
    /// field takes text too.
    pub fn next_field(&mut self) {
        match self.state.active_tab {
            MenuItem::Register => {
                let registration = &mut self.state.registration;
                registration.focus_next();
                registration.editing = registration.is_editable(registration.focus);
            }
            MenuItem::Account => self.state.account.toggle_focus(),
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Player registration
    // -----------------------------------------------------------------------

    /// Validate the form and, when it passes, build the request that creates
    /// the profile. Field errors are shown inline instead.
    pub fn submit_registration(&mut self) -> Option<NetworkRequest> {
        if self.state.registration.submitting {
            return None;
        }
        let Some(session) = self.state.session.clone() else {
            self.state.notify(NoticeKind::Error, "Please sign in to create a player profile");
            return None;
        };

        let registration = &mut self.state.registration;

        match registration.form.validate() {
            Ok(draft) => {
                registration.errors.clear();
                registration.editing = false;
                registration.submitting = true;
                let image_path = registration.form.image_path.trim();
                let image_path = (!image_path.is_empty()).then(|| PathBuf::from(image_path));
                Some(NetworkRequest::RegisterPlayer { session, draft, image_path })
            }
            Err(errors) => {
                if let Some(first) = errors.keys().next() {
                    registration.focus = *first;
                }
                registration.errors = errors;
                registration.editing = false;
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Account
    // -----------------------------------------------------------------------

    pub fn submit_account(&mut self) -> Option<NetworkRequest> {
        if self.state.session.is_some() || self.state.account.pending {
            return None;
        }
        match self.state.account.credentials() {
            Ok((email, password)) => {
                self.state.account.pending = true;
                self.state.account.editing = false;
                Some(match self.state.account.mode {
                    AccountMode::SignIn => NetworkRequest::SignIn { email, password },
                    AccountMode::SignUp => NetworkRequest::SignUp { email, password },
                })
            }
            Err(reason) => {
                self.state.notify(NoticeKind::Error, reason);
                None
            }
        }
    }

    /// Tear the session down locally right away; the returned request only
    /// tells the backend.
    pub fn sign_out(&mut self) -> Option<NetworkRequest> {
        let session = self.state.session.take()?;
        self.forget_stored_session();
        self.state.dashboard = Default::default();
        self.state.registration.reset(None);
        Some(NetworkRequest::SignOut { session })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_api::auth::AuthUser;
    use cricket_api::client::ApiConfig;
    use cricket_api::registration::FormField;
    use cricket_api::PlayerType;
    use log::LevelFilter;

    fn app(name: &str) -> App {
        let session_file = std::env::temp_dir()
            .join(format!("crictui-app-{}-{name}", std::process::id()))
            .join("session.json");
        App::new(AppSettings {
            full_screen: false,
            log_level: LevelFilter::Off,
            api: ApiConfig::new("http://localhost:54321", "anon"),
            session_file,
        })
    }

    fn session() -> Session {
        Session {
            access_token: "t".into(),
            refresh_token: "r".into(),
            expires_at: None,
            user: AuthUser { id: "u1".into(), email: Some("asha@example.com".into()) },
        }
    }

    #[test]
    fn test_startup_without_saved_session() {
        let app = app("startup");
        let requests = app.startup_requests();
        assert_eq!(requests.len(), 3);
        assert!(matches!(requests[0], NetworkRequest::LoadDashboard { session: None }));
        assert!(matches!(
            requests[1],
            NetworkRequest::LoadLeaderboard { sort: SortKey::RunsScored, .. }
        ));
    }

    #[test]
    fn test_sign_in_persists_and_sign_out_clears() {
        let mut app = app("lifecycle");
        app.state.active_tab = MenuItem::Account;
        let follow_up = app.on_signed_in(session());
        assert!(matches!(follow_up[..], [NetworkRequest::LoadDashboard { session: Some(_) }]));
        assert_eq!(app.state.active_tab, MenuItem::Dashboard);
        assert_eq!(app.state.registration.form.email, "asha@example.com");
        assert!(matches!(app.startup_requests()[0], NetworkRequest::RestoreSession { .. }));

        app.state.dashboard.player = Some(Player::default());
        let request = app.sign_out();
        assert!(matches!(request, Some(NetworkRequest::SignOut { .. })));
        assert!(app.state.session.is_none());
        assert!(app.state.dashboard.player.is_none());
        assert!(matches!(app.startup_requests()[0], NetworkRequest::LoadDashboard { session: None }));
        assert!(app.sign_out().is_none());
    }

    #[test]
    fn test_failed_restore_drops_session() {
        let mut app = app("restore");
        app.remember_session(&session());
        let follow_up = app.on_session_restored(None);
        assert!(matches!(follow_up[..], [NetworkRequest::LoadDashboard { session: None }]));
        assert!(app.state.notice.is_some());
        assert!(matches!(app.startup_requests()[0], NetworkRequest::LoadDashboard { .. }));
    }

    #[test]
    fn test_unreachable_server_keeps_saved_session() {
        let mut app = app("offline");
        app.remember_session(&session());
        let follow_up = app.on_session_restore_failed(session());
        assert!(matches!(follow_up[..], [NetworkRequest::LoadDashboard { session: Some(_) }]));
        assert_eq!(app.state.session, Some(session()));
        assert_eq!(app.state.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
        assert!(matches!(app.startup_requests()[0], NetworkRequest::RestoreSession { .. }));
    }

    #[test]
    fn test_renewed_session_replaces_stale_one() {
        let mut app = app("renewed");
        app.state.session = Some(session());
        let fresh = Session { access_token: "fresh".into(), refresh_token: "r2".into(), ..session() };
        app.on_session_refreshed(fresh.clone());
        assert_eq!(app.state.session, Some(fresh.clone()));
        match app.refresh() {
            Some(NetworkRequest::LoadDashboard { session }) => assert_eq!(session, Some(fresh.clone())),
            other => panic!("unexpected {other:?}"),
        }
        match &app.startup_requests()[0] {
            NetworkRequest::RestoreSession { session } => assert_eq!(session.refresh_token, "r2"),
            other => panic!("unexpected {other:?}"),
        }

        let other_user = Session { user: AuthUser { id: "u2".into(), email: None }, ..session() };
        app.on_session_refreshed(other_user);
        assert_eq!(app.state.session, Some(fresh));
    }

    #[test]
    fn test_refused_renewal_signs_out_once() {
        let mut app = app("expired");
        app.remember_session(&session());
        app.state.session = Some(session());

        assert!(app.on_session_expired("someone-else".into()).is_empty());
        assert!(app.state.session.is_some());

        let follow_up = app.on_session_expired("r".into());
        assert!(matches!(follow_up[..], [NetworkRequest::LoadDashboard { session: None }]));
        assert!(app.state.session.is_none());
        assert!(matches!(app.startup_requests()[0], NetworkRequest::LoadDashboard { .. }));
        assert!(app.on_session_expired("r".into()).is_empty());
    }

    #[test]
    fn test_account_without_email_can_type_one() {
        let mut app = app("no-email");
        let anonymous = Session { user: AuthUser { id: "u9".into(), email: None }, ..session() };
        app.on_signed_in(anonymous);
        app.update_tab(MenuItem::Register);
        app.state.registration.focus = FormField::Email;
        app.start_editing();
        assert!(app.state.registration.editing);
        app.type_char('a');
        assert_eq!(app.state.registration.form.email, "a");
    }

    #[test]
    fn test_registration_needs_session() {
        let mut app = app("no-session");
        assert!(app.submit_registration().is_none());
        let notice = app.state.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
    }

    #[test]
    fn test_invalid_registration_stays_local() {
        let mut app = app("invalid");
        app.state.session = Some(session());
        app.state.registration.reset(Some("asha@example.com"));
        app.state.registration.form.name = "A".into();

        assert!(app.submit_registration().is_none());
        let errors = &app.state.registration.errors;
        assert_eq!(errors.get(&FormField::Name).map(String::as_str), Some("Name must be at least 2 characters"));
        assert_eq!(app.state.registration.focus, FormField::Name);
        assert!(!app.state.registration.submitting);
    }

    #[test]
    fn test_valid_registration_builds_request_once() {
        let mut app = app("valid");
        app.state.session = Some(session());
        let reg = &mut app.state.registration;
        reg.reset(Some("asha@example.com"));
        reg.form.name = "Asha Rao".into();
        reg.form.phone = "9876543210".into();
        reg.form.age = "27".into();
        reg.form.set_player_type(PlayerType::AllRounder);
        reg.form.cycle_batting_style(true);
        reg.form.cycle_bowling_style(true);
        reg.form.image_path = " /tmp/me.png ".into();

        match app.submit_registration() {
            Some(NetworkRequest::RegisterPlayer { draft, image_path, .. }) => {
                assert_eq!(draft.age, 27);
                assert_eq!(image_path, Some(PathBuf::from("/tmp/me.png")));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(app.submit_registration().is_none());

        app.on_error("Image upload failed".into());
        assert!(!app.state.registration.submitting);
        assert_eq!(app.state.registration.form.name, "Asha Rao");
    }

    #[test]
    fn test_account_submit_picks_flow() {
        let mut app = app("account");
        app.state.account.email = "new@example.com".into();
        app.state.account.password = "secret123".into();
        app.state.account.mode = AccountMode::SignUp;
        assert!(matches!(app.submit_account(), Some(NetworkRequest::SignUp { .. })));
        assert!(app.submit_account().is_none());

        app.on_notice("Check your inbox".into());
        app.state.account.mode = AccountMode::SignIn;
        assert!(matches!(app.submit_account(), Some(NetworkRequest::SignIn { .. })));
    }

    #[test]
    fn test_sort_cycle_requests_new_board() {
        let mut app = app("sort");
        let request = app.leaderboard_cycle_sort(false);
        assert!(matches!(
            request,
            NetworkRequest::LoadLeaderboard { sort: SortKey::StrikeRate, session: None }
        ));
    }
}
