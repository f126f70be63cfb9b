use crate::app::MenuItem;
use cricket_api::auth::Session;
use cricket_api::leaderboard::{RankedPlayer, SortKey, rank};
use cricket_api::registration::{FieldErrors, FormField, RegistrationForm};
use cricket_api::search::{StatusFilter, filter_tournaments};
use cricket_api::{Player, Tournament};
use std::time::{Duration, Instant};

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Supabase rejects shorter passwords on sign-up.
const MIN_PASSWORD_LEN: usize = 6;

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    raised_at: Instant,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>, now: Instant) -> Self {
        Self { kind, message: message.into(), raised_at: now }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= NOTICE_TTL
    }
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct LeaderboardState {
    pub sort: SortKey,
    pub ranked: Vec<RankedPlayer>,
    pub loaded: bool,
    pub selected: usize,
}

impl LeaderboardState {
    /// Rows for a key other than the current one are ignored.
    pub fn load(&mut self, sort: SortKey, players: Vec<Player>) {
        if sort != self.sort {
            return;
        }
        self.ranked = rank(players);
        self.loaded = true;
        self.selected = self.selected.min(self.ranked.len().saturating_sub(1));
    }

    /// Switch metric; the board is stale until the next load.
    pub fn cycle_sort(&mut self, forward: bool) -> SortKey {
        self.sort = if forward { self.sort.next() } else { self.sort.prev() };
        self.loaded = false;
        self.selected = 0;
        self.sort
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.ranked.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Tournaments
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TournamentsState {
    pub all: Vec<Tournament>,
    pub query: String,
    pub status: StatusFilter,
    /// Keystrokes go to the search box.
    pub editing: bool,
    pub selected: usize,
    pub loaded: bool,
}

impl TournamentsState {
    pub fn load(&mut self, tournaments: Vec<Tournament>) {
        self.all = tournaments;
        self.loaded = true;
        self.clamp_selection();
    }

    pub fn visible(&self) -> Vec<&Tournament> {
        filter_tournaments(&self.all, &self.query, self.status)
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.selected = 0;
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.selected = 0;
    }

    pub fn cycle_status(&mut self, forward: bool) {
        self.status = if forward { self.status.next() } else { self.status.prev() };
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible().len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.visible().len().saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct DashboardState {
    /// `None` until the signed-in account has created its profile.
    pub player: Option<Player>,
    pub upcoming: Vec<Tournament>,
    pub loaded: bool,
}

// ---------------------------------------------------------------------------
// Player registration form
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RegistrationState {
    pub form: RegistrationForm,
    pub focus: FormField,
    pub errors: FieldErrors,
    pub editing: bool,
    pub submitting: bool,
    /// Set when the account supplied the email; the field is then read-only.
    pub email_locked: bool,
}

impl RegistrationState {
    pub fn reset(&mut self, email: Option<&str>) {
        *self = Self {
            form: RegistrationForm::for_account(email),
            email_locked: email.is_some_and(|e| !e.trim().is_empty()),
            ..Self::default()
        };
    }

    /// Whether `field` takes typed input.
    pub fn is_editable(&self, field: FormField) -> bool {
        field.is_text() && !(field == FormField::Email && self.email_locked)
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Type into the focused field. An account-supplied email stays as is.
    pub fn push_char(&mut self, c: char) {
        if !self.is_editable(self.focus) {
            return;
        }
        if let Some(text) = self.form.text_mut(self.focus) {
            text.push(c);
            self.errors.remove(&self.focus);
        }
    }

    pub fn pop_char(&mut self) {
        if !self.is_editable(self.focus) {
            return;
        }
        if let Some(text) = self.form.text_mut(self.focus) {
            text.pop();
        }
    }

    /// Step through the options of the focused picker field.
    pub fn cycle_option(&mut self, forward: bool) {
        match self.focus {
            FormField::PlayerType => self.form.cycle_player_type(),
            FormField::BattingStyle => self.form.cycle_batting_style(forward),
            FormField::BowlingStyle => self.form.cycle_bowling_style(forward),
            _ => return,
        }
        self.errors.remove(&self.focus);
    }
}

// ---------------------------------------------------------------------------
// Account (sign in / sign up)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountMode {
    #[default]
    SignIn,
    SignUp,
}

impl AccountMode {
    pub fn label(&self) -> &'static str {
        match self {
            AccountMode::SignIn => "Sign In",
            AccountMode::SignUp => "Sign Up",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountField {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Default)]
pub struct AccountState {
    pub mode: AccountMode,
    pub email: String,
    pub password: String,
    pub focus: AccountField,
    pub editing: bool,
    pub pending: bool,
}

impl AccountState {
    pub fn focused_text(&mut self) -> &mut String {
        match self.focus {
            AccountField::Email => &mut self.email,
            AccountField::Password => &mut self.password,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            AccountField::Email => AccountField::Password,
            AccountField::Password => AccountField::Email,
        };
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AccountMode::SignIn => AccountMode::SignUp,
            AccountMode::SignUp => AccountMode::SignIn,
        };
    }

    /// Trimmed email and password, or the reason they can't be sent.
    pub fn credentials(&self) -> Result<(String, String), &'static str> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err("Email and password are required");
        }
        if self.mode == AccountMode::SignUp && self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 6 characters");
        }
        Ok((email.to_owned(), self.password.clone()))
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    /// The signed-in account, passed explicitly into requests that need it.
    pub session: Option<Session>,
    pub notice: Option<Notice>,
    pub dashboard: DashboardState,
    pub leaderboard: LeaderboardState,
    pub tournaments: TournamentsState,
    pub registration: RegistrationState,
    pub account: AccountState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notice = Some(Notice::new(kind, message, Instant::now()));
    }

    /// Drop the notice once it has been up for [`NOTICE_TTL`]. Returns true
    /// when the screen changed.
    pub fn expire_notice(&mut self, now: Instant) -> bool {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
            return true;
        }
        false
    }

    /// Whether the active tab is capturing keystrokes as text.
    pub fn is_editing(&self) -> bool {
        match self.active_tab {
            MenuItem::Tournaments => self.tournaments.editing,
            MenuItem::Register => self.registration.editing,
            MenuItem::Account => self.account.editing,
            _ => false,
        }
    }

    pub fn user_email(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.user.email.as_deref())
    }
}
