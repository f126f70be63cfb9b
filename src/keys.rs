use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    if guard.state.is_editing() {
        let request = handle_text_entry(key_event, &mut guard);
        drop(guard);
        send(network_requests, request).await;
        return;
    }

    let request = match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => switch_tab(&mut guard, MenuItem::Dashboard),
        (_, Char('2'), _) => switch_tab(&mut guard, MenuItem::Tournaments),
        (_, Char('3'), _) => switch_tab(&mut guard, MenuItem::Leaderboard),
        (_, Char('4'), _) => switch_tab(&mut guard, MenuItem::Register),
        (_, Char('5'), _) => switch_tab(&mut guard, MenuItem::Account),
        (_, Char('?'), _) => switch_tab(&mut guard, MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => {
            guard.exit_help();
            None
        }

        // Leaderboard
        (MenuItem::Leaderboard, Char('s') | KeyCode::Right, _) => {
            Some(guard.leaderboard_cycle_sort(true))
        }
        (MenuItem::Leaderboard, Char('S') | KeyCode::Left, _) => {
            Some(guard.leaderboard_cycle_sort(false))
        }
        (MenuItem::Leaderboard, Char('j') | KeyCode::Down, _) => {
            guard.state.leaderboard.select_next();
            None
        }
        (MenuItem::Leaderboard, Char('k') | KeyCode::Up, _) => {
            guard.state.leaderboard.select_prev();
            None
        }

        // Tournaments
        (MenuItem::Tournaments, Char('/') | Char('i') | KeyCode::Enter, _) => {
            guard.start_editing();
            None
        }
        (MenuItem::Tournaments, Char('t') | KeyCode::Tab, _) => {
            guard.state.tournaments.cycle_status(true);
            None
        }
        (MenuItem::Tournaments, Char('T') | KeyCode::BackTab, _) => {
            guard.state.tournaments.cycle_status(false);
            None
        }
        (MenuItem::Tournaments, Char('j') | KeyCode::Down, _) => {
            guard.state.tournaments.select_next();
            None
        }
        (MenuItem::Tournaments, Char('k') | KeyCode::Up, _) => {
            guard.state.tournaments.select_prev();
            None
        }

        // Player registration form
        (MenuItem::Register, Char('j') | KeyCode::Down | KeyCode::Tab, _) => {
            guard.state.registration.focus_next();
            None
        }
        (MenuItem::Register, Char('k') | KeyCode::Up | KeyCode::BackTab, _) => {
            guard.state.registration.focus_prev();
            None
        }
        (MenuItem::Register, Char('l') | KeyCode::Right | Char(' '), _) => {
            guard.state.registration.cycle_option(true);
            None
        }
        (MenuItem::Register, Char('h') | KeyCode::Left, _) => {
            guard.state.registration.cycle_option(false);
            None
        }
        (MenuItem::Register, KeyCode::Enter, _) => {
            if guard.state.registration.focus.is_text() {
                guard.start_editing();
            } else {
                guard.state.registration.cycle_option(true);
            }
            None
        }
        (MenuItem::Register, Char('s'), _) => guard.submit_registration(),

        // Account
        (MenuItem::Account, Char('j') | Char('k') | KeyCode::Down | KeyCode::Up | KeyCode::Tab, _) => {
            guard.state.account.toggle_focus();
            None
        }
        (MenuItem::Account, KeyCode::Enter | Char('i'), _) => {
            guard.start_editing();
            None
        }
        (MenuItem::Account, Char('m'), _) => {
            guard.state.account.toggle_mode();
            None
        }
        (MenuItem::Account, Char('s'), _) => guard.submit_account(),
        (MenuItem::Account, Char('o'), _) => guard.sign_out(),

        // Global
        (_, Char('r'), _) => guard.refresh(),
        (_, Char('f'), _) => {
            guard.toggle_full_screen();
            None
        }
        (_, Char('"'), _) => {
            guard.toggle_show_logs();
            None
        }

        _ => None,
    };

    drop(guard);
    send(network_requests, request).await;
}

/// Keys while a text field has focus: everything printable is input.
fn handle_text_entry(key_event: KeyEvent, app: &mut App) -> Option<NetworkRequest> {
    match (app.state.active_tab, key_event.code, key_event.modifiers) {
        (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }
        (MenuItem::Account, KeyCode::Enter, _) => app.submit_account(),
        (MenuItem::Register, KeyCode::Enter, _) => app.submit_registration(),
        (_, KeyCode::Esc | KeyCode::Enter, _) => {
            app.stop_editing();
            None
        }
        (_, KeyCode::Tab, _) => {
            app.next_field();
            None
        }
        (_, KeyCode::Backspace, _) => {
            app.backspace();
            None
        }
        (_, Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            app.type_char(c);
            None
        }
        _ => None,
    }
}

fn switch_tab(app: &mut App, tab: MenuItem) -> Option<NetworkRequest> {
    app.update_tab(tab);
    None
}

async fn send(network_requests: &mpsc::Sender<NetworkRequest>, request: Option<NetworkRequest>) {
    if let Some(request) = request {
        let _ = network_requests.send(request).await;
    }
}
