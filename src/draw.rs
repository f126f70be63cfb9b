use chrono::{DateTime, Local, NaiveDate};
use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Gauge, List, ListItem, ListState, Paragraph, Row,
    Table, TableState, Tabs, Wrap,
};
use tui::{Frame, Terminal};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::{App, MenuItem};
use crate::components::rank_badge::{rank_badge, tier_color, tier_label};
use crate::state::app_state::{AccountField, AccountMode, DashboardState, LeaderboardState, NoticeKind};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use cricket_api::leaderboard::{RankedPlayer, SortKey, podium};
use cricket_api::registration::{FormField, bowling_style_enabled};
use cricket_api::search::empty_state_hint;
use cricket_api::{Player, PlayerStats, Tournament, TournamentStatus};

static TABS: &[&str; 5] = &["Dashboard", "Tournaments", "Leaderboard", "Register", "Account"];

const DATE_FORMAT: &str = "%d %b %Y";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let drawn = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Dashboard => draw_dashboard(f, layout.main, app),
            MenuItem::Tournaments => draw_tournaments(f, layout.main, app),
            MenuItem::Leaderboard => draw_leaderboard(f, layout.main, app),
            MenuItem::Register => draw_register(f, layout.main, app),
            MenuItem::Account => draw_account(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
        draw_notice(f, layout.main, app);
        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = drawn {
        error!("Failed to draw frame: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn tab_index(tab: MenuItem) -> Option<usize> {
    match tab {
        MenuItem::Dashboard => Some(0),
        MenuItem::Tournaments => Some(1),
        MenuItem::Leaderboard => Some(2),
        MenuItem::Register => Some(3),
        MenuItem::Account => Some(4),
        MenuItem::Help => None,
    }
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = tab_index(app.state.active_tab)
        .or_else(|| tab_index(app.state.previous_tab))
        .unwrap_or(0);

    let titles: Vec<Line> = TABS
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("{} {t}", i + 1)))
        .collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let who = app.state.user_email().unwrap_or("guest");
    let help = Paragraph::new(format!("{who} | Help: ? "))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_message(f: &mut Frame, area: Rect, msg: impl Into<String>, color: Color) {
    f.render_widget(
        Paragraph::new(msg.into())
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Dashboard ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let dashboard = &app.state.dashboard;
    let [profile_area, upcoming_area] =
        Layout::vertical([Constraint::Length(10), Constraint::Fill(1)]).areas(inner);

    match (&app.state.session, &dashboard.player) {
        (None, _) => draw_message(
            f,
            profile_area,
            "Sign in on the Account tab (5) to see your player dashboard.",
            Color::DarkGray,
        ),
        (Some(_), _) if !dashboard.loaded => {
            draw_message(f, profile_area, "Loading your profile...", Color::DarkGray)
        }
        (Some(_), None) => draw_message(
            f,
            profile_area,
            "Complete Your Player Profile\n\nCreate your player profile to start participating in tournaments.\nPress 4 to open the registration form.",
            Color::Yellow,
        ),
        (Some(_), Some(player)) => draw_player_summary(f, profile_area, player),
    }

    draw_upcoming(f, upcoming_area, dashboard);
}

fn draw_player_summary(f: &mut Frame, area: Rect, player: &Player) {
    let [header, cards, overview_title, overview] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(3),
    ])
    .areas(area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let gray = Style::default().fg(Color::Gray);
    f.render_widget(
        Paragraph::new(vec![
            Line::styled(format!("Welcome back, {}!", player.name), bold),
            Line::styled(
                format!(
                    "{} | {} | {}",
                    player.player_type, player.batting_style, player.bowling_style
                ),
                gray,
            ),
        ]),
        header,
    );

    let stats = player.stats();
    let tiles = [
        ("Runs Scored", stats.runs_scored.to_string()),
        ("Wickets Taken", stats.wickets_taken.to_string()),
        ("Matches Played", stats.matches_played.to_string()),
        ("Strike Rate", format!("{:.1}%", stats.strike_rate)),
        ("Batting Avg", format!("{:.1}", stats.batting_average)),
        ("Economy", format!("{:.2}", stats.bowling_economy)),
    ];
    let cells: [Rect; 6] = Layout::horizontal([Constraint::Fill(1); 6]).areas(cards);
    for ((title, value), cell) in tiles.into_iter().zip(cells) {
        f.render_widget(
            Paragraph::new(value)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
                .block(default_border(Color::DarkGray).title(format!(" {title} "))),
            cell,
        );
    }

    f.render_widget(Paragraph::new(Line::styled("Performance Overview", bold)), overview_title);
    let rows: [Rect; 3] = Layout::vertical([Constraint::Length(1); 3]).areas(overview);
    for ((label, value, ratio), row) in performance_bars(&stats).into_iter().zip(rows) {
        f.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
                .ratio(ratio)
                .label(format!("{label}: {value}")),
            row,
        );
    }
}

/// Bars under the stat tiles. Economy is scaled by ten; every bar is capped
/// at full width.
fn performance_bars(stats: &PlayerStats) -> [(&'static str, String, f64); 3] {
    let fill = |value: f64| if value.is_finite() { (value / 100.0).clamp(0.0, 1.0) } else { 0.0 };
    [
        ("Batting Average", format!("{:.1}", stats.batting_average), fill(stats.batting_average)),
        ("Bowling Economy", format!("{:.1}", stats.bowling_economy), fill(stats.bowling_economy * 10.0)),
        ("Strike Rate", format!("{:.1}%", stats.strike_rate), fill(stats.strike_rate)),
    ]
}

fn draw_upcoming(f: &mut Frame, area: Rect, dashboard: &DashboardState) {
    let block = default_border(Color::DarkGray).title(" Upcoming Tournaments ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if dashboard.upcoming.is_empty() {
        let msg = if dashboard.loaded { "No upcoming tournaments" } else { "Loading tournaments..." };
        draw_message(f, inner, msg, Color::DarkGray);
        return;
    }

    let mut lines = Vec::new();
    for t in &dashboard.upcoming {
        lines.push(Line::styled(t.name.clone(), Style::default().add_modifier(Modifier::BOLD)));
        lines.push(Line::styled(
            format!(
                "  Starts {}   Prize {}",
                t.start_date.format(DATE_FORMAT),
                rupees(t.prize_pool)
            ),
            Style::default().fg(Color::Gray),
        ));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Tournaments
// ---------------------------------------------------------------------------

fn draw_tournaments(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Tournaments ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let list = &app.state.tournaments;
    let [search_area, key_legend, content] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);
    let [query_area, status_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(18)]).areas(search_area);

    let (query_text, query_style) = if list.editing {
        (format!("{}_", list.query), Style::default().fg(Color::Yellow))
    } else if list.query.is_empty() {
        ("Search tournaments...".to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (list.query.clone(), Style::default().fg(Color::White))
    };
    let search_border = if list.editing { Color::Yellow } else { Color::DarkGray };
    f.render_widget(
        Paragraph::new(query_text)
            .style(query_style)
            .block(default_border(search_border).title(" Search ")),
        query_area,
    );
    f.render_widget(
        Paragraph::new(list.status.label()).block(default_border(Color::DarkGray).title(" Status ")),
        status_area,
    );
    f.render_widget(
        Paragraph::new("Keys: /=search  t/T=status  j/k=move  r=reload  ?=help")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    let visible = list.visible();
    if visible.is_empty() {
        let msg = if list.loaded {
            format!("No tournaments found\n{}", empty_state_hint(&list.query, list.status))
        } else {
            "Loading tournaments...".to_string()
        };
        draw_message(f, content, msg, Color::DarkGray);
        return;
    }

    let today = Local::now().date_naive();
    let items: Vec<ListItem> = visible.iter().map(|t| tournament_item(t, today)).collect();
    let mut state = ListState::default().with_selected(Some(list.selected));
    f.render_stateful_widget(
        List::new(items)
            .highlight_symbol("> ")
            .highlight_style(Style::default().add_modifier(Modifier::BOLD)),
        content,
        &mut state,
    );
}

fn status_badge(status: TournamentStatus) -> Span<'static> {
    let color = match status {
        TournamentStatus::Upcoming => Color::Blue,
        TournamentStatus::Ongoing => Color::Green,
        TournamentStatus::Completed => Color::DarkGray,
    };
    Span::styled(format!("[{}]", status.label()), Style::default().fg(color))
}

fn tournament_item(t: &Tournament, today: NaiveDate) -> ListItem<'static> {
    let gray = Style::default().fg(Color::Gray);
    let mut lines = vec![Line::from(vec![
        Span::styled(t.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        status_badge(t.status),
        Span::raw("  "),
        Span::styled(rupees(t.prize_pool), Style::default().fg(Color::Green)),
    ])];
    if !t.description.is_empty() {
        lines.push(Line::styled(format!("  {}", t.description), gray));
    }
    lines.push(Line::from(format!(
        "  {} - {}   Max {} participants   Entry Fee: {}",
        t.start_date.format(DATE_FORMAT),
        t.end_date.format(DATE_FORMAT),
        t.max_participants,
        rupees(t.entry_fee),
    )));

    let action = if t.registration_open(today) {
        Span::styled("Register Now", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("View Details", gray)
    };
    let mut footer = vec![
        Span::styled(
            format!("  Registration ends: {}   ", t.registration_deadline.format(DATE_FORMAT)),
            gray,
        ),
        action,
    ];
    if !t.deadline_precedes_start() {
        footer.push(Span::styled(
            "   deadline is not before the start date",
            Style::default().fg(Color::Red),
        ));
    }
    lines.push(Line::from(footer));
    lines.push(Line::from(""));
    ListItem::new(lines)
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

fn draw_leaderboard(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Leaderboard ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let board = &app.state.leaderboard;
    let [header, key_legend, body] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Sort by: "),
            Span::styled(
                board.sort.label(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("   {} players", board.ranked.len()),
                Style::default().fg(Color::Gray),
            ),
        ])),
        header,
    );
    f.render_widget(
        Paragraph::new("Keys: s/S=sort  j/k=move  r=reload  ?=help")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    if !board.loaded {
        draw_message(f, body, "Loading leaderboard...", Color::DarkGray);
        return;
    }
    if board.ranked.is_empty() {
        draw_message(
            f,
            body,
            "No players found\nBe the first to register and start climbing the leaderboard!",
            Color::DarkGray,
        );
        return;
    }

    let table_area = match podium(&board.ranked) {
        Some(top) if body.height >= 16 => {
            let [podium_area, rest] =
                Layout::vertical([Constraint::Length(5), Constraint::Fill(1)]).areas(body);
            draw_podium(f, podium_area, top, board.sort);
            rest
        }
        _ => body,
    };
    draw_board_table(f, table_area, board);
}

/// Second, first and third, left to right.
fn draw_podium(f: &mut Frame, area: Rect, top: &[RankedPlayer], sort: SortKey) {
    let [left, center, right] = Layout::horizontal([Constraint::Fill(1); 3]).areas(area);

    for (idx, cell) in [(1, left), (0, center), (2, right)] {
        let Some(entry) = top.get(idx) else {
            continue;
        };
        let tier = entry.tier();
        let color = tier_color(tier);
        let lines = vec![
            Line::styled(entry.player.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Line::styled(entry.player.player_type.label(), Style::default().fg(Color::Gray)),
            Line::from(vec![
                Span::styled(
                    sort.format_metric(&entry.player),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {}", sort.label())),
            ]),
        ];
        f.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(default_border(color).title(format!(" {} ", tier_label(tier)))),
            cell,
        );
    }
}

fn draw_board_table(f: &mut Frame, area: Rect, board: &LeaderboardState) {
    let sorted_column = 3 + SortKey::ALL.iter().position(|k| *k == board.sort).unwrap_or(0);
    let header = Row::new(
        ["Rank", "Player", "Type", "Runs", "Wickets", "Avg", "SR", "Matches"]
            .into_iter()
            .enumerate()
            .map(|(i, title)| {
                let color = if i == sorted_column { Color::Yellow } else { Color::Gray };
                Cell::from(title).style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            }),
    )
    .bottom_margin(1);

    let rows = board.ranked.iter().map(|entry| {
        let p = &entry.player;
        let mut cells = vec![
            Cell::from(rank_badge(entry.tier())),
            Cell::from(p.name.clone()),
            Cell::from(p.player_type.label()),
        ];
        cells.extend(SortKey::ALL.iter().map(|key| Cell::from(key.format_metric(p))));
        cells.push(Cell::from(p.matches_played.to_string()));
        Row::new(cells)
    });

    let widths = [
        Constraint::Length(5),
        Constraint::Fill(2),
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(9),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .block(default_border(Color::DarkGray).title(" Rankings "));
    let mut state = TableState::default().with_selected(Some(board.selected));
    f.render_stateful_widget(table, area, &mut state);
}

// ---------------------------------------------------------------------------
// Player registration
// ---------------------------------------------------------------------------

fn draw_register(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Player Registration ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.state.session.is_none() {
        draw_message(
            f,
            inner,
            "Sign in on the Account tab (5) before creating a player profile.",
            Color::DarkGray,
        );
        return;
    }
    if let Some(player) = &app.state.dashboard.player {
        draw_message(
            f,
            inner,
            format!("{} already has a player profile.\nSee it on the Dashboard (1).", player.name),
            Color::DarkGray,
        );
        return;
    }

    let reg = &app.state.registration;
    let [form_area, key_legend] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

    let mut lines = vec![
        Line::styled(
            "Create your player profile to join tournaments and the leaderboard.",
            Style::default().fg(Color::Gray),
        ),
        Line::from(""),
    ];
    for field in FormField::ORDER {
        let focused = reg.focus == field;
        let read_only = (field.is_text() && !reg.is_editable(field))
            || (field == FormField::BowlingStyle && !bowling_style_enabled(reg.form.player_type));
        let value = reg.form.value(field);

        let shown = if field.is_text() {
            if focused && reg.editing { format!("{value}_") } else { value.to_string() }
        } else if value.is_empty() {
            "<select>".to_string()
        } else {
            format!("< {value} >")
        };

        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let value_style = if read_only {
            Style::default().fg(Color::DarkGray)
        } else if focused && reg.editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(vec![
            Span::styled(if focused { "> " } else { "  " }, label_style),
            Span::styled(format!("{:<32}", field.label()), label_style),
            Span::styled(shown, value_style),
        ]));
        if let Some(err) = reg.errors.get(&field) {
            lines.push(Line::styled(format!("    {err}"), Style::default().fg(Color::Red)));
        }
    }

    if reg.submitting {
        lines.push(Line::from(""));
        lines.push(Line::styled("Creating profile...", Style::default().fg(Color::Cyan)));
    }
    f.render_widget(Paragraph::new(lines), form_area);

    let legend = if reg.editing {
        "Typing: Enter=submit  Tab=next field  Esc=done"
    } else {
        "Keys: j/k=field  Enter=edit  h/l=change option  s=submit"
    };
    f.render_widget(
        Paragraph::new(legend).style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

fn draw_account(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Account ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(session) = &app.state.session {
        let who = session.user.email.as_deref().unwrap_or(session.user.id.as_str());
        let mut lines = vec![
            Line::from(vec![
                Span::raw("Signed in as "),
                Span::styled(who.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(""),
        ];
        if let Some(expiry) = session.expires_at.and_then(|at| DateTime::from_timestamp(at, 0)) {
            lines.push(Line::styled(
                format!(
                    "Session valid until {}",
                    expiry.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                ),
                Style::default().fg(Color::Gray),
            ));
        }
        lines.push(Line::styled("Press o to sign out.", Style::default().fg(Color::DarkGray)));
        f.render_widget(Paragraph::new(lines), inner);
        return;
    }

    let account = &app.state.account;
    let other = match account.mode {
        AccountMode::SignIn => AccountMode::SignUp,
        AccountMode::SignUp => AccountMode::SignIn,
    };
    let field_line = |field: AccountField, label: &str, value: String| {
        let focused = account.focus == field;
        let style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if focused && account.editing { "_" } else { "" };
        Line::from(vec![
            Span::styled(if focused { "> " } else { "  " }, style),
            Span::styled(format!("{label:<10}"), style),
            Span::raw(format!("{value}{cursor}")),
        ])
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(account.mode.label(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("   (m to switch to {})", other.label()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
        field_line(AccountField::Email, "Email", account.email.clone()),
        field_line(
            AccountField::Password,
            "Password",
            "*".repeat(account.password.chars().count()),
        ),
        Line::from(""),
    ];
    if account.pending {
        lines.push(Line::styled("Contacting server...", Style::default().fg(Color::Cyan)));
    }
    lines.push(Line::styled(
        "Keys: Enter=edit  Tab=switch field  m=sign in/up  s=submit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = [
        ("1-5", "switch tab"),
        ("r", "reload the current tab"),
        ("f", "toggle full screen"),
        ("\"", "toggle log pane"),
        ("q / Ctrl-c", "quit"),
        ("Esc", "leave help or stop typing"),
        ("", ""),
        ("Tournaments", "/ search, t/T status filter, j/k move"),
        ("Leaderboard", "s/S change metric, j/k move"),
        ("Register", "j/k field, Enter edit, h/l option, s submit"),
        ("Account", "Enter edit, Tab field, m sign in/up, s submit, o sign out"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:<14}"), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logger = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .output_separator(' ')
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan));
    f.render_widget(logger, area);
}

fn draw_notice(f: &mut Frame, area: Rect, app: &App) {
    let Some(notice) = &app.state.notice else {
        return;
    };
    let color = match notice.kind {
        NoticeKind::Success => Color::Green,
        NoticeKind::Info => Color::Cyan,
        NoticeKind::Error => Color::Red,
    };
    let width = (notice.message.chars().count() as u16 + 4)
        .min(area.width.saturating_sub(2))
        .max(10);
    let rect = Rect::new(area.x + area.width.saturating_sub(width + 1), area.y + 1, width, 3)
        .intersection(area);

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(notice.message.as_str())
            .style(Style::default().fg(color))
            .block(default_border(color)),
        rect,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(3), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

/// Whole rupees with thousands separators, e.g. `₹15,000`.
fn rupees(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if whole < 0 { "-" } else { "" };
    format!("{sign}₹{grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rupees() {
        assert_eq!(rupees(0.0), "₹0");
        assert_eq!(rupees(300.0), "₹300");
        assert_eq!(rupees(15000.0), "₹15,000");
        assert_eq!(rupees(1_234_567.4), "₹1,234,567");
    }

    #[test]
    fn test_performance_bars_are_capped() {
        let stats = PlayerStats {
            batting_average: 42.5,
            bowling_economy: 6.25,
            strike_rate: 135.0,
            ..PlayerStats::default()
        };
        let bars = performance_bars(&stats);
        assert_eq!(bars[0], ("Batting Average", "42.5".to_string(), 0.425));
        assert_eq!(bars[1].2, 0.625);
        assert_eq!(bars[2], ("Strike Rate", "135.0%".to_string(), 1.0));

        let broken = PlayerStats { strike_rate: f64::NAN, bowling_economy: -1.0, ..PlayerStats::default() };
        let bars = performance_bars(&broken);
        assert_eq!(bars[1].2, 0.0);
        assert_eq!(bars[2].2, 0.0);
    }

    #[test]
    fn test_help_has_no_tab_index() {
        assert_eq!(tab_index(MenuItem::Help), None);
        assert_eq!(tab_index(MenuItem::Account), Some(4));
    }
}
