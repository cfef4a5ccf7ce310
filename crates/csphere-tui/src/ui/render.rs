use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use csphere_core::Route;

use crate::app::{App, AppState, LoginFocus};

use super::styles;

/// Visible width of the login form text fields
const FIELD_WIDTH: usize = 24;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar with session button
            Constraint::Min(10),   // Route content
            Constraint::Length(1), // Status bar / toast
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    match app.route {
        Route::Login => render_login(frame, app, chunks[1]),
        Route::Home => render_home(frame, app, chunks[1]),
        Route::Signup => render_signup(frame, chunks[1]),
    }
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame, app.route);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  csphere";
    let location = format!("  {}", app.route.path());
    let button = format!(" {} ", app.indicator.label());
    let hint = " [F2] ";

    let used = title.len() + location.len() + button.len() + hint.len() + 2;
    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(location, styles::muted_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(hint, styles::muted_style()),
        Span::styled(button, styles::session_button_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };

    // Show the tail of long input so the cursor stays visible
    let shown: String = {
        let count = value.chars().count();
        value.chars().skip(count.saturating_sub(FIELD_WIDTH)).collect()
    };

    Line::from(vec![
        Span::raw("  "),
        Span::styled(label, styles::muted_style()),
        Span::styled("[", styles::muted_style()),
        Span::styled(format!("{:<width$}{}", shown, cursor, width = FIELD_WIDTH), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let height = if app.login_error.is_some() { 14 } else { 12 };
    let form_area = centered_rect_fixed(46, height, area);

    let mut lines = vec![Line::from("")];

    lines.push(field_line(
        "Username: ",
        app.login_username.clone(),
        app.login_focus == LoginFocus::Username,
    ));
    if let Some(ref error) = app.login_error {
        lines.push(Line::from(Span::styled(
            format!("            {}", error),
            styles::error_style(),
        )));
    }

    let masked = "*".repeat(app.login_password.chars().count());
    lines.push(field_line(
        "Password: ",
        masked,
        app.login_focus == LoginFocus::Password,
    ));

    // Submit button (centered)
    let button_focused = app.login_focus == LoginFocus::Submit;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let button_label = if app.is_submitting() {
        " Submitting "
    } else if button_focused {
        " ▶ Submit ◀ "
    } else {
        "   Submit   "
    };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("             ["),
        Span::styled(button_label, button_style),
        Span::raw("]"),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " ──────────────────────────────────────────",
        styles::muted_style(),
    )));
    lines.push(Line::from(Span::styled(
        "           Don't have an account?",
        styles::muted_style(),
    )));
    lines.push(Line::from(vec![
        Span::raw("                 "),
        Span::styled("Sign Up", styles::link_style(app.login_focus == LoginFocus::SignUp)),
    ]));

    let block = Block::default()
        .title(" Login ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, form_area);
}

fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.indicator.is_logged_in() {
        Line::from(Span::styled("  You are signed in.", styles::success_style()))
    } else {
        Line::from(Span::styled(
            "  No session token is stored. Use [F2] to log in.",
            styles::highlight_style(),
        ))
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Welcome to csphere", styles::title_style())),
        Line::from(""),
        status,
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_signup(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  Sign Up", styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(
            "  Accounts are created on the csphere web site. Once you have one, \
             come back here to log in.",
            styles::list_item_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  [Esc]", styles::help_key_style()),
            Span::styled(" Back to login", styles::help_desc_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.route {
        Route::Login => "[Tab] next field | [Enter] submit | [F1] help | [Esc] quit",
        Route::Home | Route::Signup => "[F2] login/logout | [?] help | [q]uit",
    };

    let (left_text, left_style) = match app.toast {
        Some(ref toast) => {
            let style = if toast.notification.is_error() {
                styles::error_style()
            } else {
                styles::success_style()
            };
            (format!(" {} ", toast.notification.message), style)
        }
        None => (String::new(), styles::muted_style()),
    };

    let right_text = format!(" {} ", shortcuts);
    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

/// Key bindings shown in the help overlay for a route
fn help_entries(route: Route) -> &'static [(&'static str, &'static str)] {
    match route {
        Route::Login => &[
            ("F2", "Login / Logout"),
            ("Tab/↓", "Next form field"),
            ("S-Tab/↑", "Previous form field"),
            ("Enter", "Submit / activate"),
            ("F1", "Show this help"),
            ("Esc", "Quit"),
        ],
        Route::Home => &[
            ("F2 / l", "Login / Logout"),
            ("?", "Show this help"),
            ("Esc / q", "Quit"),
        ],
        Route::Signup => &[
            ("F2 / l", "Login / Logout"),
            ("Esc", "Back to login"),
            ("?", "Show this help"),
            ("q", "Quit"),
        ],
    }
}

fn render_help_overlay(frame: &mut Frame, route: Route) {
    let entries = help_entries(route);
    let area = centered_rect_fixed(46, entries.len() as u16 + 5, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];
    lines.extend(entries.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), styles::help_key_style()),
            Span::styled(*desc, styles::help_desc_style()),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("  Press any key to close", styles::muted_style())));

    let block = Block::default()
        .title(" Help ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Helper function to create a fixed-size centered rect
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
