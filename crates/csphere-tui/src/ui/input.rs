//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use csphere_core::Route;

use crate::app::{can_add_password_char, can_add_username_char, App, AppState, LoginFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::ShowingHelp => {
            app.state = AppState::Normal;
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            return Ok(handle_quit_confirm(app, key));
        }
        AppState::Quitting => return Ok(true),
        AppState::Normal => {}
    }

    // The session button works from every screen
    if key.code == KeyCode::F(2) {
        app.press_session_button();
        return Ok(false);
    }

    match app.route {
        Route::Login => handle_login_input(app, key),
        Route::Home => handle_page_input(app, key, None),
        Route::Signup => handle_page_input(app, key, Some(Route::Login)),
    }
    Ok(false)
}

fn handle_quit_confirm(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.state = AppState::Quitting;
            true
        }
        _ => {
            app.state = AppState::Normal;
            false
        }
    }
}

/// Keys for the non-form screens. `back` is where Esc leads, if anywhere.
fn handle_page_input(app: &mut App, key: KeyEvent, back: Option<Route>) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => match back {
            Some(route) => app.navigate(route),
            None => app.state = AppState::ConfirmingQuit,
        },
        KeyCode::Char('l') => app.press_session_button(),
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        _ => {}
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::F(1) => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = app.login_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = app.login_focus.prev();
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => {
                app.login_focus = LoginFocus::Password;
            }
            // Enter in the password field submits, like a web form
            LoginFocus::Password | LoginFocus::Submit => {
                app.start_submit();
            }
            LoginFocus::SignUp => {
                app.navigate(Route::Signup);
            }
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_username.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Submit | LoginFocus::SignUp => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_username.chars().count(), c) {
                    app.login_username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(c) {
                    app.login_password.push(c);
                }
            }
            // Ignore character input on buttons
            LoginFocus::Submit | LoginFocus::SignUp => {}
        },
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use csphere_core::auth::SessionStore;
    use csphere_core::{Config, Session};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app(session: Session) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            api_base_url: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        };
        let app = App::new(config, dir.path().join("config.json"), session).unwrap();
        (app, dir)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_input(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_typing_fills_focused_field() {
        let (mut app, _dir) = test_app(Session::in_memory());
        type_text(&mut app, "alice");
        handle_input(&mut app, key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "pw");
        handle_input(&mut app, key(KeyCode::Backspace)).unwrap();

        assert_eq!(app.login_username, "alice");
        assert_eq!(app.login_password, "p");
    }

    #[test]
    fn test_username_input_capped() {
        let (mut app, _dir) = test_app(Session::in_memory());
        type_text(&mut app, &"a".repeat(60));
        assert_eq!(app.login_username.len(), 50);
    }

    #[test]
    fn test_long_password_kept_in_full() {
        let (mut app, _dir) = test_app(Session::in_memory());
        app.login_focus = LoginFocus::Password;
        let password = "p".repeat(200);
        type_text(&mut app, &password);

        assert_eq!(app.login_password.chars().count(), 200);
        assert_eq!(app.credentials().password(), password);
    }

    #[test]
    fn test_enter_with_short_username_shows_error() {
        let (mut app, _dir) = test_app(Session::in_memory());
        type_text(&mut app, "bob");
        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.login_focus, LoginFocus::Password);
        handle_input(&mut app, key(KeyCode::Enter)).unwrap();

        assert!(app.login_error.is_some());
        assert!(!app.is_submitting());
    }

    #[test]
    fn test_sign_up_link() {
        let (mut app, _dir) = test_app(Session::in_memory());
        app.login_focus = LoginFocus::SignUp;
        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.route, Route::Signup);

        handle_input(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.route, Route::Login);
    }

    #[test]
    fn test_f2_logs_out_from_home() {
        let session = Session::in_memory();
        session.set("abc123").unwrap();
        let (mut app, _dir) = test_app(session.clone());
        assert_eq!(app.route, Route::Home);

        handle_input(&mut app, key(KeyCode::F(2))).unwrap();
        assert_eq!(app.route, Route::Login);
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_quit_confirmation() {
        let (mut app, _dir) = test_app(Session::in_memory());
        handle_input(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.state, AppState::ConfirmingQuit);

        assert!(!handle_input(&mut app, key(KeyCode::Char('n'))).unwrap());
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Esc)).unwrap();
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))).unwrap());
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let session = Session::in_memory();
        session.set("abc123").unwrap();
        let (mut app, _dir) = test_app(session);
        handle_input(&mut app, key(KeyCode::Char('?'))).unwrap();
        assert_eq!(app.state, AppState::ShowingHelp);
        handle_input(&mut app, key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.state, AppState::Normal);
    }
}
