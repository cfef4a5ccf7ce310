//! csphere - a terminal client for csphere sign-in.
//!
//! The interactive mode shows a login form, a home screen and a header
//! button that toggles between Login and Logout depending on whether a
//! session token is stored. `--login`, `--logout` and `--status` run the
//! same flows without the full-screen UI.

mod app;
mod ui;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use csphere_core::auth::Credentials;
use csphere_core::{ApiClient, Config, CredentialSubmitter, Route, Session, SessionIndicator};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name prefix inside the session directory
const LOG_FILE_PREFIX: &str = "csphere.log";

const USAGE: &str = "\
Usage: csphere [COMMAND]

Commands:
  (none)      Start the interactive client
  --login     Log in from the command line
  --logout    Clear the stored session
  --status    Print Login or Logout, as the session button would show
  --help      Show this message

Environment:
  NEXT_PUBLIC_API_BASE_URL   Base URL of the csphere API (required for login)
  RUST_LOG                   Log filter, e.g. RUST_LOG=debug";

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr, for the command-line modes
fn init_tracing_stderr() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

/// Log to a daily file, since the terminal belongs to the UI.
/// The returned guard must be held until exit to flush buffered lines.
fn init_tracing_file(log_dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config_path = Config::config_path()?;
    let config = Config::load()?;
    let session_dir = config.session_dir()?;

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str);
    match command {
        Some("--help") | Some("-h") => {
            println!("{}", USAGE);
            return Ok(());
        }
        None | Some("--status") | Some("--logout") | Some("--login") => {}
        Some(other) => {
            anyhow::bail!("Unknown argument: {}\n\n{}", other, USAGE);
        }
    }

    // Install the subscriber before anything logs
    let _log_guard = match command {
        None => Some(init_tracing_file(&session_dir)),
        Some(_) => {
            init_tracing_stderr();
            None
        }
    };
    let session = Session::open(&session_dir);

    match command {
        Some("--status") => {
            let indicator = SessionIndicator::mount(Route::Home, &session);
            println!("{}", indicator.label());
            return Ok(());
        }
        Some("--logout") => return logout(&session),
        Some("--login") => return login_interactive(config, &config_path, session).await,
        _ => {}
    }

    info!("csphere starting");

    // Create the app before touching the terminal so config errors print normally
    let mut app = App::new(config, config_path, session)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("csphere shutting down");
    Ok(())
}

fn logout(session: &Session) -> Result<()> {
    let indicator = SessionIndicator::mount(Route::Home, session);
    if !indicator.is_logged_in() {
        println!("Not logged in.");
        return Ok(());
    }
    let next = indicator.activate(session);
    println!("Logged out. Next: {}", next);
    Ok(())
}

/// Prompt for credentials on the terminal and run one submission
async fn login_interactive(mut config: Config, config_path: &Path, session: Session) -> Result<()> {
    let api = ApiClient::new(config.base_url()?, config.request_timeout())?;
    let submitter = CredentialSubmitter::new(api, Arc::new(session))
        .require_token(config.require_token);

    let username = prompt_username(config.last_username.as_deref())?;
    let password = rpassword::prompt_password("Password: ")?;
    let credentials = Credentials::new(username, password);

    println!("\nAuthenticating...");

    match submitter.submit(&credentials).await {
        Ok(success) => {
            config.last_username = Some(credentials.username().to_string());
            save_config(&config, config_path);
            if success.token_stored {
                println!("Login successful. Next: {}", success.route);
            } else {
                println!("Login accepted without a session token. Next: {}", success.route);
            }
            Ok(())
        }
        Err(e) => {
            // Validation errors have no notification; report the rule instead
            let message = e
                .notification()
                .map(|n| n.message)
                .unwrap_or_else(|| e.to_string());
            anyhow::bail!(message)
        }
    }
}

fn prompt_username(last_username: Option<&str>) -> Result<String> {
    match last_username {
        Some(last) => print!("Username [{}]: ", last),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim_end_matches(['\r', '\n']);

    Ok(match last_username {
        Some(last) if input.is_empty() => last.to_string(),
        _ => input.to_string(),
    })
}

fn save_config(config: &Config, path: &Path) {
    if let Err(e) = config.save_to(path) {
        warn!(error = %e, "Failed to save config");
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ignore key release events on platforms that report them
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }

        // Let spawned submissions make progress between frames
        tokio::task::yield_now().await;
    }
}
