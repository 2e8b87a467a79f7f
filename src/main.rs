//! newsdeck — a terminal news reader with per-source grouping and read state.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  LoadMsg   ┌──────────┐  draw()  ┌──────────┐
//! │  load.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │  (task)  │  (channel) │ (state)  │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘
//!                           ▲      │ Command
//!      handle_key_event()   │      ▼
//!                    ┌──────────┐ ┌────────────┐
//!                    │ input.rs │ │ persist.rs │ ──► API
//!                    └──────────┘ └────────────┘
//! ```
//!
//! * **`source/`** — collaborator traits and the HTTP client.
//! * **`feed/`** — grouping, aggregation, read state and the accordion.
//! * **`load`** — fetches the selected sections on a background task.
//! * **`persist`** — delivers read / link-clicked commands in the background.
//! * **`app`** — owns all view state (feed, cursor, search, language).
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`main`** — wires everything together: config, logging, terminal, and
//!   the event loop.

mod app;
mod config;
mod feed;
mod input;
mod load;
mod persist;
mod source;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::process::{Command as Process, Stdio};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::App;
use config::Config;
use source::{HttpClient, NewsFetcher, SectionCatalog};

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Send tracing output to the configured log file.
///
/// The terminal belongs to the UI, so if the file cannot be opened logging
/// is disabled rather than redirected to stderr.
fn init_logging(config: &Config) -> Option<WorkerGuard> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    info!(path = %config.log_file.display(), "logging initialized");
    Some(guard)
}

/// Hand `url` to the platform's browser launcher without blocking the UI.
fn open_url(url: &str) {
    let launcher = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    if let Err(e) = Process::new(launcher)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        warn!(error = %e, %url, launcher, "failed to open link");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    let _log_guard = init_logging(&config);
    install_panic_hook();

    // -- collaborators -------------------------------------------------------
    let client = Arc::new(
        HttpClient::new(&config.api_url, config.token.clone(), config.timeout())
            .context("failed to set up API client")?,
    );
    let fetcher: Arc<dyn NewsFetcher> = client.clone();
    let catalog: Arc<dyn SectionCatalog> = client.clone();

    let (commands, command_rx) = persist::channel();
    let _worker = persist::spawn(client, command_rx);

    // -- start loading -------------------------------------------------------
    let mut load_rx = load::spawn(fetcher.clone(), catalog.clone(), config.sections.clone());

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(commands, config.language());
    info!(api = %config.api_url, "newsdeck started");

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Apply a finished load, if any.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    //   4. Carry out requests the input left on `app`.
    let tick_rate = Duration::from_millis(100);

    loop {
        if let Ok(msg) = load_rx.try_recv() {
            app.apply_load(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if let Some(link) = app.pending_link.take() {
            open_url(&link);
        }
        if app.reload {
            app.reload = false;
            app.status = "Reloading…".into();
            load_rx = load::spawn(fetcher.clone(), catalog.clone(), config.sections.clone());
        }
        if app.quit {
            break;
        }
    }

    info!("newsdeck exited");
    // `guard` is dropped here, restoring the terminal.  Commands still in
    // flight are abandoned with the runtime.
    Ok(())
}
