//! WM Admin TUI - terminal client for a mock server's admin API
//!
//! Browses the request journal of a WireMock-style server and turns
//! captured traffic into stub mappings.
//!
//! # Features
//!
//! - **Request Log**: Filterable journal with a JSON detail pane
//! - **Mapping Drafts**: Build a stub mapping from any captured request
//! - **Mapping Editor**: Create, edit and delete mappings; every change is
//!   persisted to the server's disk and reloaded
//! - **Cross Navigation**: Jump from a request to the mapping that served it
//!
//! # Example
//!
//! ```no_run
//! use wm_admin_tui::{App, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let mut app = App::new(&config)?;
//!     app.refresh_all().await;
//!     wm_admin_tui::run(app).await
//! }
//! ```

pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod entry;
pub mod event;
pub mod filter;
pub mod identity;
pub mod log_view;
pub mod logging;
pub mod mapping;
pub mod synth;
pub mod theme;
pub mod timestamp;
pub mod ui;
pub mod workflow;

pub use api::{AdminApi, ApiClient, ApiError};
pub use app::App;
pub use config::Config;
pub use event::{Event, EventHandler};
pub use theme::Theme;

use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// Event loop tick; status expiry and auto refresh are checked on each tick
const TICK_RATE: Duration = Duration::from_millis(250);

/// Run the TUI application with the given app state.
///
/// Sets up the terminal, runs the event loop and restores the terminal on exit.
pub async fn run(mut app: App) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

/// Main event loop
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;

        match events.next().await {
            Some(Event::Key(key)) => app.handle_key_event(key).await,
            Some(Event::Paste(text)) => app.handle_paste(&text),
            Some(Event::Tick) => app.on_tick().await,
            Some(Event::Resize(_, _)) => {}
            None => break,
        }
    }

    tracing::info!("Exiting");
    Ok(())
}
