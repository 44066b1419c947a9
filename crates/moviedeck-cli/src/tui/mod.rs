//! TUI module for the interactive movie browser.
//!
//! Uses `ratatui` + `crossterm` for rendering. TMDB requests run as tokio
//! tasks while this loop keeps drawing, so it must be entered from inside a
//! multi-threaded runtime.

/// Browser controller.
pub mod browser;
mod debounce;
mod fetch;
/// Browser state types.
pub mod state;
#[cfg(test)]
pub(crate) mod testing;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use moviedeck_api::tmdb::TmdbApi;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub use self::browser::{Action, Browser, BrowserSettings};
pub use self::state::Route;

/// How long to wait for terminal input before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the movie browser starting at `route`.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub fn run_browser<C>(client: Arc<C>, settings: BrowserSettings, route: Route) -> Result<()>
where
    C: TmdbApi + Send + Sync + 'static,
{
    let mut browser = Browser::new(client, settings);
    browser.navigate(route);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut browser);

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
fn run_event_loop<C>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    browser: &mut Browser<C>,
) -> Result<()>
where
    C: TmdbApi + Send + Sync + 'static,
{
    loop {
        browser.tick(Instant::now());

        terminal
            .draw(|frame| ui::draw(frame, &mut browser.state))
            .context("failed to draw TUI")?;

        if event::poll(POLL_INTERVAL).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            match browser.handle_key(key, Instant::now()) {
                Action::Quit => return Ok(()),
                Action::Open(url) => {
                    if let Err(e) = open::that(&url) {
                        tracing::warn!(%url, error = %e, "failed to open browser");
                        browser.state.status = Some(format!("Could not open {url}"));
                    }
                }
                Action::Continue => {}
            }
        }
    }
}
