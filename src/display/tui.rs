//! Terminal User Interface Implementation
//!
//! Terminal setup and teardown plus the blocking event loop: draw, wait for a
//! key, apply it to [`DashboardState`], then act on the returned [`Action`].

use super::state::{Action, DashboardState};
use super::widgets::render_dashboard;
use crate::error::{DashboardError, Result};
use crate::models::EnrichedRecord;
use crate::preferences::ThemeStore;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long to wait for a key before redrawing (milliseconds)
const POLL_INTERVAL_MS: u64 = 250;

type TerminalBackend = CrosstermBackend<Stdout>;

/// Produces a fresh set of records when the user asks for a reload
pub type Reloader = Box<dyn FnMut() -> Result<Vec<EnrichedRecord>> + Send>;

pub struct DashboardApp {
    terminal: Terminal<TerminalBackend>,
    state: DashboardState,
    theme_store: ThemeStore,
    reloader: Reloader,
}

impl DashboardApp {
    pub fn new(state: DashboardState, theme_store: ThemeStore, reloader: Reloader) -> Result<Self> {
        let terminal = setup_terminal()?;
        Ok(Self {
            terminal,
            state,
            theme_store,
            reloader,
        })
    }

    /// Run until the user quits
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.render()?;

            if !event::poll(Duration::from_millis(POLL_INTERVAL_MS))? {
                continue;
            }

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match self.state.handle_key(key.code, key.modifiers) {
                Action::None => {}
                Action::Quit => {
                    info!("Dashboard closed");
                    return Ok(());
                }
                Action::Reload => self.reload(),
                Action::ThemeChanged(theme) => {
                    if let Err(e) = self.theme_store.save(theme) {
                        warn!(error = %e, "Could not persist theme");
                    }
                }
            }
        }
    }

    fn reload(&mut self) {
        debug!("Reload requested");
        match (self.reloader)() {
            Ok(records) => self.state.replace_records(records),
            Err(e) => {
                warn!(error = %e, "Reload failed");
                if e.is_load_failure() {
                    self.state.set_load_error(e.to_string());
                }
            }
        }
    }

    fn render(&mut self) -> Result<()> {
        let state = &self.state;
        self.terminal.draw(|frame| {
            let area = frame.area();
            render_dashboard(frame, state, area);
        })?;
        Ok(())
    }
}

impl Drop for DashboardApp {
    fn drop(&mut self) {
        let _ = cleanup_terminal(&mut self.terminal);
    }
}

fn setup_terminal() -> Result<Terminal<TerminalBackend>> {
    enable_raw_mode()
        .map_err(|e| DashboardError::terminal(format!("Failed to enable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    rollback_on_error(
        execute!(stdout, EnterAlternateScreen),
        "Failed to setup terminal",
        || {
            let _ = disable_raw_mode();
        },
    )?;
    let backend = CrosstermBackend::new(stdout);
    rollback_on_error(Terminal::new(backend), "Failed to create terminal", || {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })
}

/// Run `rollback` when a setup step failed, so the terminal is not left in raw mode
fn rollback_on_error<T>(
    result: io::Result<T>,
    context: &str,
    rollback: impl FnOnce(),
) -> Result<T> {
    result.map_err(|e| {
        rollback();
        DashboardError::terminal(format!("{}: {}", context, e))
    })
}

fn cleanup_terminal(terminal: &mut Terminal<TerminalBackend>) -> Result<()> {
    disable_raw_mode()
        .map_err(|e| DashboardError::terminal(format!("Failed to disable raw mode: {}", e)))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| DashboardError::terminal(format!("Failed to cleanup terminal: {}", e)))?;
    terminal.show_cursor()?;
    Ok(())
}

/// Open the dashboard on `state` and block until the user quits
pub fn run_dashboard(state: DashboardState, theme_store: ThemeStore, reloader: Reloader) -> Result<()> {
    let mut app = DashboardApp::new(state, theme_store, reloader)?;
    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_interval_keeps_ui_responsive() {
        assert!(POLL_INTERVAL_MS <= 500);
    }

    #[test]
    fn test_failed_setup_step_rolls_back() {
        let mut rolled_back = false;
        let result: Result<()> = rollback_on_error(
            Err(io::Error::new(io::ErrorKind::Other, "no tty")),
            "Failed to setup terminal",
            || rolled_back = true,
        );

        assert!(rolled_back);
        let err = result.unwrap_err();
        assert!(matches!(err, DashboardError::Terminal(_)));
        assert!(err.to_string().contains("Failed to setup terminal: no tty"));
    }

    #[test]
    fn test_successful_setup_step_keeps_state() {
        let mut rolled_back = false;
        let value = rollback_on_error(Ok(7), "unused", || rolled_back = true).unwrap();

        assert_eq!(value, 7);
        assert!(!rolled_back);
    }
}
