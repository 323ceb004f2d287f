//! NGO portal dashboard
//!
//! A sidebar of pages (templates, API configuration, donors, recipients)
//! rendered with ratatui. Donor and recipient pages share one record table
//! that loads through a [`crate::supplier::DataSupplier`].

pub mod app;
pub mod components;
pub mod screens;
pub mod traits;
pub mod ui;

pub use app::{App, Page};
pub use traits::{Screen, ScreenAction};

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::info;

/// Log file used while the dashboard owns the terminal
pub const LOG_FILE: &str = "ngomate_tui.log";

/// Take over the terminal, run `app` until it quits, then restore the terminal
pub async fn run_in_terminal(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("Starting main application loop");
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Application loop completed");
    result
}
