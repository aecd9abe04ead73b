//! QuoteLab dashboard: interactive view over cached daily price CSVs.
//!
//! Areas:
//! 1. Symbols: multi-select of every symbol found in the data directory
//! 2. Date Range: start/end bounds, clamped to the data span
//! 3. Latest Price, Trend, Detail: views recomputed on every filter change

mod app;
mod input;
mod theme;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use quotelab_core::config::resolve_data_dir;
use quotelab_core::logging::{init_file, LoggingConfig};

use crate::app::AppState;

#[derive(Parser)]
#[command(name = "quotelab-tui", about = "Browse cached daily prices")]
struct Cli {
    /// Directory holding the fetched CSV files
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // stdout belongs to the terminal UI; log to a file or not at all.
    let log_result = init_file(&LoggingConfig::from_env());

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let data_dir = resolve_data_dir(cli.data_dir);
    let mut app = AppState::new(data_dir);
    if let Err(e) = log_result {
        app.set_error(format!("Log file unavailable: {e}"));
    }
    tracing::info!(dir = %app.data_dir.display(), halted = app.is_halted(), "dashboard started");

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // 50ms timeout for ~20 FPS tick
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
