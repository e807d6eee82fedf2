use std::io;
use std::time::Duration;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use tokendeck::config::AppConfig;
use tokendeck::tui::app::AppState;
use tokendeck::tui::services::Services;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _log_guard = tokendeck::core::logging::init_tui();
    log::info!("tokendeck v{} starting", tokendeck::VERSION);

    // Config and backend before touching the terminal, so errors print normally
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = match Services::init(&config, event_tx) {
        Ok(services) => services,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {:?}", miette::Report::new(e));
            std::process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if config.tui.mouse_enabled {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState::new(event_rx, services, config.tui.notification_ttl_ticks);
    let result = app
        .run(&mut terminal, Duration::from_millis(config.tui.tick_rate_ms.max(1)))
        .await;

    // Restore terminal
    disable_raw_mode()?;
    if config.tui.mouse_enabled {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        log::error!("TUI exited with error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    log::info!("tokendeck exiting");
    Ok(())
}
