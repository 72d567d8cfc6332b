use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use camp_service::HttpService;
use camp_tui::app::App;
use camp_tui::config::Config;
use camp_tui::logging;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{info, warn};

fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(&config.log_file)?;

    let service = match config.api_key() {
        Some(key) => HttpService::with_api_key(&config.server_url, key),
        None => HttpService::new(&config.server_url),
    };
    wait_for_server(&service)?;
    info!(server = %config.server_url, "connected");

    run_tui(
        App::new(Arc::new(service), config.project.clone(), config.demo_link())?,
    )
}

fn wait_for_server(service: &HttpService) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;
    let start = Instant::now();
    let timeout = Duration::from_secs(10);

    rt.block_on(async {
        loop {
            match service.health_check().await {
                Ok(()) => return Ok(()),
                Err(e) => warn!("health check failed: {e}"),
            }
            if start.elapsed() > timeout {
                bail!(
                    "{} did not become ready within {}s",
                    service.base_url(),
                    timeout.as_secs()
                );
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    })
}

fn run_tui(app: App<HttpService>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App<HttpService>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if let Event::Key(key) = event::read()? {
            // Ctrl+C always quits
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            // q quits unless we're typing into a form
            if key.code == KeyCode::Char('q') && !app.is_input_mode() {
                break;
            }
            app.handle_key(key);
        }
    }

    Ok(())
}
