mod config;
mod controller;
mod logging;
mod model;
mod sdk;
mod view;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use anyhow::Result;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::AppConfig;
use controller::AppController;
use model::{AppModel, Sample};
use sdk::{DemoCatalog, Sessions};
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== VideoKit Samples Starting ===");

    let config = AppConfig::load()?;

    // The SDK session has to exist before any sample opens
    let sessions = Sessions::new();
    if let Err(e) = sessions.start(&config.app_token, &config.identity) {
        tracing::error!(error = %e, "Session start failed");
        eprintln!("Error: {}", e);
        return Err(e.into());
    }
    tracing::info!(identity = ?sessions.identity(), "Session ready");

    let catalog = DemoCatalog::new(sessions, config.catalog_size);
    let model = Arc::new(Mutex::new(AppModel::new(config.identity.clone())));
    let controller = AppController::new(model.clone(), Arc::new(catalog), Arc::new(config));

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model.clone(), controller).await;

    // Release players and recorder before the terminal goes away
    model.lock().await.close_sample();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("VideoKit Samples shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        let should_quit = {
            let mut model_guard = model.lock().await;

            model_guard.auto_clear_old_errors();
            if let Some(Sample::Recorder(sample)) = model_guard.sample_mut() {
                sample.refresh(Instant::now());
            }

            terminal.draw(|f| AppView::render(f, &model_guard))?;
            model_guard.should_quit()
        };

        if should_quit {
            break;
        }

        // Short poll keeps the timer and Busy debounce smooth
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let _ = controller.handle_key_event(key).await;
            }
        }
    }

    Ok(())
}
