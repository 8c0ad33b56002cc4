//! CodePulse TUI entry point.

use codepulse_tui::api_client::{ResourceFetcher, RestClient};
use codepulse_tui::cache::QueryCache;
use codepulse_tui::config::TuiConfig;
use codepulse_tui::error::TuiError;
use codepulse_tui::events::TuiEvent;
use codepulse_tui::nav::Page;
use codepulse_tui::state::App;
use codepulse_tui::telemetry::init_logging;
use codepulse_tui::views::render_view;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    init_logging(&config)?;

    let client = RestClient::new(&config)?;
    let fetcher: Arc<dyn ResourceFetcher> = Arc::new(client);
    let (cache, mut outcome_rx) = QueryCache::new(fetcher, config.search_cache_capacity);
    let tick_rate = config.tick_rate();
    let mut app = App::new(config, cache, Page::Overview);

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx);

    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        if app.take_redraw() {
            terminal.draw(|f| render_view(f, &app))?;
        }

        tokio::select! {
            _ = ticker.tick() => {
                app.on_tick(Instant::now());
            }
            Some(outcome) = outcome_rx.recv() => {
                app.apply_outcome(outcome);
            }
            Some(event) = event_rx.recv() => {
                if handle_event(&mut app, event) {
                    break;
                }
            }
        }
    }

    app.shutdown();
    tracing::info!("Session ended");
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let forwarded = match evt {
                    CrosstermEvent::Key(key) => sender.blocking_send(TuiEvent::Input(key)),
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if forwarded.is_err() {
                    break;
                }
            }
        }
    });
}

fn handle_event(app: &mut App, event: TuiEvent) -> bool {
    match event {
        TuiEvent::Input(key) => app.handle_key(key),
        TuiEvent::Tick => {
            app.on_tick(Instant::now());
            false
        }
        TuiEvent::Resize { width, height } => {
            tracing::debug!(width, height, "Terminal resized");
            app.mark_dirty();
            false
        }
    }
}
