//! redpen: a terminal editor for AI writing suggestions.
//!
//! Entry point for the `redpen` binary. Wires together logging, configuration,
//! the terminal lifecycle (`tui`), the unified event bus (`event`), the analysis
//! workers (`analysis`), and the UI (`ui`) around one `redpen_core::Session`.
//!
//! Usage: `redpen [FILE]`. The file is loaded if it exists and is where `w`
//! writes; without one, `w` writes `redpen.txt` in the working directory.
//!
//! # Startup sequence
//!
//! 1. File logging via `tracing-appender`; nothing may write to the terminal
//!    once the TUI owns it.
//! 2. Config and theme; both fall back to defaults on any error.
//! 3. Load the initial text, before the terminal is touched so a read error is
//!    printed normally.
//! 4. `install_panic_hook()` so a panic restores the terminal.
//! 5. `register_sigterm()`, polled on the 50 ms heartbeat.
//! 6. `init_tui()`, then the event bus and the background tasks.
//!
//! `restore_tui()` runs once, after the event loop exits. A draw error breaks
//! out of the loop and is returned after the terminal is restored.

mod analysis;
mod app;
mod config;
mod event;
mod input;
mod theme;
mod tui;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use redpen_core::{AnalysisClient, HyperTransport, Session};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::event::AppEvent;
use crate::ui::keybindings::{handle_key, handle_mouse, handle_paste, KeyAction};

/// Sends tracing output to `redpen.log` in the state directory.
///
/// The returned guard flushes the writer on drop and must live until exit.
fn init_logging() -> io::Result<WorkerGuard> {
    let dir = config::state_dir();
    std::fs::create_dir_all(&dir)?;
    let appender = tracing_appender::rolling::never(&dir, "redpen.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))?;
    Ok(guard)
}

/// Reads the file named on the command line. A missing file starts empty.
fn load_initial_text(path: &Path) -> io::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e),
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    // Step 1: logging.
    let _log_guard = init_logging()?;

    // Step 2: config and theme.
    let config = config::Config::load();
    let theme = theme::Theme::from_name(&config.theme);
    tracing::info!(target: "runtime", api_url = %config.api_url, "starting redpen");

    // Step 3: initial text.
    let file_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("redpen.txt"));
    let text = load_initial_text(&file_path)?;
    let mut state = app::AppState::new(Session::new(text), file_path, config.commit_idle());

    // Steps 4 and 5: panic hook and SIGTERM flag.
    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;

    // Step 6: terminal, event bus, workers.
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    let client = Arc::new(AnalysisClient::new(
        config.api_url.clone(),
        HyperTransport::new(config.request_timeout()),
    ));
    let (job_tx, job_rx) = mpsc::unbounded_channel();
    analysis::worker::spawn_analysis_worker(Arc::clone(&client), job_rx, handler.tx.clone());
    let poll_interval = config.status_poll_interval();
    analysis::worker::spawn_status_poller(client, poll_interval, handler.tx.clone());
    state.analysis_tx = Some(job_tx);

    let mut draw_error = None;
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: SIGTERM is checked at least every 50 ms even when idle.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        // The only draw() call in the application.
                        let drawn = terminal.draw(|frame| ui::render(frame, &mut state, &theme));
                        if let Err(e) = drawn {
                            tracing::error!(target: "runtime", error = %e, "draw failed");
                            draw_error = Some(e);
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Tick) => state.on_tick(Instant::now()),
                    Some(AppEvent::Key(key)) => {
                        if handle_key(key, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Mouse(mouse)) => {
                        if handle_mouse(mouse, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Paste(text)) => handle_paste(&text, &mut state),
                    Some(AppEvent::AnalysisFinished(reply)) => state.apply_analysis_reply(*reply),
                    Some(AppEvent::AiStatus(available)) => state.set_ai_available(available),
                    // ratatui picks up the new size from frame.area() on the next Render.
                    Some(AppEvent::Resize) => {}
                    Some(AppEvent::Quit) | None => break 'event_loop,
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    tui::restore_tui()?;
    tracing::info!(target: "runtime", "redpen exited");
    match draw_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
