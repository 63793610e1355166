//! Event bus for redpen.
//!
//! Terminal input, timer ticks, and background results are normalised into one
//! `AppEvent` enum and sent over a tokio unbounded MPSC channel. The main loop
//! receives from this channel and dispatches accordingly.
//!
//! Two independent intervals drive the render and logic cycles:
//! - **Render interval** (33 ms ≈ 30 FPS) triggers a `terminal.draw()` call.
//! - **Tick interval** (250 ms) drives time-based state: the idle commit of the
//!   Insert-mode draft and the analysing spinner.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::analysis::types::AnalysisReply;

/// All events the application can receive from any source.
#[derive(Debug)]
#[non_exhaustive]
pub enum AppEvent {
    /// A key press (`KeyEventKind::Press` only; release and repeat are dropped).
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Bracketed paste: the whole pasted string in one event.
    Paste(String),
    /// Terminal was resized. The next render reads the new size from the frame.
    Resize,
    /// Logic tick (250 ms).
    Tick,
    /// Render tick (≈30 FPS).
    Render,
    /// An analysis request finished, successfully or not.
    AnalysisFinished(Box<AnalysisReply>),
    /// Result of the periodic availability check.
    AiStatus(bool),
    Quit,
}

/// Sender and receiver ends of the unified event channel.
///
/// Clone `tx` for each background task that produces events; `rx` is owned by
/// the main loop.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the task that feeds terminal input and timer ticks into the bus.
///
/// The task ends when the receiver is dropped and a send fails.
/// `reader.next().fuse()` keeps `select!` from polling a finished stream.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(250));
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let tick_tick = tick_interval.tick();
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            let sent = tokio::select! {
                _ = tick_tick => tx.send(AppEvent::Tick),
                _ = render_tick => tx.send(AppEvent::Render),
                maybe_event = crossterm_event => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        tx.send(AppEvent::Key(key))
                    }
                    Some(Ok(Event::Paste(text))) => tx.send(AppEvent::Paste(text)),
                    Some(Ok(Event::Resize(_, _))) => tx.send(AppEvent::Resize),
                    Some(Ok(Event::Mouse(mouse))) => tx.send(AppEvent::Mouse(mouse)),
                    Some(Err(e)) => {
                        tracing::warn!(target: "runtime", error = %e, "terminal input error");
                        Ok(())
                    }
                    None => {
                        let _ = tx.send(AppEvent::Quit);
                        break;
                    }
                    _ => Ok(()),
                },
            };
            if sent.is_err() {
                break;
            }
        }
    });
}
