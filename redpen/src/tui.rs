//! Terminal lifecycle management for redpen.
//!
//! Raw mode, the alternate screen, mouse capture, and bracketed paste are
//! enabled together in [`init_tui`] and undone together in [`restore_tui`].
//! Logging goes to a file, so nothing else writes to the terminal while the
//! TUI owns it.

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use signal_hook::consts::SIGTERM;
use signal_hook::flag::register;
use std::io::{stdout, BufWriter, Stdout};
use std::panic;
use std::sync::{atomic::AtomicBool, Arc};

/// CrosstermBackend over a buffered stdout, batching escape sequences per frame.
///
/// Unbuffered stdout issues one write syscall per escape sequence, which shows
/// up as flicker on slow terminals and over SSH.
pub type Tui = Terminal<CrosstermBackend<BufWriter<Stdout>>>;

/// Enters raw mode and the alternate screen. Call [`restore_tui`] at every
/// exit path.
///
/// Mouse capture is needed for click-to-select on highlights; bracketed paste
/// delivers a paste as one event instead of a burst of key presses.
///
/// # Errors
///
/// Returns `Err` if `enable_raw_mode`, `execute!`, or `Terminal::new` fails.
pub fn init_tui() -> std::io::Result<Tui> {
    let mut out = BufWriter::new(stdout());
    enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    Terminal::new(CrosstermBackend::new(out))
}

/// Restores the terminal to its pre-TUI state. Idempotent.
///
/// ratatui does not restore the terminal on `Drop`, so this must run on every
/// exit path including the panic hook.
pub fn restore_tui() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Installs a panic hook that logs the panic and restores the terminal before
/// the previous hook prints the message.
///
/// Must be called before [`init_tui`]. The terminal is restored before the
/// original hook runs, otherwise the panic message would be printed into the
/// alternate screen and lost.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        tracing::error!(target: "runtime.panic", %panic_info, "panic");
        let _ = restore_tui();
        original_hook(panic_info);
    }));
}

/// Registers a SIGTERM handler and returns the flag it sets.
///
/// The main loop polls the flag on its 50 ms heartbeat. A flag is used
/// instead of handling the signal directly because the handler may only do
/// async-signal-safe work; restoring the terminal is not.
///
/// # Errors
///
/// Returns `Err` if the OS refuses to register the handler.
pub fn register_sigterm() -> std::io::Result<Arc<AtomicBool>> {
    let term = Arc::new(AtomicBool::new(false));
    register(SIGTERM, Arc::clone(&term))?;
    Ok(term)
}
