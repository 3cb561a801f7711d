//! Terminal setup/teardown and the background input pump shared by every
//! scene.

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn enter() -> anyhow::Result<Tui> {
    debug!("terminal: enabling raw mode");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    debug!("terminal: ready, size={:?}", terminal.size());
    Ok(terminal)
}

pub fn leave(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// `q`, `Esc` or `Ctrl-C`.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

pub fn is_quit_event(ev: &Event) -> bool {
    matches!(ev, Event::Key(key) if is_quit_key(key))
}

/// Reads terminal events on a blocking thread and forwards them to the async
/// side. The reader polls so it can notice the stop flag.
pub struct EventPump {
    rx: mpsc::Receiver<Event>,
    stop: Arc<AtomicBool>,
}

impl EventPump {
    pub fn start() -> Self {
        let (tx, rx) = mpsc::channel::<Event>(256);
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        tokio::task::spawn_blocking(move || {
            while !flag.load(Ordering::Relaxed) {
                match event::poll(Duration::from_millis(50)) {
                    Ok(true) => match event::read() {
                        Ok(ev) => {
                            if tx.blocking_send(ev).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("terminal: event read failed: {}", e);
                            break;
                        }
                    },
                    Ok(false) => {}
                    Err(e) => {
                        warn!("terminal: event poll failed: {}", e);
                        break;
                    }
                }
            }
            debug!("terminal: event pump stopped");
        });
        Self { rx, stop }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Drain without waiting.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    /// Whether a quit key is among the pending events. Other events are
    /// dropped.
    pub fn quit_pending(&mut self) -> bool {
        let mut quit = false;
        while let Some(ev) = self.try_next() {
            quit |= is_quit_event(&ev);
        }
        quit
    }
}

impl Drop for EventPump {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_quit_keys() {
        assert!(is_quit_key(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit_key(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit_key(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit_key(&key(KeyCode::Char('r'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_release_is_ignored() {
        let mut k = key(KeyCode::Char('q'), KeyModifiers::NONE);
        k.kind = KeyEventKind::Release;
        assert!(!is_quit_key(&k));
    }
}
