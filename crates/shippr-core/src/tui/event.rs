//! Event handling for the TUI

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::warn;

/// TUI events
#[derive(Debug, Clone)]
pub enum Event {
    /// Terminal tick (re-checks the session and redraws)
    Tick,
    /// Keyboard event
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// Forwards terminal input and ticks over a channel
pub struct EventHandler {
    /// Sender for events, handed to the reader thread on start
    tx: Option<mpsc::UnboundedSender<Event>>,
    /// Receiver for events
    rx: mpsc::UnboundedReceiver<Event>,
    /// Tick rate
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx: Some(tx),
            rx,
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Start reading terminal input on a blocking thread.
    ///
    /// The channel closes when the reader stops, so [`EventHandler::next`]
    /// then returns `None`. Calling this twice does nothing.
    pub fn start(&mut self) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        let tick_rate = self.tick_rate;

        tokio::task::spawn_blocking(move || {
            let mut last_tick = Instant::now();

            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        let forwarded = match event::read() {
                            Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                                Some(Event::Key(key))
                            }
                            Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
                            Ok(_) => None,
                            Err(e) => {
                                warn!(error = %e, "Failed to read terminal event");
                                None
                            }
                        };
                        if let Some(event) = forwarded {
                            if tx.send(event).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!(error = %e, "Failed to poll terminal events");
                        break;
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if tx.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Empty the channel without waiting, returning the keys that were in it
    pub fn drain_keys(&mut self) -> Vec<KeyEvent> {
        let mut keys = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            if let Event::Key(key) = event {
                keys.push(key);
            }
        }
        keys
    }
}

/// Check if a key event matches a key binding
pub fn key_match(key: KeyEvent, code: KeyCode, modifiers: KeyModifiers) -> bool {
    key.code == code && key.modifiers == modifiers
}

/// Ctrl+C quits from anywhere, including forms
pub fn is_quit(key: KeyEvent) -> bool {
    key_match(key, KeyCode::Char('c'), KeyModifiers::CONTROL)
}
