use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, MouseEvent};

pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Paste(String),
    /// The terminal lost focus; any pointer drag is abandoned.
    FocusLost,
    Tick,
    Resize(#[allow(dead_code)] u16, #[allow(dead_code)] u16),
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            loop {
                let app_event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => AppEvent::Key(key),
                        Ok(Event::Mouse(mouse)) => AppEvent::Mouse(mouse),
                        Ok(Event::Paste(text)) => AppEvent::Paste(text),
                        Ok(Event::FocusLost) => AppEvent::FocusLost,
                        Ok(Event::Resize(w, h)) => AppEvent::Resize(w, h),
                        _ => continue,
                    }
                } else {
                    AppEvent::Tick
                };
                if tx.send(app_event).is_err() {
                    return;
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
