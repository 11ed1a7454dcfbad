use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;

use crate::domain::models::Event;

/// Redraw cadence while nothing else happens; drives the cursor blink and the
/// memory test bar.
pub const TICK: time::Duration = time::Duration::from_millis(100);

pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    pub fn handle_key(keyevent: KeyEvent) -> Option<Event> {
        if keyevent.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = keyevent.modifiers.contains(KeyModifiers::CONTROL);

        match keyevent.code {
            KeyCode::Char('c') if ctrl => {
                return Some(Event::KeyboardCTRLC);
            }
            KeyCode::Char('d') if ctrl => {
                return Some(Event::UIScrollPageDown);
            }
            KeyCode::Char('u') if ctrl => {
                return Some(Event::UIScrollPageUp);
            }
            KeyCode::Char(_) if ctrl => {
                return None;
            }
            KeyCode::Char(c) => {
                return Some(Event::KeyboardCharInput(c));
            }
            KeyCode::Backspace => {
                return Some(Event::KeyboardBackspace);
            }
            KeyCode::Enter => {
                return Some(Event::KeyboardEnter);
            }
            KeyCode::Up => {
                return Some(Event::UIScrollUp);
            }
            KeyCode::Down => {
                return Some(Event::UIScrollDown);
            }
            KeyCode::PageUp => {
                return Some(Event::UIScrollPageUp);
            }
            KeyCode::PageDown => {
                return Some(Event::UIScrollPageDown);
            }
            _ => {
                return None;
            }
        }
    }

    fn handle_crossterm(&self, event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Paste(text) => {
                return Some(Event::KeyboardPaste(text));
            }
            CrosstermEvent::Mouse(mouseevent) => match mouseevent.kind {
                MouseEventKind::ScrollUp => {
                    return Some(Event::UIScrollUp);
                }
                MouseEventKind::ScrollDown => {
                    return Some(Event::UIScrollDown);
                }
                _ => {
                    return None;
                }
            },
            CrosstermEvent::Key(keyevent) => {
                return EventsService::handle_key(keyevent);
            }
            _ => return None,
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => self.handle_crossterm(input),
                    Some(Err(_)) => None,
                    None => None
                },
                _ = time::sleep(TICK) => Some(Event::UITick)
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}
