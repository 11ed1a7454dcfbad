use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::LeaveAlternateScreen;
use cyberfolio_core::BootLine;
use ratatui::prelude::Backend;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use ratatui::Terminal;
use tokio::sync::mpsc;

use super::render;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::services::AppState;
use crate::domain::services::EventsService;
use crate::domain::services::TICK;

pub struct UiProps {
    pub boot_lines: Vec<BootLine>,
    /// Length of the memory test screen after any speedup.
    pub memory_test: std::time::Duration,
}

impl UiProps {
    fn memory_test_ticks(&self) -> u64 {
        return (self.memory_test.as_millis() / TICK.as_millis()) as u64;
    }
}

fn input_line(app_state: &AppState) -> Line<'static> {
    let mut spans = render::prompt_spans(&app_state.input);
    if app_state.waiting_for_backend {
        spans.push(Span::styled(" ⟳", Style::default().fg(Color::Gray)));
    } else if app_state.cursor_visible() {
        spans.push(Span::styled("█", Style::default().fg(Color::White)));
    }
    return Line::from(spans);
}

fn ui(frame: &mut Frame, app_state: &mut AppState, memory_test_ticks: u64) {
    let area = frame.area();
    let background = Style::default().bg(Color::Black);

    if !app_state.is_interactive() {
        let lines = render::boot_lines(app_state, memory_test_ticks);
        frame.render_widget(Paragraph::new(lines).style(background), area);
        return;
    }

    let mut lines = render::history_lines(app_state);
    lines.push(input_line(app_state));

    let viewport_height = area.height as usize;
    app_state.clamp_scroll(lines.len(), viewport_height);
    let offset = lines
        .len()
        .saturating_sub(viewport_height)
        .saturating_sub(app_state.scroll);

    frame.render_widget(
        Paragraph::new(lines)
            .style(background)
            .scroll((offset.min(u16::MAX as usize) as u16, 0)),
        area,
    );
}

/// Applies one event. Returns `false` once the user asked to quit.
fn handle_event(
    app_state: &mut AppState,
    event: Event,
    tx: &mpsc::UnboundedSender<Action>,
) -> Result<bool> {
    match event {
        Event::Boot(phase) => {
            app_state.handle_boot_phase(phase);
        }
        Event::Session(session_event) => {
            for action in app_state.handle_session_event(session_event) {
                tx.send(action)?;
            }
        }
        Event::PreviewLoaded(url, result) => {
            app_state.handle_preview(url, result);
        }
        Event::KeyboardCharInput(c) => {
            app_state.handle_char(c);
        }
        Event::KeyboardBackspace => {
            app_state.handle_backspace();
        }
        Event::KeyboardPaste(text) => {
            app_state.handle_paste(&text);
        }
        Event::KeyboardEnter => {
            if let Some(raw_input) = app_state.take_submission() {
                tx.send(Action::Submit(raw_input))?;
            }
        }
        Event::KeyboardCTRLC => {
            return Ok(false);
        }
        Event::UITick => {
            app_state.tick();
        }
        Event::UIScrollUp => {
            app_state.scroll_up(1);
        }
        Event::UIScrollDown => {
            app_state.scroll_down(1);
        }
        Event::UIScrollPageUp => {
            app_state.scroll_up(app_state.page_size());
        }
        Event::UIScrollPageDown => {
            app_state.scroll_down(app_state.page_size());
        }
    }

    return Ok(true);
}

pub async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    props: UiProps,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let memory_test_ticks = props.memory_test_ticks();
    let mut app_state = AppState::new(props.boot_lines);
    let mut events = EventsService::new(rx);

    loop {
        terminal.draw(|frame| ui(frame, &mut app_state, memory_test_ticks))?;

        let event = events.next().await?;
        if !handle_event(&mut app_state, event, &tx)? {
            tracing::debug!("quit requested");
            break;
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyberfolio_core::content::portfolio;
    use cyberfolio_core::BootPhase;
    use cyberfolio_core::HistoryLine;
    use cyberfolio_core::SessionEvent;
    use cyberfolio_core::BOOT_LINES;
    use ratatui::backend::TestBackend;

    fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        return buffer
            .content
            .chunks(width)
            .map(|row| {
                return row
                    .iter()
                    .map(|cell| cell.symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string();
            })
            .collect();
    }

    #[test]
    fn test_typing_waits_for_boot_and_enter_submits() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app_state = AppState::new(BOOT_LINES.to_vec());

        assert!(handle_event(&mut app_state, Event::KeyboardCharInput('x'), &tx).unwrap());
        assert!(handle_event(&mut app_state, Event::KeyboardEnter, &tx).unwrap());
        assert!(rx.try_recv().is_err());

        handle_event(&mut app_state, Event::Boot(BootPhase::Done), &tx).unwrap();
        for c in "whoami".chars() {
            handle_event(&mut app_state, Event::KeyboardCharInput(c), &tx).unwrap();
        }
        handle_event(&mut app_state, Event::KeyboardEnter, &tx).unwrap();
        assert_eq!(rx.try_recv().unwrap(), Action::Submit("whoami".to_string()));

        handle_event(&mut app_state, Event::KeyboardEnter, &tx).unwrap();
        assert!(rx.try_recv().is_err());

        assert!(!handle_event(&mut app_state, Event::KeyboardCTRLC, &tx).unwrap());
    }

    #[test]
    fn test_appended_output_requests_previews() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app_state = AppState::new(BOOT_LINES.to_vec());
        handle_event(&mut app_state, Event::Boot(BootPhase::Done), &tx).unwrap();

        let line = HistoryLine {
            command: "projects".to_string(),
            output: portfolio::projects(),
        };
        handle_event(
            &mut app_state,
            Event::Session(SessionEvent::Appended(line)),
            &tx,
        )
        .unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            Action::FetchPreview("https://defendis.ai".to_string())
        );
    }

    #[test]
    fn test_draws_boot_then_prompt() {
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        let mut app_state = AppState::new(BOOT_LINES.to_vec());

        app_state.handle_boot_phase(BootPhase::MemoryTest);
        terminal.draw(|frame| ui(frame, &mut app_state, 15)).unwrap();
        assert_eq!(screen(&terminal)[0], "Memory Test:");

        app_state.handle_boot_phase(BootPhase::Done);
        terminal.draw(|frame| ui(frame, &mut app_state, 15)).unwrap();
        let rows = screen(&terminal);
        assert_eq!(rows[0], portfolio::WELCOME_TITLE);
        assert_eq!(rows[2], "root@portfolio:~$ █");
    }

    #[test]
    fn test_keeps_the_prompt_in_view() {
        let mut terminal = Terminal::new(TestBackend::new(80, 6)).unwrap();
        let mut app_state = AppState::new(BOOT_LINES.to_vec());
        app_state.handle_boot_phase(BootPhase::Done);
        app_state.history.push(HistoryLine {
            command: "help".to_string(),
            output: portfolio::skills(),
        });
        app_state.input = "skills".to_string();
        app_state.ticks = 4;

        terminal.draw(|frame| ui(frame, &mut app_state, 15)).unwrap();
        let rows = screen(&terminal);
        assert_eq!(rows[5], "root@portfolio:~$ skills");

        app_state.scroll_up(1000);
        terminal.draw(|frame| ui(frame, &mut app_state, 15)).unwrap();
        let rows = screen(&terminal);
        assert_eq!(rows[0], "");
        assert_eq!(rows[1], "root@portfolio:~$ help");
    }
}
