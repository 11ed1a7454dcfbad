use std::collections::HashMap;

use cyberfolio_core::boot::BootLine;
use cyberfolio_core::link_preview::preview_panel;
use cyberfolio_core::BootPhase;
use cyberfolio_core::FolioError;
use cyberfolio_core::HistoryLine;
use cyberfolio_core::LinkPreview;
use cyberfolio_core::Panel;
use cyberfolio_core::SessionEvent;

use crate::domain::models::Action;

#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

/// Ticks per half cursor blink.
const BLINK_TICKS: u64 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    Loading,
    Ready(Panel),
}

/// Everything the UI draws, mirrored from the boot sequencer and the interpreter.
pub struct AppState {
    pub boot_lines: Vec<BootLine>,
    pub boot_phase: BootPhase,
    /// Ticks since the current boot phase was entered.
    pub phase_ticks: u64,
    pub ticks: u64,
    pub input: String,
    pub history: Vec<HistoryLine>,
    pub previews: HashMap<String, PreviewState>,
    pub waiting_for_backend: bool,
    /// Lines scrolled up from the bottom of the history.
    pub scroll: usize,
    pub last_known_height: usize,
}

impl AppState {
    pub fn new(boot_lines: Vec<BootLine>) -> AppState {
        return AppState {
            boot_lines,
            boot_phase: BootPhase::PrePost,
            phase_ticks: 0,
            ticks: 0,
            input: String::new(),
            history: vec![],
            previews: HashMap::new(),
            waiting_for_backend: false,
            scroll: 0,
            last_known_height: 0,
        };
    }

    pub fn is_interactive(&self) -> bool {
        return self.boot_phase.is_done();
    }

    pub fn cursor_visible(&self) -> bool {
        return (self.ticks / BLINK_TICKS) % 2 == 0;
    }

    pub fn tick(&mut self) {
        self.ticks += 1;
        self.phase_ticks += 1;
    }

    pub fn handle_boot_phase(&mut self, phase: BootPhase) {
        // The sequencer announces its opening PrePost frame; every later phase is new.
        let repeat = phase == self.boot_phase && phase != BootPhase::PrePost;
        if phase < self.boot_phase || repeat {
            tracing::warn!(?phase, current = ?self.boot_phase, "ignoring stale boot phase");
            return;
        }
        self.boot_phase = phase;
        self.phase_ticks = 0;
    }

    pub fn handle_char(&mut self, c: char) {
        if !self.is_interactive() || c.is_control() {
            return;
        }
        self.input.push(c);
    }

    pub fn handle_paste(&mut self, text: &str) {
        for c in text.chars() {
            self.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        self.input.pop();
    }

    /// Takes the input line for submission. Blank lines are discarded and nothing is
    /// submitted before the boot sequence completes.
    pub fn take_submission(&mut self) -> Option<String> {
        if !self.is_interactive() {
            return None;
        }

        let raw = std::mem::take(&mut self.input);
        if raw.trim().is_empty() {
            return None;
        }

        return Some(raw);
    }

    /// Applies an interpreter event, returning any preview fetches it calls for.
    pub fn handle_session_event(&mut self, event: SessionEvent) -> Vec<Action> {
        match event {
            SessionEvent::Busy(_) => {
                self.waiting_for_backend = true;
                return vec![];
            }
            SessionEvent::Idle => {
                self.waiting_for_backend = false;
                return vec![];
            }
            SessionEvent::Cleared => {
                self.history.clear();
                self.scroll = 0;
                return vec![];
            }
            SessionEvent::Appended(line) => {
                let mut actions = vec![];
                for url in line.output.preview_urls() {
                    if !self.previews.contains_key(url) {
                        self.previews.insert(url.to_string(), PreviewState::Loading);
                        actions.push(Action::FetchPreview(url.to_string()));
                    }
                }

                self.history.push(line);
                self.scroll = 0;
                return actions;
            }
        }
    }

    pub fn handle_preview(&mut self, url: String, result: Result<LinkPreview, FolioError>) {
        let panel = preview_panel(&url, &result);
        self.previews.insert(url, PreviewState::Ready(panel));
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn page_size(&self) -> usize {
        return self.last_known_height.max(2) / 2;
    }

    /// Clamps the scroll offset once the rendered height is known.
    pub fn clamp_scroll(&mut self, content_height: usize, viewport_height: usize) {
        self.last_known_height = viewport_height;
        let max_scroll = content_height.saturating_sub(viewport_height);
        self.scroll = self.scroll.min(max_scroll);
    }
}
