use ratatui::layout::Rect;

use crate::controller::Controller;
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Terminal UI state. Conversation state lives in the controller; this only
/// tracks what the screen needs on top of it.
pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub controller: Controller,
    pub backend_url: String,

    // Query box cursor, in characters
    pub input_cursor: usize,

    // Transcript viewport
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height, set by the renderer
    pub chat_width: u16,  // inner width, set by the renderer
    pub follow_tail: bool,
    pub chat_area: Option<Rect>,

    pub animation_frame: u8,
}

impl App {
    pub fn new(controller: Controller, backend_url: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            controller,
            backend_url: backend_url.into(),
            input_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            follow_tail: true,
            chat_area: None,
            animation_frame: 0,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        } else {
            self.animation_frame = 0;
        }
    }

    pub fn trigger_ingest(&mut self) {
        if self.controller.begin_ingest() {
            self.follow_tail = true;
        }
    }

    pub fn submit_input(&mut self) {
        if self.controller.begin_pending_input() {
            self.input_cursor = 0;
            self.follow_tail = true;
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.max_scroll();
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max);
        if self.chat_scroll >= max {
            self.follow_tail = true;
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        if self.follow_tail {
            self.chat_scroll = self.max_scroll();
            self.follow_tail = false;
        }
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_half_page_down(&mut self) {
        self.scroll_down((self.chat_height / 2).max(1));
    }

    pub fn scroll_half_page_up(&mut self) {
        self.scroll_up((self.chat_height / 2).max(1));
    }

    pub fn scroll_to_top(&mut self) {
        self.follow_tail = false;
        self.chat_scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.follow_tail = true;
        self.chat_scroll = self.max_scroll();
    }

    /// Rendered height of the transcript at the current width, including the
    /// "Processing" indicator while busy.
    pub fn transcript_height(&self) -> u16 {
        let wrap_width = if self.chat_width > 0 { self.chat_width } else { 50 };

        let rows = ui::transcript_paragraph(self).line_count(wrap_width);
        rows.min(u16::MAX as usize) as u16
    }

    pub fn max_scroll(&self) -> u16 {
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.transcript_height().saturating_sub(visible_height)
    }

    /// Called by the renderer once the viewport size is known.
    pub fn clamp_scroll(&mut self) {
        let max = self.max_scroll();
        if self.follow_tail || self.chat_scroll > max {
            self.chat_scroll = max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::{FakeBackend, FakeQuery};
    use std::sync::Arc;

    fn app_with(results: &[&str]) -> App {
        let backend = FakeBackend::new(
            true,
            FakeQuery::Results(results.iter().map(|s| s.to_string()).collect()),
        );
        App::new(Controller::new(Arc::new(backend)), "http://localhost:9090")
    }

    #[test]
    fn test_greeting_height_accounts_for_wrapping() {
        let mut app = app_with(&[]);
        app.chat_width = 100;
        // label + greeting + spacer
        assert_eq!(app.transcript_height(), 3);

        // Word wrapping never takes fewer rows than breaking at any character
        app.chat_width = 10;
        assert!(app.transcript_height() >= 1 + 7 + 1);
    }

    #[tokio::test]
    async fn test_scroll_is_clamped_to_transcript() {
        let lines: Vec<String> = (0..20).map(|i| format!("line {}", i)).collect();
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        let mut app = app_with(&refs);
        app.chat_width = 80;
        app.chat_height = 10;
        app.controller.submit_query("line").await;

        let max = app.max_scroll();
        assert!(max > 0);

        app.scroll_up(5);
        assert!(!app.follow_tail);
        assert_eq!(app.chat_scroll, max - 5);

        app.scroll_down(100);
        assert_eq!(app.chat_scroll, max);
        assert!(app.follow_tail);

        app.scroll_to_top();
        assert_eq!(app.chat_scroll, 0);
        app.clamp_scroll();
        assert_eq!(app.chat_scroll, 0);
    }

    #[test]
    fn test_animation_only_runs_while_busy() {
        let mut app = app_with(&[]);
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);
    }
}
