use crate::app::{App, InputMode};
use crate::tui::AppEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => app.clamp_scroll(),
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        KeyCode::Char('i') => app.trigger_ingest(),

        KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }

        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_down();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_up();
        }
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::PageDown => app.scroll_half_page_down(),
        KeyCode::PageUp => app.scroll_half_page_up(),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.scroll_to_bottom(),

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.input_mode = InputMode::Normal;
        return;
    }

    // The query box is disabled while a request is outstanding
    if app.is_busy() {
        return;
    }

    let cursor = app.input_cursor;
    let input = app.controller.pending_input_mut();

    match key.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Backspace => {
            if cursor > 0 {
                let byte_pos = char_to_byte_index(input, cursor - 1);
                input.remove(byte_pos);
                app.input_cursor -= 1;
            }
        }
        KeyCode::Delete => {
            if cursor < input.chars().count() {
                let byte_pos = char_to_byte_index(input, cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.input_cursor = cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = input.chars().count();
            app.input_cursor = (cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.input_cursor = 0;
        }
        KeyCode::End => {
            app.input_cursor = input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(input, cursor);
            input.insert(byte_pos, c);
            app.input_cursor += 1;
        }
        _ => {}
    }
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_chat = app
        .chat_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_chat {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(3),
        MouseEventKind::ScrollUp => app.scroll_up(3),
        _ => {}
    }
}
