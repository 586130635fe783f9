use crate::app::{App, InputMode};
use crate::transcript::Role;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, transcript, query box, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_transcript(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let status = if app.is_busy() {
        Span::styled(
            " Processing... ",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        )
    } else {
        Span::styled(
            " Ingest Logs (i) ",
            Style::default().bg(Color::Green).fg(Color::Black),
        )
    };

    let header = Line::from(vec![
        Span::styled(
            " 🔍 Log Bot ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} ", app.backend_url),
            Style::default().fg(Color::DarkGray),
        ),
        status,
    ]);

    frame.render_widget(Paragraph::new(header), area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);
    app.clamp_scroll();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Transcript ");

    let transcript = transcript_paragraph(app)
        .block(block)
        .scroll((app.chat_scroll, 0));

    frame.render_widget(transcript, area);
}

/// The wrapped transcript body. Scroll limits are measured on this same
/// paragraph, so they always agree with what is drawn.
pub(crate) fn transcript_paragraph(app: &App) -> Paragraph<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for entry in app.controller.transcript().entries() {
        let (label, color) = match entry.role {
            Role::User => ("You:", Color::Cyan),
            Role::Bot => ("Bot:", Color::Yellow),
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for line in entry.display_lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::default());
    }

    if app.is_busy() {
        lines.push(Line::from(Span::styled(
            "Bot:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Processing{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false })
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let busy = app.is_busy();
    let editing = app.input_mode == InputMode::Editing;

    let (border_color, title) = if busy {
        (Color::DarkGray, " Query (waiting for backend) ")
    } else if editing {
        (Color::Yellow, " Query (Enter to send) ")
    } else {
        (Color::DarkGray, " Query (e to edit) ")
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Keep the cursor inside the visible part of the box
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.input_cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .controller
        .transcript()
        .pending_input()
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let text_color = if busy { Color::DarkGray } else { Color::Cyan };
    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(text_color))
        .block(input_block);

    frame.render_widget(input, area);

    if editing && !busy {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.input_mode {
        InputMode::Normal => (" NORMAL ", Style::default().bg(Color::Blue).fg(Color::White)),
        InputMode::Editing => (" EDIT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    let hints: &[(&str, &str)] = match app.input_mode {
        InputMode::Normal => &[
            (" i ", " ingest "),
            (" e ", " query "),
            (" j/k ", " scroll "),
            (" g/G ", " top/bottom "),
            (" q ", " quit "),
        ],
        InputMode::Editing => &[
            (" Enter ", " send "),
            (" Esc ", " normal mode "),
            (" Ctrl-C ", " quit "),
        ],
    };
    for (key, label) in hints {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(*label, label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::{FakeBackend, FakeQuery};
    use crate::controller::Controller;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use tokio::sync::Notify;

    const WIDTH: u16 = 100;
    const HEIGHT: u16 = 30;

    fn draw(app: &mut App) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .chunks(WIDTH as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    fn app_with(backend: FakeBackend) -> App {
        App::new(Controller::new(Arc::new(backend)), "http://localhost:9090")
    }

    #[test]
    fn test_initial_screen_shows_greeting() {
        let mut app = app_with(FakeBackend::new(true, FakeQuery::Results(Vec::new())));
        let rows = draw(&mut app);

        assert!(rows.iter().any(|row| row.contains("Log Bot")));
        assert!(rows.iter().any(|row| row.contains("Ingest Logs (i)")));
        assert!(rows.iter().any(|row| row.contains("Bot:")));
        assert!(rows
            .iter()
            .any(|row| row.contains("Hello! I am your Log Analysis Bot.")));
        assert_eq!(app.chat_width, WIDTH - 2);
    }

    #[tokio::test]
    async fn test_each_result_gets_its_own_line() {
        let mut app = app_with(FakeBackend::new(
            true,
            FakeQuery::Results(vec!["alpha".to_string(), "beta".to_string()]),
        ));
        app.controller.submit_query("OOM").await;

        let rows = draw(&mut app);

        let alpha = rows.iter().position(|row| row.contains("• alpha")).unwrap();
        let beta = rows.iter().position(|row| row.contains("• beta")).unwrap();
        assert_eq!(beta, alpha + 2);
        assert!(rows
            .iter()
            .any(|row| row.contains("Here are the relevant log entries I found:")));
        assert!(rows.iter().any(|row| row.contains("You:")));
    }

    #[tokio::test]
    async fn test_word_wrapped_answer_scrolls_fully_into_view() {
        let long_results: Vec<String> = (0..6)
            .map(|i| {
                format!(
                    "{} {} {} END{}",
                    "a".repeat(60),
                    "b".repeat(60),
                    "c".repeat(60),
                    i
                )
            })
            .collect();
        let mut app = app_with(FakeBackend::new(true, FakeQuery::Results(long_results)));
        app.controller.submit_query("OOM").await;

        let rows = draw(&mut app);
        assert!(app.follow_tail);
        assert!(rows.iter().any(|row| row.contains("END5")));

        app.scroll_to_top();
        draw(&mut app);
        app.scroll_down(1000);
        let rows = draw(&mut app);
        assert!(rows.iter().any(|row| row.contains("END5")));
    }

    #[tokio::test]
    async fn test_busy_screen_shows_processing() {
        let gate = Arc::new(Notify::new());
        let mut app = app_with(
            FakeBackend::new(true, FakeQuery::Results(Vec::new())).gated(gate.clone()),
        );
        app.controller.begin_ingest();

        let rows = draw(&mut app);

        assert!(rows.iter().any(|row| row.contains("Processing...")));
        assert!(rows.iter().any(|row| row.contains("waiting for backend")));
        assert!(!rows.iter().any(|row| row.contains("Ingest Logs (i)")));

        gate.notify_one();
        app.controller.settle().await;
    }
}
