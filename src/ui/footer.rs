use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, InputMode};

pub fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::default().fg(Color::LightYellow);
    let text_style = Style::default().fg(Color::Gray);

    let spans = match app.input_mode {
        InputMode::Normal => vec![
            Span::styled("↑/↓", key_style),
            Span::styled(" navigate  ", text_style),
            Span::styled("Enter", key_style),
            Span::styled(" connect  ", text_style),
            Span::styled("i", key_style),
            Span::styled(" resolve config  ", text_style),
            Span::styled("/", key_style),
            Span::styled(" search  ", text_style),
            Span::styled("e", key_style),
            Span::styled(" edit hosts  ", text_style),
            Span::styled("?", key_style),
            Span::styled(" help  ", text_style),
            Span::styled("q", key_style),
            Span::styled(" quit", text_style),
        ],
        InputMode::Search => vec![
            Span::styled("↑/↓", key_style),
            Span::styled(" navigate  ", text_style),
            Span::styled("Enter", key_style),
            Span::styled(" connect  ", text_style),
            Span::styled("Esc", key_style),
            Span::styled(" cancel search", text_style),
        ],
    };

    let paragraph =
        Paragraph::new(Line::from(spans)).alignment(ratatui::layout::Alignment::Center);
    f.render_widget(paragraph, area);
}
