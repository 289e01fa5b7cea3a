use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::centered_rect;

pub fn draw_help_popup(f: &mut Frame) {
    let area = centered_rect(50, 14, f.size());

    let key = |k: &str| Span::styled(format!("  {:<8}", k), Style::default().fg(Color::LightYellow));
    let text = |t: &str| Span::styled(t.to_string(), Style::default().fg(Color::White));

    let lines = vec![
        Line::from(Span::styled(
            "Keyboard shortcuts",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![key("j/k ↑/↓"), text("move between hosts")]),
        Line::from(vec![key("Enter"), text("open an SSH session")]),
        Line::from(vec![key("i"), text("resolve effective config (ssh -G)")]),
        Line::from(vec![key("/"), text("fuzzy search hosts")]),
        Line::from(vec![key("e"), text("edit hosts.toml in your editor")]),
        Line::from(vec![key("r"), text("reload the host list")]),
        Line::from(vec![key("?"), text("toggle this help")]),
        Line::from(vec![key("q"), text("quit (state is saved on exit)")]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}
