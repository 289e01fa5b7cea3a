use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub fn draw_status_bar(f: &mut Frame, app: &mut App, area: Rect) {
    if let Some((message, timestamp)) = &app.status_message {
        // Clear messages older than 5 seconds (except when connecting)
        let should_show = if app.is_connecting {
            true
        } else {
            timestamp.elapsed().as_secs() < 5
        };

        if should_show {
            let lowered = message.to_lowercase();
            let style = if lowered.contains("error") || lowered.contains("can't") {
                Style::default().fg(Color::Red)
            } else if lowered.contains("success") || lowered.contains("ended") {
                Style::default().fg(Color::Green)
            } else if lowered.contains("connecting") || lowered.contains("resolving") {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::Yellow)
            };

            let paragraph = Paragraph::new(message.as_str())
                .style(style)
                .alignment(ratatui::layout::Alignment::Center);
            f.render_widget(paragraph, area);
        } else {
            // Expired
            app.clear_status_message();
        }
    }
}
