use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};
use std::time::SystemTime;

use crate::app::{App, InputMode};
use crate::ssh_config;
use crate::ui::centered_rect;

pub fn draw_hosts_list(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(area);

    draw_hosts_panel(f, app, chunks[0]);
    draw_details_panel(f, app, chunks[1]);
}

fn draw_hosts_panel(f: &mut Frame, app: &mut App, area: Rect) {
    let is_search_mode = app.input_mode == InputMode::Search;

    let (list_area, border_style, title) = if is_search_mode {
        let search_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
            .split(area);

        let search_block = Block::default()
            .borders(Borders::ALL)
            .title(" Search (Esc to exit) ")
            .border_style(Style::default().fg(Color::Yellow));

        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let cursor = if now % 1000 < 500 { "█" } else { " " };

        let search_paragraph = Paragraph::new(format!("{} {}", app.search_query, cursor))
            .style(Style::default().fg(Color::White))
            .block(search_block);
        f.render_widget(search_paragraph, search_chunks[0]);

        (
            search_chunks[1],
            Style::default().fg(Color::Yellow),
            format!(" Results ({} matches) ", app.filtered_hosts.len()),
        )
    } else {
        (
            area,
            Style::default().fg(Color::Green),
            " Hosts ".to_string(),
        )
    };

    let items: Vec<ListItem> = app
        .filtered_hosts
        .iter()
        .enumerate()
        .map(|(i, filtered_host)| {
            let host = &app.hosts[filtered_host.original_index];
            let is_selected = if is_search_mode {
                i == app.search_selected
            } else {
                i == app.selected_host
            };

            let prefix = if is_selected { "> " } else { "  " };
            let (text_style, bg_style) = if is_selected {
                (
                    Style::default()
                        .fg(Color::Black)
                        .bg(if is_search_mode {
                            Color::Yellow
                        } else {
                            Color::Green
                        })
                        .add_modifier(Modifier::BOLD),
                    Style::default().bg(if is_search_mode {
                        Color::Yellow
                    } else {
                        Color::Green
                    }),
                )
            } else {
                (Style::default().fg(Color::White), Style::default())
            };

            let mut spans = vec![Span::styled(prefix, text_style)];

            // Highlight the fuzzy-matched characters of the alias
            if is_search_mode && !filtered_host.matched_indices.is_empty() {
                for (idx, ch) in host.alias.chars().enumerate() {
                    let style = if filtered_host.matched_indices.contains(&idx) {
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                    } else {
                        text_style
                    };
                    spans.push(Span::styled(ch.to_string(), style));
                }
            } else {
                spans.push(Span::styled(host.alias.clone(), text_style));
            }

            if !host.host.is_empty() {
                let details = format!(
                    " ({}@{}:{})",
                    host.user,
                    host.host,
                    host.port.unwrap_or(22)
                );
                spans.push(Span::styled(details, text_style.fg(Color::Gray)));
            }

            ListItem::new(Line::from(spans)).style(bg_style)
        })
        .collect();

    let list = if items.is_empty() {
        let message = if is_search_mode {
            format!("No results for '{}'", app.search_query)
        } else {
            "No hosts configured. Press 'e' to edit the host list.".to_string()
        };
        List::new(vec![ListItem::new(Span::styled(
            message,
            Style::default().fg(Color::Gray),
        ))])
    } else {
        List::new(items)
    };

    let list_widget = list.block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );

    f.render_stateful_widget(list_widget, list_area, &mut app.host_list_state);
}

// Effective SSH parameters of the selected host. Shows the stub until a
// real resolution was requested, to avoid running ssh for every listed host.
fn draw_details_panel(f: &mut Frame, app: &App, area: Rect) {
    let label_style = Style::default().fg(Color::Gray);
    let value_style = Style::default().fg(Color::White);

    let lines = match app.get_current_selected_host() {
        Some(host) => {
            let (config, resolved) = match &app.resolved_config {
                Some((alias, config)) if *alias == host.alias => (config.clone(), true),
                _ => (ssh_config::stub_config(), false),
            };

            let source = if resolved {
                Span::styled("resolved from ssh -G", Style::default().fg(Color::Green))
            } else {
                Span::styled(
                    "defaults, press 'i' to resolve",
                    Style::default().fg(Color::Yellow),
                )
            };

            let field = |value: &str| {
                if value.is_empty() {
                    "-".to_string()
                } else {
                    value.to_string()
                }
            };

            vec![
                Line::from(vec![
                    Span::styled("Alias:         ", label_style),
                    Span::styled(host.alias.clone(), value_style.add_modifier(Modifier::BOLD)),
                ]),
                Line::from(vec![
                    Span::styled("Hostname:      ", label_style),
                    Span::styled(field(&host.host), value_style),
                ]),
                Line::from(""),
                Line::from(vec![
                    Span::styled("User:          ", label_style),
                    Span::styled(field(&config.user), value_style),
                ]),
                Line::from(vec![
                    Span::styled("Port:          ", label_style),
                    Span::styled(field(&config.port), value_style),
                ]),
                Line::from(vec![
                    Span::styled("Identity file: ", label_style),
                    Span::styled(field(&config.identity_file), value_style),
                ]),
                Line::from(""),
                Line::from(source),
            ]
        }
        None => vec![Line::from(Span::styled("No host selected", label_style))],
    };

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Connection "),
    );

    f.render_widget(paragraph, area);
}

pub fn draw_loading_overlay(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 8, f.size());

    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dots_count = (now / 500) % 4;
    let dots = ".".repeat(dots_count as usize);

    let status_text = match &app.status_message {
        Some((msg, _)) => msg.clone(),
        None => "Connecting".to_string(),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "SSH Connection",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}{}", status_text, dots),
            Style::default().fg(Color::Cyan),
        )),
    ];

    if let Some(host) = app.get_current_selected_host() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Host: ", Style::default().fg(Color::Gray)),
            Span::styled(host.alias.clone(), Style::default().fg(Color::Green)),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" sshgo ")
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
