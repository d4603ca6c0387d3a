use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::console::{EXTERNAL_QUERY_ENTRY, HELP_ENTRY};

use super::picker::Picker;

/// Rows used by the prompt line and the key hint around the list.
pub const CHROME_HEIGHT: u16 = 2;

pub fn draw(frame: &mut Frame, picker: &Picker) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Prompt
            Constraint::Min(1),    // Options
            Constraint::Length(1), // Key hint
        ])
        .split(frame.area());

    let prompt = Line::from(vec![
        Span::styled("? ", Style::default().fg(Color::Green)),
        Span::styled(
            picker.message.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(prompt), chunks[0]);

    let items: Vec<ListItem> = picker
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let is_pseudo = i + 2 >= picker.options.len()
                && (option == HELP_ENTRY || option == EXTERNAL_QUERY_ENTRY);
            let style = if is_pseudo {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(option.clone(), style)))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("❯ ");

    let mut state = ListState::default().with_selected(Some(picker.selected));
    frame.render_stateful_widget(list, chunks[1], &mut state);

    let hint = Line::from(Span::styled(
        "↑/↓ move · enter select · esc quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(hint), chunks[2]);
}
