// List rendering for the LOC tree.
// Provides the entries list with loading, error and empty states.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::state::TreeState;

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an error message.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = Paragraph::new(format!("❌ {}", error))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// Color for an entry's share of its parent.
fn share_color(percent: f64) -> Color {
    if percent >= 50.0 {
        Color::Green
    } else if percent >= 10.0 {
        Color::Yellow
    } else {
        Color::White
    }
}

/// Render the children of the current node, largest first.
pub fn render_entries(frame: &mut Frame, tree: &mut TreeState, area: Rect) {
    let Some(node) = tree.current_node() else {
        render_empty(frame, area, "Nothing loaded");
        return;
    };

    let title = format!(" Files ({} lines) ", node.total_lines);
    let entries = node.sorted_children();
    if entries.is_empty() {
        let block = Block::default().borders(Borders::ALL).title(title);
        let text = Paragraph::new("Single file: see the Languages tab")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let width = entries
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);

    let items: Vec<ListItem> = entries
        .iter()
        .map(|(name, child)| {
            let icon = if child.is_leaf() { "📄" } else { "📁" };
            let percent = node.percent_of(child.total_lines);
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} {:<width$}  ", icon, name, width = width)),
                Span::styled(
                    format!("{:>9}", child.total_lines),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {:>5.1}%", percent),
                    Style::default().fg(share_color(percent)),
                ),
            ]))
        })
        .collect();

    let list_widget = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut tree.list_state);
}
