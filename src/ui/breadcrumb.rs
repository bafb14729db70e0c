// Breadcrumb rendering for the navigation trail.
// Shows the path into the LOC tree, when it was fetched, and the branch.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::state::BreadcrumbNode;
use crate::state::navigation::ViewLevel;

use super::list::format_relative_time;

/// Format timestamp for display in ISO 8601 format with local timezone.
fn format_timestamp(dt: &DateTime<Utc>) -> String {
    let local: DateTime<chrono::Local> = dt.with_timezone(&chrono::Local);
    local.format("%Y-%m-%d %H:%M:%S %z").to_string()
}

/// Render the breadcrumb trail with the branch line below it.
pub fn draw_breadcrumb(
    frame: &mut Frame,
    breadcrumbs: &[BreadcrumbNode],
    area: Rect,
    fetched_at: Option<DateTime<Utc>>,
    branch: Option<&str>,
) {
    let mut spans = Vec::new();

    for (i, node) in breadcrumbs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" / ", Style::default().fg(Color::DarkGray)));
        }

        let style = if i == breadcrumbs.len() - 1 {
            // Current level is highlighted
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        if let ViewLevel::Repository { .. } = node.level {
            spans.push(Span::raw("📦 "));
        }
        spans.push(Span::styled(node.label.clone(), style));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    if let Some(ts) = fetched_at {
        let fetched = Line::from(vec![Span::styled(
            format!(
                "fetched {} ({})",
                format_timestamp(&ts),
                format_relative_time(&ts)
            ),
            Style::default().fg(Color::DarkGray),
        )]);
        frame.render_widget(
            Paragraph::new(fetched).alignment(Alignment::Right),
            chunks[0],
        );
    }

    let branch_line = Line::from(vec![
        Span::styled("Branch: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            branch.unwrap_or("(default)"),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  (press 'b' to switch)",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(branch_line), chunks[1]);
}
