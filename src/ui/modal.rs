// Branch prompt popup.
// Edits the branch to browse, previews the cache key it loads and lists recent branches.

use ratatui::{prelude::*, widgets::*};

/// Popup of at most `width` x `height` centered in `area` and clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Draw the branch prompt for `repo` on top of the current view.
///
/// An empty input means the repository's default branch.
pub fn draw_branch_modal(
    frame: &mut Frame,
    repo: &str,
    input: &str,
    current_branch: Option<&str>,
    branch_history: &[String],
    history_selection: Option<usize>,
) {
    let popup = centered(frame.area(), 56, 12);
    frame.render_widget(Clear, popup);

    let hints = Line::from(vec![
        Span::styled(" ↵", Style::default().fg(Color::Yellow)),
        Span::raw(" load "),
        Span::styled("↑↓", Style::default().fg(Color::Yellow)),
        Span::raw(" recent "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" cancel "),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Magenta))
        .title(format!(" Switch branch of {} ", repo))
        .title_bottom(hints.right_aligned());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Input
            Constraint::Length(1), // Key preview
            Constraint::Length(1), // Separator
            Constraint::Min(1),    // Recent branches
        ])
        .split(inner);

    let input_line = Line::from(vec![
        Span::styled("⎇ ", Style::default().fg(Color::Magenta)),
        Span::styled(input, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("▏", Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(input_line), rows[0]);

    let branch = input.trim();
    let preview = if branch.is_empty() {
        format!("loads {} (default branch)", repo)
    } else {
        format!("loads {}/{}", repo, branch)
    };
    frame.render_widget(
        Paragraph::new(preview).style(Style::default().fg(Color::DarkGray)),
        rows[1],
    );

    frame.render_widget(
        Paragraph::new("recent").style(Style::default().fg(Color::DarkGray)),
        rows[2],
    );

    if branch_history.is_empty() {
        frame.render_widget(
            Paragraph::new("  none yet").style(Style::default().fg(Color::DarkGray)),
            rows[3],
        );
        return;
    }

    let items: Vec<ListItem> = branch_history
        .iter()
        .map(|name| {
            let style = if current_branch == Some(name.as_str()) {
                Style::default().fg(Color::Magenta)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(name.as_str(), style))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(history_selection);
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("› ");
    frame.render_stateful_widget(list, rows[3], &mut list_state);
}
