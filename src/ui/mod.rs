// UI module for rendering the TUI.
// Contains widgets for tabs, breadcrumbs, the file list, the languages panel and the console.

mod breadcrumb;
mod list;
mod modal;
mod panel;
mod tabs;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};
use crate::state::{ConsoleLevel, LoadingState};

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Length(3), // Breadcrumb and branch
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, chunks[0]);

    let breadcrumbs = app.tree.nav.breadcrumbs();
    breadcrumb::draw_breadcrumb(
        frame,
        &breadcrumbs,
        chunks[1],
        app.tree.fetched_at,
        app.locator.branch.as_deref(),
    );

    draw_content(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    // Overlays are rendered last, on top of everything
    if let Some(prompt) = &app.branch_prompt {
        modal::draw_branch_modal(
            frame,
            &app.locator.repo(),
            &prompt.input,
            app.locator.branch.as_deref(),
            &app.branch_history,
            prompt.history_selection,
        );
    } else if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the main content area based on active tab.
fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.active_tab == Tab::Console {
        draw_console_tab(frame, app, area);
        return;
    }

    match &app.tree.data {
        LoadingState::Idle => {
            list::render_empty(frame, area, "Press r to fetch");
            return;
        }
        LoadingState::Loading => {
            list::render_loading(frame, area, "Loading lines of code");
            return;
        }
        LoadingState::Error(e) => {
            list::render_error(frame, area, e);
            return;
        }
        LoadingState::Loaded(_) => {}
    }

    if app.active_tab == Tab::Files {
        list::render_entries(frame, &mut app.tree, area);
    } else {
        draw_languages_tab(frame, app, area);
    }
}

/// Draw the Languages tab for the current node.
fn draw_languages_tab(frame: &mut Frame, app: &App, area: Rect) {
    let Some(node) = app.tree.current_node() else {
        list::render_empty(frame, area, "Nothing loaded");
        return;
    };
    let path = app.tree.nav.path();
    let label = if path.is_empty() {
        app.locator.repo()
    } else {
        format!("{}/{}", app.locator.repo(), path.join("/"))
    };
    let link = app.stats_link();
    panel::render_languages(frame, node, &label, link.as_deref(), area);
}

/// Draw the Console tab with the activity log.
fn draw_console_tab(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Console ");

    if app.console.messages.is_empty() {
        let text = Paragraph::new("No messages")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    // Newest first
    let items: Vec<ListItem> = app
        .console
        .messages
        .iter()
        .rev()
        .map(|msg| {
            let (icon, color) = match msg.level {
                ConsoleLevel::Error => ("❌", Color::Red),
                ConsoleLevel::Warn => ("⚠️", Color::Yellow),
                ConsoleLevel::Info => ("ℹ️", Color::Cyan),
            };

            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", icon)),
                Span::styled(
                    list::format_relative_time(&msg.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(msg.message.clone(), Style::default().fg(color)),
            ]))
        })
        .collect();

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut app.console.list_state);
}

/// Draw the status bar with keybinding hints and the cache key being viewed.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = vec![
        Span::raw(" ↑↓ "),
        Span::styled("Navigate", Style::default().fg(Color::DarkGray)),
        Span::raw("  ↵ "),
        Span::styled("Open", Style::default().fg(Color::DarkGray)),
    ];
    if app.tree.nav.can_go_back() {
        hints.push(Span::raw("  Esc "));
        hints.push(Span::styled("Up", Style::default().fg(Color::DarkGray)));
    }
    hints.extend([
        Span::raw("  Tab "),
        Span::styled("Switch", Style::default().fg(Color::DarkGray)),
        Span::raw("  b "),
        Span::styled("Branch", Style::default().fg(Color::DarkGray)),
        Span::raw("  r "),
        Span::styled("Refetch", Style::default().fg(Color::DarkGray)),
        Span::raw("  ? "),
        Span::styled("Help", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ]);

    let status_color = if app.tree.data.is_loading() {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    hints.push(Span::styled(
        format!("  [{}]", app.locator.cache_key()),
        Style::default().fg(status_color),
    ));

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let popup_width = 50;
    let popup_height = 16;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let key = |keys: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(keys, Style::default().fg(Color::Cyan)),
            Span::raw(action),
        ])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        key("  ↑/↓ or j/k    ", "Move selection"),
        key("  Enter / → / l ", "Open directory or file"),
        key("  Esc / ← / h   ", "Up one directory"),
        key("  Tab / 1-3     ", "Switch tabs"),
        key("  b             ", "Switch branch"),
        key("  r             ", "Refetch from the LOC service"),
        key("  ?             ", "Show/hide this help"),
        key("  q             ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" or ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
    );

    frame.render_widget(help_paragraph, popup_area);
}
