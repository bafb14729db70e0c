// Languages panel.
// Total line count and per-language breakdown for the selected node, with the stats link.

use ratatui::{prelude::*, widgets::*};

use ghloc::LocBreakdown;

const BAR_WIDTH: usize = 30;

/// Proportional bar for `percent` of `BAR_WIDTH` cells.
pub fn share_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Render the languages of `node` largest first.
pub fn render_languages(
    frame: &mut Frame,
    node: &LocBreakdown,
    label: &str,
    stats_link: Option<&str>,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Lines of Code: {} ", node.total_lines))
        .title_style(Style::default().add_modifier(Modifier::BOLD));

    let languages = node.languages();
    let width = languages
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
    ];

    if languages.is_empty() {
        lines.push(Line::from(Span::styled(
            "No language data",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (name, count) in languages {
        let percent = node.percent_of(count);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<width$}  ", name, width = width),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{:>9}  ", count)),
            Span::styled(share_bar(percent), Style::default().fg(Color::Green)),
            Span::styled(
                format!(" {:>5.1}%", percent),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    if let Some(link) = stats_link {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("More stats: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                link.to_string(),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_bar() {
        assert_eq!(share_bar(0.0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(share_bar(50.0).chars().filter(|c| *c == '█').count(), 15);
        assert_eq!(share_bar(100.0).chars().filter(|c| *c == '█').count(), 30);
        assert_eq!(share_bar(250.0).chars().count(), 30);
    }
}
