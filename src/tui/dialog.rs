use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::pages::{ConfirmDialog, ConfirmVariant};

/// Centered popup over whatever page is showing.
pub(super) fn draw<A>(frame: &mut Frame, dialog: &ConfirmDialog<A>, running: bool) {
    if !dialog.is_open {
        return;
    }
    let area = centered(frame.area(), 50, 7);
    let accent = match dialog.confirm_variant {
        ConfirmVariant::Danger => Color::Red,
        ConfirmVariant::Success => Color::Green,
        ConfirmVariant::Primary => Color::Cyan,
    };

    let buttons = if running {
        Line::from(Span::styled("Working...", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(vec![
            Span::styled(
                format!("[y] {}", dialog.confirm_text),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::raw(format!("[n] {}", dialog.cancel_text)),
        ])
    };
    let body = Text::from(vec![
        Line::from(dialog.message.as_str()),
        Line::from(""),
        buttons,
    ]);

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(body)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(accent))
                    .title(format!(" {} ", dialog.title)),
            ),
        area,
    );
}

fn centered(area: Rect, width_pct: u16, height: u16) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_pct) / 2),
            Constraint::Percentage(width_pct),
            Constraint::Percentage((100 - width_pct) / 2),
        ])
        .split(rows[1])[1]
}
