use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::truncate;
use crate::models::{AccountStatus, RecruiterProfile};
use crate::pages::{LoadState, RecruitersPage, RecruitersView};

fn badge_style(status: AccountStatus) -> Style {
    match status {
        AccountStatus::Approved => Style::default().fg(Color::Green),
        AccountStatus::Pending => Style::default().fg(Color::Yellow),
        AccountStatus::Rejected => Style::default().fg(Color::Red),
        AccountStatus::Unknown => Style::default().fg(Color::DarkGray),
    }
}

pub(super) fn draw(frame: &mut Frame, area: Rect, page: &RecruitersPage, scroll: u16) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let (state_error, loading) = match page.view {
        RecruitersView::All => (page.listing.error(), !matches!(page.listing, LoadState::Loaded(_))),
        RecruitersView::Pending => (page.pending.error(), !matches!(page.pending, LoadState::Loaded(_))),
    };
    let title = match page.view {
        RecruitersView::All => {
            let status = page.filters.status.map_or("all", |s| s.label());
            let total = page.listing.data().map_or(0, |p| p.total);
            format!(" Recruiters ({}) [{}] page {} ", total, status, page.filters.page)
        }
        RecruitersView::Pending => format!(" Pending validation ({}) ", page.pending_count()),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if let Some(message) = state_error {
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block),
            chunks[0],
        );
    } else if loading {
        frame.render_widget(Paragraph::new("Loading...").block(block), chunks[0]);
    } else if page.visible().is_empty() {
        frame.render_widget(Paragraph::new("No recruiters found.").block(block), chunks[0]);
    } else {
        let items: Vec<ListItem> = page
            .visible()
            .iter()
            .map(|r| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<11}", r.account_status.label()),
                        badge_style(r.account_status),
                    ),
                    Span::raw(format!("#{:<4} ", r.id)),
                    Span::raw(truncate(&r.company_name, 32)),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(page.selected));
        frame.render_stateful_widget(list, chunks[0], &mut state);
    }

    let detail = Paragraph::new(detail(page.selected_profile()))
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(detail, chunks[1]);
}

fn detail(profile: Option<&RecruiterProfile>) -> Text<'_> {
    let Some(r) = profile else {
        return Text::raw("No recruiter selected");
    };
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        r.company_name.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("Statut: {}", r.account_status.label()),
        badge_style(r.account_status),
    )));
    lines.push(Line::from(format!(
        "Sector: {}   Size: {}",
        r.sector.label(),
        r.company_size.label()
    )));
    lines.push(Line::from(""));

    lines.push(Line::from(format!("Contact: {}", r.contact_name())));
    if !r.user.email.is_empty() {
        lines.push(Line::from(format!("Email: {}", r.user.email)));
    }
    if let Some(email) = &r.contact_email {
        lines.push(Line::from(format!("Company email: {}", email)));
    }
    if let Some(phone) = r.contact_phone.as_ref().or(r.user.phone.as_ref()) {
        lines.push(Line::from(format!("Phone: {}", phone)));
    }
    if let Some(website) = &r.website {
        lines.push(Line::from(format!("Website: {}", website)));
    }
    let location: Vec<String> = r
        .address
        .iter()
        .cloned()
        .chain(r.region.as_ref().map(|v| v.display()))
        .chain(r.country.as_ref().map(|v| v.display()))
        .collect();
    if !location.is_empty() {
        lines.push(Line::from(format!("Location: {}", location.join(", "))));
    }
    if let Some(created) = r.created_at {
        lines.push(Line::from(format!(
            "Registered: {}",
            created.format("%Y-%m-%d")
        )));
    }

    if let Some(description) = r.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::from(""));
        for line in textwrap::fill(description, 70).lines() {
            lines.push(Line::from(line.to_string()));
        }
    }

    if !r.documents.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Documents",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for doc in &r.documents {
            let name = doc.name.as_deref().unwrap_or("document");
            let url = doc.url.as_deref().unwrap_or("-");
            lines.push(Line::from(format!("  {} ({})", name, url)));
        }
    }

    Text::from(lines)
}
