use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::truncate;
use crate::models::{BlogPost, PostStatus};
use crate::pages::{BlogListPage, LoadState};

fn status_style(status: PostStatus) -> Style {
    match status {
        PostStatus::Published => Style::default().fg(Color::Green),
        PostStatus::Pending => Style::default().fg(Color::Yellow),
        PostStatus::Draft => Style::default().fg(Color::Cyan),
        PostStatus::Archived => Style::default().fg(Color::DarkGray),
        PostStatus::Unknown => Style::default(),
    }
}

pub(super) fn draw(frame: &mut Frame, area: Rect, page: &BlogListPage, scroll: u16) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let status = page.filters.status.map_or("all", |s| s.label());
    let title = match &page.posts {
        LoadState::Loaded(p) => format!(
            " Posts ({}) [{}] page {} ",
            p.count, status, page.filters.page
        ),
        _ => format!(" Posts [{}] ", status),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    match &page.posts {
        LoadState::Idle | LoadState::Loading => {
            frame.render_widget(Paragraph::new("Loading...").block(block), chunks[0]);
        }
        LoadState::Failed(message) => {
            frame.render_widget(
                Paragraph::new(message.as_str())
                    .style(Style::default().fg(Color::Red))
                    .wrap(Wrap { trim: true })
                    .block(block),
                chunks[0],
            );
        }
        LoadState::Loaded(p) if p.results.is_empty() => {
            frame.render_widget(Paragraph::new("No posts found.").block(block), chunks[0]);
        }
        LoadState::Loaded(p) => {
            let items: Vec<ListItem> = p
                .results
                .iter()
                .map(|post| {
                    let star = if post.is_featured { "*" } else { " " };
                    ListItem::new(Line::from(vec![
                        Span::raw(format!("{} ", star)),
                        Span::styled(
                            format!("{:<11}", post.status.label()),
                            status_style(post.status),
                        ),
                        Span::raw(truncate(&post.title, 40)),
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
    }

    let detail = Paragraph::new(detail(page))
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(detail, chunks[1]);
}

fn detail(page: &BlogListPage) -> Text<'_> {
    let Some(post) = page.selected_post() else {
        return Text::raw("No post selected");
    };
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        post.title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("/{}", post.slug),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        format!("Statut: {}", post.status.label()),
        status_style(post.status),
    )));
    if post.is_featured {
        lines.push(Line::from(Span::styled("Featured", Style::default().fg(Color::Yellow))));
    }
    if let Some(category) = &post.category {
        let name = category
            .id()
            .and_then(|id| page.category_name(id))
            .map(str::to_string)
            .unwrap_or_else(|| category.display());
        lines.push(Line::from(format!("Category: {}", name)));
    }
    if let Some(author) = &post.author {
        lines.push(Line::from(format!("Author: {}", author.display())));
    }
    if !post.tags.is_empty() {
        lines.push(Line::from(format!("Tags: {}", post.tags.join(", "))));
    }
    lines.push(Line::from(dates(post)));
    lines.push(Line::from(format!("Views: {}", post.views_count)));
    lines.push(Line::from(""));

    if let Some(excerpt) = post.excerpt.as_deref().filter(|e| !e.is_empty()) {
        for line in textwrap::fill(excerpt, 70).lines() {
            lines.push(Line::from(Span::styled(
                line.to_string(),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }
        lines.push(Line::from(""));
    }
    for line in post.content.lines() {
        lines.push(Line::from(line.to_string()));
    }

    Text::from(lines)
}

fn dates(post: &BlogPost) -> String {
    let fmt = |d: Option<chrono::DateTime<chrono::Utc>>| {
        d.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    format!(
        "Published: {}  Updated: {}",
        fmt(post.publish_date),
        fmt(post.updated_at)
    )
}
