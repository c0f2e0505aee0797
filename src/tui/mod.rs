mod blog;
mod dialog;
mod recruiters;

use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::models::{
    BlogCategory, BlogFilters, BlogPost, Paginated, RecruiterFilters, RecruiterPage,
    RecruiterProfile, ValidationAction,
};
use crate::pages::{BlogListPage, RecruitersPage, Ticket};
use crate::services::{ServiceResult, Services};

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Blog,
    Recruiters,
}

/// Results of spawned work, delivered back to the event loop.
enum Message {
    Posts(Ticket, ServiceResult<Paginated<BlogPost>>),
    Categories(ServiceResult<Vec<BlogCategory>>),
    Listing(Ticket, ServiceResult<RecruiterPage>),
    Pending(Ticket, ServiceResult<Vec<RecruiterProfile>>),
    BlogActionDone(ServiceResult<String>),
    RecruiterActionDone(ServiceResult<String>),
}

struct App {
    services: Services,
    tx: mpsc::UnboundedSender<Message>,
    tab: Tab,
    blog: BlogListPage,
    recruiters: RecruitersPage,
    /// Text typed after `/`, until Enter or Esc.
    search_input: Option<String>,
    scroll_offset: u16,
    action_running: bool,
    user: Option<String>,
    quit: bool,
}

impl App {
    fn new(services: Services, tx: mpsc::UnboundedSender<Message>) -> Self {
        let user = services.auth.current_user().map(|u| u.display_name());
        Self {
            services,
            tx,
            tab: Tab::Blog,
            blog: BlogListPage::new(BlogFilters::default()),
            recruiters: RecruitersPage::new(RecruiterFilters::default()),
            search_input: None,
            scroll_offset: 0,
            action_running: false,
            user,
            quit: false,
        }
    }

    fn spawn<F>(&self, work: F)
    where
        F: Future<Output = Message> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // The receiver only goes away when the UI is shutting down.
            let _ = tx.send(work.await);
        });
    }

    fn load_posts(&mut self) {
        let (ticket, filters) = self.blog.begin_load();
        let blog = self.services.blog.clone();
        self.spawn(async move { Message::Posts(ticket, blog.list_posts(&filters).await) });
    }

    fn load_categories(&mut self) {
        let blog = self.services.blog.clone();
        self.spawn(async move { Message::Categories(blog.list_categories().await) });
    }

    fn load_recruiters(&mut self) {
        let (listing_ticket, filters) = self.recruiters.begin_listing();
        let pending_ticket = self.recruiters.begin_pending();
        let service = self.services.recruiters.clone();
        self.spawn(async move {
            Message::Listing(listing_ticket, service.list_recruiters(&filters).await)
        });
        let service = self.services.recruiters.clone();
        self.spawn(async move { Message::Pending(pending_ticket, service.list_pending().await) });
    }

    fn reload_current(&mut self) {
        match self.tab {
            Tab::Blog => self.load_posts(),
            Tab::Recruiters => self.load_recruiters(),
        }
    }

    fn handle_message(&mut self, message: Message) {
        match message {
            Message::Posts(ticket, result) => {
                if !self.blog.finish_load(ticket, result) {
                    debug!("dropped stale blog listing");
                }
            }
            Message::Categories(result) => match result {
                Ok(categories) => self.blog.categories = categories,
                Err(e) => tracing::warn!(error = %e, "could not load blog categories"),
            },
            Message::Listing(ticket, result) => {
                if !self.recruiters.finish_listing(ticket, result) {
                    debug!("dropped stale recruiter listing");
                }
            }
            Message::Pending(ticket, result) => {
                if !self.recruiters.finish_pending(ticket, result) {
                    debug!("dropped stale pending queue");
                }
            }
            Message::BlogActionDone(result) => {
                let succeeded = result.is_ok();
                self.action_running = false;
                self.blog.action_finished(result);
                self.blog.close_dialog();
                if succeeded {
                    self.load_posts();
                }
            }
            Message::RecruiterActionDone(result) => {
                let succeeded = result.is_ok();
                self.action_running = false;
                self.recruiters.action_finished(result);
                self.recruiters.close_dialog();
                if succeeded {
                    self.load_recruiters();
                }
            }
        }
    }

    fn dialog_open(&self) -> bool {
        match self.tab {
            Tab::Blog => self.blog.dialog.is_some(),
            Tab::Recruiters => self.recruiters.dialog.is_some(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.search_input.is_some() {
            self.handle_search_key(key.code);
        } else if self.dialog_open() {
            self.handle_dialog_key(key.code);
        } else {
            self.handle_normal_key(key.code);
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        let Some(input) = self.search_input.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => self.search_input = None,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            KeyCode::Enter => {
                let search = self.search_input.take();
                let changed = match self.tab {
                    Tab::Blog => self.blog.set_search(search),
                    Tab::Recruiters => self.recruiters.set_search(search),
                };
                if changed {
                    self.reload_current();
                }
            }
            _ => {}
        }
    }

    fn handle_dialog_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => self.confirm_dialog(),
            KeyCode::Char('n') | KeyCode::Esc if !self.action_running => match self.tab {
                Tab::Blog => self.blog.close_dialog(),
                Tab::Recruiters => self.recruiters.close_dialog(),
            },
            _ => {}
        }
    }

    /// Starts the confirmed action; the dialog closes when its result arrives.
    fn confirm_dialog(&mut self) {
        if self.action_running {
            return;
        }
        match self.tab {
            Tab::Blog => {
                let Some(action) = self.blog.dialog.as_ref().and_then(|d| d.confirm()) else {
                    return;
                };
                let blog = self.services.blog.clone();
                self.spawn(async move { Message::BlogActionDone(action.execute(&blog).await) });
            }
            Tab::Recruiters => {
                let Some(action) = self.recruiters.dialog.as_ref().and_then(|d| d.confirm())
                else {
                    return;
                };
                let service = self.services.recruiters.clone();
                self.spawn(async move {
                    Message::RecruiterActionDone(action.execute(&service).await)
                });
            }
        }
        self.action_running = true;
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        let changed = match (self.tab, code) {
            (_, KeyCode::Char('q')) | (_, KeyCode::Esc) => {
                self.quit = true;
                false
            }
            (_, KeyCode::Tab) => {
                self.tab = match self.tab {
                    Tab::Blog => Tab::Recruiters,
                    Tab::Recruiters => Tab::Blog,
                };
                self.scroll_offset = 0;
                let idle = match self.tab {
                    Tab::Blog => matches!(self.blog.posts, crate::pages::LoadState::Idle),
                    Tab::Recruiters => {
                        matches!(self.recruiters.listing, crate::pages::LoadState::Idle)
                    }
                };
                idle
            }
            (_, KeyCode::Char('/')) => {
                let current = match self.tab {
                    Tab::Blog => self.blog.filters.search.clone(),
                    Tab::Recruiters => self.recruiters.filters.search.clone(),
                };
                self.search_input = Some(current.unwrap_or_default());
                false
            }
            (_, KeyCode::Char('r')) => true,
            (_, KeyCode::Char('J')) | (_, KeyCode::PageDown) => {
                self.scroll_offset = self.scroll_offset.saturating_add(3);
                false
            }
            (_, KeyCode::Char('K')) | (_, KeyCode::PageUp) => {
                self.scroll_offset = self.scroll_offset.saturating_sub(3);
                false
            }

            (Tab::Blog, KeyCode::Down | KeyCode::Char('j')) => {
                self.blog.select_next();
                self.scroll_offset = 0;
                false
            }
            (Tab::Blog, KeyCode::Up | KeyCode::Char('k')) => {
                self.blog.select_prev();
                self.scroll_offset = 0;
                false
            }
            (Tab::Blog, KeyCode::Char('s')) => self.blog.cycle_status(),
            (Tab::Blog, KeyCode::Char('n')) => self.blog.next_page(),
            (Tab::Blog, KeyCode::Char('p')) => self.blog.prev_page(),
            (Tab::Blog, KeyCode::Char('d')) => {
                self.blog.request_delete();
                false
            }
            (Tab::Blog, KeyCode::Char('f')) => {
                self.blog.request_toggle_featured();
                false
            }

            (Tab::Recruiters, KeyCode::Down | KeyCode::Char('j')) => {
                self.recruiters.select_next();
                self.scroll_offset = 0;
                false
            }
            (Tab::Recruiters, KeyCode::Up | KeyCode::Char('k')) => {
                self.recruiters.select_prev();
                self.scroll_offset = 0;
                false
            }
            (Tab::Recruiters, KeyCode::Char('s')) => self.recruiters.cycle_status(),
            (Tab::Recruiters, KeyCode::Char('n')) => self.recruiters.next_page(),
            (Tab::Recruiters, KeyCode::Char('p')) => self.recruiters.prev_page(),
            (Tab::Recruiters, KeyCode::Char('v')) => {
                self.recruiters.toggle_view();
                false
            }
            (Tab::Recruiters, KeyCode::Char('a')) => {
                self.recruiters.request_validation(ValidationAction::Approve);
                false
            }
            (Tab::Recruiters, KeyCode::Char('x')) => {
                self.recruiters.request_validation(ValidationAction::Reject);
                false
            }
            _ => false,
        };
        if changed {
            self.reload_current();
        }
    }
}

pub async fn run_dashboard(services: Services) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(services, tx);
    app.load_categories();
    app.load_posts();

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    info!("dashboard started");

    let result = run_loop(&mut terminal, &mut app, &mut rx).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    info!("dashboard closed");

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<Message>,
) -> Result<()> {
    while !app.quit {
        while let Ok(message) = rx.try_recv() {
            app.handle_message(message);
        }

        terminal.draw(|frame| draw(frame, app))?;

        let ready = tokio::task::block_in_place(|| event::poll(TICK))?;
        if !ready {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let pending = app.recruiters.pending_count();
    let recruiters_title = if pending > 0 {
        format!(" Recruiters ({} pending) ", pending)
    } else {
        " Recruiters ".to_string()
    };
    let selected = match app.tab {
        Tab::Blog => 0,
        Tab::Recruiters => 1,
    };
    let user = app.user.as_deref().unwrap_or("?");
    let tabs = Tabs::new(vec![" Blog ".to_string(), recruiters_title])
        .select(selected)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .divider("|");
    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(user.len() as u16 + 2)])
        .split(rows[0]);
    frame.render_widget(tabs, header[0]);
    frame.render_widget(
        Paragraph::new(user).style(Style::default().fg(Color::DarkGray)),
        header[1],
    );

    match app.tab {
        Tab::Blog => blog::draw(frame, rows[1], &app.blog, app.scroll_offset),
        Tab::Recruiters => recruiters::draw(frame, rows[1], &app.recruiters, app.scroll_offset),
    }

    frame.render_widget(status_line(app), rows[2]);

    let help = match (app.tab, &app.search_input) {
        (_, Some(_)) => " type to search  enter:apply  esc:cancel",
        (Tab::Blog, None) => {
            " j/k:navigate  J/K:scroll  /:search s:status n/p:page r:reload  d:delete f:feature  tab:recruiters q:quit"
        }
        (Tab::Recruiters, None) => {
            " j/k:navigate  J/K:scroll  /:search s:status v:pending n/p:page r:reload  a:approve x:reject  tab:blog q:quit"
        }
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        rows[3],
    );

    match app.tab {
        Tab::Blog => {
            if let Some(d) = &app.blog.dialog {
                dialog::draw(frame, d, app.action_running);
            }
        }
        Tab::Recruiters => {
            if let Some(d) = &app.recruiters.dialog {
                dialog::draw(frame, d, app.action_running);
            }
        }
    }
}

fn status_line(app: &App) -> Paragraph<'static> {
    if let Some(input) = &app.search_input {
        return Paragraph::new(format!(" /{}", input)).style(Style::default().fg(Color::Yellow));
    }
    let (notice, error) = match app.tab {
        Tab::Blog => (&app.blog.notice, &app.blog.action_error),
        Tab::Recruiters => (&app.recruiters.notice, &app.recruiters.action_error),
    };
    match (error, notice) {
        (Some(error), _) => {
            Paragraph::new(format!(" {}", error)).style(Style::default().fg(Color::Red))
        }
        (None, Some(notice)) => {
            Paragraph::new(format!(" {}", notice)).style(Style::default().fg(Color::Green))
        }
        (None, None) => Paragraph::new(""),
    }
}

/// Cuts `s` to `max` characters, marking the cut with `...`.
/// Cuts to `max` characters, ending with `...` when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}
