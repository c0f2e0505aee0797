use tracing::warn;

use super::{ConfirmDialog, ConfirmVariant, LoadState, RequestSeq, Ticket};
use crate::models::{BlogCategory, BlogFilters, BlogPost, Paginated, PostStatus};
use crate::services::blog::BlogPostPatch;
use crate::services::{BlogService, ServiceResult};

#[derive(Debug, Clone, PartialEq)]
pub enum BlogListAction {
    Delete { slug: String, title: String },
    SetFeatured { slug: String, featured: bool },
}

impl BlogListAction {
    /// Runs the action against the backend and returns the success notice.
    pub async fn execute(&self, blog: &BlogService) -> ServiceResult<String> {
        match self {
            BlogListAction::Delete { slug, title } => {
                blog.delete_post(slug).await?;
                Ok(format!("Deleted \"{}\"", title))
            }
            BlogListAction::SetFeatured { slug, featured } => {
                let patch = BlogPostPatch {
                    is_featured: Some(*featured),
                    ..Default::default()
                };
                let post = blog.patch_post(slug, &patch).await?;
                Ok(if post.is_featured {
                    format!("\"{}\" is now featured", post.title)
                } else {
                    format!("\"{}\" is no longer featured", post.title)
                })
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct BlogListPage {
    pub filters: BlogFilters,
    pub posts: LoadState<Paginated<BlogPost>>,
    pub categories: Vec<BlogCategory>,
    pub dialog: Option<ConfirmDialog<BlogListAction>>,
    pub notice: Option<String>,
    pub action_error: Option<String>,
    pub selected: usize,
    seq: RequestSeq,
}

impl BlogListPage {
    pub fn new(filters: BlogFilters) -> Self {
        Self {
            filters,
            ..Default::default()
        }
    }

    // --- Filters: every change goes back to page 1 ---

    pub fn set_search(&mut self, search: Option<String>) -> bool {
        let search = search.filter(|s| !s.trim().is_empty());
        self.update_filters(|f| f.search = search)
    }

    pub fn set_status(&mut self, status: Option<PostStatus>) -> bool {
        self.update_filters(|f| f.status = status)
    }

    pub fn set_category(&mut self, category: Option<i64>) -> bool {
        self.update_filters(|f| f.category = category)
    }

    pub fn set_featured(&mut self, featured: Option<bool>) -> bool {
        self.update_filters(|f| f.is_featured = featured)
    }

    /// All → Draft → Pending → Published → Archived → All.
    pub fn cycle_status(&mut self) -> bool {
        let next = match self.filters.status {
            None => Some(PostStatus::ALL[0]),
            Some(current) => PostStatus::ALL
                .iter()
                .position(|s| *s == current)
                .and_then(|i| PostStatus::ALL.get(i + 1).copied()),
        };
        self.set_status(next)
    }

    fn update_filters(&mut self, apply: impl FnOnce(&mut BlogFilters)) -> bool {
        let before = self.filters.clone();
        apply(&mut self.filters);
        self.filters.page = 1;
        self.filters != before
    }

    pub fn next_page(&mut self) -> bool {
        match self.posts.data() {
            Some(page) if page.has_next() => {
                self.filters.page += 1;
                true
            }
            _ => false,
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.filters.page > 1 {
            self.filters.page -= 1;
            true
        } else {
            false
        }
    }

    // --- Loading ---

    /// Marks the page loading and returns what to fetch.
    pub fn begin_load(&mut self) -> (Ticket, BlogFilters) {
        self.posts = LoadState::Loading;
        (self.seq.issue(), self.filters.clone())
    }

    /// Applies a result if it belongs to the latest load. Returns whether it did.
    pub fn finish_load(&mut self, ticket: Ticket, result: ServiceResult<Paginated<BlogPost>>) -> bool {
        if !self.seq.is_current(ticket) {
            return false;
        }
        self.posts.settle(result);
        let len = self.posts.data().map_or(0, |p| p.results.len());
        self.selected = self.selected.min(len.saturating_sub(1));
        true
    }

    pub async fn load(&mut self, blog: &BlogService) {
        let (ticket, filters) = self.begin_load();
        let result = blog.list_posts(&filters).await;
        self.finish_load(ticket, result);
    }

    /// Categories only feed the filter; a failure is logged, not shown.
    pub async fn load_categories(&mut self, blog: &BlogService) {
        match blog.list_categories().await {
            Ok(categories) => self.categories = categories,
            Err(e) => warn!(error = %e, "could not load blog categories"),
        }
    }

    pub fn selected_post(&self) -> Option<&BlogPost> {
        self.posts.data().and_then(|p| p.results.get(self.selected))
    }

    pub fn select_next(&mut self) {
        let len = self.posts.data().map_or(0, |p| p.results.len());
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn category_name(&self, id: i64) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    // --- Confirmed actions ---

    pub fn request_delete(&mut self) -> bool {
        let Some(post) = self.selected_post() else {
            return false;
        };
        let action = BlogListAction::Delete {
            slug: post.slug.clone(),
            title: post.title.clone(),
        };
        self.dialog = Some(
            ConfirmDialog::new(
                "Delete post",
                format!("Delete \"{}\"? This cannot be undone.", post.title),
                action,
            )
            .variant(ConfirmVariant::Danger)
            .confirm_text("Delete"),
        );
        true
    }

    pub fn request_toggle_featured(&mut self) -> bool {
        let Some(post) = self.selected_post() else {
            return false;
        };
        let featured = !post.is_featured;
        let (title, message) = if featured {
            ("Feature post", format!("Feature \"{}\"?", post.title))
        } else {
            ("Unfeature post", format!("Remove \"{}\" from featured posts?", post.title))
        };
        let action = BlogListAction::SetFeatured {
            slug: post.slug.clone(),
            featured,
        };
        self.dialog = Some(ConfirmDialog::new(title, message, action));
        true
    }

    pub fn close_dialog(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.close();
        }
        self.dialog = None;
    }

    pub fn action_finished(&mut self, result: ServiceResult<String>) {
        match result {
            Ok(notice) => {
                self.notice = Some(notice);
                self.action_error = None;
            }
            Err(e) => {
                self.notice = None;
                self.action_error = Some(e.0);
            }
        }
    }

    /// Runs the confirmed action, closes the dialog, and reloads on success.
    pub async fn confirm_dialog(&mut self, blog: &BlogService) {
        let Some(action) = self.dialog.as_ref().and_then(|d| d.confirm()) else {
            return;
        };
        let result = action.execute(blog).await;
        let succeeded = result.is_ok();
        self.action_finished(result);
        self.close_dialog();
        if succeeded {
            self.load(blog).await;
        }
    }
}
