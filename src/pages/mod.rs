//! Page state: what each dashboard screen holds between renders.
//!
//! Pages never render themselves; the TUI and the CLI printers read them.

pub mod blog_form;
pub mod blog_list;
pub mod dialog;
pub mod recruiter_detail;
pub mod recruiters;

pub use blog_form::{BlogFormPage, FormMode, FormState};
pub use blog_list::{BlogListAction, BlogListPage};
pub use dialog::{ConfirmDialog, ConfirmVariant};
pub use recruiter_detail::RecruiterDetailPage;
pub use recruiters::{RecruiterAction, RecruitersPage, RecruitersView};

use crate::services::ServiceResult;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Keeps nothing from a previous load; errors become the banner message.
    pub fn settle(&mut self, result: ServiceResult<T>) {
        *self = match result {
            Ok(data) => LoadState::Loaded(data),
            Err(e) => LoadState::Failed(e.0),
        };
    }
}

/// Identifies one issued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Request sequencing for a page: only the most recently issued ticket's
/// result is applied, so a slow stale response can't overwrite newer data.
#[derive(Debug, Clone, Default)]
pub struct RequestSeq {
    issued: u64,
}

impl RequestSeq {
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }
}
