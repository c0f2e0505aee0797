use tracing::info;

use super::{ConfirmDialog, ConfirmVariant, LoadState, RequestSeq, Ticket};
use crate::models::{
    AccountStatus, CompanySize, RecruiterFilters, RecruiterPage, RecruiterProfile, Sector,
    ValidationAction,
};
use crate::services::{RecruiterService, ServiceResult};

/// Which collection the page is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecruitersView {
    #[default]
    All,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecruiterAction {
    pub id: i64,
    pub company_name: String,
    pub action: ValidationAction,
}

impl RecruiterAction {
    pub fn for_profile(profile: &RecruiterProfile, action: ValidationAction) -> Self {
        Self {
            id: profile.id,
            company_name: profile.company_name.clone(),
            action,
        }
    }

    pub fn dialog(self) -> ConfirmDialog<RecruiterAction> {
        let (title, message, variant, text) = match self.action {
            ValidationAction::Approve => (
                "Approve recruiter",
                format!("Approve {}? They will be able to post job offers.", self.company_name),
                ConfirmVariant::Success,
                "Approve",
            ),
            ValidationAction::Reject => (
                "Reject recruiter",
                format!("Reject {}?", self.company_name),
                ConfirmVariant::Danger,
                "Reject",
            ),
        };
        ConfirmDialog::new(title, message, self)
            .variant(variant)
            .confirm_text(text)
    }

    pub async fn execute(&self, recruiters: &RecruiterService) -> ServiceResult<String> {
        recruiters.validate_recruiter(self.id, self.action).await?;
        info!(id = self.id, action = self.action.as_str(), "recruiter validated");
        Ok(format!(
            "{}: {}",
            self.company_name,
            self.action.resulting_status().label()
        ))
    }
}

/// Both collections are loaded together but settle independently.
#[derive(Debug, Default)]
pub struct RecruitersPage {
    pub filters: RecruiterFilters,
    pub view: RecruitersView,
    pub listing: LoadState<RecruiterPage>,
    pub pending: LoadState<Vec<RecruiterProfile>>,
    pub dialog: Option<ConfirmDialog<RecruiterAction>>,
    pub notice: Option<String>,
    pub action_error: Option<String>,
    pub selected: usize,
    listing_seq: RequestSeq,
    pending_seq: RequestSeq,
}

impl RecruitersPage {
    pub fn new(filters: RecruiterFilters) -> Self {
        Self {
            filters,
            ..Default::default()
        }
    }

    pub fn set_status(&mut self, status: Option<AccountStatus>) -> bool {
        self.update_filters(|f| f.status = status)
    }

    pub fn set_search(&mut self, search: Option<String>) -> bool {
        let search = search.filter(|s| !s.trim().is_empty());
        self.update_filters(|f| f.search = search)
    }

    pub fn set_country(&mut self, country: Option<i64>) -> bool {
        self.update_filters(|f| f.country = country)
    }

    pub fn set_sector(&mut self, sector: Option<Sector>) -> bool {
        self.update_filters(|f| f.sector = sector)
    }

    pub fn set_company_size(&mut self, size: Option<CompanySize>) -> bool {
        self.update_filters(|f| f.company_size = size)
    }

    /// All → En attente → Approuvé → Rejeté → All.
    pub fn cycle_status(&mut self) -> bool {
        let next = match self.filters.status {
            None => Some(AccountStatus::ALL[0]),
            Some(current) => AccountStatus::ALL
                .iter()
                .position(|s| *s == current)
                .and_then(|i| AccountStatus::ALL.get(i + 1).copied()),
        };
        self.set_status(next)
    }

    fn update_filters(&mut self, apply: impl FnOnce(&mut RecruiterFilters)) -> bool {
        let before = self.filters.clone();
        apply(&mut self.filters);
        self.filters.page = 1;
        self.filters != before
    }

    pub fn next_page(&mut self) -> bool {
        match self.listing.data() {
            Some(page) if page.has_next => {
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

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            RecruitersView::All => RecruitersView::Pending,
            RecruitersView::Pending => RecruitersView::All,
        };
        self.selected = 0;
    }

    /// Rows of the active view.
    pub fn visible(&self) -> &[RecruiterProfile] {
        match self.view {
            RecruitersView::All => self.listing.data().map_or(&[][..], |p| p.items.as_slice()),
            RecruitersView::Pending => self.pending.data().map_or(&[][..], |p| p.as_slice()),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.data().map_or(0, Vec::len)
    }

    pub fn selected_profile(&self) -> Option<&RecruiterProfile> {
        self.visible().get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible().len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.visible().len().saturating_sub(1));
    }

    // --- Loading ---

    pub fn begin_listing(&mut self) -> (Ticket, RecruiterFilters) {
        self.listing = LoadState::Loading;
        (self.listing_seq.issue(), self.filters.clone())
    }

    pub fn begin_pending(&mut self) -> Ticket {
        self.pending = LoadState::Loading;
        self.pending_seq.issue()
    }

    pub fn finish_listing(&mut self, ticket: Ticket, result: ServiceResult<RecruiterPage>) -> bool {
        if !self.listing_seq.is_current(ticket) {
            return false;
        }
        self.listing.settle(result);
        self.clamp_selection();
        true
    }

    pub fn finish_pending(
        &mut self,
        ticket: Ticket,
        result: ServiceResult<Vec<RecruiterProfile>>,
    ) -> bool {
        if !self.pending_seq.is_current(ticket) {
            return false;
        }
        self.pending.settle(result);
        self.clamp_selection();
        true
    }

    /// Fetches the listing and the pending queue concurrently.
    pub async fn load(&mut self, recruiters: &RecruiterService) {
        let (listing_ticket, filters) = self.begin_listing();
        let pending_ticket = self.begin_pending();
        let (listing, pending) =
            tokio::join!(recruiters.list_recruiters(&filters), recruiters.list_pending());
        self.finish_listing(listing_ticket, listing);
        self.finish_pending(pending_ticket, pending);
    }

    // --- Moderation ---

    pub fn request_validation(&mut self, action: ValidationAction) -> bool {
        let Some(profile) = self.selected_profile() else {
            return false;
        };
        self.dialog = Some(RecruiterAction::for_profile(profile, action).dialog());
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

    /// Runs the confirmed validation, closes the dialog, and reloads both
    /// collections on success.
    pub async fn confirm_dialog(&mut self, recruiters: &RecruiterService) {
        let Some(action) = self.dialog.as_ref().and_then(|d| d.confirm()) else {
            return;
        };
        let result = action.execute(recruiters).await;
        let succeeded = result.is_ok();
        self.action_finished(result);
        self.close_dialog();
        if succeeded {
            self.load(recruiters).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceError;

    fn profile(id: i64, status: &str) -> RecruiterProfile {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "user": {"username": format!("user{}", id)},
            "company_name": format!("Company {}", id),
            "account_status": status
        }))
        .unwrap()
    }

    fn listing(items: Vec<RecruiterProfile>) -> RecruiterPage {
        RecruiterPage {
            total: items.len() as u64,
            items,
            has_next: true,
            has_previous: false,
        }
    }

    #[test]
    fn one_failing_collection_does_not_hide_the_other() {
        let mut page = RecruitersPage::default();
        let (listing_ticket, _) = page.begin_listing();
        let pending_ticket = page.begin_pending();

        page.finish_listing(listing_ticket, Err(ServiceError("Server error".into())));
        page.finish_pending(pending_ticket, Ok(vec![profile(1, "PENDING")]));

        assert_eq!(page.listing.error(), Some("Server error"));
        assert_eq!(page.pending_count(), 1);
        page.toggle_view();
        assert_eq!(page.visible().len(), 1);
    }

    #[test]
    fn stale_listing_is_ignored() {
        let mut page = RecruitersPage::default();
        let (old, _) = page.begin_listing();
        page.set_search(Some("acme".into()));
        let (new, filters) = page.begin_listing();
        assert_eq!(filters.search.as_deref(), Some("acme"));

        assert!(page.finish_listing(new, Ok(listing(vec![profile(2, "APPROVED")]))));
        assert!(!page.finish_listing(old, Ok(listing(vec![profile(1, "PENDING")]))));
        assert_eq!(page.visible()[0].id, 2);
    }

    #[test]
    fn filter_change_resets_page() {
        let mut page = RecruitersPage::default();
        let (ticket, _) = page.begin_listing();
        page.finish_listing(ticket, Ok(listing(vec![profile(1, "PENDING")])));
        assert!(page.next_page());
        assert_eq!(page.filters.page, 2);

        assert!(page.cycle_status());
        assert_eq!(page.filters.status, Some(AccountStatus::Pending));
        assert_eq!(page.filters.page, 1);
    }

    #[test]
    fn approve_opens_success_dialog() {
        let mut page = RecruitersPage::default();
        assert!(!page.request_validation(ValidationAction::Approve));

        let (ticket, _) = page.begin_listing();
        page.finish_listing(ticket, Ok(listing(vec![profile(7, "PENDING")])));
        assert!(page.request_validation(ValidationAction::Approve));

        let dialog = page.dialog.as_ref().unwrap();
        assert_eq!(dialog.confirm_variant, ConfirmVariant::Success);
        assert_eq!(dialog.confirm_text, "Approve");
        let action = dialog.confirm().unwrap();
        assert_eq!(action.id, 7);
        assert_eq!(action.action, ValidationAction::Approve);
    }

    #[test]
    fn reject_is_a_danger_action() {
        let profile = profile(3, "PENDING");
        let dialog = RecruiterAction::for_profile(&profile, ValidationAction::Reject).dialog();
        assert_eq!(dialog.confirm_variant, ConfirmVariant::Danger);
        assert!(dialog.message.contains("Company 3"));
    }
}
