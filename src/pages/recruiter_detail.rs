use super::{ConfirmDialog, LoadState, RecruiterAction, RequestSeq};
use crate::models::{RecruiterProfile, ValidationAction};
use crate::services::{RecruiterService, ServiceResult};

#[derive(Debug)]
pub struct RecruiterDetailPage {
    pub id: i64,
    pub profile: LoadState<RecruiterProfile>,
    pub dialog: Option<ConfirmDialog<RecruiterAction>>,
    pub notice: Option<String>,
    pub action_error: Option<String>,
    seq: RequestSeq,
}

impl RecruiterDetailPage {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            profile: LoadState::Idle,
            dialog: None,
            notice: None,
            action_error: None,
            seq: RequestSeq::default(),
        }
    }

    pub async fn load(&mut self, recruiters: &RecruiterService) {
        self.profile = LoadState::Loading;
        let ticket = self.seq.issue();
        let result = recruiters.get_recruiter(self.id).await;
        if self.seq.is_current(ticket) {
            self.profile.settle(result);
        }
    }

    /// Only pending profiles can be moderated from here.
    pub fn can_moderate(&self) -> bool {
        self.profile.data().is_some_and(RecruiterProfile::is_pending)
    }

    pub fn request_validation(&mut self, action: ValidationAction) -> bool {
        let Some(profile) = self.profile.data() else {
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

    /// Runs the confirmed action, closes the dialog, and reloads the profile.
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

    #[test]
    fn nothing_to_moderate_before_load() {
        let mut page = RecruiterDetailPage::new(5);
        assert!(!page.can_moderate());
        assert!(!page.request_validation(ValidationAction::Approve));
        assert!(page.dialog.is_none());
    }

    #[test]
    fn pending_profile_can_be_moderated() {
        let mut page = RecruiterDetailPage::new(5);
        page.profile = LoadState::Loaded(
            serde_json::from_value(serde_json::json!({
                "id": 5,
                "user": {"username": "acme"},
                "company_name": "Acme",
                "account_status": "PENDING"
            }))
            .unwrap(),
        );
        assert!(page.can_moderate());
        assert!(page.request_validation(ValidationAction::Reject));
        assert_eq!(page.dialog.as_ref().unwrap().confirm().unwrap().id, 5);
        page.close_dialog();
        assert!(page.dialog.is_none());
    }
}
