mod common;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, ResponseTemplate};

use common::{Harness, recruiter_json};
use jobboard_admin::models::{AccountStatus, RecruiterFilters, ValidationAction};
use jobboard_admin::pages::{LoadState, RecruiterDetailPage, RecruitersPage, RecruitersView};

const VALIDATION: &str = "/api/auth/recruiter-validation/";

#[tokio::test]
async fn approving_moves_recruiter_out_of_the_pending_queue() {
    let h = Harness::logged_in().await;

    // Before approval.
    Mock::given(method("GET"))
        .and(path(VALIDATION))
        .and(query_param_is_missing("status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recruiters": [recruiter_json(7, "PENDING"), recruiter_json(8, "APPROVED")]
        })))
        .up_to_n_times(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(VALIDATION))
        .and(query_param("status", "PENDING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([recruiter_json(7, "PENDING")])))
        .up_to_n_times(1)
        .mount(&h.server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{}7/", VALIDATION)))
        .and(body_json(json!({"action": "approve"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": "Recruteur approuvé"})))
        .expect(1)
        .mount(&h.server)
        .await;

    // After approval.
    Mock::given(method("GET"))
        .and(path(VALIDATION))
        .and(query_param_is_missing("status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [recruiter_json(7, "APPROVED"), recruiter_json(8, "APPROVED")],
            "count": 2
        })))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(VALIDATION))
        .and(query_param("status", "PENDING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&h.server)
        .await;

    let mut page = RecruitersPage::new(RecruiterFilters::default());
    page.load(&h.services.recruiters).await;
    assert_eq!(page.pending_count(), 1);

    page.toggle_view();
    assert_eq!(page.view, RecruitersView::Pending);
    assert!(page.request_validation(ValidationAction::Approve));
    page.confirm_dialog(&h.services.recruiters).await;

    assert!(page.dialog.is_none());
    assert_eq!(page.pending_count(), 0);
    assert_eq!(page.notice.as_deref(), Some("Company 7: Approuvé"));

    page.toggle_view();
    let approved = page.visible().iter().find(|r| r.id == 7).unwrap();
    assert_eq!(approved.account_status, AccountStatus::Approved);
    assert_eq!(approved.account_status.label(), "Approuvé");
}

#[tokio::test]
async fn pending_queue_drops_rows_that_are_not_pending() {
    let h = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path(VALIDATION))
        .and(query_param("status", "PENDING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [recruiter_json(1, "PENDING"), recruiter_json(2, "REJECTED")],
            "count": 2
        })))
        .mount(&h.server)
        .await;

    let pending = h.services.recruiters.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, 1);
}

#[tokio::test]
async fn row_without_status_is_unknown_and_not_queued() {
    let h = Harness::logged_in().await;
    let mut missing = recruiter_json(2, "PENDING");
    missing.as_object_mut().unwrap().remove("account_status");

    Mock::given(method("GET"))
        .and(path(VALIDATION))
        .and(query_param("status", "PENDING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [recruiter_json(1, "PENDING"), missing.clone()]
        })))
        .mount(&h.server)
        .await;

    let pending = h.services.recruiters.list_pending().await.unwrap();
    assert_eq!(pending.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);

    let profile: jobboard_admin::models::RecruiterProfile =
        serde_json::from_value(missing).unwrap();
    assert_eq!(profile.account_status, AccountStatus::Unknown);
    assert_eq!(profile.account_status.label(), "Inconnu");
    assert!(!profile.is_pending());
}

#[tokio::test]
async fn listing_failure_leaves_pending_queue_usable() {
    let h = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path(VALIDATION))
        .and(query_param_is_missing("status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(VALIDATION))
        .and(query_param("status", "PENDING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([recruiter_json(3, "PENDING")])))
        .mount(&h.server)
        .await;

    let mut page = RecruitersPage::default();
    page.load(&h.services.recruiters).await;

    assert!(page.listing.error().is_some());
    assert!(matches!(page.pending, LoadState::Loaded(ref rows) if rows.len() == 1));
}

#[tokio::test]
async fn cancelled_dialog_sends_nothing() {
    let h = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path(VALIDATION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([recruiter_json(4, "PENDING")])))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{}4/", VALIDATION)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let mut page = RecruitersPage::default();
    page.load(&h.services.recruiters).await;
    assert!(page.request_validation(ValidationAction::Reject));
    page.close_dialog();
    page.confirm_dialog(&h.services.recruiters).await;
    assert!(page.notice.is_none());
}

#[tokio::test]
async fn detail_page_rejects_and_reloads_profile() {
    let h = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/profiles/public/9/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recruiter_json(9, "PENDING")))
        .up_to_n_times(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{}9/", VALIDATION)))
        .and(body_json(json!({"action": "reject"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profiles/public/9/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recruiter_json(9, "REJECTED")))
        .mount(&h.server)
        .await;

    let mut detail = RecruiterDetailPage::new(9);
    detail.load(&h.services.recruiters).await;
    assert!(detail.can_moderate());

    assert!(detail.request_validation(ValidationAction::Reject));
    detail.confirm_dialog(&h.services.recruiters).await;

    let profile = detail.profile.data().unwrap();
    assert_eq!(profile.account_status.label(), "Rejeté");
    assert!(!detail.can_moderate());
    assert!(detail.dialog.is_none());
}
