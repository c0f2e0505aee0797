mod common;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, Request, ResponseTemplate};

use common::{Harness, page_json, post_json};
use jobboard_admin::models::{BlogFilters, PostStatus, RecruiterFilters};

#[tokio::test]
async fn attaches_bearer_token_from_auth_context() {
    let h = Harness::logged_in().await;
    let token = h.auth.access_token().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/blog/posts/"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![post_json("a", "DRAFT")])))
        .expect(1)
        .mount(&h.server)
        .await;

    let page = h.services.blog.list_posts(&BlogFilters::default()).await.unwrap();
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].status, PostStatus::Draft);
}

#[tokio::test]
async fn login_is_sent_without_authorization() {
    let h = Harness::logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(|request: &Request| !request.headers.contains_key("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": common::token_expiring_in(3600),
            "refresh": "refresh-2"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    h.services.auth.login("admin@example.test", "secret").await.unwrap();
}

#[tokio::test]
async fn unset_filters_are_left_out_of_the_query() {
    let h = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/blog/posts/"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "10"))
        .and(query_param("status", "PUBLISHED"))
        .and(query_param_is_missing("search"))
        .and(query_param_is_missing("category"))
        .and(query_param_is_missing("is_featured"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![])))
        .expect(1)
        .mount(&h.server)
        .await;

    let filters = BlogFilters {
        search: Some("   ".to_string()),
        status: Some(PostStatus::Published),
        ..Default::default()
    };
    h.services.blog.list_posts(&filters).await.unwrap();
}

#[tokio::test]
async fn recruiter_filters_omit_empty_fields() {
    let h = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/recruiter-validation/"))
        .and(query_param("search", "acme"))
        .and(query_param_is_missing("status"))
        .and(query_param_is_missing("country"))
        .and(query_param_is_missing("sector"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&h.server)
        .await;

    let filters = RecruiterFilters {
        search: Some("acme".to_string()),
        ..Default::default()
    };
    let page = h.services.recruiters.list_recruiters(&filters).await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn slugs_and_session_ids_stay_inside_their_path_segment() {
    let h = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/blog/posts/what%3F%23next/"))
        .and(query_param_is_missing("next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(post_json("what?#next", "DRAFT")))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sessions/a%2Fb/invalidate/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    let post = h.services.blog.get_post("what?#next").await.unwrap();
    assert_eq!(post.slug, "what?#next");
    h.services.sessions.invalidate("a/b").await.unwrap();
}

#[tokio::test]
async fn server_detail_becomes_the_error_message() {
    let h = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/blog/posts/missing/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&h.server)
        .await;

    let error = h.services.blog.get_post("missing").await.unwrap_err();
    assert_eq!(error.message(), "Not found.");
}

#[tokio::test]
async fn status_without_body_gets_a_generic_message() {
    let h = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/blog/stats/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&h.server)
        .await;

    let error = h.services.blog.get_stats().await.unwrap_err();
    assert_eq!(
        error.message(),
        "The server encountered an error. Please try again later."
    );
}

#[tokio::test]
async fn field_errors_are_reported_with_their_field() {
    let h = Harness::logged_in().await;

    Mock::given(method("PATCH"))
        .and(path("/api/auth/profile/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"phone": ["Enter a valid phone number."]})),
        )
        .mount(&h.server)
        .await;

    let update = jobboard_admin::models::auth::ProfileUpdate {
        phone: Some("abc".to_string()),
        ..Default::default()
    };
    let error = h.services.profile.update_profile(&update).await.unwrap_err();
    assert_eq!(error.message(), "phone: Enter a valid phone number.");
}

#[tokio::test]
async fn undecodable_body_is_reported() {
    let h = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/blog/posts/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&h.server)
        .await;

    let error = h
        .services
        .blog
        .list_posts(&BlogFilters::default())
        .await
        .unwrap_err();
    assert_eq!(error.message(), "Unexpected response from the server.");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let h = Harness::logged_in().await;
    let config = jobboard_admin::config::ApiConfig {
        base_url: "http://127.0.0.1:9/".to_string(),
        timeout_secs: 2,
    };
    let client = jobboard_admin::api::ApiClient::new(&config, h.auth.clone()).unwrap();
    let services = jobboard_admin::services::Services::new(client);

    let error = services.blog.get_stats().await.unwrap_err();
    assert!(
        error.message().starts_with("Unable to reach the server")
            || error.message().starts_with("Network error"),
        "{}",
        error.message()
    );
}
