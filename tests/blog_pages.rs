mod common;

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{Harness, page_json, post_json};
use jobboard_admin::models::{BlogFilters, PostStatus};
use jobboard_admin::pages::{BlogFormPage, BlogListPage, FormMode, FormState, LoadState};

fn png(len: usize) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.resize(len.max(8), 0);
    bytes
}

/// Plain-ASCII image bytes, so the multipart body stays valid UTF-8.
fn gif(len: usize) -> Vec<u8> {
    let mut bytes = b"GIF89a".to_vec();
    bytes.resize(len.max(6), b'0');
    bytes
}

#[tokio::test]
async fn create_sends_multipart_with_normalized_tags_and_image() {
    let h = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/blog/categories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 2, "name": "Carrière"}])))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/blog/posts/create/"))
        .and(body_string_contains("name=\"title\""))
        .and(body_string_contains(r#"["a","b","c"]"#))
        .and(body_string_contains("name=\"featured_image\"; filename=\"cover.gif\""))
        .and(body_string_contains("image/gif"))
        .respond_with(ResponseTemplate::new(201).set_body_json(post_json("hello", "DRAFT")))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut form = BlogFormPage::create();
    form.load(&h.services.blog).await;
    assert!(matches!(form.state, FormState::Ready));
    assert_eq!(form.categories.len(), 1);

    form.title = "Hello".into();
    form.content = "Body".into();
    form.tags_input = "a, b ,c,".into();
    form.category = Some(2);
    assert!(form.select_image("cover.gif", gif(128)));

    assert!(form.submit(&h.services.blog).await);
    assert_eq!(form.mode, FormMode::Edit { slug: "hello".into() });
}

#[tokio::test]
async fn rejected_image_is_never_uploaded() {
    let h = Harness::logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/blog/posts/create/"))
        .and(body_string_contains("filename=\"huge.png\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(post_json("hello", "DRAFT")))
        .expect(0)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/blog/posts/create/"))
        .and(body_string_contains("name=\"featured_image\"; filename=\"cover.gif\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(post_json("hello", "DRAFT")))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut form = BlogFormPage::create();
    form.title = "Hello".into();
    form.content = "Body".into();
    assert!(form.select_image("cover.gif", gif(64)));
    assert!(!form.select_image("huge.png", png(5 * 1024 * 1024 + 1)));
    assert!(form.field_errors.contains_key("featured_image"));
    assert_eq!(form.image.selected().unwrap().file_name(), "cover.gif");

    assert!(form.submit(&h.services.blog).await);
    assert!(form.field_errors.is_empty());
}

#[tokio::test]
async fn edit_loads_post_and_keeps_publish_date_when_blank() {
    let h = Harness::logged_in().await;
    let mut stored = post_json("hello", "PUBLISHED");
    stored["publish_date"] = json!("2023-01-02T08:30:00Z");
    stored["category"] = json!({"id": 2, "name": "Carrière"});

    Mock::given(method("GET"))
        .and(path("/api/blog/posts/hello/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored.clone()))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/blog/categories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![json!({"id": 2, "name": "Carrière"})])))
        .mount(&h.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/blog/posts/hello/update/"))
        .and(body_string_contains("2023-01-02T08:30:00+00:00"))
        .and(body_string_contains("Updated title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut form = BlogFormPage::edit("hello");
    form.load(&h.services.blog).await;
    assert!(matches!(form.state, FormState::Ready));
    assert_eq!(form.category, Some(2));
    assert_eq!(form.status, PostStatus::Published);

    form.title = "Updated title".into();
    form.publish_date_input.clear();
    assert!(form.submit(&h.services.blog).await);
    assert!(matches!(form.state, FormState::Saved(_)));
}

#[tokio::test]
async fn edit_of_missing_post_fails_the_page() {
    let h = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/blog/posts/gone/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/blog/categories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&h.server)
        .await;

    let mut form = BlogFormPage::edit("gone");
    form.load(&h.services.blog).await;
    assert!(
        matches!(form.state, FormState::Failed(ref m) if m == "The requested resource was not found.")
    );
}

#[tokio::test]
async fn confirmed_delete_reloads_the_list() {
    let h = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/blog/posts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![
            post_json("first", "DRAFT"),
            post_json("second", "PUBLISHED"),
        ])))
        .up_to_n_times(1)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/blog/posts/second/delete/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/blog/posts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![post_json("first", "DRAFT")])))
        .mount(&h.server)
        .await;

    let mut page = BlogListPage::new(BlogFilters::default());
    page.load(&h.services.blog).await;
    page.select_next();
    assert!(page.request_delete());

    page.confirm_dialog(&h.services.blog).await;

    assert!(page.dialog.is_none());
    assert_eq!(page.notice.as_deref(), Some("Deleted \"SECOND\""));
    let posts = page.posts.data().unwrap();
    assert_eq!(posts.results.len(), 1);
    assert_eq!(page.selected, 0);
}

#[tokio::test]
async fn failed_toggle_keeps_list_and_reports_error() {
    let h = Harness::logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/blog/posts/"))
        .and(query_param("status", "DRAFT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![post_json("first", "DRAFT")])))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/blog/posts/first/update/"))
        .and(body_json(json!({"is_featured": true})))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "Forbidden."})))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut page = BlogListPage::new(BlogFilters::default());
    page.set_status(Some(PostStatus::Draft));
    page.load(&h.services.blog).await;
    assert!(page.request_toggle_featured());
    page.confirm_dialog(&h.services.blog).await;

    assert!(page.dialog.is_none());
    assert_eq!(page.action_error.as_deref(), Some("Forbidden."));
    assert!(matches!(page.posts, LoadState::Loaded(_)));
}
