use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::models::{BlogCategory, BlogPost, BlogPostInput, PostStatus};
use crate::services::{BlogService, ServiceResult};
use crate::validation::{self, ImageSelection, ValidationError};

const PUBLISH_DATE_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { slug: String },
}

/// `Saving` is separate from `Loading` so the form stays visible while a
/// submit is in flight.
#[derive(Debug, Clone, Default)]
pub enum FormState {
    #[default]
    Idle,
    Loading,
    Ready,
    Saving,
    Saved(BlogPost),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct BlogFormPage {
    pub mode: FormMode,
    pub state: FormState,
    pub categories: Vec<BlogCategory>,

    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: Option<i64>,
    pub tags_input: String,
    pub status: PostStatus,
    pub is_featured: bool,
    pub meta_description: String,
    pub publish_date_input: String,
    pub image: ImageSelection,
    /// URL of the image already stored on the post (edit mode).
    pub current_image: Option<String>,

    pub field_errors: BTreeMap<&'static str, String>,
    stored_publish_date: Option<DateTime<Utc>>,
}

impl BlogFormPage {
    pub fn create() -> Self {
        Self::with_mode(FormMode::Create)
    }

    pub fn edit(slug: impl Into<String>) -> Self {
        Self::with_mode(FormMode::Edit { slug: slug.into() })
    }

    fn with_mode(mode: FormMode) -> Self {
        Self {
            mode,
            state: FormState::Idle,
            categories: Vec::new(),
            title: String::new(),
            excerpt: String::new(),
            content: String::new(),
            category: None,
            tags_input: String::new(),
            status: PostStatus::Draft,
            is_featured: false,
            meta_description: String::new(),
            publish_date_input: String::new(),
            image: ImageSelection::default(),
            current_image: None,
            field_errors: BTreeMap::new(),
            stored_publish_date: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    /// Copies a fetched post into the editable fields.
    pub fn fill_from(&mut self, post: &BlogPost) {
        self.title = post.title.clone();
        self.excerpt = post.excerpt.clone().unwrap_or_default();
        self.content = post.content.clone();
        self.category = post.category.as_ref().and_then(|c| c.id());
        self.tags_input = post.tags.join(", ");
        self.status = match post.status {
            PostStatus::Unknown => PostStatus::Draft,
            status => status,
        };
        self.is_featured = post.is_featured;
        self.meta_description = post.meta_description.clone().unwrap_or_default();
        self.current_image = post.featured_image.clone();
        self.stored_publish_date = post.publish_date;
        self.publish_date_input = self.stored_date_text().unwrap_or_default();
    }

    /// Minute-precision rendering of the stored date used to pre-fill the input.
    fn stored_date_text(&self) -> Option<String> {
        self.stored_publish_date
            .map(|d| d.format(PUBLISH_DATE_INPUT_FORMAT).to_string())
    }

    /// The input still shows the pre-filled stored date.
    fn publish_date_untouched(&self) -> bool {
        let input = self.publish_date_input.trim();
        input.is_empty() || self.stored_date_text().as_deref() == Some(input)
    }

    /// The publish date field only applies to published posts.
    pub fn shows_publish_date(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Validates the picked file locally. A rejected file keeps the previous
    /// selection and shows the reason under the image field.
    pub fn select_image(&mut self, file_name: &str, bytes: Vec<u8>) -> bool {
        let accepted = self.image.select(file_name, bytes);
        match self.image.error() {
            Some(error) if !accepted => {
                self.field_errors.insert("featured_image", error.to_string());
            }
            _ => {
                self.field_errors.remove("featured_image");
            }
        }
        accepted
    }

    /// Drops the picked image and any error about it.
    pub fn clear_image(&mut self) {
        self.image.clear();
        self.field_errors.remove("featured_image");
    }

    pub fn validate(&mut self) -> Option<BlogPostInput> {
        self.validate_at(Utc::now())
    }

    /// Builds the submission, or fills `field_errors` and returns `None`.
    /// A previously rejected image does not block: the kept selection is valid.
    pub fn validate_at(&mut self, now: DateTime<Utc>) -> Option<BlogPostInput> {
        let mut errors = BTreeMap::new();

        let title = record(&mut errors, "title", validation::require("title", &self.title));
        let content = record(
            &mut errors,
            "content",
            validation::require("content", &self.content),
        );
        let keep_stored = self.is_edit() && self.publish_date_untouched();
        let publish_date = if !self.shows_publish_date() || keep_stored {
            Some(None)
        } else {
            record(
                &mut errors,
                "publish_date",
                validation::parse_publish_date(&self.publish_date_input),
            )
        };

        self.field_errors = errors;
        if !self.field_errors.is_empty() {
            return None;
        }

        let publish_date = match (publish_date.flatten(), &self.mode) {
            (Some(date), _) => Some(date),
            (None, FormMode::Edit { .. }) => self.stored_publish_date,
            (None, FormMode::Create) if self.shows_publish_date() => Some(now),
            (None, FormMode::Create) => None,
        };

        Some(BlogPostInput {
            title: title?.to_string(),
            excerpt: non_blank(&self.excerpt),
            content: content?.to_string(),
            category: self.category,
            tags: validation::normalize_tags(&self.tags_input),
            status: self.status,
            is_featured: self.is_featured,
            meta_description: non_blank(&self.meta_description),
            publish_date,
            featured_image: self.image.selected().cloned(),
        })
    }

    /// Create mode needs categories only; edit mode also fetches the post.
    pub async fn load(&mut self, blog: &BlogService) {
        self.state = FormState::Loading;
        let categories = match &self.mode {
            FormMode::Create => blog.list_categories().await,
            FormMode::Edit { slug } => {
                let (post, categories) = tokio::join!(blog.get_post(slug), blog.list_categories());
                match post {
                    Ok(post) => self.fill_from(&post),
                    Err(e) => {
                        self.state = FormState::Failed(e.0);
                        return;
                    }
                }
                categories
            }
        };
        match categories {
            Ok(categories) => self.categories = categories,
            Err(e) => warn!(error = %e, "could not load blog categories"),
        }
        self.state = FormState::Ready;
    }

    /// Validates, then creates or updates. Nothing is sent when validation fails.
    pub async fn submit(&mut self, blog: &BlogService) -> bool {
        let Some(input) = self.validate() else {
            return false;
        };
        self.state = FormState::Saving;
        let result = match &self.mode {
            FormMode::Create => blog.create_post(&input).await,
            FormMode::Edit { slug } => blog.update_post(slug, &input).await,
        };
        self.finish_submit(result)
    }

    pub fn finish_submit(&mut self, result: ServiceResult<BlogPost>) -> bool {
        match result {
            Ok(post) => {
                info!(slug = %post.slug, "blog post saved");
                if let FormMode::Create = self.mode {
                    self.mode = FormMode::Edit {
                        slug: post.slug.clone(),
                    };
                }
                self.stored_publish_date = post.publish_date;
                self.state = FormState::Saved(post);
                true
            }
            Err(e) => {
                self.state = FormState::Failed(e.0);
                false
            }
        }
    }
}

fn record<T>(
    errors: &mut BTreeMap<&'static str, String>,
    field: &'static str,
    result: Result<T, ValidationError>,
) -> Option<T> {
    result
        .map_err(|e| {
            errors.insert(field, e.to_string());
        })
        .ok()
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceError;
    use crate::validation::fixtures::png;
    use chrono::TimeZone;

    fn filled() -> BlogFormPage {
        let mut form = BlogFormPage::create();
        form.title = "  Hello  ".into();
        form.content = "Body".into();
        form.tags_input = "a, b ,c,".into();
        form
    }

    #[test]
    fn title_and_content_are_required() {
        let mut form = BlogFormPage::create();
        form.content = "   ".into();
        assert!(form.validate().is_none());
        assert_eq!(form.field_errors.get("title").unwrap(), "title is required");
        assert!(form.field_errors.contains_key("content"));
    }

    #[test]
    fn valid_form_normalizes_fields() {
        let mut form = filled();
        let input = form.validate().unwrap();
        assert_eq!(input.title, "Hello");
        assert_eq!(input.tags, vec!["a", "b", "c"]);
        assert_eq!(input.excerpt, None);
        assert_eq!(input.publish_date, None);
        assert!(form.field_errors.is_empty());
    }

    #[test]
    fn blank_publish_date_on_create_means_now() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut form = filled();
        form.status = PostStatus::Published;
        assert!(form.shows_publish_date());
        assert_eq!(form.validate_at(now).unwrap().publish_date, Some(now));
    }

    #[test]
    fn blank_publish_date_on_edit_keeps_stored_value() {
        let stored = Utc.with_ymd_and_hms(2023, 1, 2, 8, 30, 0).unwrap();
        let post: BlogPost = serde_json::from_value(serde_json::json!({
            "slug": "hello",
            "title": "Hello",
            "content": "Body",
            "status": "PUBLISHED",
            "publish_date": "2023-01-02T08:30:00Z"
        }))
        .unwrap();
        let mut form = BlogFormPage::edit("hello");
        form.fill_from(&post);
        form.publish_date_input.clear();

        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(form.validate_at(now).unwrap().publish_date, Some(stored));
    }

    #[test]
    fn typed_publish_date_is_used() {
        let mut form = filled();
        form.status = PostStatus::Published;
        form.publish_date_input = "2024-06-01 09:15".into();
        let input = form.validate().unwrap();
        assert_eq!(
            input.publish_date,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 9, 15, 0).unwrap())
        );
    }

    #[test]
    fn bad_publish_date_blocks_submission() {
        let mut form = filled();
        form.status = PostStatus::Published;
        form.publish_date_input = "tomorrow".into();
        assert!(form.validate().is_none());
        assert!(form.field_errors.contains_key("publish_date"));
    }

    #[test]
    fn rejected_image_keeps_previous_selection() {
        let mut form = filled();
        assert!(form.select_image("cover.png", png(64)));
        assert!(!form.select_image("notes.txt", b"plain text".to_vec()));
        assert!(form.field_errors.contains_key("featured_image"));
        assert_eq!(form.image.selected().unwrap().file_name(), "cover.png");

        let input = form.validate().unwrap();
        assert_eq!(input.featured_image.unwrap().file_name(), "cover.png");
        assert!(form.field_errors.is_empty());

        assert!(form.select_image("other.png", png(64)));
        let input = form.validate().unwrap();
        assert_eq!(input.featured_image.unwrap().file_name(), "other.png");
    }

    #[test]
    fn clearing_image_after_rejection_allows_submission() {
        let mut form = filled();
        assert!(form.select_image("ok.png", png(64)));
        assert!(!form.select_image("bad.txt", b"plain text".to_vec()));

        form.clear_image();
        assert!(!form.field_errors.contains_key("featured_image"));
        let input = form.validate().unwrap();
        assert!(input.featured_image.is_none());
    }

    #[test]
    fn untouched_publish_date_keeps_seconds_on_edit() {
        let post: BlogPost = serde_json::from_value(serde_json::json!({
            "slug": "hello",
            "title": "Hello",
            "content": "Body",
            "status": "PUBLISHED",
            "publish_date": "2023-01-02T08:30:45Z"
        }))
        .unwrap();
        let mut form = BlogFormPage::edit("hello");
        form.fill_from(&post);
        assert_eq!(form.publish_date_input, "2023-01-02 08:30");
        form.title = "Renamed".into();

        let input = form.validate().unwrap();
        assert_eq!(
            input.publish_date,
            Some(Utc.with_ymd_and_hms(2023, 1, 2, 8, 30, 45).unwrap())
        );

        form.publish_date_input = "2023-02-01 10:00".into();
        assert_eq!(
            form.validate().unwrap().publish_date,
            Some(Utc.with_ymd_and_hms(2023, 2, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn saving_a_new_post_switches_to_edit_mode() {
        let mut form = filled();
        let saved: BlogPost =
            serde_json::from_value(serde_json::json!({"slug": "hello", "title": "Hello"})).unwrap();
        assert!(form.finish_submit(Ok(saved)));
        assert_eq!(form.mode, FormMode::Edit { slug: "hello".into() });

        assert!(!form.finish_submit(Err(ServiceError("Server error".into()))));
        assert!(matches!(form.state, FormState::Failed(ref m) if m == "Server error"));
    }
}
