use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Reference;
use crate::api::query::Query;

/// Blog post as returned by `/api/blog/posts/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(default)]
    pub id: Option<i64>,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: Option<Reference>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub is_featured: bool,
    /// URL of the stored image; uploads go through `BlogPostInput`.
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub views_count: u64,
    #[serde(default)]
    pub author: Option<Reference>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    #[default]
    Draft,
    Pending,
    Published,
    Archived,
    #[serde(other)]
    Unknown,
}

impl PostStatus {
    pub const ALL: [PostStatus; 4] = [
        PostStatus::Draft,
        PostStatus::Pending,
        PostStatus::Published,
        PostStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "DRAFT",
            PostStatus::Pending => "PENDING",
            PostStatus::Published => "PUBLISHED",
            PostStatus::Archived => "ARCHIVED",
            PostStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PostStatus::Draft => "Brouillon",
            PostStatus::Pending => "En attente",
            PostStatus::Published => "Publié",
            PostStatus::Archived => "Archivé",
            PostStatus::Unknown => "Inconnu",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DRAFT" => Some(PostStatus::Draft),
            "PENDING" => Some(PostStatus::Pending),
            "PUBLISHED" => Some(PostStatus::Published),
            "ARCHIVED" => Some(PostStatus::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Filters for the blog list page. Unset fields never reach the query string.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogFilters {
    pub search: Option<String>,
    pub status: Option<PostStatus>,
    pub category: Option<i64>,
    pub is_featured: Option<bool>,
    pub ordering: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for BlogFilters {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            category: None,
            is_featured: None,
            ordering: None,
            page: 1,
            page_size: 10,
        }
    }
}

impl BlogFilters {
    pub fn to_query(&self) -> Query {
        Query::new()
            .opt("search", self.search.as_deref())
            .opt("status", self.status.map(|s| s.as_str()))
            .opt("category", self.category)
            .opt("is_featured", self.is_featured)
            .opt("ordering", self.ordering.as_deref())
            .push("page", self.page)
            .push("page_size", self.page_size)
    }
}

/// Fields submitted on create/update. Sent as multipart form data.
#[derive(Debug, Clone, Default)]
pub struct BlogPostInput {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub category: Option<i64>,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub is_featured: bool,
    pub meta_description: Option<String>,
    pub publish_date: Option<DateTime<Utc>>,
    pub featured_image: Option<crate::validation::ImageUpload>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogStats {
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub published_posts: u64,
    #[serde(default)]
    pub draft_posts: u64,
    #[serde(default)]
    pub pending_posts: u64,
    #[serde(default)]
    pub archived_posts: u64,
    #[serde(default)]
    pub featured_posts: u64,
    #[serde(default)]
    pub total_views: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of `POST /api/blog/search/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlogSearch {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_falls_back_to_safe_label() {
        let post: BlogPost = serde_json::from_str(
            r#"{"slug": "hello", "title": "Hello", "status": "SCHEDULED"}"#,
        )
        .unwrap();
        assert_eq!(post.status, PostStatus::Unknown);
        assert_eq!(post.status.label(), "Inconnu");
    }

    #[test]
    fn post_deserializes_with_nested_category_and_author() {
        let post: BlogPost = serde_json::from_str(
            r#"{
                "id": 4,
                "slug": "rust-jobs",
                "title": "Rust jobs",
                "content": "body",
                "category": {"id": 2, "name": "Tech"},
                "author": {"id": 1, "username": "admin"},
                "tags": ["rust", "jobs"],
                "status": "PUBLISHED",
                "is_featured": true,
                "publish_date": "2024-05-01T08:00:00Z",
                "views_count": 42
            }"#,
        )
        .unwrap();
        assert_eq!(post.category.unwrap().display(), "Tech");
        assert_eq!(post.author.unwrap().display(), "admin");
        assert_eq!(post.status, PostStatus::Published);
        assert_eq!(post.views_count, 42);
        assert!(post.publish_date.is_some());
    }

    #[test]
    fn default_filters_only_send_pagination() {
        let query = BlogFilters::default().to_query();
        assert_eq!(query.to_query_string(), "page=1&page_size=10");
    }

    #[test]
    fn empty_search_is_omitted() {
        let filters = BlogFilters {
            search: Some("  ".into()),
            status: Some(PostStatus::Draft),
            is_featured: Some(true),
            ..Default::default()
        };
        assert_eq!(
            filters.to_query().to_query_string(),
            "status=DRAFT&is_featured=true&page=1&page_size=10"
        );
    }

    #[test]
    fn parse_status_is_case_insensitive() {
        assert_eq!(PostStatus::parse("published"), Some(PostStatus::Published));
        assert_eq!(PostStatus::parse("nope"), None);
    }
}
