use reqwest::Method;
use reqwest::multipart::Form;
use serde::Serialize;

use super::ServiceResult;
use crate::api::{ApiClient, Query, path_segment};
use crate::models::blog::BlogSearch;
use crate::models::{BlogCategory, BlogFilters, BlogPost, BlogPostInput, BlogStats, Paginated};

/// Quick-edit fields sent as JSON `PATCH`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlogPostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<crate::models::PostStatus>,
}

#[derive(Clone)]
pub struct BlogService {
    client: ApiClient,
}

impl BlogService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_posts(&self, filters: &BlogFilters) -> ServiceResult<Paginated<BlogPost>> {
        Ok(self.client.get("api/blog/posts/", filters.to_query()).await?)
    }

    pub async fn get_post(&self, slug: &str) -> ServiceResult<BlogPost> {
        Ok(self
            .client
            .get(&format!("api/blog/posts/{}/", path_segment(slug)), Query::new())
            .await?)
    }

    pub async fn create_post(&self, input: &BlogPostInput) -> ServiceResult<BlogPost> {
        let form = post_form(input)?;
        Ok(self
            .client
            .send_form(Method::POST, "api/blog/posts/create/", form)
            .await?)
    }

    /// Full update (`PUT`) with the same multipart body as create.
    pub async fn update_post(&self, slug: &str, input: &BlogPostInput) -> ServiceResult<BlogPost> {
        let form = post_form(input)?;
        let path = format!("api/blog/posts/{}/update/", path_segment(slug));
        Ok(self.client.send_form(Method::PUT, &path, form).await?)
    }

    pub async fn patch_post(&self, slug: &str, patch: &BlogPostPatch) -> ServiceResult<BlogPost> {
        Ok(self
            .client
            .patch(&format!("api/blog/posts/{}/update/", path_segment(slug)), patch)
            .await?)
    }

    pub async fn delete_post(&self, slug: &str) -> ServiceResult<()> {
        let path = format!("api/blog/posts/{}/delete/", path_segment(slug));
        self.client.delete::<serde_json::Value>(&path).await?;
        Ok(())
    }

    /// Accepts both a bare array and a paginated envelope.
    pub async fn list_categories(&self) -> ServiceResult<Vec<BlogCategory>> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Categories {
            Bare(Vec<BlogCategory>),
            Paginated(Paginated<BlogCategory>),
        }

        let categories: Categories = self.client.get("api/blog/categories/", Query::new()).await?;
        Ok(match categories {
            Categories::Bare(list) => list,
            Categories::Paginated(page) => page.results,
        })
    }

    pub async fn get_stats(&self) -> ServiceResult<BlogStats> {
        Ok(self.client.get("api/blog/stats/", Query::new()).await?)
    }

    pub async fn search(&self, search: &BlogSearch) -> ServiceResult<Paginated<BlogPost>> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Found {
            Paginated(Paginated<BlogPost>),
            Bare(Vec<BlogPost>),
        }

        let found: Found = self.client.post("api/blog/search/", search).await?;
        Ok(match found {
            Found::Paginated(page) => page,
            Found::Bare(results) => Paginated {
                count: results.len() as u64,
                results,
                ..Default::default()
            },
        })
    }
}

/// Multipart body for create/update. Tags travel as a JSON array string and
/// the image part is only attached when a new file was picked.
pub fn post_form(input: &BlogPostInput) -> reqwest::Result<Form> {
    let mut form = Form::new()
        .text("title", input.title.clone())
        .text("content", input.content.clone())
        .text("status", input.status.as_str())
        .text("is_featured", input.is_featured.to_string())
        .text(
            "tags",
            serde_json::to_string(&input.tags).unwrap_or_else(|_| "[]".to_string()),
        );

    if let Some(excerpt) = input.excerpt.as_deref().filter(|v| !v.trim().is_empty()) {
        form = form.text("excerpt", excerpt.to_string());
    }
    if let Some(category) = input.category {
        form = form.text("category", category.to_string());
    }
    if let Some(meta) = input
        .meta_description
        .as_deref()
        .filter(|v| !v.trim().is_empty())
    {
        form = form.text("meta_description", meta.to_string());
    }
    if let Some(date) = input.publish_date {
        form = form.text("publish_date", date.to_rfc3339());
    }
    if let Some(image) = &input.featured_image {
        form = form.part("featured_image", image.to_part()?);
    }
    Ok(form)
}
