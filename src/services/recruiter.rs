use super::ServiceResult;
use crate::api::{ApiClient, Query};
use crate::models::recruiter::{AdvancedSearch, RecruiterUpdate, ValidationRequest};
use crate::models::{
    AccountStatus, RecruiterFilters, RecruiterListing, RecruiterPage, RecruiterProfile,
    ValidationAction,
};

const VALIDATION_PATH: &str = "api/auth/recruiter-validation/";

#[derive(Clone)]
pub struct RecruiterService {
    client: ApiClient,
}

impl RecruiterService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_recruiters(&self, filters: &RecruiterFilters) -> ServiceResult<RecruiterPage> {
        let listing: RecruiterListing = self.client.get(VALIDATION_PATH, filters.to_query()).await?;
        Ok(listing.into_page())
    }

    /// Moderation queue. The server filter is a hint; only `PENDING` rows are kept.
    pub async fn list_pending(&self) -> ServiceResult<Vec<RecruiterProfile>> {
        let query = Query::new().push("status", AccountStatus::Pending.as_str());
        let listing: RecruiterListing = self.client.get(VALIDATION_PATH, query).await?;
        Ok(listing
            .into_page()
            .items
            .into_iter()
            .filter(RecruiterProfile::is_pending)
            .collect())
    }

    pub async fn validate_recruiter(
        &self,
        id: i64,
        action: ValidationAction,
    ) -> ServiceResult<serde_json::Value> {
        Ok(self
            .client
            .post(
                &format!("{}{}/", VALIDATION_PATH, id),
                &ValidationRequest { action },
            )
            .await?)
    }

    pub async fn get_recruiter(&self, id: i64) -> ServiceResult<RecruiterProfile> {
        Ok(self
            .client
            .get(&format!("api/auth/profiles/public/{}/", id), Query::new())
            .await?)
    }

    pub async fn update_recruiter(
        &self,
        id: i64,
        update: &RecruiterUpdate,
    ) -> ServiceResult<RecruiterProfile> {
        Ok(self
            .client
            .patch(&format!("api/auth/profiles/public/{}/", id), update)
            .await?)
    }

    pub async fn list_public_profiles(
        &self,
        filters: &RecruiterFilters,
    ) -> ServiceResult<RecruiterPage> {
        let listing: RecruiterListing = self
            .client
            .get("api/auth/profiles/public/", filters.to_query())
            .await?;
        Ok(listing.into_page())
    }

    pub async fn advanced_search(&self, search: &AdvancedSearch) -> ServiceResult<RecruiterPage> {
        let listing: RecruiterListing = self
            .client
            .post("api/auth/profiles/search/advanced/", search)
            .await?;
        Ok(listing.into_page())
    }
}
