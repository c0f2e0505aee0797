use reqwest::Method;
use reqwest::multipart::Form;

use super::ServiceResult;
use crate::api::{ApiClient, Query};
use crate::models::UserProfile;
use crate::models::auth::ProfileUpdate;
use crate::validation::ImageUpload;

const PROFILE_PATH: &str = "api/auth/profile/";

#[derive(Clone)]
pub struct ProfileService {
    client: ApiClient,
}

impl ProfileService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_profile(&self) -> ServiceResult<UserProfile> {
        Ok(self.client.get(PROFILE_PATH, Query::new()).await?)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ServiceResult<UserProfile> {
        Ok(self.client.patch(PROFILE_PATH, update).await?)
    }

    pub async fn update_avatar(&self, avatar: &ImageUpload) -> ServiceResult<UserProfile> {
        let form = Form::new().part("avatar", avatar.to_part()?);
        Ok(self.client.send_form(Method::PATCH, PROFILE_PATH, form).await?)
    }
}
