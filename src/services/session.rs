use super::ServiceResult;
use crate::api::{ApiClient, Query, path_segment};
use crate::models::Session;
use crate::models::session::ForceLogoutRequest;

#[derive(Clone)]
pub struct SessionService {
    client: ApiClient,
}

impl SessionService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_sessions(&self) -> ServiceResult<Vec<Session>> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Sessions {
            Bare(Vec<Session>),
            Keyed { sessions: Vec<Session> },
            Paginated { results: Vec<Session> },
        }

        let sessions: Sessions = self.client.get("api/auth/sessions/", Query::new()).await?;
        Ok(match sessions {
            Sessions::Bare(list)
            | Sessions::Keyed { sessions: list }
            | Sessions::Paginated { results: list } => list,
        })
    }

    pub async fn invalidate(&self, session_id: &str) -> ServiceResult<()> {
        let path = format!("api/auth/sessions/{}/invalidate/", path_segment(session_id));
        self.client.post_empty::<serde_json::Value>(&path).await?;
        Ok(())
    }

    pub async fn logout_all(&self) -> ServiceResult<serde_json::Value> {
        Ok(self.client.post_empty("api/auth/sessions/logout-all/").await?)
    }

    pub async fn force_logout(&self, user_id: i64) -> ServiceResult<serde_json::Value> {
        Ok(self
            .client
            .post("api/auth/sessions/force-logout/", &ForceLogoutRequest { user_id })
            .await?)
    }
}
