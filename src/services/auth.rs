use tracing::{info, warn};

use super::{ServiceError, ServiceResult};
use crate::api::ApiClient;
use crate::auth::jwt;
use crate::models::auth::{
    Ack, PasswordResetRequest, RefreshRequest, RefreshResponse, VerifyEmailRequest,
};
use crate::models::{LoginRequest, LoginResponse, UserSummary};

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// `POST /api/auth/login/`; persists tokens, session, and user.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<Option<UserSummary>> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .client
            .post_anonymous("api/auth/login/", &request)
            .await?;

        let user = response.user.clone();
        self.client
            .auth()
            .update(response.tokens.into_pair(), response.session_id, response.user)
            .map_err(|e| ServiceError(format!("Could not save the session: {}", e)))?;
        info!(email = %request.email, "logged in");
        Ok(user)
    }

    /// Invalidates the server session (best effort) and always clears local state.
    pub async fn logout(&self) -> ServiceResult<()> {
        let auth = self.client.auth();
        if let Some(session_id) = auth.session_id() {
            let path = format!("api/auth/sessions/{}/invalidate/", session_id);
            if let Err(e) = self.client.post_empty::<serde_json::Value>(&path).await {
                warn!(session_id = %session_id, error = %e, "session invalidation failed; clearing locally");
            }
        }
        auth.clear()
            .map_err(|e| ServiceError(format!("Could not clear stored credentials: {}", e)))?;
        info!("logged out");
        Ok(())
    }

    /// `POST /api/auth/token/refresh/`. Returns `false` when there was no
    /// refresh token or the session changed while the call was in flight.
    pub async fn refresh(&self) -> ServiceResult<bool> {
        let auth = self.client.auth();
        let Some(refresh) = auth.refresh_token() else {
            return Ok(false);
        };
        let response: RefreshResponse = self
            .client
            .post_anonymous(
                "api/auth/token/refresh/",
                &RefreshRequest {
                    refresh: refresh.clone(),
                },
            )
            .await?;
        auth.apply_refresh(&refresh, response.access, response.refresh)
            .map_err(|e| ServiceError(format!("Could not save the refreshed token: {}", e)))
    }

    pub async fn verify_email(&self, token: &str) -> ServiceResult<Option<String>> {
        let ack: Ack = self
            .client
            .post_anonymous(
                "api/auth/verify-email/",
                &VerifyEmailRequest {
                    token: token.trim().to_string(),
                },
            )
            .await?;
        Ok(ack.detail)
    }

    pub async fn request_password_reset(&self, email: &str) -> ServiceResult<Option<String>> {
        let ack: Ack = self
            .client
            .post_anonymous(
                "api/auth/password/reset/",
                &PasswordResetRequest {
                    email: email.trim().to_string(),
                },
            )
            .await?;
        Ok(ack.detail)
    }

    /// Local check only: decodes `exp` without verifying the signature.
    pub fn is_token_expired(&self) -> bool {
        match self.client.auth().access_token() {
            Some(token) => jwt::is_token_expired(&token),
            None => true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.auth().is_authenticated() && !self.is_token_expired()
    }

    pub fn current_user(&self) -> Option<UserSummary> {
        self.client.auth().user()
    }
}
