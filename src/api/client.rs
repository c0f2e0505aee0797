use reqwest::multipart::Form;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::error::ApiError;
use super::query::Query;
use crate::auth::AuthContext;
use crate::config::ApiConfig;

pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Form),
}

impl RequestBody {
    pub fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self, ApiError> {
        serde_json::to_value(body)
            .map(RequestBody::Json)
            .map_err(|e| ApiError::Encode(e.to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Query,
    /// Skip the bearer header (login, token refresh, password reset).
    pub anonymous: bool,
}

impl RequestOptions {
    pub fn query(query: Query) -> Self {
        Self {
            query,
            anonymous: false,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            query: Query::new(),
            anonymous: true,
        }
    }
}

/// The single HTTP entry point. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    auth: Arc<AuthContext>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, auth: Arc<AuthContext>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("jbadmin/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    pub fn auth(&self) -> &Arc<AuthContext> {
        &self.auth
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = self.url(path)?;
        debug!(method = %method, path, query = %options.query.to_query_string(), "api request");

        let mut builder = self.http.request(method.clone(), url);
        if !options.query.is_empty() {
            builder = builder.query(options.query.pairs());
        }
        if !options.anonymous {
            if let Some(token) = self.auth.access_token() {
                builder = builder.bearer_auth(token);
            }
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send().await.map_err(|e| {
            warn!(method = %method, path, error = %e, "api transport failure");
            ApiError::Transport(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            warn!(method = %method, path, status = status.as_u16(), "api request failed");
            let body = serde_json::from_slice::<Value>(&bytes).ok();
            return Err(ApiError::Status { status, body });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_value(Value::Null).map_err(|e| ApiError::Decode(e.to_string()));
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(method = %method, path, error = %e, "undecodable api response");
            ApiError::Decode(e.to_string())
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: Query) -> Result<T, ApiError> {
        self.request(Method::GET, path, RequestBody::Empty, RequestOptions::query(query))
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, RequestBody::json(body)?, RequestOptions::default())
            .await
    }

    pub async fn post_anonymous<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, RequestBody::json(body)?, RequestOptions::anonymous())
            .await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::POST, path, RequestBody::Empty, RequestOptions::default())
            .await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::PATCH, path, RequestBody::json(body)?, RequestOptions::default())
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, RequestBody::Empty, RequestOptions::default())
            .await
    }

    /// Multipart submission; reqwest sets `multipart/form-data; boundary=...`.
    pub async fn send_form<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        self.request(method, path, RequestBody::Multipart(form), RequestOptions::default())
            .await
    }
}
