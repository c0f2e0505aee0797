#![allow(dead_code)]

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};
use wiremock::MockServer;

use jobboard_admin::api::ApiClient;
use jobboard_admin::auth::AuthContext;
use jobboard_admin::config::ApiConfig;
use jobboard_admin::models::TokenPair;
use jobboard_admin::services::Services;
use jobboard_admin::store::{MemoryStore, StorageKey, TokenStore};

pub struct Harness {
    pub server: MockServer,
    pub services: Services,
    pub auth: Arc<AuthContext>,
    pub store: Arc<MemoryStore>,
}

impl Harness {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryStore::new());
        let auth = Arc::new(AuthContext::init(store.clone()).unwrap());
        let config = ApiConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        };
        let client = ApiClient::new(&config, auth.clone()).unwrap();
        Self {
            server,
            services: Services::new(client),
            auth,
            store,
        }
    }

    /// Starts with a session whose access token is valid for an hour.
    pub async fn logged_in() -> Self {
        let harness = Self::start().await;
        harness
            .auth
            .update(
                TokenPair {
                    access: token_expiring_in(3600),
                    refresh: "refresh-1".to_string(),
                },
                Some("session-1".to_string()),
                None,
            )
            .unwrap();
        harness
    }

    pub fn stored(&self, key: StorageKey) -> Option<String> {
        self.store.get(key).unwrap()
    }
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Unsigned JWT carrying only `exp`.
pub fn token_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "exp": exp, "token_type": "access" }).to_string());
    format!("{}.{}.signature", header, payload)
}

pub fn token_expiring_in(secs: i64) -> String {
    token_with_exp(now() + secs)
}

pub fn post_json(slug: &str, status: &str) -> Value {
    json!({
        "id": 1,
        "slug": slug,
        "title": slug.to_uppercase(),
        "content": "Body",
        "status": status,
        "is_featured": false,
        "tags": ["rust"],
        "views_count": 3
    })
}

pub fn page_json(results: Vec<Value>) -> Value {
    json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results
    })
}

pub fn recruiter_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "user": {
            "id": id + 100,
            "username": format!("recruiter{}", id),
            "email": format!("hr{}@example.test", id),
            "first_name": "Awa",
            "last_name": "Diop"
        },
        "company_name": format!("Company {}", id),
        "sector": "TECHNOLOGY",
        "company_size": "SMALL",
        "account_status": status
    })
}
