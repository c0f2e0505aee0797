pub mod auth;
pub mod blog;
pub mod profile;
pub mod recruiter;
pub mod session;
pub mod stats;
pub mod token;

use thiserror::Error;

use crate::api::{ApiClient, ApiError, handle_api_error};

pub use auth::AuthService;
pub use blog::BlogService;
pub use profile::ProfileService;
pub use recruiter::RecruiterService;
pub use session::SessionService;
pub use stats::{StatsEndpoint, StatsService};
pub use token::{RefreshHandle, RefreshScheduler, TokenService};

/// A failed service call, already reduced to the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ServiceError(pub String);

impl ServiceError {
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<ApiError> for ServiceError {
    fn from(error: ApiError) -> Self {
        ServiceError(handle_api_error(&error))
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::from(error).into()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Every service over one shared client.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub blog: BlogService,
    pub profile: ProfileService,
    pub recruiters: RecruiterService,
    pub sessions: SessionService,
    pub stats: StatsService,
    pub tokens: TokenService,
}

impl Services {
    pub fn new(client: ApiClient) -> Self {
        let auth = AuthService::new(client.clone());
        Self {
            tokens: TokenService::new(auth.clone()),
            auth,
            blog: BlogService::new(client.clone()),
            profile: ProfileService::new(client.clone()),
            recruiters: RecruiterService::new(client.clone()),
            sessions: SessionService::new(client.clone()),
            stats: StatsService::new(client),
        }
    }
}
