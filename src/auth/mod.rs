pub mod context;
pub mod jwt;

pub use context::{AuthContext, AuthSnapshot};
pub use jwt::{TokenError, is_token_expired, should_refresh_token};
