pub mod client;
pub mod error;
pub mod query;

pub use client::{ApiClient, RequestBody, RequestOptions};
pub use error::{ApiError, handle_api_error};
pub use query::{Query, path_segment};
