pub mod auth;
pub mod blog;
pub mod recruiter;
pub mod session;

use serde::{Deserialize, Serialize};

pub use auth::{LoginRequest, LoginResponse, TokenPair, UserProfile, UserSummary};
pub use blog::{BlogCategory, BlogFilters, BlogPost, BlogPostInput, BlogStats, PostStatus};
pub use recruiter::{
    AccountStatus, CompanySize, RecruiterFilters, RecruiterListing, RecruiterPage,
    RecruiterProfile, Sector, ValidationAction,
};
pub use session::Session;

/// Django REST framework style page envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

/// A reference the backend sends either as a bare id or as a nested object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Id(i64),
    Named {
        id: i64,
        #[serde(default, alias = "username", alias = "title")]
        name: Option<String>,
    },
    Label(String),
}

impl Reference {
    pub fn id(&self) -> Option<i64> {
        match self {
            Reference::Id(id) | Reference::Named { id, .. } => Some(*id),
            Reference::Label(_) => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Reference::Id(id) => format!("#{}", id),
            Reference::Named { name: Some(name), .. } => name.clone(),
            Reference::Named { id, name: None } => format!("#{}", id),
            Reference::Label(label) => label.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

/// Identifiers arrive as integers or strings (UUIDs) depending on the endpoint.
pub(crate) fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(RawId::into_string)
}

pub(crate) fn opt_id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(RawId::into_string))
}
