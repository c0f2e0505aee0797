use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Reference;
use crate::api::query::Query;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruiterUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruiterDocument {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "file")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruiterProfile {
    pub id: i64,
    pub user: RecruiterUser,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub sector: Sector,
    #[serde(default)]
    pub company_size: CompanySize,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub country: Option<Reference>,
    #[serde(default)]
    pub region: Option<Reference>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub account_status: AccountStatus,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub documents: Vec<RecruiterDocument>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RecruiterProfile {
    pub fn contact_name(&self) -> String {
        let full = format!("{} {}", self.user.first_name, self.user.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.user.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn is_pending(&self) -> bool {
        self.account_status == AccountStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Pending,
    Approved,
    Rejected,
    #[default]
    #[serde(other)]
    Unknown,
}

impl AccountStatus {
    pub const ALL: [AccountStatus; 3] = [
        AccountStatus::Pending,
        AccountStatus::Approved,
        AccountStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "PENDING",
            AccountStatus::Approved => "APPROVED",
            AccountStatus::Rejected => "REJECTED",
            AccountStatus::Unknown => "UNKNOWN",
        }
    }

    /// Badge text shown next to a recruiter.
    pub fn label(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "En attente",
            AccountStatus::Approved => "Approuvé",
            AccountStatus::Rejected => "Rejeté",
            AccountStatus::Unknown => "Inconnu",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(AccountStatus::Pending),
            "APPROVED" => Some(AccountStatus::Approved),
            "REJECTED" => Some(AccountStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sector {
    Technology,
    Finance,
    Health,
    Education,
    Commerce,
    Industry,
    Services,
    Agriculture,
    Other,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Sector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Technology => "TECHNOLOGY",
            Sector::Finance => "FINANCE",
            Sector::Health => "HEALTH",
            Sector::Education => "EDUCATION",
            Sector::Commerce => "COMMERCE",
            Sector::Industry => "INDUSTRY",
            Sector::Services => "SERVICES",
            Sector::Agriculture => "AGRICULTURE",
            Sector::Other => "OTHER",
            Sector::Unknown => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sector::Technology => "Technologie",
            Sector::Finance => "Finance",
            Sector::Health => "Santé",
            Sector::Education => "Éducation",
            Sector::Commerce => "Commerce",
            Sector::Industry => "Industrie",
            Sector::Services => "Services",
            Sector::Agriculture => "Agriculture",
            Sector::Other => "Autre",
            Sector::Unknown => "Inconnu",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let sector: Sector =
            serde_json::from_value(serde_json::Value::String(value.trim().to_ascii_uppercase()))
                .ok()?;
        (sector != Sector::Unknown).then_some(sector)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanySize {
    Small,
    Medium,
    Large,
    #[default]
    #[serde(other)]
    Unknown,
}

impl CompanySize {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanySize::Small => "SMALL",
            CompanySize::Medium => "MEDIUM",
            CompanySize::Large => "LARGE",
            CompanySize::Unknown => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompanySize::Small => "Petite",
            CompanySize::Medium => "Moyenne",
            CompanySize::Large => "Grande",
            CompanySize::Unknown => "Inconnue",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SMALL" => Some(CompanySize::Small),
            "MEDIUM" => Some(CompanySize::Medium),
            "LARGE" => Some(CompanySize::Large),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationAction {
    Approve,
    Reject,
}

impl ValidationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationAction::Approve => "approve",
            ValidationAction::Reject => "reject",
        }
    }

    /// Status the recruiter ends up in once the action succeeds.
    pub fn resulting_status(&self) -> AccountStatus {
        match self {
            ValidationAction::Approve => AccountStatus::Approved,
            ValidationAction::Reject => AccountStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationRequest {
    pub action: ValidationAction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecruiterFilters {
    pub status: Option<AccountStatus>,
    pub country: Option<i64>,
    pub sector: Option<Sector>,
    pub company_size: Option<CompanySize>,
    pub search: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for RecruiterFilters {
    fn default() -> Self {
        Self {
            status: None,
            country: None,
            sector: None,
            company_size: None,
            search: None,
            page: 1,
            page_size: 20,
        }
    }
}

impl RecruiterFilters {
    pub fn to_query(&self) -> Query {
        Query::new()
            .opt("status", self.status.map(|s| s.as_str()))
            .opt("country", self.country)
            .opt("sector", self.sector.map(|s| s.as_str()))
            .opt("company_size", self.company_size.map(|s| s.as_str()))
            .opt("search", self.search.as_deref())
            .push("page", self.page)
            .push("page_size", self.page_size)
    }
}

/// The recruiter listing endpoint answers in one of three shapes depending on
/// the backend version. Each variant is one accepted schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecruiterListing {
    Keyed {
        recruiters: Vec<RecruiterProfile>,
        #[serde(default, alias = "total")]
        count: Option<u64>,
    },
    Paginated {
        results: Vec<RecruiterProfile>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
    },
    Bare(Vec<RecruiterProfile>),
}

/// Canonical listing shape used by every page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecruiterPage {
    pub items: Vec<RecruiterProfile>,
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl RecruiterListing {
    pub fn into_page(self) -> RecruiterPage {
        match self {
            RecruiterListing::Keyed { recruiters, count } => {
                let total = count.unwrap_or(recruiters.len() as u64);
                RecruiterPage {
                    items: recruiters,
                    total,
                    has_next: false,
                    has_previous: false,
                }
            }
            RecruiterListing::Paginated {
                results,
                count,
                next,
                previous,
            } => {
                let total = count.unwrap_or(results.len() as u64);
                RecruiterPage {
                    items: results,
                    total,
                    has_next: next.is_some(),
                    has_previous: previous.is_some(),
                }
            }
            RecruiterListing::Bare(items) => {
                let total = items.len() as u64;
                RecruiterPage {
                    items,
                    total,
                    has_next: false,
                    has_previous: false,
                }
            }
        }
    }
}

impl From<RecruiterListing> for RecruiterPage {
    fn from(listing: RecruiterListing) -> Self {
        listing.into_page()
    }
}

/// Body of `POST /api/auth/profiles/search/advanced/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdvancedSearch {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_status: Option<AccountStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<Sector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<i64>,
}

/// Editable subset for `PATCH /api/auth/profiles/public/{id}/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecruiterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECRUITER: &str = r#"{
        "id": 12,
        "user": {"id": 40, "username": "acme", "email": "hr@acme.test",
                 "first_name": "Awa", "last_name": "Diop", "phone": "+221 77 000 00 00"},
        "company_name": "Acme",
        "sector": "TECHNOLOGY",
        "company_size": "MEDIUM",
        "country": {"id": 1, "name": "Sénégal"},
        "account_status": "PENDING"
    }"#;

    fn recruiter_json() -> serde_json::Value {
        serde_json::from_str(RECRUITER).unwrap()
    }

    #[test]
    fn three_listing_shapes_normalize_to_the_same_page() {
        let keyed = serde_json::json!({ "recruiters": [recruiter_json()] });
        let paginated = serde_json::json!({ "count": 1, "results": [recruiter_json()] });
        let bare = serde_json::json!([recruiter_json()]);

        let pages: Vec<RecruiterPage> = [keyed, paginated, bare]
            .into_iter()
            .map(|value| {
                serde_json::from_value::<RecruiterListing>(value)
                    .unwrap()
                    .into_page()
            })
            .collect();

        assert_eq!(pages[0], pages[1]);
        assert_eq!(pages[1], pages[2]);
        assert_eq!(pages[0].total, 1);
        assert_eq!(pages[0].items[0].company_name, "Acme");
        assert_eq!(pages[0].items[0].contact_name(), "Awa Diop");
    }

    #[test]
    fn listing_with_unexpected_shape_is_rejected() {
        let value = serde_json::json!({ "data": [] });
        assert!(serde_json::from_value::<RecruiterListing>(value).is_err());
    }

    #[test]
    fn paginated_listing_keeps_server_total() {
        let value = serde_json::json!({
            "count": 57,
            "next": "http://api/?page=2",
            "results": [recruiter_json()]
        });
        let page = serde_json::from_value::<RecruiterListing>(value)
            .unwrap()
            .into_page();
        assert_eq!(page.total, 57);
        assert!(page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn unknown_enum_values_fall_back() {
        let mut value = recruiter_json();
        value["account_status"] = "SUSPENDED".into();
        value["sector"] = "SPACE".into();
        let profile: RecruiterProfile = serde_json::from_value(value).unwrap();
        assert_eq!(profile.account_status.label(), "Inconnu");
        assert_eq!(profile.sector, Sector::Unknown);
    }

    #[test]
    fn validation_action_serializes_lowercase() {
        let body = serde_json::to_value(ValidationRequest {
            action: ValidationAction::Approve,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "action": "approve" }));
        assert_eq!(
            ValidationAction::Reject.resulting_status(),
            AccountStatus::Rejected
        );
    }

    #[test]
    fn filters_skip_unset_fields() {
        let filters = RecruiterFilters {
            status: Some(AccountStatus::Approved),
            search: Some(String::new()),
            sector: Some(Sector::Finance),
            ..Default::default()
        };
        assert_eq!(
            filters.to_query().to_query_string(),
            "status=APPROVED&sector=FINANCE&page=1&page_size=20"
        );
    }

    #[test]
    fn sector_parse_rejects_unknown() {
        assert_eq!(Sector::parse("finance"), Some(Sector::Finance));
        assert_eq!(Sector::parse("space"), None);
    }
}
