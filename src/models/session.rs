use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Reference, id_as_string};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub user: Option<Reference>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Active and not past its expiry.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.is_none_or(|expires| expires > now)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForceLogoutRequest {
    pub user_id: i64,
}

/// Session ids are UUIDs on recent backends and integers on older ones.
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn numeric_and_uuid_ids_become_strings() {
        let numeric: Session = serde_json::from_str(r#"{"id": 5, "is_active": true}"#).unwrap();
        assert_eq!(numeric.id, "5");

        let uuid: Session = serde_json::from_str(
            r#"{"id": "0b6c7c1e-2f4a-4d7e-9d56-1f1f5e0c9a11", "is_active": true}"#,
        )
        .unwrap();
        assert_eq!(uuid.id, "0b6c7c1e-2f4a-4d7e-9d56-1f1f5e0c9a11");
    }

    #[test]
    fn validity_checks_flag_and_expiry() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut session: Session = serde_json::from_str(
            r#"{"id": "s", "is_active": true, "expires_at": "2024-01-01T13:00:00Z"}"#,
        )
        .unwrap();
        assert!(session.is_valid_at(now));

        session.expires_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap());
        assert!(!session.is_valid_at(now));

        session.expires_at = None;
        session.is_active = false;
        assert!(!session.is_valid_at(now));
    }
}
