//! Shared identity and audit fields for user-owned records.

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and audit fields embedded by composition in every record that
/// belongs to a user (accounts and flows).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OwnedResource {
    pub id: String,
    pub owner_id: String,
    pub created_on: NaiveDateTime,
    pub updated_on: NaiveDateTime,
}

impl OwnedResource {
    /// Builds the identity for a freshly created record. A v4 UUID is
    /// assigned when the caller does not supply an id.
    pub fn new(id: Option<String>, owner_id: impl Into<String>) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            owner_id: owner_id.into(),
            created_on: now,
            updated_on: now,
        }
    }

    /// Bumps the update timestamp.
    pub fn touch(&mut self) {
        self.updated_on = Utc::now().naive_utc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assigns_uuid_when_missing() {
        let resource = OwnedResource::new(None, "user-1");
        assert!(!resource.id.is_empty());
        assert!(Uuid::parse_str(&resource.id).is_ok());
        assert_eq!(resource.owner_id, "user-1");
    }

    #[test]
    fn test_new_keeps_supplied_id() {
        let resource = OwnedResource::new(Some("acc-1".to_string()), "user-1");
        assert_eq!(resource.id, "acc-1");
    }

    #[test]
    fn test_touch_advances_updated_on() {
        let mut resource = OwnedResource::new(None, "user-1");
        let created = resource.updated_on;
        resource.touch();
        assert!(resource.updated_on >= created);
        assert_eq!(resource.created_on, created);
    }
}
