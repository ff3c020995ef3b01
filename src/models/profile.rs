use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

/// Application identity record in the `profiles` table, keyed by the auth
/// user id. Created once at signup and treated as read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_uses_lowercase_wire_format() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let role: UserRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, UserRole::User);
    }

    #[test]
    fn profile_parses_postgrest_row() {
        let row = serde_json::json!({
            "id": "8f2b9c1e-6a0d-4e3f-9b2a-1c5d7e9f0a3b",
            "username": "mika",
            "email": null,
            "role": "user",
            "avatar_url": null,
            "bio": "hello",
            "created_at": "2026-07-01T10:00:00+00:00",
            "updated_at": "2026-07-01T10:00:00+00:00"
        });

        let profile: Profile = serde_json::from_value(row).unwrap();
        assert_eq!(profile.username, "mika");
        assert_eq!(profile.role, UserRole::User);
        assert!(profile.email.is_none());
        assert_eq!(profile.bio.as_deref(), Some("hello"));
    }
}
