use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored profile. Created once during onboarding and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub style_preference: String,
    pub body_type: String,
    pub created_at: DateTime<Utc>,
}

/// Profile fields collected by onboarding, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub style_preference: String,
    pub body_type: String,
}
