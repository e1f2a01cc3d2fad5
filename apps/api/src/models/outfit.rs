use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted recommendation. `outfit_json` holds the canonical serialized
/// `OutfitRecommendation`; rows are never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedOutfitRow {
    pub id: i64,
    pub user_id: i64,
    pub outfit_json: String,
    pub occasion: String,
    pub created_at: DateTime<Utc>,
}
