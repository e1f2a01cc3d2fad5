//! Axum route handlers for the saved-outfit collection.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::collection::store::{create_saved_outfit, list_saved_outfits};
use crate::errors::AppError;
use crate::models::outfit::SavedOutfitRow;
use crate::models::CreatedResponse;
use crate::state::AppState;
use crate::stylist::schema::OutfitRecommendation;

#[derive(Debug, Deserialize)]
pub struct SaveOutfitRequest {
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: i64,
    /// Serialized `OutfitRecommendation`, exactly as the UI received it.
    #[serde(rename = "outfitJson", alias = "outfit_json")]
    pub outfit_json: String,
    #[serde(default)]
    pub occasion: Option<String>,
}

/// Validates the payload of a save request and returns the canonical JSON to
/// store together with the resolved occasion.
///
/// The occasion falls back to the recommendation's own `occasion`.
pub fn prepare_saved_outfit(req: &SaveOutfitRequest) -> Result<(String, String), AppError> {
    let recommendation = OutfitRecommendation::parse(&req.outfit_json)
        .map_err(|e| AppError::Validation(format!("outfitJson is not a valid recommendation: {e}")))?;

    let occasion = req
        .occasion
        .as_deref()
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .or_else(|| {
            recommendation
                .occasion
                .as_deref()
                .map(str::trim)
                .filter(|o| !o.is_empty())
        })
        .ok_or_else(|| AppError::Validation("occasion cannot be empty".to_string()))?
        .to_string();

    let canonical = serde_json::to_string(&recommendation)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize outfit: {e}")))?;

    Ok((canonical, occasion))
}

/// GET /api/outfits/:userId
pub async fn handle_list_outfits(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<SavedOutfitRow>>, AppError> {
    let outfits = list_saved_outfits(&state.db, user_id).await?;
    Ok(Json(outfits))
}

/// POST /api/outfits
pub async fn handle_save_outfit(
    State(state): State<AppState>,
    Json(req): Json<SaveOutfitRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let (outfit_json, occasion) = prepare_saved_outfit(&req)?;
    let id = create_saved_outfit(&state.db, req.user_id, &outfit_json, &occasion).await?;
    Ok(Json(CreatedResponse { id }))
}
