//! Axum route handlers for user profiles.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::user::UserProfile;
use crate::models::CreatedResponse;
use crate::profile::onboarding::Onboarding;
use crate::profile::store::{create_user, get_user};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub style_preference: String,
    #[serde(default)]
    pub body_type: String,
}

/// GET /api/user/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserProfile>, AppError> {
    let user = get_user(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;
    Ok(Json(user))
}

/// POST /api/user
///
/// Runs the submitted fields through onboarding, so only a completed
/// sequence is ever stored.
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let mut onboarding = Onboarding::new();
    for input in [&req.name, &req.style_preference, &req.body_type] {
        onboarding
            .advance(input)
            .map_err(|e| AppError::Validation(e.to_string()))?;
    }
    let new_user = onboarding
        .into_new_user()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let id = create_user(&state.db, &new_user).await?;
    Ok(Json(CreatedResponse { id }))
}
