//! Axum route handlers for the Stylist API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::UserProfile;
use crate::profile::store::get_user;
use crate::state::AppState;
use crate::stylist::request::{ImageUpload, StyleRequest};
use crate::stylist::{current_trends, generate_look, Look};

#[derive(Debug, Deserialize)]
pub struct RenderImageRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct RenderImageResponse {
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub trends: Vec<String>,
}

async fn load_profile(state: &AppState, user_id: Option<i64>) -> Result<Option<UserProfile>, AppError> {
    let Some(id) = user_id else {
        return Ok(None);
    };
    let user = get_user(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;
    Ok(Some(user))
}

async fn recommend(state: &AppState, request: StyleRequest) -> Result<Json<Look>, AppError> {
    let profile = load_profile(state, request.user_id).await?;
    let include_image = request.include_image;
    let context = request.into_context(profile.as_ref())?;
    let look = generate_look(state.stylist.as_ref(), &context, include_image).await?;
    Ok(Json(look))
}

/// POST /api/recommendations
///
/// Validates before any model call: a request with neither text nor an image
/// is rejected with 400 and never reaches the model.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<StyleRequest>,
) -> Result<Json<Look>, AppError> {
    recommend(&state, request).await
}

/// POST /api/recommendations/upload
///
/// Multipart variant for direct photo uploads. Text fields share the JSON
/// names; the photo goes in an `image` file field.
pub async fn handle_recommend_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Look>, AppError> {
    let request = read_style_form(multipart).await?;
    recommend(&state, request).await
}

async fn read_style_form(mut multipart: Multipart) -> Result<StyleRequest, AppError> {
    let bad_form = |e: axum::extract::multipart::MultipartError| {
        AppError::Validation(format!("Malformed upload: {e}"))
    };

    let mut request = StyleRequest::default();
    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let mime_type = field.content_type().map(String::from);
            let bytes = field.bytes().await.map_err(bad_form)?;
            if !bytes.is_empty() {
                request.image = Some(ImageUpload::from_bytes(mime_type, &bytes));
            }
            continue;
        }

        let value = field.text().await.map_err(bad_form)?;
        match name.as_str() {
            "style_preference" => request.style_preference = Some(value),
            "occasion" => request.occasion = Some(value),
            "weather" => request.weather = Some(value),
            "gender" => request.gender = Some(value),
            "notes" => request.notes = Some(value),
            "user_id" => {
                let id = value.trim().parse::<i64>().map_err(|_| {
                    AppError::Validation(format!("user_id '{value}' is not a valid id"))
                })?;
                request.user_id = Some(id);
            }
            "include_image" => {
                request.include_image = matches!(value.trim(), "true" | "1" | "on");
            }
            _ => {}
        }
    }
    Ok(request)
}

/// POST /api/recommendations/image
///
/// `image` is null when the model produced no picture.
pub async fn handle_render_image(
    State(state): State<AppState>,
    Json(request): Json<RenderImageRequest>,
) -> Result<Json<RenderImageResponse>, AppError> {
    if request.description.trim().is_empty() {
        return Err(AppError::Validation(
            "description cannot be empty".to_string(),
        ));
    }

    let image = state.stylist.render_image(&request.description).await?;

    Ok(Json(RenderImageResponse {
        image: image.map(|i| i.to_data_url()),
    }))
}

/// GET /api/trends
///
/// Always 200. Upstream failure yields an empty list.
pub async fn handle_trends(State(state): State<AppState>) -> Json<TrendsResponse> {
    Json(TrendsResponse {
        trends: current_trends(state.stylist.as_ref()).await,
    })
}
