pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::collection::handlers as collection;
use crate::profile::handlers as profile;
use crate::state::AppState;
use crate::stylist::handlers as stylist;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profiles
        .route("/api/user", post(profile::handle_create_user))
        .route("/api/user/:id", get(profile::handle_get_user))
        // Collection
        .route("/api/outfits", post(collection::handle_save_outfit))
        .route("/api/outfits/:user_id", get(collection::handle_list_outfits))
        // Stylist
        .route("/api/recommendations", post(stylist::handle_recommend))
        .route(
            "/api/recommendations/upload",
            post(stylist::handle_recommend_upload),
        )
        .route(
            "/api/recommendations/image",
            post(stylist::handle_render_image),
        )
        .route("/api/trends", get(stylist::handle_trends))
        .with_state(state)
}
