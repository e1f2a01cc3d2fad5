use std::sync::Arc;

use sqlx::SqlitePool;

use crate::stylist::Stylist;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Pluggable AI adapter. Production: `GeminiStylist`.
    pub stylist: Arc<dyn Stylist>,
}
