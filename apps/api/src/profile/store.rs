use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::AppError;
use crate::models::user::{NewUser, UserProfile};

/// Inserts a profile and returns its store-assigned id.
pub async fn create_user(pool: &SqlitePool, user: &NewUser) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO users (name, style_preference, body_type, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&user.name)
    .bind(&user.style_preference)
    .bind(&user.body_type)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    info!("Created user {id}");
    Ok(id)
}

/// Returns the profile with this id, if any.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<Option<UserProfile>, AppError> {
    Ok(sqlx::query_as::<_, UserProfile>(
        "SELECT id, name, style_preference, body_type, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?)
}
