use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::AppError;
use crate::models::outfit::SavedOutfitRow;

/// Saves a serialized recommendation for a user and returns the new row id.
///
/// The user check and the insert share one transaction. The foreign key on
/// `saved_outfits.user_id` backs the check up; either way an unknown user is
/// `NotFound` and nothing is written.
pub async fn create_saved_outfit(
    pool: &SqlitePool,
    user_id: i64,
    outfit_json: &str,
    occasion: &str,
) -> Result<i64, AppError> {
    let not_found = || AppError::NotFound(format!("User {user_id} not found"));

    let mut tx = pool.begin().await?;

    let user: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
    if user.is_none() {
        return Err(not_found());
    }

    let result = sqlx::query(
        "INSERT INTO saved_outfits (user_id, outfit_json, occasion, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(outfit_json)
    .bind(occasion)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => not_found(),
        other => AppError::Database(other),
    })?;

    tx.commit().await?;

    let id = result.last_insert_rowid();
    info!("Saved outfit {id} for user {user_id}");
    Ok(id)
}

/// All saved outfits for a user, oldest first.
pub async fn list_saved_outfits(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<SavedOutfitRow>, AppError> {
    Ok(sqlx::query_as::<_, SavedOutfitRow>(
        r#"
        SELECT id, user_id, outfit_json, occasion, created_at
        FROM saved_outfits
        WHERE user_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::models::user::NewUser;
    use crate::profile::store::create_user;

    async fn seeded_user(pool: &SqlitePool) -> i64 {
        create_user(
            pool,
            &NewUser {
                name: "Kai".into(),
                style_preference: "Streetwear".into(),
                body_type: "Average".into(),
            },
        )
        .await
        .unwrap()
    }

    async fn count_rows(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM saved_outfits")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_user_rejected_without_orphan() {
        let pool = memory_pool().await;
        let err = create_saved_outfit(&pool, 999, "{}", "Gala")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(count_rows(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_foreign_key_enforced_at_schema_level() {
        let pool = memory_pool().await;
        let result = sqlx::query(
            "INSERT INTO saved_outfits (user_id, outfit_json, occasion) VALUES (?, ?, ?)",
        )
        .bind(12345_i64)
        .bind("{}")
        .bind("Gala")
        .execute(&pool)
        .await;
        match result {
            Err(sqlx::Error::Database(db)) => assert!(db.is_foreign_key_violation()),
            other => panic!("expected foreign key violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_returns_every_save_in_creation_order() {
        let pool = memory_pool().await;
        let user_id = seeded_user(&pool).await;
        let other_user = seeded_user(&pool).await;

        let mut ids = Vec::new();
        for occasion in ["Brunch", "Gallery Opening", "Beach Wedding"] {
            ids.push(
                create_saved_outfit(&pool, user_id, "{\"title\":\"t\"}", occasion)
                    .await
                    .unwrap(),
            );
        }
        create_saved_outfit(&pool, other_user, "{}", "Hike")
            .await
            .unwrap();

        let saved = list_saved_outfits(&pool, user_id).await.unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved.iter().map(|s| s.id).collect::<Vec<_>>(), ids);
        assert_eq!(saved[1].occasion, "Gallery Opening");
        assert!(saved.iter().all(|s| s.user_id == user_id));
    }

    #[tokio::test]
    async fn test_list_for_unknown_user_is_empty() {
        let pool = memory_pool().await;
        assert!(list_saved_outfits(&pool, 5).await.unwrap().is_empty());
    }
}
