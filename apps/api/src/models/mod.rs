pub mod outfit;
pub mod user;

use serde::Serialize;

/// `{ "id": ... }` body returned by every create route.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}
