use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session record as written to redis by the identity service.
/// The session id doubles as the bearer token.
#[derive(Debug, Deserialize, Serialize)]
pub struct Session {
    pub session_id: Uuid,
    pub role: String,
    pub actor_id: i64,
    pub display_name: String,
    pub updated_at: DateTime<Utc>,
}
