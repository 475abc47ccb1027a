use crate::entities::superstars::Superstar as SuperstarEntity;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SuperstarSummary {
    pub id: i64,
    pub stage_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

impl From<SuperstarEntity> for SuperstarSummary {
    fn from(value: SuperstarEntity) -> Self {
        Self {
            id: value.id,
            stage_name: value.stage_name,
            avatar_url: value.avatar_url,
            bio: value.bio,
        }
    }
}
