use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct Superstar {
    pub id: i64,
    pub stage_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub is_active: bool,
}
