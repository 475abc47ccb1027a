use crate::common::context::Context;
use crate::common::redis_json::Json;
use crate::entities::sessions::Session;
use redis::AsyncCommands;
use uuid::Uuid;

/// Written by the identity service; this service only resolves and prunes.
const SESSIONS_KEY: &str = "encore:chat:sessions";

pub async fn fetch_one<C: Context>(ctx: &C, session_id: Uuid) -> anyhow::Result<Option<Session>> {
    let mut redis = ctx.redis().await?;
    let session: Option<Json<Session>> = redis.hget(SESSIONS_KEY, session_id).await?;
    Ok(session.map(Json::into_inner))
}

pub async fn fetch_all<C: Context>(ctx: &C) -> anyhow::Result<impl Iterator<Item = Session>> {
    let mut redis = ctx.redis().await?;
    let sessions: Vec<Json<Session>> = redis.hvals(SESSIONS_KEY).await?;
    Ok(sessions.into_iter().map(Json::into_inner))
}

pub async fn delete<C: Context>(ctx: &C, session_id: Uuid) -> anyhow::Result<()> {
    let mut redis = ctx.redis().await?;
    let _: () = redis.hdel(SESSIONS_KEY, session_id).await?;
    Ok(())
}
