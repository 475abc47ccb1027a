use crate::common::context::Context;
use crate::entities::conversations::Conversation;
use chrono::{DateTime, Utc};

const TABLE_NAME: &str = "conversations";
const READ_FIELDS: &str =
    "id, user_id, superstar_id, status, started_at, ended_at, created_at, updated_at";

pub async fn fetch_one<C: Context>(ctx: &C, conversation_id: i64) -> sqlx::Result<Conversation> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE id = ?"
    );
    sqlx::query_as(QUERY)
        .bind(conversation_id)
        .fetch_one(ctx.db())
        .await
}

pub async fn fetch_one_by_pair<C: Context>(
    ctx: &C,
    user_id: i64,
    superstar_id: i64,
) -> sqlx::Result<Option<Conversation>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE user_id = ? AND superstar_id = ?"
    );
    sqlx::query_as(QUERY)
        .bind(user_id)
        .bind(superstar_id)
        .fetch_optional(ctx.db())
        .await
}

pub async fn create<C: Context>(
    ctx: &C,
    user_id: i64,
    superstar_id: i64,
    status: &str,
) -> sqlx::Result<Conversation> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO ",
        TABLE_NAME,
        " (user_id, superstar_id, status, started_at) ",
        "VALUES (?, ?, ?, CURRENT_TIMESTAMP)"
    );
    let result = sqlx::query(QUERY)
        .bind(user_id)
        .bind(superstar_id)
        .bind(status)
        .execute(ctx.db())
        .await?;
    fetch_one(ctx, result.last_insert_id() as i64).await
}

pub async fn fetch_page<C: Context>(
    ctx: &C,
    user_id: i64,
    status: Option<&str>,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Conversation>> {
    match status {
        Some(status) => {
            const QUERY: &str = const_str::concat!(
                "SELECT ",
                READ_FIELDS,
                " FROM ",
                TABLE_NAME,
                " WHERE user_id = ? AND status = ?",
                " ORDER BY updated_at DESC, id DESC LIMIT ?,?"
            );
            sqlx::query_as(QUERY)
                .bind(user_id)
                .bind(status)
                .bind(offset)
                .bind(limit)
                .fetch_all(ctx.db())
                .await
        }
        None => {
            const QUERY: &str = const_str::concat!(
                "SELECT ",
                READ_FIELDS,
                " FROM ",
                TABLE_NAME,
                " WHERE user_id = ?",
                " ORDER BY updated_at DESC, id DESC LIMIT ?,?"
            );
            sqlx::query_as(QUERY)
                .bind(user_id)
                .bind(offset)
                .bind(limit)
                .fetch_all(ctx.db())
                .await
        }
    }
}

pub async fn count<C: Context>(
    ctx: &C,
    user_id: i64,
    status: Option<&str>,
) -> sqlx::Result<i64> {
    match status {
        Some(status) => {
            const QUERY: &str = const_str::concat!(
                "SELECT COUNT(*) FROM ",
                TABLE_NAME,
                " WHERE user_id = ? AND status = ?"
            );
            sqlx::query_scalar(QUERY)
                .bind(user_id)
                .bind(status)
                .fetch_one(ctx.db())
                .await
        }
        None => {
            const QUERY: &str =
                const_str::concat!("SELECT COUNT(*) FROM ", TABLE_NAME, " WHERE user_id = ?");
            sqlx::query_scalar(QUERY)
                .bind(user_id)
                .fetch_one(ctx.db())
                .await
        }
    }
}

pub async fn update_status<C: Context>(
    ctx: &C,
    conversation_id: i64,
    status: &str,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
) -> sqlx::Result<()> {
    const QUERY: &str = const_str::concat!(
        "UPDATE ",
        TABLE_NAME,
        " SET status = ?, started_at = ?, ended_at = ?, updated_at = CURRENT_TIMESTAMP",
        " WHERE id = ?"
    );
    sqlx::query(QUERY)
        .bind(status)
        .bind(started_at)
        .bind(ended_at)
        .bind(conversation_id)
        .execute(ctx.db())
        .await?;
    Ok(())
}

/// Bumps `updated_at` so the conversation list surfaces recent chat activity.
pub async fn touch<C: Context>(ctx: &C, conversation_id: i64) -> sqlx::Result<()> {
    const QUERY: &str = const_str::concat!(
        "UPDATE ",
        TABLE_NAME,
        " SET updated_at = CURRENT_TIMESTAMP WHERE id = ?"
    );
    sqlx::query(QUERY)
        .bind(conversation_id)
        .execute(ctx.db())
        .await?;
    Ok(())
}
