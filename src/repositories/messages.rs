use crate::common::context::Context;
use crate::entities::messages::Message;
use crate::models::messages::{CreateMessageArgs, SenderRole};

const TABLE_NAME: &str = "messages";
const READ_FIELDS: &str = r#"
id, conversation_id, sender_type, sender_id, message_type,
body, file_path, file_name, file_size, is_read, read_at, created_at"#;

pub async fn fetch_one<C: Context>(ctx: &C, message_id: i64) -> sqlx::Result<Message> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE id = ?"
    );
    sqlx::query_as(QUERY)
        .bind(message_id)
        .fetch_one(ctx.db())
        .await
}

pub async fn create<C: Context>(ctx: &C, args: &CreateMessageArgs) -> sqlx::Result<Message> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO ",
        TABLE_NAME,
        " (conversation_id, sender_type, sender_id, message_type, body,",
        " file_path, file_name, file_size) ",
        "VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
    );
    let attachment = args.attachment.as_ref();
    let result = sqlx::query(QUERY)
        .bind(args.conversation_id)
        .bind(args.sender_type.as_str())
        .bind(args.sender_id)
        .bind(args.message_type.as_str())
        .bind(args.body.as_deref())
        .bind(attachment.map(|blob| blob.path.as_str()))
        .bind(attachment.map(|blob| blob.original_name.as_str()))
        .bind(attachment.map(|blob| blob.size_bytes))
        .execute(ctx.db())
        .await?;
    fetch_one(ctx, result.last_insert_id() as i64).await
}

/// Newest-first page: page 1 holds the most recent messages so pagination
/// cursors walk backward through time.
pub async fn fetch_page<C: Context>(
    ctx: &C,
    conversation_id: i64,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Message>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE conversation_id = ?",
        " ORDER BY created_at DESC, id DESC LIMIT ?,?"
    );
    sqlx::query_as(QUERY)
        .bind(conversation_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(ctx.db())
        .await
}

pub async fn count_for_conversation<C: Context>(
    ctx: &C,
    conversation_id: i64,
) -> sqlx::Result<i64> {
    const QUERY: &str = const_str::concat!(
        "SELECT COUNT(*) FROM ",
        TABLE_NAME,
        " WHERE conversation_id = ?"
    );
    sqlx::query_scalar(QUERY)
        .bind(conversation_id)
        .fetch_one(ctx.db())
        .await
}

pub async fn fetch_latest<C: Context>(
    ctx: &C,
    conversation_id: i64,
) -> sqlx::Result<Option<Message>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE conversation_id = ?",
        " ORDER BY created_at DESC, id DESC LIMIT 1"
    );
    sqlx::query_as(QUERY)
        .bind(conversation_id)
        .fetch_optional(ctx.db())
        .await
}

/// Marks the given sender's unread messages in a conversation as read and
/// returns how many rows flipped. Already-read rows are left untouched, so
/// `read_at` is stamped exactly once.
pub async fn mark_read<C: Context>(
    ctx: &C,
    conversation_id: i64,
    sender_type: &str,
) -> sqlx::Result<u64> {
    const QUERY: &str = const_str::concat!(
        "UPDATE ",
        TABLE_NAME,
        " SET is_read = TRUE, read_at = CURRENT_TIMESTAMP",
        " WHERE conversation_id = ? AND sender_type = ? AND is_read IS FALSE"
    );
    let result = sqlx::query(QUERY)
        .bind(conversation_id)
        .bind(sender_type)
        .execute(ctx.db())
        .await?;
    Ok(result.rows_affected())
}

/// Counterpart-authored unread messages across every conversation the caller
/// participates in.
pub async fn unread_count<C: Context>(
    ctx: &C,
    caller: SenderRole,
    actor_id: i64,
) -> sqlx::Result<i64> {
    let query = match caller {
        SenderRole::User => const_str::concat!(
            "SELECT COUNT(*) FROM ",
            TABLE_NAME,
            " m INNER JOIN conversations c ON m.conversation_id = c.id",
            " WHERE c.user_id = ? AND m.sender_type = ? AND m.is_read IS FALSE"
        ),
        SenderRole::Superstar => const_str::concat!(
            "SELECT COUNT(*) FROM ",
            TABLE_NAME,
            " m INNER JOIN conversations c ON m.conversation_id = c.id",
            " WHERE c.superstar_id = ? AND m.sender_type = ? AND m.is_read IS FALSE"
        ),
    };
    sqlx::query_scalar(query)
        .bind(actor_id)
        .bind(caller.counterpart().as_str())
        .fetch_one(ctx.db())
        .await
}

pub async fn delete<C: Context>(ctx: &C, message_id: i64) -> sqlx::Result<()> {
    const QUERY: &str = const_str::concat!("DELETE FROM ", TABLE_NAME, " WHERE id = ?");
    sqlx::query(QUERY)
        .bind(message_id)
        .execute(ctx.db())
        .await?;
    Ok(())
}
