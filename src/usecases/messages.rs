use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::common::pagination::{PageInfo, PageRequest};
use crate::models::messages::{CreateMessageArgs, Message, MessageType, SendMessageArgs};
use crate::models::sessions::Session;
use crate::repositories::{conversations as conversations_repo, messages};
use crate::usecases::{attachments, conversations};
use std::str::FromStr;
use tracing::warn;

pub const MAX_BODY_LENGTH: usize = 2000;

fn normalize_body(body: Option<String>) -> Option<String> {
    body.map(|body| body.trim().to_owned())
        .filter(|body| !body.is_empty())
}

/// A message needs something to say: text messages need a body, any other
/// type needs a body or an attached file.
fn ensure_has_content(
    message_type: MessageType,
    body: Option<&str>,
    has_attachment: bool,
) -> ServiceResult<()> {
    match (message_type, body, has_attachment) {
        (MessageType::Text, None, _) => Err(AppError::MessagesMissingContent),
        (_, None, false) => Err(AppError::MessagesMissingContent),
        _ => Ok(()),
    }
}

pub async fn send<C: Context>(
    ctx: &C,
    session: &Session,
    conversation_id: i64,
    args: SendMessageArgs,
) -> ServiceResult<Message> {
    conversations::fetch_one_for_participant(ctx, session, conversation_id).await?;

    let message_type = MessageType::from_str(&args.message_type)?;
    let body = normalize_body(args.body);
    if let Some(body) = &body {
        if body.chars().count() > MAX_BODY_LENGTH {
            return Err(AppError::MessagesBodyTooLong);
        }
    }
    ensure_has_content(message_type, body.as_deref(), args.file.is_some())?;

    // Blob first: the row is only written once the bytes are durable, and an
    // insert failure sweeps the orphaned blob back out.
    let attachment = match &args.file {
        Some(file) => Some(attachments::store(ctx, message_type, file).await?),
        None => None,
    };

    let create_args = CreateMessageArgs {
        conversation_id,
        sender_type: session.role,
        sender_id: session.actor_id,
        message_type,
        body,
        attachment,
    };
    let entity = match messages::create(ctx, &create_args).await {
        Ok(entity) => entity,
        Err(e) => {
            if let Some(blob) = &create_args.attachment {
                if let Err(delete_err) = ctx.blobs().delete(&blob.path).await {
                    warn!("Failed to clean up attachment {}: {delete_err:?}", blob.path);
                }
            }
            return unexpected(e);
        }
    };
    if let Err(e) = conversations_repo::touch(ctx, conversation_id).await {
        warn!("Failed to bump conversation {conversation_id}: {e:?}");
    }
    Message::try_from(entity)
}

/// Pages walk backward through time (page 1 = most recent) but each page is
/// returned oldest-first so a chat view can append pages in reading order.
/// Listing never flips read state; that only happens through the explicit
/// mark-read call.
pub async fn list<C: Context>(
    ctx: &C,
    session: &Session,
    conversation_id: i64,
    page: &PageRequest,
) -> ServiceResult<(Vec<Message>, PageInfo)> {
    conversations::fetch_one_for_participant(ctx, session, conversation_id).await?;

    let total = match messages::count_for_conversation(ctx, conversation_id).await {
        Ok(total) => total,
        Err(e) => return unexpected(e),
    };
    let entities =
        match messages::fetch_page(ctx, conversation_id, page.per_page(), page.offset()).await {
            Ok(entities) => entities,
            Err(e) => return unexpected(e),
        };
    let mut messages = entities
        .into_iter()
        .map(Message::try_from)
        .collect::<ServiceResult<Vec<_>>>()?;
    messages.reverse();
    Ok((messages, PageInfo::new(page, total)))
}

pub async fn latest<C: Context>(ctx: &C, conversation_id: i64) -> ServiceResult<Option<Message>> {
    match messages::fetch_latest(ctx, conversation_id).await {
        Ok(Some(entity)) => Ok(Some(Message::try_from(entity)?)),
        Ok(None) => Ok(None),
        Err(e) => unexpected(e),
    }
}

/// Marks the counterpart's unread messages read. The caller's own sent
/// messages stay unread until the other side reads them.
pub async fn mark_conversation_read<C: Context>(
    ctx: &C,
    session: &Session,
    conversation_id: i64,
) -> ServiceResult<u64> {
    conversations::fetch_one_for_participant(ctx, session, conversation_id).await?;
    match messages::mark_read(ctx, conversation_id, session.role.counterpart().as_str()).await {
        Ok(marked) => Ok(marked),
        Err(e) => unexpected(e),
    }
}

pub async fn unread_count<C: Context>(ctx: &C, session: &Session) -> ServiceResult<i64> {
    match messages::unread_count(ctx, session.role, session.actor_id).await {
        Ok(count) => Ok(count),
        Err(e) => unexpected(e),
    }
}

/// Senders may delete their own messages only. The backing blob goes first:
/// an already-absent blob is tolerated, a hard storage failure keeps the row.
pub async fn delete<C: Context>(
    ctx: &C,
    session: &Session,
    message_id: i64,
) -> ServiceResult<()> {
    let message = match messages::fetch_one(ctx, message_id).await {
        Ok(entity) => Message::try_from(entity)?,
        Err(sqlx::Error::RowNotFound) => return Err(AppError::MessagesNotFound),
        Err(e) => return unexpected(e),
    };
    if message.sender_type != session.role || message.sender_id != session.actor_id {
        return Err(AppError::MessagesForbidden);
    }
    if let Some(attachment) = &message.attachment {
        attachments::discard(ctx, &attachment.file_path).await?;
    }
    match messages::delete(ctx, message_id).await {
        Ok(()) => Ok(()),
        Err(e) => unexpected(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_bodies_count_as_empty() {
        assert_eq!(normalize_body(Some("  \n ".to_owned())), None);
        assert_eq!(normalize_body(Some(" hi ".to_owned())), Some("hi".to_owned()));
        assert_eq!(normalize_body(None), None);
    }

    #[test]
    fn text_messages_require_a_body_even_with_a_file() {
        let error = ensure_has_content(MessageType::Text, None, true).unwrap_err();
        assert_eq!(error.code(), AppError::MessagesMissingContent.code());
        assert!(ensure_has_content(MessageType::Text, Some("hi"), false).is_ok());
    }

    #[test]
    fn media_messages_need_a_body_or_a_file() {
        let error = ensure_has_content(MessageType::Image, None, false).unwrap_err();
        assert_eq!(error.code(), AppError::MessagesMissingContent.code());
        assert!(ensure_has_content(MessageType::Image, None, true).is_ok());
        assert!(ensure_has_content(MessageType::File, Some("see attached"), false).is_ok());
    }
}
