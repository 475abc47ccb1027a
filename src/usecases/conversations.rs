use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::common::pagination::{PageInfo, PageRequest};
use crate::models::conversations::{Conversation, ConversationPreview, ConversationStatus};
use crate::models::sessions::Session;
use crate::repositories::conversations;
use crate::usecases::{messages, superstars};
use chrono::Utc;
use std::str::FromStr;

/// Find-or-create on the (user, superstar) pair. Repeated calls return the
/// same conversation; a concurrent create loses the race on the unique key
/// and picks up the winner's row.
pub async fn start_or_get<C: Context>(
    ctx: &C,
    session: &Session,
    superstar_id: i64,
) -> ServiceResult<Conversation> {
    if !session.is_user() {
        return Err(AppError::ConversationsForbidden);
    }
    superstars::fetch_one_active(ctx, superstar_id).await?;

    match conversations::fetch_one_by_pair(ctx, session.actor_id, superstar_id).await {
        Ok(Some(entity)) => return Conversation::try_from(entity),
        Ok(None) => {}
        Err(e) => return unexpected(e),
    }

    let status = ConversationStatus::Active.as_str();
    match conversations::create(ctx, session.actor_id, superstar_id, status).await {
        Ok(entity) => Conversation::try_from(entity),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            match conversations::fetch_one_by_pair(ctx, session.actor_id, superstar_id).await {
                Ok(Some(entity)) => Conversation::try_from(entity),
                Ok(None) => Err(AppError::Unexpected),
                Err(e) => unexpected(e),
            }
        }
        Err(e) => unexpected(e),
    }
}

/// Shared existence + ownership gate for every conversation-scoped
/// operation, evaluated the same way for both roles.
pub async fn fetch_one_for_participant<C: Context>(
    ctx: &C,
    session: &Session,
    conversation_id: i64,
) -> ServiceResult<Conversation> {
    let conversation = match conversations::fetch_one(ctx, conversation_id).await {
        Ok(entity) => Conversation::try_from(entity)?,
        Err(sqlx::Error::RowNotFound) => return Err(AppError::ConversationsNotFound),
        Err(e) => return unexpected(e),
    };
    if !conversation.is_participant(session) {
        return Err(AppError::ConversationsForbidden);
    }
    Ok(conversation)
}

pub async fn list<C: Context>(
    ctx: &C,
    session: &Session,
    status: Option<&str>,
    page: &PageRequest,
) -> ServiceResult<(Vec<ConversationPreview>, PageInfo)> {
    if !session.is_user() {
        return Err(AppError::ConversationsForbidden);
    }
    let status = status.map(ConversationStatus::from_str).transpose()?;
    let status = status.map(|status| status.as_str());

    let total = match conversations::count(ctx, session.actor_id, status).await {
        Ok(total) => total,
        Err(e) => return unexpected(e),
    };
    let entities = match conversations::fetch_page(
        ctx,
        session.actor_id,
        status,
        page.per_page(),
        page.offset(),
    )
    .await
    {
        Ok(entities) => entities,
        Err(e) => return unexpected(e),
    };

    let mut previews = Vec::with_capacity(entities.len());
    for entity in entities {
        let conversation = Conversation::try_from(entity)?;
        let superstar = superstars::fetch_summary(ctx, conversation.superstar_id).await?;
        let latest_message = messages::latest(ctx, conversation.id).await?;
        previews.push(ConversationPreview {
            conversation,
            superstar,
            latest_message,
        });
    }
    Ok((previews, PageInfo::new(page, total)))
}

/// Any status may transition to any other; only the target value itself is
/// validated. Entering `active` stamps `started_at` when missing, entering
/// `ended` stamps `ended_at`.
pub async fn update_status<C: Context>(
    ctx: &C,
    session: &Session,
    conversation_id: i64,
    new_status: &str,
) -> ServiceResult<Conversation> {
    let conversation = fetch_one_for_participant(ctx, session, conversation_id).await?;
    let new_status = ConversationStatus::from_str(new_status)?;

    let now = Utc::now();
    let started_at = match (new_status, conversation.started_at) {
        (ConversationStatus::Active, None) => Some(now),
        (_, existing) => existing,
    };
    let ended_at = match new_status {
        ConversationStatus::Ended => Some(now),
        _ => conversation.ended_at,
    };

    if let Err(e) = conversations::update_status(
        ctx,
        conversation_id,
        new_status.as_str(),
        started_at,
        ended_at,
    )
    .await
    {
        return unexpected(e);
    }
    match conversations::fetch_one(ctx, conversation_id).await {
        Ok(entity) => Conversation::try_from(entity),
        Err(e) => unexpected(e),
    }
}
