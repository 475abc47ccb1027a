use crate::api::RequestContext;
use crate::common::error::ServiceResponse;
use crate::common::pagination::PageRequest;
use crate::models::messages::{
    DeleteMessageResponse, MarkReadResponse, MessagesListResponse, SendMessageArgs,
    SendMessageResponse, UnreadCountResponse,
};
use crate::models::sessions::Session;
use crate::usecases::messages;
use axum::Json;
use axum::extract::{Path, Query};

pub async fn list(
    ctx: RequestContext,
    session: Session,
    Path(conversation_id): Path<i64>,
    Query(page): Query<PageRequest>,
) -> ServiceResponse<MessagesListResponse> {
    let (messages, pagination) = messages::list(&ctx, &session, conversation_id, &page).await?;
    Ok(Json(MessagesListResponse {
        messages,
        pagination,
    }))
}

pub async fn send(
    ctx: RequestContext,
    session: Session,
    Path(conversation_id): Path<i64>,
    args: SendMessageArgs,
) -> ServiceResponse<SendMessageResponse> {
    let message = messages::send(&ctx, &session, conversation_id, args).await?;
    Ok(Json(SendMessageResponse { message }))
}

pub async fn mark_read(
    ctx: RequestContext,
    session: Session,
    Path(conversation_id): Path<i64>,
) -> ServiceResponse<MarkReadResponse> {
    let messages_marked =
        messages::mark_conversation_read(&ctx, &session, conversation_id).await?;
    Ok(Json(MarkReadResponse {
        message: "Messages marked as read",
        messages_marked,
    }))
}

pub async fn unread_count(
    ctx: RequestContext,
    session: Session,
) -> ServiceResponse<UnreadCountResponse> {
    let unread_count = messages::unread_count(&ctx, &session).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

pub async fn delete(
    ctx: RequestContext,
    session: Session,
    Path(message_id): Path<i64>,
) -> ServiceResponse<DeleteMessageResponse> {
    messages::delete(&ctx, &session, message_id).await?;
    Ok(Json(DeleteMessageResponse {
        message: "Message deleted",
    }))
}
