use crate::api::RequestContext;
use crate::common::error::ServiceResponse;
use crate::models::conversations::{
    ConversationResponse, ConversationsListResponse, ListConversationsArgs, UpdateStatusArgs,
    UpdateStatusResponse,
};
use crate::models::sessions::Session;
use crate::usecases::conversations;
use axum::Json;
use axum::extract::{Path, Query};

pub async fn start(
    ctx: RequestContext,
    session: Session,
    Path(superstar_id): Path<i64>,
) -> ServiceResponse<ConversationResponse> {
    let conversation = conversations::start_or_get(&ctx, &session, superstar_id).await?;
    Ok(Json(ConversationResponse { conversation }))
}

pub async fn list(
    ctx: RequestContext,
    session: Session,
    Query(args): Query<ListConversationsArgs>,
) -> ServiceResponse<ConversationsListResponse> {
    let page = args.page_request();
    let (conversations, pagination) =
        conversations::list(&ctx, &session, args.status.as_deref(), &page).await?;
    Ok(Json(ConversationsListResponse {
        conversations,
        pagination,
    }))
}

pub async fn update_status(
    ctx: RequestContext,
    session: Session,
    Path(conversation_id): Path<i64>,
    args: UpdateStatusArgs,
) -> ServiceResponse<UpdateStatusResponse> {
    let conversation =
        conversations::update_status(&ctx, &session, conversation_id, &args.status).await?;
    Ok(Json(UpdateStatusResponse {
        message: "Conversation status updated",
        conversation,
    }))
}
