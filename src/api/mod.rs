use crate::adapters::blob_storage::BlobStorage;
use crate::common::context::Context;
use crate::common::error::AppError;
use crate::common::init;
use crate::common::redis_pool::{PoolResult, RedisPool};
use crate::common::state::AppState;
use crate::models::sessions::Session;
use crate::settings::AppSettings;
use crate::usecases::{attachments, sessions};
use async_trait::async_trait;
use axum::Router;
use axum::extract::{DefaultBodyLimit, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::routing::{delete, get, post, put};
use sqlx::{MySql, Pool};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub mod conversations;
pub mod messages;

pub struct RequestContext {
    pub db: Pool<MySql>,
    pub redis: RedisPool,
    pub blobs: Arc<dyn BlobStorage>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route(
            "/conversations/start/{superstar_id}",
            post(conversations::start),
        )
        .route("/conversations", get(conversations::list))
        .route(
            "/conversations/{conversation_id}/messages",
            get(messages::list).post(messages::send),
        )
        .route(
            "/conversations/{conversation_id}/read",
            post(messages::mark_read),
        )
        .route(
            "/conversations/{conversation_id}/status",
            put(conversations::update_status),
        )
        .route("/messages/{message_id}", delete(messages::delete))
        .route("/unread-count", get(messages::unread_count))
        .layer(DefaultBodyLimit::max(
            attachments::MAX_ATTACHMENT_SIZE + 64 * 1024,
        ))
}

pub async fn index() -> &'static str {
    "Running encore-chat-service v0.1"
}

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let state = init::initialize_state(settings).await?;
    let app = router().with_state(state);
    let addr = SocketAddr::from((settings.app_host, settings.app_port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Serving on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            db: state.db.clone(),
            redis: state.redis.clone(),
            blobs: state.blobs.clone(),
        })
    }
}

#[async_trait]
impl Context for RequestContext {
    fn db(&self) -> &Pool<MySql> {
        &self.db
    }

    async fn redis(&self) -> PoolResult {
        self.redis.get().await
    }

    fn blobs(&self) -> &dyn BlobStorage {
        self.blobs.as_ref()
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;
        sessions::authenticate(state, token.trim()).await
    }
}
