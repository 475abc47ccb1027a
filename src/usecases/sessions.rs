use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::models::sessions::Session;
use crate::repositories::sessions;
use crate::settings::AppSettings;
use std::str::FromStr;
use uuid::Uuid;

/// Resolves a bearer token to the identity the token was issued for.
/// Unknown, malformed and timed-out tokens are indistinguishable to the
/// caller; all three are a plain 401.
pub async fn authenticate<C: Context>(ctx: &C, bearer_token: &str) -> ServiceResult<Session> {
    let session_id = Uuid::from_str(bearer_token).map_err(|_| AppError::Unauthorized)?;
    let entity = match sessions::fetch_one(ctx, session_id).await {
        Ok(Some(entity)) => entity,
        Ok(None) => return Err(AppError::Unauthorized),
        Err(e) => return unexpected(e),
    };
    let session = Session::try_from(entity)?;
    if session.is_expired(AppSettings::get().session_timeout) {
        return Err(AppError::Unauthorized);
    }
    Ok(session)
}

pub async fn fetch_all<C: Context>(ctx: &C) -> ServiceResult<Vec<Session>> {
    match sessions::fetch_all(ctx).await {
        Ok(sessions) => sessions.map(Session::try_from).collect(),
        Err(e) => unexpected(e),
    }
}

pub async fn delete<C: Context>(ctx: &C, session: &Session) -> ServiceResult<()> {
    match sessions::delete(ctx, session.session_id).await {
        Ok(()) => Ok(()),
        Err(e) => unexpected(e),
    }
}
