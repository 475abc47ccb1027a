use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::models::superstars::SuperstarSummary;
use crate::repositories::superstars;

/// Existence check for conversation start: deactivated superstars are not
/// reachable for new chats and look absent to callers.
pub async fn fetch_one_active<C: Context>(
    ctx: &C,
    superstar_id: i64,
) -> ServiceResult<SuperstarSummary> {
    match superstars::fetch_one(ctx, superstar_id).await {
        Ok(superstar) if superstar.is_active => Ok(SuperstarSummary::from(superstar)),
        Ok(_) => Err(AppError::SuperstarsNotFound),
        Err(sqlx::Error::RowNotFound) => Err(AppError::SuperstarsNotFound),
        Err(e) => unexpected(e),
    }
}

/// Preview enrichment; a missing profile row is not an error here.
pub async fn fetch_summary<C: Context>(
    ctx: &C,
    superstar_id: i64,
) -> ServiceResult<Option<SuperstarSummary>> {
    match superstars::fetch_one(ctx, superstar_id).await {
        Ok(superstar) => Ok(Some(SuperstarSummary::from(superstar))),
        Err(sqlx::Error::RowNotFound) => Ok(None),
        Err(e) => unexpected(e),
    }
}
