use crate::common::context::Context;
use crate::common::error::ServiceResult;
use crate::settings::AppSettings;
use crate::usecases::sessions;
use tracing::{error, info};

pub async fn cleanup_sessions<C: Context>(ctx: &C) -> ServiceResult<()> {
    let timeout = AppSettings::get().session_timeout;
    let active_sessions = sessions::fetch_all(ctx).await?;
    let expired = active_sessions
        .into_iter()
        .filter(|session| session.is_expired(timeout));
    for session in expired {
        info!(
            session_id = session.session_id.to_string(),
            actor_id = session.actor_id,
            "Session expired..."
        );
        if let Err(e) = sessions::delete(ctx, &session).await {
            error!(
                session_id = session.session_id.to_string(),
                actor_id = session.actor_id,
                "Failed to remove expired session: {e:?}",
            );
        }
    }
    Ok(())
}
