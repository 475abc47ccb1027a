use crate::common::error::AppError;
use crate::entities::sessions::Session as SessionEntity;
use crate::models::messages::SenderRole;
use chrono::{DateTime, TimeDelta, Utc};
use std::ops::Add;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: Uuid,
    pub role: SenderRole,
    pub actor_id: i64,
    pub display_name: String,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, timeout: Duration) -> bool {
        let timeout = TimeDelta::seconds(timeout.as_secs() as i64);
        self.updated_at.add(timeout) < Utc::now()
    }

    pub fn is_user(&self) -> bool {
        self.role == SenderRole::User
    }
}

impl TryFrom<SessionEntity> for Session {
    type Error = AppError;

    fn try_from(value: SessionEntity) -> Result<Self, Self::Error> {
        let role = SenderRole::from_str(&value.role)?;
        Ok(Self {
            session_id: value.session_id,
            role,
            actor_id: value.actor_id,
            display_name: value.display_name,
            updated_at: value.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(updated_at: DateTime<Utc>) -> Session {
        Session {
            session_id: Uuid::new_v4(),
            role: SenderRole::User,
            actor_id: 1,
            display_name: "tester".to_owned(),
            updated_at,
        }
    }

    #[test]
    fn fresh_session_is_not_expired() {
        let session = session(Utc::now());
        assert!(!session.is_expired(Duration::from_secs(30 * 60)));
    }

    #[test]
    fn stale_session_is_expired() {
        let session = session(Utc::now() - TimeDelta::hours(2));
        assert!(session.is_expired(Duration::from_secs(30 * 60)));
    }

    #[test]
    fn unknown_role_in_the_store_is_rejected() {
        let entity = SessionEntity {
            session_id: Uuid::new_v4(),
            role: "admin".to_owned(),
            actor_id: 1,
            display_name: "tester".to_owned(),
            updated_at: Utc::now(),
        };
        assert!(Session::try_from(entity).is_err());
    }
}
