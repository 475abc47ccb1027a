use crate::common::error::AppError;
use crate::common::pagination::{PageInfo, PageRequest};
use crate::entities::conversations::Conversation as ConversationEntity;
use crate::models::messages::{Message, SenderRole};
use crate::models::sessions::Session;
use crate::models::superstars::SuperstarSummary;
use axum::Json;
use axum::extract::{FromRequest, Request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Ended,
    Blocked,
}

impl ConversationStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConversationStatus::Active => "active",
            ConversationStatus::Ended => "ended",
            ConversationStatus::Blocked => "blocked",
        }
    }
}

impl FromStr for ConversationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ConversationStatus::Active),
            "ended" => Ok(ConversationStatus::Ended),
            "blocked" => Ok(ConversationStatus::Blocked),
            _ => Err(AppError::ConversationsInvalidStatus),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Conversation {
    pub id: i64,
    pub user_id: i64,
    pub superstar_id: i64,
    pub status: ConversationStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// The single ownership predicate: a caller participates in a
    /// conversation when the id on their side of the pairing matches.
    pub fn is_participant(&self, session: &Session) -> bool {
        match session.role {
            SenderRole::User => self.user_id == session.actor_id,
            SenderRole::Superstar => self.superstar_id == session.actor_id,
        }
    }
}

impl TryFrom<ConversationEntity> for Conversation {
    type Error = AppError;

    fn try_from(value: ConversationEntity) -> Result<Self, Self::Error> {
        let status =
            ConversationStatus::from_str(&value.status).map_err(|_| AppError::Unexpected)?;
        Ok(Self {
            id: value.id,
            user_id: value.user_id,
            superstar_id: value.superstar_id,
            status,
            started_at: value.started_at,
            ended_at: value.ended_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

/// Conversation-list item: the conversation denormalized with the
/// counterpart's profile and the most recent message.
#[derive(Debug, Serialize)]
pub struct ConversationPreview {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub superstar: Option<SuperstarSummary>,
    pub latest_message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct ListConversationsArgs {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
}

impl ListConversationsArgs {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusArgs {
    pub status: String,
}

impl<S: Send + Sync> FromRequest<S> for UpdateStatusArgs {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(args) = Json::<UpdateStatusArgs>::from_request(req, state)
            .await
            .map_err(|_| AppError::DecodingRequestFailed)?;
        Ok(args)
    }
}

#[derive(Serialize)]
pub struct ConversationResponse {
    pub conversation: Conversation,
}

#[derive(Serialize)]
pub struct ConversationsListResponse {
    pub conversations: Vec<ConversationPreview>,
    pub pagination: PageInfo,
}

#[derive(Serialize)]
pub struct UpdateStatusResponse {
    pub message: &'static str,
    pub conversation: Conversation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn conversation() -> Conversation {
        Conversation {
            id: 1,
            user_id: 10,
            superstar_id: 20,
            status: ConversationStatus::Active,
            started_at: Some(Utc::now()),
            ended_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn session(role: SenderRole, actor_id: i64) -> Session {
        Session {
            session_id: Uuid::new_v4(),
            role,
            actor_id,
            display_name: "tester".to_owned(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn status_parse_round_trips() {
        for status in [
            ConversationStatus::Active,
            ConversationStatus::Ended,
            ConversationStatus::Blocked,
        ] {
            assert_eq!(ConversationStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let error = ConversationStatus::from_str("archived").unwrap_err();
        assert_eq!(error.code(), AppError::ConversationsInvalidStatus.code());
    }

    #[test]
    fn both_sides_of_the_pairing_are_participants() {
        let conversation = conversation();
        assert!(conversation.is_participant(&session(SenderRole::User, 10)));
        assert!(conversation.is_participant(&session(SenderRole::Superstar, 20)));
    }

    #[test]
    fn matching_id_with_the_wrong_role_is_not_a_participant() {
        let conversation = conversation();
        assert!(!conversation.is_participant(&session(SenderRole::User, 20)));
        assert!(!conversation.is_participant(&session(SenderRole::Superstar, 10)));
        assert!(!conversation.is_participant(&session(SenderRole::User, 99)));
    }
}
