use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::HashMap;
use tracing::error;

pub type ServiceResult<T> = Result<T, AppError>;
pub type ServiceResponse<T> = ServiceResult<Json<T>>;

#[track_caller]
pub fn unexpected<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    error!("An unexpected error has occurred at {caller}: {}", e.into());
    Err(AppError::Unexpected)
}

#[derive(Debug)]
pub enum AppError {
    Unexpected,
    Unauthorized,
    DecodingRequestFailed,

    ConversationsNotFound,
    ConversationsForbidden,
    ConversationsInvalidStatus,

    MessagesNotFound,
    MessagesForbidden,
    MessagesMissingContent,
    MessagesInvalidType,
    MessagesBodyTooLong,

    SuperstarsNotFound,

    AttachmentsTooLarge,
    AttachmentsUnsupportedType,
    AttachmentsStorageFailed,
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    #[track_caller]
    fn from(e: E) -> Self {
        unexpected::<(), E>(e).unwrap_err()
    }
}

impl AppError {
    pub const fn as_str(&self) -> &str {
        self.code()
    }

    pub const fn code(&self) -> &'static str {
        match self {
            AppError::Unexpected => "unexpected",
            AppError::Unauthorized => "unauthorized",
            AppError::DecodingRequestFailed => "decoding_request_failed",

            AppError::ConversationsNotFound => "conversations.not_found",
            AppError::ConversationsForbidden => "conversations.forbidden",
            AppError::ConversationsInvalidStatus => "conversations.invalid_status",

            AppError::MessagesNotFound => "messages.not_found",
            AppError::MessagesForbidden => "messages.forbidden",
            AppError::MessagesMissingContent => "messages.missing_content",
            AppError::MessagesInvalidType => "messages.invalid_type",
            AppError::MessagesBodyTooLong => "messages.body_too_long",

            AppError::SuperstarsNotFound => "superstars.not_found",

            AppError::AttachmentsTooLarge => "attachments.too_large",
            AppError::AttachmentsUnsupportedType => "attachments.unsupported_type",
            AppError::AttachmentsStorageFailed => "attachments.storage_failed",
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            AppError::Unexpected => "An unexpected error has occurred.",
            AppError::Unauthorized => "You are not authorized to perform this action.",
            AppError::DecodingRequestFailed => "Failed to decode request",

            AppError::ConversationsNotFound => "Conversation not found.",
            AppError::ConversationsForbidden => {
                "You are not a participant of this conversation."
            }
            AppError::ConversationsInvalidStatus => {
                "Status must be one of: active, ended, blocked."
            }

            AppError::MessagesNotFound => "Message not found.",
            AppError::MessagesForbidden => "You may only delete your own messages.",
            AppError::MessagesMissingContent => {
                "A message needs a text body or an attached file."
            }
            AppError::MessagesInvalidType => {
                "Message type must be one of: text, image, video, file."
            }
            AppError::MessagesBodyTooLong => {
                "Your message was too long. It has not been sent."
            }

            AppError::SuperstarsNotFound => "This superstar does not exist.",

            AppError::AttachmentsTooLarge => "The attached file exceeds the size limit.",
            AppError::AttachmentsUnsupportedType => {
                "The attached file type is not supported for this message type."
            }
            AppError::AttachmentsStorageFailed => "Failed to store the attached file.",
        }
    }

    /// Field the validation failure applies to, for the field-keyed error map.
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            AppError::ConversationsInvalidStatus => Some("status"),
            AppError::MessagesMissingContent | AppError::MessagesBodyTooLong => Some("body"),
            AppError::MessagesInvalidType => Some("message_type"),
            AppError::AttachmentsTooLarge | AppError::AttachmentsUnsupportedType => Some("file"),
            _ => None,
        }
    }

    pub const fn http_status_code(&self) -> StatusCode {
        match self {
            AppError::DecodingRequestFailed => StatusCode::BAD_REQUEST,

            AppError::Unauthorized => StatusCode::UNAUTHORIZED,

            AppError::ConversationsForbidden | AppError::MessagesForbidden => {
                StatusCode::FORBIDDEN
            }

            AppError::ConversationsNotFound
            | AppError::MessagesNotFound
            | AppError::SuperstarsNotFound => StatusCode::NOT_FOUND,

            AppError::ConversationsInvalidStatus
            | AppError::MessagesMissingContent
            | AppError::MessagesInvalidType
            | AppError::MessagesBodyTooLong
            | AppError::AttachmentsTooLarge
            | AppError::AttachmentsUnsupportedType => StatusCode::UNPROCESSABLE_ENTITY,

            AppError::Unexpected | AppError::AttachmentsStorageFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn response_parts(&self) -> (StatusCode, Json<ErrorResponse>) {
        let status = self.http_status_code();
        let errors = self
            .field()
            .map(|field| HashMap::from([(field, vec![self.message()])]));
        let response = ErrorResponse {
            code: self.code(),
            message: self.message(),
            errors,
        };
        (status, Json(response))
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<&'static str, Vec<&'static str>>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.response_parts().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_carry_a_field_map() {
        let (status, Json(body)) = AppError::MessagesMissingContent.response_parts();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let errors = body.errors.expect("field map");
        assert_eq!(errors["body"], vec![AppError::MessagesMissingContent.message()]);
    }

    #[test]
    fn non_validation_errors_have_no_field_map() {
        let (status, Json(body)) = AppError::ConversationsForbidden.response_parts();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.errors.is_none());
    }

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(AppError::Unauthorized.http_status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::ConversationsNotFound.http_status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::AttachmentsStorageFailed.http_status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
