use crate::adapters::blob_storage::StoredBlob;
use crate::common::error::AppError;
use crate::common::pagination::PageInfo;
use crate::entities::messages::Message as MessageEntity;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    User,
    Superstar,
}

impl SenderRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SenderRole::User => "user",
            SenderRole::Superstar => "superstar",
        }
    }

    pub const fn counterpart(&self) -> SenderRole {
        match self {
            SenderRole::User => SenderRole::Superstar,
            SenderRole::Superstar => SenderRole::User,
        }
    }
}

impl FromStr for SenderRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(SenderRole::User),
            "superstar" => Ok(SenderRole::Superstar),
            _ => Err(AppError::Unexpected),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    Video,
    File,
}

impl MessageType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
            MessageType::Video => "video",
            MessageType::File => "file",
        }
    }
}

impl FromStr for MessageType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(MessageType::Text),
            "image" => Ok(MessageType::Image),
            "video" => Ok(MessageType::Video),
            "file" => Ok(MessageType::File),
            _ => Err(AppError::MessagesInvalidType),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub file_path: String,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_type: SenderRole,
    pub sender_id: i64,
    pub message_type: MessageType,
    pub body: Option<String>,
    pub attachment: Option<Attachment>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MessageEntity> for Message {
    type Error = AppError;

    fn try_from(value: MessageEntity) -> Result<Self, Self::Error> {
        let sender_type = SenderRole::from_str(&value.sender_type)?;
        let message_type =
            MessageType::from_str(&value.message_type).map_err(|_| AppError::Unexpected)?;
        let attachment = value.file_path.map(|file_path| Attachment {
            file_path,
            file_name: value.file_name,
            file_size: value.file_size,
        });
        Ok(Self {
            id: value.id,
            conversation_id: value.conversation_id,
            sender_type,
            sender_id: value.sender_id,
            message_type,
            body: value.body,
            attachment,
            is_read: value.is_read,
            read_at: value.read_at,
            created_at: value.created_at,
        })
    }
}

/// Row-creation arguments handed to the message repository.
pub struct CreateMessageArgs {
    pub conversation_id: i64,
    pub sender_type: SenderRole,
    pub sender_id: i64,
    pub message_type: MessageType,
    pub body: Option<String>,
    pub attachment: Option<StoredBlob>,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub name: String,
    pub data: Bytes,
}

/// Send-message input, accepted either as JSON or as multipart form data
/// (the latter is the only way to attach a file).
#[derive(Debug)]
pub struct SendMessageArgs {
    pub message_type: String,
    pub body: Option<String>,
    pub file: Option<UploadedFile>,
}

#[derive(Deserialize)]
struct SendMessageJson {
    message_type: String,
    body: Option<String>,
}

impl<S: Send + Sync> FromRequest<S> for SendMessageArgs {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|_| AppError::DecodingRequestFailed)?;
            let mut message_type = None;
            let mut body = None;
            let mut file = None;
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|_| AppError::DecodingRequestFailed)?
            {
                let field_name = field.name().map(str::to_owned);
                match field_name.as_deref() {
                    Some("message_type") => {
                        let text = field
                            .text()
                            .await
                            .map_err(|_| AppError::DecodingRequestFailed)?;
                        message_type = Some(text);
                    }
                    Some("body") => {
                        let text = field
                            .text()
                            .await
                            .map_err(|_| AppError::DecodingRequestFailed)?;
                        body = Some(text);
                    }
                    Some("file") => {
                        let name = field.file_name().unwrap_or("attachment").to_owned();
                        let data = field
                            .bytes()
                            .await
                            .map_err(|_| AppError::DecodingRequestFailed)?;
                        file = Some(UploadedFile { name, data });
                    }
                    _ => {}
                }
            }
            Ok(SendMessageArgs {
                message_type: message_type.ok_or(AppError::MessagesInvalidType)?,
                body,
                file,
            })
        } else {
            let Json(args) = Json::<SendMessageJson>::from_request(req, state)
                .await
                .map_err(|_| AppError::DecodingRequestFailed)?;
            Ok(SendMessageArgs {
                message_type: args.message_type,
                body: args.body,
                file: None,
            })
        }
    }
}

#[derive(Serialize)]
pub struct SendMessageResponse {
    pub message: Message,
}

#[derive(Serialize)]
pub struct MessagesListResponse {
    pub messages: Vec<Message>,
    pub pagination: PageInfo,
}

#[derive(Serialize)]
pub struct MarkReadResponse {
    pub message: &'static str,
    pub messages_marked: u64,
}

#[derive(Serialize)]
pub struct DeleteMessageResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn entity(file_path: Option<&str>) -> MessageEntity {
        MessageEntity {
            id: 7,
            conversation_id: 3,
            sender_type: "user".to_owned(),
            sender_id: 42,
            message_type: "text".to_owned(),
            body: Some("hi".to_owned()),
            file_path: file_path.map(str::to_owned),
            file_name: file_path.map(|_| "photo.png".to_owned()),
            file_size: file_path.map(|_| 1024),
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn counterpart_flips_the_role() {
        assert_eq!(SenderRole::User.counterpart(), SenderRole::Superstar);
        assert_eq!(SenderRole::Superstar.counterpart(), SenderRole::User);
    }

    #[test]
    fn message_type_rejects_unknown_values() {
        assert!(MessageType::from_str("text").is_ok());
        assert!(MessageType::from_str("audio").is_err());
    }

    #[test]
    fn entity_without_file_has_no_attachment() {
        let message = Message::try_from(entity(None)).unwrap();
        assert!(message.attachment.is_none());
        assert_eq!(message.sender_type, SenderRole::User);
        assert!(!message.is_read);
    }

    #[test]
    fn entity_with_file_carries_the_attachment() {
        let message = Message::try_from(entity(Some("chat/abc.png"))).unwrap();
        let attachment = message.attachment.unwrap();
        assert_eq!(attachment.file_path, "chat/abc.png");
        assert_eq!(attachment.file_name.as_deref(), Some("photo.png"));
        assert_eq!(attachment.file_size, Some(1024));
    }

    #[tokio::test]
    async fn json_request_parses_without_a_file() {
        let request = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"message_type":"text","body":"hello"}"#))
            .unwrap();
        let args = SendMessageArgs::from_request(request, &()).await.unwrap();
        assert_eq!(args.message_type, "text");
        assert_eq!(args.body.as_deref(), Some("hello"));
        assert!(args.file.is_none());
    }

    #[tokio::test]
    async fn multipart_request_parses_file_and_fields() {
        let boundary = "test-boundary";
        let payload = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"message_type\"\r\n\r\n\
             image\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"pic.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             pngbytes\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(payload))
            .unwrap();
        let args = SendMessageArgs::from_request(request, &()).await.unwrap();
        assert_eq!(args.message_type, "image");
        assert!(args.body.is_none());
        let file = args.file.unwrap();
        assert_eq!(file.name, "pic.png");
        assert_eq!(&file.data[..], b"pngbytes");
    }

    #[tokio::test]
    async fn garbled_json_is_a_decoding_failure() {
        let request = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let error = SendMessageArgs::from_request(request, &()).await.unwrap_err();
        assert_eq!(error.code(), AppError::DecodingRequestFailed.code());
    }
}
