use crate::adapters::blob_storage::{BlobCategory, StoredBlob};
use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult};
use crate::models::messages::{MessageType, UploadedFile};
use std::ffi::OsStr;
use std::path::Path;
use tracing::error;

pub const MAX_ATTACHMENT_SIZE: usize = 50 * 1024 * 1024;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "m4v"];

pub fn validate(message_type: MessageType, file: &UploadedFile) -> ServiceResult<()> {
    if file.data.len() > MAX_ATTACHMENT_SIZE {
        return Err(AppError::AttachmentsTooLarge);
    }
    let allowed = match message_type {
        MessageType::Image => IMAGE_EXTENSIONS,
        MessageType::Video => VIDEO_EXTENSIONS,
        // generic files and text messages accept any payload
        MessageType::Text | MessageType::File => return Ok(()),
    };
    let extension = Path::new(&file.name)
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match extension {
        Some(extension) if allowed.contains(&extension.as_str()) => Ok(()),
        _ => Err(AppError::AttachmentsUnsupportedType),
    }
}

pub async fn store<C: Context>(
    ctx: &C,
    message_type: MessageType,
    file: &UploadedFile,
) -> ServiceResult<StoredBlob> {
    validate(message_type, file)?;
    match ctx
        .blobs()
        .store(BlobCategory::ChatAttachments, &file.name, &file.data)
        .await
    {
        Ok(blob) => Ok(blob),
        Err(e) => {
            error!("Failed to store attachment {}: {e:?}", file.name);
            Err(AppError::AttachmentsStorageFailed)
        }
    }
}

/// Removes the backing blob. An already-absent blob is fine; a hard storage
/// error is not, so callers can refuse to drop rows that still point at data.
pub async fn discard<C: Context>(ctx: &C, path: &str) -> ServiceResult<()> {
    match ctx.blobs().delete(path).await {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("Failed to delete attachment {path}: {e:?}");
            Err(AppError::AttachmentsStorageFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn file(name: &str, size: usize) -> UploadedFile {
        UploadedFile {
            name: name.to_owned(),
            data: Bytes::from(vec![0u8; size]),
        }
    }

    #[test]
    fn image_extensions_are_enforced_case_insensitively() {
        assert!(validate(MessageType::Image, &file("selfie.JPG", 16)).is_ok());
        assert!(validate(MessageType::Image, &file("clip.mp4", 16)).is_err());
        assert!(validate(MessageType::Image, &file("noextension", 16)).is_err());
    }

    #[test]
    fn video_extensions_are_enforced() {
        assert!(validate(MessageType::Video, &file("clip.webm", 16)).is_ok());
        assert!(validate(MessageType::Video, &file("selfie.png", 16)).is_err());
    }

    #[test]
    fn generic_files_accept_any_extension() {
        assert!(validate(MessageType::File, &file("contract.pdf", 16)).is_ok());
        assert!(validate(MessageType::File, &file("noextension", 16)).is_ok());
    }

    #[test]
    fn oversized_payloads_are_rejected_before_type_checks() {
        let error = validate(MessageType::File, &file("big.bin", MAX_ATTACHMENT_SIZE + 1));
        assert_eq!(error.unwrap_err().code(), AppError::AttachmentsTooLarge.code());
    }
}
