use anyhow::{Context, bail};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BlobCategory {
    ChatAttachments,
    PostMedia,
}

impl BlobCategory {
    pub const ALL: [BlobCategory; 2] = [BlobCategory::ChatAttachments, BlobCategory::PostMedia];

    pub const fn dir(&self) -> &'static str {
        match self {
            BlobCategory::ChatAttachments => "chat",
            BlobCategory::PostMedia => "posts",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub path: String,
    pub original_name: String,
    pub size_bytes: i64,
}

#[async_trait]
pub trait BlobStorage: Send + Sync {
    async fn store(
        &self,
        category: BlobCategory,
        original_name: &str,
        data: &[u8],
    ) -> anyhow::Result<StoredBlob>;

    async fn exists(&self, path: &str) -> anyhow::Result<bool>;

    /// Returns false when the blob was already absent.
    async fn delete(&self, path: &str) -> anyhow::Result<bool>;
}

/// Filesystem-backed blob store. Blobs live under one subdirectory per
/// category and are named by a fresh UUID, keeping the original extension
/// so that served files retain a usable content type.
pub struct DiskBlobStorage {
    root: PathBuf,
}

impl DiskBlobStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub async fn ensure_layout(&self) -> anyhow::Result<()> {
        for category in BlobCategory::ALL {
            fs::create_dir_all(self.root.join(category.dir()))
                .await
                .with_context(|| format!("Failed to create blob directory {}", category.dir()))?;
        }
        Ok(())
    }

    /// Stored paths are always `<category>/<uuid>[.<ext>]`; anything else
    /// (absolute paths, parent components) is rejected before touching disk.
    fn resolve(&self, path: &str) -> anyhow::Result<PathBuf> {
        let relative = Path::new(path);
        if relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
        {
            bail!("Invalid blob path: {path}");
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStorage for DiskBlobStorage {
    async fn store(
        &self,
        category: BlobCategory,
        original_name: &str,
        data: &[u8],
    ) -> anyhow::Result<StoredBlob> {
        let file_name = match Path::new(original_name)
            .extension()
            .and_then(OsStr::to_str)
        {
            Some(extension) => format!("{}.{}", Uuid::new_v4(), extension.to_ascii_lowercase()),
            None => Uuid::new_v4().to_string(),
        };
        let path = format!("{}/{}", category.dir(), file_name);
        let target = self.root.join(&path);
        fs::write(&target, data)
            .await
            .with_context(|| format!("Failed to write blob {path}"))?;
        Ok(StoredBlob {
            path,
            original_name: original_name.to_owned(),
            size_bytes: data.len() as i64,
        })
    }

    async fn exists(&self, path: &str) -> anyhow::Result<bool> {
        let target = self.resolve(path)?;
        match fs::metadata(&target).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to stat blob {path}")),
        }
    }

    async fn delete(&self, path: &str) -> anyhow::Result<bool> {
        let target = self.resolve(path)?;
        match fs::remove_file(&target).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to delete blob {path}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage() -> (tempfile::TempDir, DiskBlobStorage) {
        let dir = tempdir().unwrap();
        let storage = DiskBlobStorage::new(dir.path().to_path_buf());
        storage.ensure_layout().await.unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn store_then_exists_then_delete() {
        let (_dir, storage) = storage().await;
        let blob = storage
            .store(BlobCategory::ChatAttachments, "photo.PNG", b"pngbytes")
            .await
            .unwrap();
        assert!(blob.path.starts_with("chat/"));
        assert!(blob.path.ends_with(".png"));
        assert_eq!(blob.original_name, "photo.PNG");
        assert_eq!(blob.size_bytes, 8);

        assert!(storage.exists(&blob.path).await.unwrap());
        assert!(storage.delete(&blob.path).await.unwrap());
        assert!(!storage.exists(&blob.path).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_an_absent_blob_reports_false() {
        let (_dir, storage) = storage().await;
        assert!(!storage.delete("chat/no-such-file.png").await.unwrap());
    }

    #[tokio::test]
    async fn names_without_extension_are_stored_bare() {
        let (_dir, storage) = storage().await;
        let blob = storage
            .store(BlobCategory::PostMedia, "README", b"data")
            .await
            .unwrap();
        assert!(blob.path.starts_with("posts/"));
        assert!(!blob.path.contains('.'));
    }

    #[tokio::test]
    async fn traversal_paths_are_rejected() {
        let (_dir, storage) = storage().await;
        assert!(storage.exists("../outside").await.is_err());
        assert!(storage.delete("/etc/passwd").await.is_err());
    }
}
