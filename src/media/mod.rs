//! Local filesystem storage for uploaded media.
//!
//! Files live flat under `<data_dir>/uploads/` and are served back at
//! `/uploads/<filename>`. Stored names are generated server-side, so the
//! original filename only contributes its extension.

use std::path::{Path, PathBuf};

use rand::Rng;
use thiserror::Error;

/// Largest accepted upload per file, in bytes.
pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// Photo uploads accept up to this many files per request.
pub const MAX_FILES_PER_UPLOAD: usize = 10;

/// Video uploads accept up to this many files per request.
pub const MAX_VIDEO_FILES: usize = 5;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "webm"];

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("File type not allowed: {0}")]
    DisallowedType(String),
    #[error("Invalid filename")]
    InvalidFilename,
    #[error("File too large")]
    TooLarge,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classifies a filename by its extension. Returns None for anything
    /// outside the allow-lists.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())?
            .to_ascii_lowercase();

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaStorage {
    uploads_dir: PathBuf,
}

impl MediaStorage {
    pub fn new<P: Into<PathBuf>>(uploads_dir: P) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Generates a stored name: unix millis, a random suffix, and the
    /// original extension.
    pub fn unique_filename(&self, original: &str) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: u32 = rand::thread_rng().r#gen();

        match Path::new(original).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{millis}-{suffix}.{}", ext.to_ascii_lowercase()),
            None => format!("{millis}-{suffix}"),
        }
    }

    /// Writes file contents under the uploads directory, creating it on
    /// first use.
    pub async fn save(&self, filename: &str, data: &[u8]) -> Result<(), MediaError> {
        validate_filename(filename)?;
        if data.len() > MAX_FILE_SIZE {
            return Err(MediaError::TooLarge);
        }

        tokio::fs::create_dir_all(&self.uploads_dir).await?;
        tokio::fs::write(self.uploads_dir.join(filename), data).await?;
        Ok(())
    }

    /// Removes a stored file. Returns false when the file was already gone,
    /// which callers treat as success.
    pub async fn delete(&self, filename: &str) -> Result<bool, MediaError> {
        validate_filename(filename)?;

        match tokio::fs::remove_file(self.uploads_dir.join(filename)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(MediaError::Io(e)),
        }
    }

    pub fn exists(&self, filename: &str) -> bool {
        validate_filename(filename).is_ok() && self.uploads_dir.join(filename).exists()
    }

    /// Public URL for a stored filename.
    pub fn url_for(&self, filename: &str) -> String {
        format!("/uploads/{filename}")
    }
}

/// Extracts the stored filename from a `/uploads/...` URL. Returns None for
/// external URLs, which have no local file to manage.
pub fn filename_from_url(url: &str) -> Option<&str> {
    let name = url.strip_prefix("/uploads/")?;
    validate_filename(name).ok()?;
    Some(name)
}

fn validate_filename(filename: &str) -> Result<(), MediaError> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(MediaError::InvalidFilename);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_media_kind_classification() {
        assert_eq!(MediaKind::from_filename("team.JPG"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_filename("clip.webm"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_filename("roster.pdf"), None);
        assert_eq!(MediaKind::from_filename("no_extension"), None);
    }

    #[test]
    fn test_unique_filename_keeps_extension() {
        let storage = MediaStorage::new("/tmp/uploads");
        let name = storage.unique_filename("Match Photo.PNG");
        assert!(name.ends_with(".png"));
        assert!(!name.contains(' '));
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(filename_from_url("/uploads/123-456.jpg"), Some("123-456.jpg"));
        assert_eq!(filename_from_url("https://youtube.com/watch?v=abc"), None);
        assert_eq!(filename_from_url("/uploads/../secret"), None);
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let temp = TempDir::new().unwrap();
        let storage = MediaStorage::new(temp.path().join("uploads"));

        storage.save("photo.jpg", b"fake image data").await.unwrap();
        assert!(storage.exists("photo.jpg"));

        assert!(storage.delete("photo.jpg").await.unwrap());
        assert!(!storage.exists("photo.jpg"));

        // Deleting again reports the file as already gone.
        assert!(!storage.delete("photo.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_save_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let storage = MediaStorage::new(temp.path().join("uploads"));

        let result = storage.save("../escape.jpg", b"data").await;
        assert!(matches!(result, Err(MediaError::InvalidFilename)));
    }
}
