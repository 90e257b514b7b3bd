use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use rand::Rng;
use thiserror::Error;

use crate::core::config::Settings;
use crate::core::time::{now_utc, unix_millis};
use crate::services::image_urls::{is_absolute_url, UPLOADS_ROUTE};

#[derive(Debug, Error)]
pub(crate) enum UploadError {
    #[error("failed to prepare uploads directory {path}: {source}")]
    Prepare { path: PathBuf, source: std::io::Error },
    #[error("failed to write upload {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
}

/// Course images on local disk, served back under `/uploads`.
#[derive(Debug, Clone)]
pub(crate) struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub(crate) async fn from_settings(settings: &Settings) -> Result<Self, UploadError> {
        Self::open(PathBuf::from(&settings.storage().uploads_dir)).await
    }

    pub(crate) async fn open(root: PathBuf) -> Result<Self, UploadError> {
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| UploadError::Prepare { path: root.clone(), source })?;

        Ok(Self { root })
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the image and returns the value to store on the course (`/uploads/<file>`).
    pub(crate) async fn save_course_image(
        &self,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        let filename = course_image_filename(original_filename);
        let path = self.root.join(&filename);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| UploadError::Write { path: path.clone(), source })?;

        tracing::info!(path = %path.display(), size = bytes.len(), "Stored course image");
        Ok(format!("{UPLOADS_ROUTE}/{filename}"))
    }

    /// Best-effort removal of a locally stored image; never fails the caller.
    pub(crate) async fn remove_course_image(&self, image: &str) -> bool {
        let Some(path) = self.local_path(image) else {
            return false;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Removed course image");
                true
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Course image already missing");
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, path = %path.display(), "Failed to remove course image");
                false
            }
        }
    }

    /// Maps a stored image value to a file inside the uploads root. External URLs and
    /// anything that would escape the root map to `None`.
    pub(crate) fn local_path(&self, image: &str) -> Option<PathBuf> {
        if image.is_empty() || is_absolute_url(image) {
            return None;
        }

        let relative = image.trim_start_matches('/');
        let relative = relative.strip_prefix("uploads/").unwrap_or(relative);

        let mut components = Path::new(relative).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Some(self.root.join(name)),
            _ => None,
        }
    }
}

fn course_image_filename(original_filename: &str) -> String {
    let extension = Path::new(original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();
    let unique: u32 = rand::thread_rng().gen_range(0..1_000_000_000);

    format!("course-{}-{unique}{extension}", unix_millis(now_utc()))
}
