use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use utils::assets::SCHOOL_IMAGES_DIR;

use super::config::ImageConfig;

const MAX_NAME_ATTEMPTS: usize = 8;
const RANDOM_SUFFIX_BOUND: u32 = 1_000_000_000;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Invalid image format")]
    InvalidFormat,
    #[error("Image file is empty")]
    Empty,
    #[error("Image too large: {0} bytes (max: {1} bytes)")]
    TooLarge(u64, u64),
    #[error("Invalid image path: {0}")]
    InvalidPath(String),
}

/// Owns the directory of uploaded school images.
///
/// Every stored file gets a fresh generated name and is created with
/// create-new semantics, so concurrent uploads never overwrite each other.
/// Records refer to files by their public path, `/schoolImages/<file>`.
#[derive(Clone)]
pub struct SchoolImageService {
    images_dir: PathBuf,
    max_size_bytes: u64,
    allowed_extensions: Arc<Vec<String>>,
}

impl SchoolImageService {
    pub fn new(images_dir: PathBuf, config: &ImageConfig) -> Result<Self, ImageError> {
        std::fs::create_dir_all(&images_dir)?;
        Ok(Self {
            images_dir,
            max_size_bytes: config.max_size_bytes,
            allowed_extensions: Arc::new(config.allowed_extensions.clone()),
        })
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Writes `data` to a new uniquely named file and returns the path to
    /// record on the school row. The file is synced before returning.
    pub async fn store(&self, data: &[u8], original_name: &str) -> Result<String, ImageError> {
        if data.is_empty() {
            return Err(ImageError::Empty);
        }
        let size = data.len() as u64;
        if size > self.max_size_bytes {
            return Err(ImageError::TooLarge(size, self.max_size_bytes));
        }
        let extension = self.extension_for(original_name)?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let file_name = generate_file_name(&extension);
            let path = self.images_dir.join(&file_name);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                    tracing::debug!(file_name = %file_name, "Generated image name already taken, retrying");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let written: std::io::Result<()> = async {
                file.write_all(data).await?;
                file.sync_all().await
            }
            .await;
            if let Err(err) = written {
                drop(file);
                if let Err(cleanup_err) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(
                        path = %path.display(),
                        error = %cleanup_err,
                        "Failed to remove partially written image"
                    );
                }
                return Err(err.into());
            }

            tracing::debug!(file_name = %file_name, size_bytes = size, "Stored school image");
            return Ok(format!("/{SCHOOL_IMAGES_DIR}/{file_name}"));
        }

        Err(ImageError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "could not allocate a unique image file name",
        )))
    }

    /// Deletes the file behind a stored path. A file that is already gone is
    /// not an error.
    pub async fn remove(&self, stored_path: &str) -> Result<(), ImageError> {
        let path = self.resolve(stored_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = stored_path, "Removed school image");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = stored_path, "School image already removed");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Maps a stored `/schoolImages/<file>` path to its location on disk.
    pub fn resolve(&self, stored_path: &str) -> Result<PathBuf, ImageError> {
        let file_name = stored_path
            .strip_prefix('/')
            .and_then(|rest| rest.strip_prefix(SCHOOL_IMAGES_DIR))
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| ImageError::InvalidPath(stored_path.to_string()))?;

        if !is_plain_file_name(file_name) {
            return Err(ImageError::InvalidPath(stored_path.to_string()));
        }
        Ok(self.images_dir.join(file_name))
    }

    fn extension_for(&self, original_name: &str) -> Result<String, ImageError> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or(ImageError::InvalidFormat)?;

        if self.allowed_extensions.contains(&extension) {
            Ok(extension)
        } else {
            Err(ImageError::InvalidFormat)
        }
    }
}

fn generate_file_name(extension: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = rand::thread_rng().gen_range(0..RANDOM_SUFFIX_BOUND);
    format!("school-{millis}-{suffix}.{extension}")
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}
