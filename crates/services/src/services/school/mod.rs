use db::{
    DbErr, DbPool,
    models::school::School,
};
use thiserror::Error;

use super::school_image::{ImageError, SchoolImageService};

pub mod validation;

pub use validation::{FieldError, SchoolForm, ValidationErrors};

#[derive(Debug, Error)]
pub enum SchoolError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("School not found")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, SchoolError>;

/// An uploaded image as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Keeps a school row and its image file consistent.
///
/// New images are written and synced before the row that points at them is
/// committed. Replaced or orphaned images are removed only after the row
/// change has committed, and a failed removal is logged rather than returned.
#[derive(Clone)]
pub struct SchoolService {
    images: SchoolImageService,
}

impl SchoolService {
    pub fn new(images: SchoolImageService) -> Self {
        Self { images }
    }

    pub fn images(&self) -> &SchoolImageService {
        &self.images
    }

    pub async fn list(&self, pool: &DbPool) -> Result<Vec<School>> {
        Ok(School::find_all(pool).await?)
    }

    pub async fn get(&self, pool: &DbPool, id: i64) -> Result<School> {
        School::find_by_id(pool, id)
            .await?
            .ok_or(SchoolError::NotFound)
    }

    pub async fn create(
        &self,
        pool: &DbPool,
        form: &SchoolForm,
        image: Option<ImageUpload>,
    ) -> Result<i64> {
        let image = image.filter(|upload| !upload.data.is_empty());
        let (fields, upload) = validation::validate_new_school(form, image)?;

        let image_path = self.images.store(&upload.data, &upload.file_name).await?;

        let school = match School::create(pool, &fields, Some(&image_path)).await {
            Ok(school) => school,
            Err(err) => {
                self.discard_image(&image_path).await;
                return Err(err.into());
            }
        };

        tracing::info!(school_id = school.id, image = %image_path, "Created school");
        Ok(school.id)
    }

    pub async fn update(
        &self,
        pool: &DbPool,
        id: i64,
        form: &SchoolForm,
        image: Option<ImageUpload>,
    ) -> Result<()> {
        let fields = validation::validate_school_form(form)?;
        let existing = self.get(pool, id).await?;

        let new_image = match image.filter(|upload| !upload.data.is_empty()) {
            Some(upload) => Some(self.images.store(&upload.data, &upload.file_name).await?),
            None => None,
        };

        let rows = match School::update(pool, id, &fields, new_image.as_deref()).await {
            Ok(rows) => rows,
            Err(err) => {
                if let Some(path) = &new_image {
                    self.discard_image(path).await;
                }
                return Err(err.into());
            }
        };

        if rows == 0 {
            if let Some(path) = &new_image {
                self.discard_image(path).await;
            }
            return Err(SchoolError::NotFound);
        }

        if new_image.is_some()
            && let Some(old_image) = existing.image.as_deref()
        {
            self.discard_image(old_image).await;
        }

        tracing::info!(
            school_id = id,
            image_replaced = new_image.is_some(),
            "Updated school"
        );
        Ok(())
    }

    pub async fn delete(&self, pool: &DbPool, id: i64) -> Result<()> {
        let existing = self.get(pool, id).await?;

        let rows = School::delete(pool, id).await?;
        if rows == 0 {
            return Err(SchoolError::NotFound);
        }

        if let Some(image) = existing.image.as_deref() {
            self.discard_image(image).await;
        }

        tracing::info!(school_id = id, "Deleted school");
        Ok(())
    }

    async fn discard_image(&self, path: &str) {
        if let Err(err) = self.images.remove(path).await {
            tracing::warn!(path, error = %err, "Failed to remove school image");
        }
    }
}
