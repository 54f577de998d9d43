use std::sync::Arc;

use async_trait::async_trait;
use db::DBService;
use deployment::{Deployment, DeploymentError, DeploymentSettings};
use services::services::{
    config::{Config, load_config_from_file, save_config_to_file},
    school::SchoolService,
    school_image::SchoolImageService,
};
use utils::assets::{config_path, school_images_dir};

#[derive(Clone)]
pub struct LocalDeployment {
    config: Arc<Config>,
    db: DBService,
    school: SchoolService,
}

#[async_trait]
impl Deployment for LocalDeployment {
    async fn new(settings: DeploymentSettings) -> Result<Self, DeploymentError> {
        let config = Self::load_runtime_config(&settings).await?;
        let db = DBService::connect(&settings.database_url).await?;
        let images = SchoolImageService::new(school_images_dir(&settings.asset_dir), &config.images)?;
        let school = SchoolService::new(images);

        Ok(Self {
            config,
            db,
            school,
        })
    }

    fn config(&self) -> &Arc<Config> {
        &self.config
    }

    fn db(&self) -> &DBService {
        &self.db
    }

    fn school(&self) -> &SchoolService {
        &self.school
    }

    async fn shutdown(self) -> Result<(), DeploymentError> {
        self.db.close().await?;
        tracing::info!("Database connection closed");
        Ok(())
    }
}

impl LocalDeployment {
    async fn load_runtime_config(
        settings: &DeploymentSettings,
    ) -> Result<Arc<Config>, DeploymentError> {
        let path = config_path(&settings.asset_dir);
        let config = load_config_from_file(&path).await;
        save_config_to_file(&config, &path).await?;
        Ok(Arc::new(config))
    }

    pub fn log_image_limits(&self) {
        let images = &self.config.images;
        tracing::info!(
            images_dir = %self.school.images().images_dir().display(),
            max_size_bytes = images.max_size_bytes,
            allowed_extensions = %images.allowed_extensions.join(","),
            "Image storage"
        );
    }
}
