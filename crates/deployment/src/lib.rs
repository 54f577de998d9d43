use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use db::{DBService, DbErr};
use services::services::{
    config::{Config, ConfigError},
    school::SchoolService,
    school_image::ImageError,
};
use thiserror::Error;
use utils::assets::{asset_dir, database_path};

const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Where a deployment keeps its state. Resolved once during startup.
#[derive(Debug, Clone)]
pub struct DeploymentSettings {
    pub asset_dir: PathBuf,
    pub database_url: String,
}

impl DeploymentSettings {
    /// Reads `SCHOOLS_ASSET_DIR` and `DATABASE_URL`. Without a database URL
    /// a SQLite file inside the asset directory is used.
    pub fn from_env() -> Result<Self, DeploymentError> {
        let asset_dir = asset_dir()?;
        let database_url = std::env::var(DATABASE_URL_ENV)
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| sqlite_url_in(&asset_dir));
        Ok(Self {
            asset_dir,
            database_url,
        })
    }

    pub fn for_asset_dir(asset_dir: PathBuf) -> Self {
        let database_url = sqlite_url_in(&asset_dir);
        Self {
            asset_dir,
            database_url,
        }
    }
}

fn sqlite_url_in(asset_dir: &std::path::Path) -> String {
    format!(
        "sqlite://{}?mode=rwc",
        database_path(asset_dir).to_string_lossy()
    )
}

#[async_trait]
pub trait Deployment: Clone + Send + Sync + 'static {
    async fn new(settings: DeploymentSettings) -> Result<Self, DeploymentError>;

    fn config(&self) -> &Arc<Config>;

    fn db(&self) -> &DBService;

    fn school(&self) -> &SchoolService;

    /// Releases the store connection. Call after the server has stopped
    /// accepting requests.
    async fn shutdown(self) -> Result<(), DeploymentError>;
}
