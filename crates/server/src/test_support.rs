use std::{
    path::Path,
    sync::{Mutex, MutexGuard, OnceLock},
};

use deployment::{Deployment, DeploymentSettings};
use tempfile::TempDir;

use crate::DeploymentImpl;

pub fn test_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

pub struct TestEnvGuard {
    _lock: MutexGuard<'static, ()>,
    prev_database_url: Option<String>,
    prev_asset_dir: Option<String>,
}

impl TestEnvGuard {
    pub fn new(temp_root: &Path, db_url: Option<String>) -> Self {
        let lock = test_lock().lock().unwrap_or_else(|err| err.into_inner());
        let prev_database_url = std::env::var("DATABASE_URL").ok();
        let prev_asset_dir = std::env::var("SCHOOLS_ASSET_DIR").ok();

        // SAFETY: tests using TestEnvGuard are serialized by test_lock.
        unsafe {
            std::env::set_var("SCHOOLS_ASSET_DIR", temp_root);
            match db_url {
                Some(url) => std::env::set_var("DATABASE_URL", url),
                None => std::env::remove_var("DATABASE_URL"),
            }
        }

        Self {
            _lock: lock,
            prev_database_url,
            prev_asset_dir,
        }
    }
}

impl Drop for TestEnvGuard {
    fn drop(&mut self) {
        // SAFETY: tests using TestEnvGuard are serialized by test_lock.
        unsafe {
            match &self.prev_database_url {
                Some(value) => std::env::set_var("DATABASE_URL", value),
                None => std::env::remove_var("DATABASE_URL"),
            }
            match &self.prev_asset_dir {
                Some(value) => std::env::set_var("SCHOOLS_ASSET_DIR", value),
                None => std::env::remove_var("SCHOOLS_ASSET_DIR"),
            }
        }
    }
}

/// A deployment rooted in a fresh temporary asset directory. The directory
/// lives as long as the returned guard.
pub async fn setup_deployment() -> (TempDir, DeploymentImpl) {
    setup_deployment_with_config(None).await
}

pub async fn setup_deployment_with_config(config_json: Option<&str>) -> (TempDir, DeploymentImpl) {
    let temp_root = tempfile::tempdir().unwrap();
    if let Some(config_json) = config_json {
        std::fs::write(temp_root.path().join("config.json"), config_json).unwrap();
    }

    let settings = DeploymentSettings::for_asset_dir(temp_root.path().to_path_buf());
    let deployment = DeploymentImpl::new(settings).await.unwrap();

    (temp_root, deployment)
}
