use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const PROJECT_ROOT: &str = env!("CARGO_MANIFEST_DIR");
const ASSET_DIR_ENV: &str = "SCHOOLS_ASSET_DIR";

/// Directory name under the asset root that holds uploaded school images.
/// Stored image paths use the same name as their URL prefix.
pub const SCHOOL_IMAGES_DIR: &str = "schoolImages";

/// Root directory for the database, config file and uploaded images.
pub fn asset_dir() -> std::io::Result<PathBuf> {
    if let Ok(override_dir) = std::env::var(ASSET_DIR_ENV) {
        let override_dir = override_dir.trim();
        if !override_dir.is_empty() {
            let path = PathBuf::from(override_dir);
            ensure_dir(&path)?;
            return Ok(path);
        }
    }

    let path = if cfg!(debug_assertions) {
        PathBuf::from(PROJECT_ROOT).join("../../dev_assets")
    } else {
        ProjectDirs::from("dev", "schools", "school-directory")
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "OS didn't give us a home directory",
                )
            })?
            .data_dir()
            .to_path_buf()
    };

    ensure_dir(&path)?;
    Ok(path)
}

pub fn config_path(asset_dir: &Path) -> PathBuf {
    asset_dir.join("config.json")
}

pub fn database_path(asset_dir: &Path) -> PathBuf {
    asset_dir.join("db.sqlite")
}

pub fn school_images_dir(asset_dir: &Path) -> PathBuf {
    asset_dir.join(SCHOOL_IMAGES_DIR)
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
