use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const CURRENT_CONFIG_VERSION: &str = "v1";

const DEFAULT_MAX_IMAGE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

fn default_image_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "avif"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct ImageConfig {
    #[serde(alias = "maxSizeBytes")]
    pub max_size_bytes: u64,
    #[serde(alias = "allowedExtensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_IMAGE_SIZE_BYTES,
            allowed_extensions: default_image_extensions(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Config {
    #[serde(alias = "configVersion")]
    pub config_version: String,
    pub images: ImageConfig,
}

impl Config {
    pub fn from_raw(raw_config: &str) -> Self {
        match serde_json::from_str::<Config>(raw_config) {
            Ok(config) => config.normalized(),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse config (line {}, column {}): {}, using default",
                    e.line(),
                    e.column(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn normalized(mut self) -> Self {
        self.config_version = CURRENT_CONFIG_VERSION.to_string();

        if self.images.max_size_bytes == 0 {
            tracing::warn!("Image size limit of 0 bytes is not usable, resetting to default");
            self.images.max_size_bytes = DEFAULT_MAX_IMAGE_SIZE_BYTES;
        }

        let mut extensions: Vec<String> = Vec::new();
        for ext in &self.images.allowed_extensions {
            let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
            if !ext.is_empty() && !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
        if extensions.is_empty() {
            tracing::warn!("No allowed image extensions configured, resetting to default");
            extensions = default_image_extensions();
        }
        self.images.allowed_extensions = extensions;

        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: CURRENT_CONFIG_VERSION.to_string(),
            images: ImageConfig::default(),
        }
    }
}
