use std::path::Path;

use serde::Deserialize;
use url::Url;

const ART_PATH: [&str; 2] = ["api", "art"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config ({path}): {error}")]
    Read { path: String, error: std::io::Error },
    #[error("failed to parse config ({path}): {error}")]
    Parse {
        path: String,
        error: serde_yaml::Error,
    },
    #[error("backend URL cannot take a path: {0}")]
    NotABase(String),
}

fn default_fallback_media_type() -> String {
    mime::APPLICATION_OCTET_STREAM.to_string()
}

/// Settings shared by the record store client and the image pipeline.
/// Built once at startup and passed to both.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    pub backend_url: Url,
    #[serde(default = "default_fallback_media_type")]
    pub fallback_media_type: String,
}

impl GalleryConfig {
    pub fn new(backend_url: Url) -> Self {
        Self {
            backend_url,
            fallback_media_type: default_fallback_media_type(),
        }
    }

    pub async fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|error| ConfigError::Read {
                path: path.display().to_string(),
                error,
            })?;
        serde_yaml::from_str(&text).map_err(|error| ConfigError::Parse {
            path: path.display().to_string(),
            error,
        })
    }

    /// The collection endpoint: `api/art` appended to the backend URL's path.
    /// A query on the backend URL is kept, a fragment is dropped.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let mut endpoint = self.backend_url.clone();
        endpoint.set_fragment(None);
        endpoint
            .path_segments_mut()
            .map_err(|()| ConfigError::NotABase(self.backend_url.to_string()))?
            .pop_if_empty()
            .extend(ART_PATH);
        Ok(endpoint)
    }
}
