//! Turns a user selected file into a self-contained `data:` URL.
//!
//! No validation happens here: any file, image or not, is read and encoded.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::config::GalleryConfig;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read file ({path}): {error}")]
    ReadFailure { path: PathBuf, error: std::io::Error },
    #[error("not a data URL: {0}")]
    NotDataUrl(String),
    #[error("failed to decode data URL: {0}")]
    DecodeDataUrl(data_url::forgiving_base64::InvalidBase64),
}

/// A file picked from disk or dropped onto the uploader.
#[derive(Debug, Clone)]
pub enum SelectedFile {
    Path(PathBuf),
    Memory {
        name: String,
        media_type: Option<String>,
        body: Bytes,
    },
}

impl SelectedFile {
    pub fn name(&self) -> String {
        match self {
            SelectedFile::Path(path) => path.display().to_string(),
            SelectedFile::Memory { name, .. } => name.clone(),
        }
    }

    async fn read(&self) -> Result<Bytes, Error> {
        match self {
            SelectedFile::Path(path) => tokio::fs::read(path)
                .await
                .map(Bytes::from)
                .map_err(|error| Error::ReadFailure {
                    path: path.clone(),
                    error,
                }),
            SelectedFile::Memory { body, .. } => Ok(body.clone()),
        }
    }

    fn declared_media_type(&self) -> Option<&str> {
        match self {
            SelectedFile::Path(_) => None,
            SelectedFile::Memory { media_type, .. } => media_type.as_deref(),
        }
    }

    fn guess_path(&self) -> &Path {
        match self {
            SelectedFile::Path(path) => path,
            SelectedFile::Memory { name, .. } => Path::new(name),
        }
    }
}

impl From<PathBuf> for SelectedFile {
    fn from(path: PathBuf) -> Self {
        SelectedFile::Path(path)
    }
}

/// Image encoded as `data:<media-type>;base64,<content>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn media_type(&self) -> Result<String, Error> {
        let url = data_url::DataUrl::process(&self.0)
            .map_err(|error| Error::NotDataUrl(format!("{error:?}")))?;
        let mime = url.mime_type();
        Ok(format!("{}/{}", mime.type_, mime.subtype))
    }

    pub fn decode(&self) -> Result<Vec<u8>, Error> {
        decode(&self.0)
    }
}

impl std::fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decode the body of a `data:` URL string, as stored in `image_data`.
pub fn decode(src: &str) -> Result<Vec<u8>, Error> {
    let url = data_url::DataUrl::process(src)
        .map_err(|error| Error::NotDataUrl(format!("{error:?}")))?;
    let (body, _) = url.decode_to_vec().map_err(Error::DecodeDataUrl)?;
    Ok(body)
}

pub struct ImagePipeline {
    fallback_media_type: String,
}

impl ImagePipeline {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            fallback_media_type: config.fallback_media_type.clone(),
        }
    }

    fn media_type(&self, file: &SelectedFile) -> String {
        if let Some(declared) = file.declared_media_type().filter(|t| !t.is_empty()) {
            return declared.to_owned();
        }
        mime_guess::from_path(file.guess_path())
            .first_raw()
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| self.fallback_media_type.clone())
    }

    /// Reads the whole file and encodes it. The result is complete or absent.
    pub async fn encode(&self, file: &SelectedFile) -> Result<EncodedImage, Error> {
        let body = file.read().await.inspect_err(|error| {
            warn!(file = file.name(), %error, "failed to read selected file");
        })?;
        let media_type = self.media_type(file);
        let encoded = format!(
            "data:{media_type};base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&body)
        );
        debug!(
            file = file.name(),
            media_type,
            size = body.len(),
            "encoded image"
        );
        Ok(EncodedImage(encoded))
    }
}
