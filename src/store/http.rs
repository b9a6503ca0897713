use tracing::{debug, trace, warn};
use url::Url;

use crate::{
    config::{ConfigError, GalleryConfig},
    record::{ArtworkRecord, NewArtwork},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    #[error("unexpected status {code}: {body}")]
    Status {
        code: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to parse collection: {0}")]
    ParseJson(serde_json::Error),
}

pub struct HttpRecordStore {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpRecordStore {
    pub fn new(config: &GalleryConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint()?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

async fn status_error(response: reqwest::Response) -> Error {
    let code = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!(%code, body, "record store returned failure status");
    Error::Status { code, body }
}

impl super::RecordStore for HttpRecordStore {
    type Error = Error;

    async fn list(&self) -> Result<Vec<ArtworkRecord>, Self::Error> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(Error::Transport)?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let text = response.text().await.map_err(Error::Transport)?;
        trace!(size = text.len(), "collection response");
        let records =
            serde_json::from_str::<Vec<ArtworkRecord>>(&text).map_err(Error::ParseJson)?;
        debug!(count = records.len(), "fetched collection");
        Ok(records)
    }

    async fn create(&self, artwork: &NewArtwork) -> Result<(), Self::Error> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(artwork)
            .send()
            .await
            .map_err(Error::Transport)?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        debug!(status = %response.status(), title = artwork.title, "artwork accepted");
        Ok(())
    }
}
