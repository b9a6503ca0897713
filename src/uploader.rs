//! Upload form lifecycle: `Idle -> Editing -> Submitting -> Idle | Editing`.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    Error, ErrorDetail,
    collection::CollectionStore,
    ingest::{ImagePipeline, SelectedFile},
    record::UploadDraft,
    store::RecordStore,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploaderState {
    Idle,
    Editing(UploadDraft),
    Submitting(UploadDraft),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Title or image missing, or the uploader is not open. Nothing was sent.
    Incomplete,
    Created,
}

pub struct UploadFormController<S> {
    collection: Arc<CollectionStore<S>>,
    pipeline: Arc<ImagePipeline>,
    state: UploaderState,
}

impl<S: RecordStore> UploadFormController<S> {
    pub fn new(collection: Arc<CollectionStore<S>>, pipeline: Arc<ImagePipeline>) -> Self {
        Self {
            collection,
            pipeline,
            state: UploaderState::Idle,
        }
    }

    pub fn state(&self) -> &UploaderState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, UploaderState::Idle)
    }

    pub fn draft(&self) -> Option<&UploadDraft> {
        match &self.state {
            UploaderState::Idle => None,
            UploaderState::Editing(draft) | UploaderState::Submitting(draft) => Some(draft),
        }
    }

    pub fn open(&mut self) {
        if let UploaderState::Idle = self.state {
            debug!("uploader opened");
            self.state = UploaderState::Editing(UploadDraft::default());
        }
    }

    /// Discards the draft without asking.
    pub fn close(&mut self) {
        if self.is_open() {
            debug!("uploader closed");
        }
        self.state = UploaderState::Idle;
    }

    fn edit(&mut self, field: &'static str, apply: impl FnOnce(&mut UploadDraft)) {
        match &mut self.state {
            UploaderState::Editing(draft) => apply(draft),
            _ => debug!(field, "ignoring edit outside of editing"),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.edit("title", |draft| draft.title = title);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        self.edit("description", |draft| draft.description = description);
    }

    pub fn set_artist(&mut self, artist: impl Into<String>) {
        let artist = artist.into();
        self.edit("artist", |draft| draft.artist = artist);
    }

    pub fn set_tags_raw(&mut self, tags: impl Into<String>) {
        let tags = tags.into();
        self.edit("tags", |draft| draft.tags_raw = tags);
    }

    /// Encode `file` into the draft's image. A failed read leaves the draft untouched.
    pub async fn attach_image(&mut self, file: &SelectedFile) -> Result<(), Error> {
        if !matches!(self.state, UploaderState::Editing(_)) {
            debug!(file = file.name(), "ignoring image outside of editing");
            return Ok(());
        }
        let encoded = self
            .pipeline
            .encode(file)
            .await
            .map_err(|err| Error::read(ErrorDetail::Ingest(err)))?;
        let encoded = encoded.into_string();
        self.edit("image_data", |draft| draft.image_data = encoded);
        Ok(())
    }

    pub async fn submit(&mut self) -> Result<SubmitOutcome, Error> {
        let draft = match std::mem::replace(&mut self.state, UploaderState::Idle) {
            UploaderState::Editing(draft) if draft.is_submittable() => draft,
            other => {
                self.state = other;
                debug!("submit skipped: uploader closed, or title or image missing");
                return Ok(SubmitOutcome::Incomplete);
            }
        };
        let artwork = draft.to_new_artwork();
        self.state = UploaderState::Submitting(draft);
        let submitting = ReturnToEditing(&mut self.state);

        self.collection.create(&artwork).await?;
        *submitting.0 = UploaderState::Idle;
        info!(title = artwork.title, "upload finished");
        Ok(SubmitOutcome::Created)
    }
}

/// Puts a `Submitting` draft back into `Editing` unless the submission
/// finished. Covers a failed create and a dropped `submit` future alike.
struct ReturnToEditing<'a>(&'a mut UploaderState);

impl Drop for ReturnToEditing<'_> {
    fn drop(&mut self) {
        *self.0 = match std::mem::replace(self.0, UploaderState::Idle) {
            UploaderState::Submitting(draft) => UploaderState::Editing(draft),
            other => other,
        };
    }
}
