pub mod collection;
pub mod config;
pub mod ingest;
pub mod record;
pub mod store;
pub mod uploader;
pub mod view;

#[cfg(test)]
mod tests;

/// Which part of the session a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A selected file could not be turned into an encoded image.
    Read,
    /// The collection could not be fetched from the record store.
    Load,
    /// The record store did not accept a new artwork.
    Create,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Read => write!(f, "read failure"),
            FailureKind::Load => write!(f, "load failure"),
            FailureKind::Create => write!(f, "create failure"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct Error {
    pub kind: FailureKind,
    pub detail: Box<ErrorDetail>,
}

impl Error {
    pub fn read(detail: ErrorDetail) -> Self {
        Self::new(FailureKind::Read, detail)
    }

    pub fn load(detail: ErrorDetail) -> Self {
        Self::new(FailureKind::Load, detail)
    }

    pub fn create(detail: ErrorDetail) -> Self {
        Self::new(FailureKind::Create, detail)
    }

    fn new(kind: FailureKind, detail: ErrorDetail) -> Self {
        Self {
            kind,
            detail: Box::new(detail),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorDetail {
    #[error("Failed to ingest image: {0}")]
    Ingest(ingest::Error),
    #[error("Record store error: {0}")]
    Store(Box<dyn std::error::Error + Send + Sync>),
}

impl ErrorDetail {
    pub(crate) fn store(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Store(Box::new(error))
    }
}
