//! The remote record store the gallery syncs against.
//!
//! [`http::HttpRecordStore`] talks to the real service; [`memory::MemoryRecordStore`]
//! keeps everything in process.

use crate::record::{ArtworkRecord, NewArtwork};

pub mod http;
pub mod memory;

pub trait RecordStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the whole collection, in store order.
    fn list(&self) -> impl Future<Output = Result<Vec<ArtworkRecord>, Self::Error>> + Send;

    /// Persist a new record. Nothing is read back from the response.
    fn create(&self, artwork: &NewArtwork)
    -> impl Future<Output = Result<(), Self::Error>> + Send;
}
