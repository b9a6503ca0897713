//! In-memory copy of the remote collection.
//!
//! Every read replaces the published list wholesale. Each `load` takes a
//! sequence token and its response is only applied while that token is the
//! newest one issued, so an older response arriving late never overwrites a
//! fresher request.

use std::sync::{
    Arc,
    atomic::{AtomicU64, AtomicUsize, Ordering},
};

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{
    Error, ErrorDetail,
    record::{ArtworkRecord, NewArtwork},
    store::RecordStore,
};

/// What the view renders: the last applied list and whether a load is running.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub items: Arc<[ArtworkRecord]>,
    pub loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { count: usize },
    /// A newer load was issued while this one was in flight.
    Superseded,
}

pub struct CollectionStore<S> {
    store: S,
    published: watch::Sender<Snapshot>,
    issued: AtomicU64,
    in_flight: AtomicUsize,
}

/// Settles one in-flight load when dropped, also when the `load` future is
/// dropped before its response arrives.
struct PendingLoad<'a, S> {
    collection: &'a CollectionStore<S>,
    items: Option<Arc<[ArtworkRecord]>>,
}

impl<S> Drop for PendingLoad<'_, S> {
    fn drop(&mut self) {
        let items = self.items.take();
        self.collection.published.send_modify(|snapshot| {
            let remaining = self.collection.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            snapshot.loading = remaining > 0;
            if let Some(items) = items {
                snapshot.items = items;
            }
        });
    }
}

impl<S: RecordStore> CollectionStore<S> {
    /// Starts out `loading` until the first load settles.
    pub fn new(store: S) -> Self {
        Self {
            store,
            published: watch::Sender::new(Snapshot {
                items: Arc::from(Vec::new()),
                loading: true,
            }),
            issued: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        self.published.borrow().clone()
    }

    pub fn items(&self) -> Arc<[ArtworkRecord]> {
        self.published.borrow().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.published.borrow().loading
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.published.subscribe()
    }

    /// Fetch the collection and publish it. On failure the previous list stays.
    pub async fn load(&self) -> Result<LoadOutcome, Error> {
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.published.send_modify(|snapshot| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            snapshot.loading = true;
        });
        let mut pending = PendingLoad {
            collection: self,
            items: None,
        };
        debug!(token, "loading collection");
        let result = self.store.list().await;
        let latest = token == self.issued.load(Ordering::SeqCst);
        match result {
            Ok(items) if latest => {
                let count = items.len();
                pending.items = Some(items.into());
                drop(pending);
                debug!(token, count, "collection published");
                Ok(LoadOutcome::Applied { count })
            }
            Ok(_) => {
                drop(pending);
                debug!(token, "discarding superseded collection response");
                Ok(LoadOutcome::Superseded)
            }
            Err(err) => {
                drop(pending);
                error!(token, error = %err, "failed to load collection");
                Err(Error::load(ErrorDetail::store(err)))
            }
        }
    }

    /// Send a new record, then re-read the collection. Nothing is inserted locally.
    pub async fn create(&self, artwork: &NewArtwork) -> Result<(), Error> {
        if let Err(err) = self.store.create(artwork).await {
            warn!(title = artwork.title, error = %err, "record store rejected artwork");
            return Err(Error::create(ErrorDetail::store(err)));
        }
        info!(title = artwork.title, tags = artwork.tags.len(), "artwork created");
        if let Err(err) = self.load().await {
            warn!(error = %err, "refresh after create failed");
        }
        Ok(())
    }
}
