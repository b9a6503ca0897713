use std::collections::VecDeque;

use tokio::sync::{Mutex, oneshot};

use crate::record::{ArtworkId, ArtworkRecord, NewArtwork};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("injected {0} failure")]
    Injected(&'static str),
}

/// One request seen by the store, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(NewArtwork),
}

#[derive(Default)]
struct State {
    records: Vec<ArtworkRecord>,
    next_id: u64,
    calls: Vec<Call>,
    failing_lists: usize,
    failing_creates: usize,
    list_gates: VecDeque<oneshot::Receiver<()>>,
    create_gates: VecDeque<oneshot::Receiver<()>>,
}

/// Record store kept in process memory. Ids are assigned sequentially.
#[derive(Default)]
pub struct MemoryRecordStore {
    state: Mutex<State>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub async fn with_records(records: impl IntoIterator<Item = NewArtwork>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock().await;
            for artwork in records {
                insert(&mut state, artwork);
            }
        }
        store
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.state.lock().await.calls.clone()
    }

    pub async fn records(&self) -> Vec<ArtworkRecord> {
        self.state.lock().await.records.clone()
    }

    pub async fn fail_next_list(&self) {
        self.state.lock().await.failing_lists += 1;
    }

    pub async fn fail_next_create(&self) {
        self.state.lock().await.failing_creates += 1;
    }

    /// The next list request reads the records immediately but does not
    /// answer until the returned sender fires (or is dropped).
    pub async fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().await.list_gates.push_back(rx);
        tx
    }

    /// The next create request is logged but not stored until the returned
    /// sender fires (or is dropped).
    pub async fn hold_next_create(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().await.create_gates.push_back(rx);
        tx
    }
}

fn insert(state: &mut State, artwork: NewArtwork) {
    state.next_id += 1;
    let id = ArtworkId::Text(state.next_id.to_string());
    state.records.push(artwork.with_id(id));
}

impl super::RecordStore for MemoryRecordStore {
    type Error = Error;

    async fn list(&self) -> Result<Vec<ArtworkRecord>, Self::Error> {
        let (records, gate) = {
            let mut state = self.state.lock().await;
            state.calls.push(Call::List);
            if state.failing_lists > 0 {
                state.failing_lists -= 1;
                return Err(Error::Injected("list"));
            }
            (state.records.clone(), state.list_gates.pop_front())
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(records)
    }

    async fn create(&self, artwork: &NewArtwork) -> Result<(), Self::Error> {
        let gate = {
            let mut state = self.state.lock().await;
            state.calls.push(Call::Create(artwork.clone()));
            if state.failing_creates > 0 {
                state.failing_creates -= 1;
                return Err(Error::Injected("create"));
            }
            state.create_gates.pop_front()
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        insert(&mut *self.state.lock().await, artwork.clone());
        Ok(())
    }
}
