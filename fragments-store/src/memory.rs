//! In-memory fragment store.
//!
//! Backs the test suites and embedders that have not configured a durable
//! backend. Both maps sit behind one mutex, so each individual store
//! operation is atomic; the entity's two-call write sequence is not.

use crate::{FragmentListing, FragmentRecord, FragmentStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

type Key = (String, String);

#[derive(Debug, Default)]
struct Maps {
    metadata: HashMap<Key, FragmentRecord>,
    payloads: HashMap<Key, Vec<u8>>,
}

/// A [`FragmentStore`] holding everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Maps>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Maps>> {
        self.inner
            .lock()
            .map_err(|err| StoreError::Backend(err.to_string()))
    }
}

fn key(owner_id: &str, id: &str) -> Key {
    (owner_id.to_string(), id.to_string())
}

#[async_trait]
impl FragmentStore for MemoryStore {
    async fn read_fragment(
        &self,
        owner_id: &str,
        id: &str,
    ) -> StoreResult<Option<FragmentRecord>> {
        Ok(self.lock()?.metadata.get(&key(owner_id, id)).cloned())
    }

    async fn write_fragment(&self, record: FragmentRecord) -> StoreResult<()> {
        let k = (record.owner_id.clone(), record.id.clone());
        self.lock()?.metadata.insert(k, record);
        Ok(())
    }

    async fn list_fragments(&self, owner_id: &str, expand: bool) -> StoreResult<FragmentListing> {
        let maps = self.lock()?;
        let mut records: Vec<FragmentRecord> = maps
            .metadata
            .values()
            .filter(|record| record.owner_id == owner_id)
            .cloned()
            .collect();
        // Map iteration order is arbitrary; sort for deterministic output.
        records.sort_by(|a, b| a.id.cmp(&b.id));

        if expand {
            Ok(FragmentListing::Records(records))
        } else {
            Ok(FragmentListing::Ids(
                records.into_iter().map(|record| record.id).collect(),
            ))
        }
    }

    async fn delete_fragment(&self, owner_id: &str, id: &str) -> StoreResult<()> {
        let mut maps = self.lock()?;
        let k = key(owner_id, id);
        if maps.metadata.remove(&k).is_none() {
            return Err(StoreError::NotFound(owner_id.to_string(), id.to_string()));
        }
        maps.payloads.remove(&k);
        Ok(())
    }

    async fn read_fragment_data(&self, owner_id: &str, id: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.lock()?.payloads.get(&key(owner_id, id)).cloned())
    }

    async fn write_fragment_data(
        &self,
        owner_id: &str,
        id: &str,
        data: Vec<u8>,
    ) -> StoreResult<()> {
        self.lock()?.payloads.insert(key(owner_id, id), data);
        Ok(())
    }
}
