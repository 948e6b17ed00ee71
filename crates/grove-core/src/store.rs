// ── Document store gateway ──
//
// The recipe store as seen by the runtime: read everything, write one
// document, replicate with an origin. `CouchStore` talks to a
// CouchDB-compatible server; `MemoryStore` keeps documents in process and
// can be told to fail, for tests and offline runs.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::BoxFuture;
use grove_api::CouchClient;
use tracing::debug;
use url::Url;

use crate::error::StoreError;
use crate::model::{PutConfirmation, Recipe, decode_recipes};

/// Persistence for recipe documents.
pub trait DocumentStore: Send + Sync {
    /// Every document, in store order.
    fn restore(&self) -> BoxFuture<'_, Result<Vec<Recipe>, StoreError>>;

    /// Write one document. The returned revision supersedes `recipe.rev`.
    fn put(&self, recipe: Recipe) -> BoxFuture<'_, Result<PutConfirmation, StoreError>>;

    /// Push local changes to `origin`, then pull remote changes back.
    fn sync(&self, origin: Url) -> BoxFuture<'_, Result<(), StoreError>>;
}

// ── CouchDB ──

#[derive(Debug, Clone)]
pub struct CouchStore {
    client: CouchClient,
}

impl CouchStore {
    pub fn new(client: CouchClient) -> Self {
        Self { client }
    }
}

impl DocumentStore for CouchStore {
    fn restore(&self) -> BoxFuture<'_, Result<Vec<Recipe>, StoreError>> {
        Box::pin(async move {
            let docs = self
                .client
                .all_docs::<serde_json::Value>()
                .await
                .map_err(StoreError::storage)?;
            Ok(decode_recipes(docs))
        })
    }

    fn put(&self, recipe: Recipe) -> BoxFuture<'_, Result<PutConfirmation, StoreError>> {
        Box::pin(async move {
            self.client
                .put(&recipe.id, &recipe)
                .await
                .map(PutConfirmation::from)
                .map_err(StoreError::storage)
        })
    }

    fn sync(&self, origin: Url) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            self.client
                .sync(&origin)
                .await
                .map_err(|e| StoreError::sync(&e))
        })
    }
}

// ── In-memory ──

#[derive(Debug, Default)]
struct MemoryState {
    docs: BTreeMap<String, Recipe>,
    /// Insertion order of ids in `docs`.
    order: Vec<String>,
    fail_restore: Option<StoreError>,
    fail_put: Option<StoreError>,
    fail_sync: Option<StoreError>,
    synced_with: Vec<Url>,
}

/// In-process store with CouchDB revision semantics.
///
/// A write whose `_rev` does not match the stored one is rejected with
/// `StoreError::Conflict`, like a real database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `docs`, each given a first revision.
    pub fn with_recipes(docs: impl IntoIterator<Item = Recipe>) -> Self {
        let store = Self::new();
        {
            let mut state = store.lock();
            for mut doc in docs {
                doc.rev = Some(next_rev(None));
                state.order.push(doc.id.clone());
                state.docs.insert(doc.id.clone(), doc);
            }
        }
        store
    }

    pub fn fail_restore(&self, err: StoreError) {
        self.lock().fail_restore = Some(err);
    }

    pub fn fail_put(&self, err: StoreError) {
        self.lock().fail_put = Some(err);
    }

    pub fn fail_sync(&self, err: StoreError) {
        self.lock().fail_sync = Some(err);
    }

    /// Origins passed to successful `sync` calls, oldest first.
    pub fn synced_with(&self) -> Vec<Url> {
        self.lock().synced_with.clone()
    }

    pub fn get(&self, id: &str) -> Option<Recipe> {
        self.lock().docs.get(id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn restore_now(&self) -> Result<Vec<Recipe>, StoreError> {
        let state = self.lock();
        if let Some(err) = state.fail_restore.clone() {
            return Err(err);
        }
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.docs.get(id).cloned())
            .collect())
    }

    fn put_now(&self, mut recipe: Recipe) -> Result<PutConfirmation, StoreError> {
        let mut state = self.lock();
        if let Some(err) = state.fail_put.clone() {
            return Err(err);
        }

        let current = state.docs.get(&recipe.id).and_then(|d| d.rev.clone());
        if current.is_some() && current != recipe.rev {
            return Err(StoreError::Conflict { id: recipe.id });
        }

        let rev = next_rev(current.as_deref());
        recipe.rev = Some(rev.clone());
        let id = recipe.id.clone();
        if state.docs.insert(id.clone(), recipe).is_none() {
            state.order.push(id.clone());
        }
        debug!(%id, %rev, "memory store write");
        Ok(PutConfirmation { id, rev })
    }

    fn sync_now(&self, origin: Url) -> Result<(), StoreError> {
        let mut state = self.lock();
        if let Some(err) = state.fail_sync.clone() {
            return Err(err);
        }
        state.synced_with.push(origin);
        Ok(())
    }
}

/// `N-memory` revision following `prev`.
fn next_rev(prev: Option<&str>) -> String {
    let generation = prev
        .and_then(|r| r.split_once('-'))
        .and_then(|(n, _)| n.parse::<u64>().ok())
        .unwrap_or(0);
    format!("{}-memory", generation + 1)
}

impl DocumentStore for MemoryStore {
    fn restore(&self) -> BoxFuture<'_, Result<Vec<Recipe>, StoreError>> {
        Box::pin(async move { self.restore_now() })
    }

    fn put(&self, recipe: Recipe) -> BoxFuture<'_, Result<PutConfirmation, StoreError>> {
        Box::pin(async move { self.put_now(recipe) })
    }

    fn sync(&self, origin: Url) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move { self.sync_now(origin) })
    }
}
