// ── Effect runtime ──
//
// Executes the tasks that update functions describe. Each I/O task runs
// on its own tokio task and its continuation's action is sent back over
// the channel the event loop drains, so results arrive in completion
// order. `Send` tasks are delivered straight away.

use std::sync::Arc;

use grove_api::{CouchClient, RemoteClient, TransportConfig};
use secrecy::ExposeSecret;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::config::GroveConfig;
use crate::effect::{Effects, Task};
use crate::error::CoreError;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::store::{CouchStore, DocumentStore};

pub struct Runtime<A> {
    store: Arc<dyn DocumentStore>,
    fetcher: Arc<dyn Fetcher>,
    tx: mpsc::UnboundedSender<A>,
}

impl<A> Clone for Runtime<A> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            fetcher: Arc::clone(&self.fetcher),
            tx: self.tx.clone(),
        }
    }
}

impl<A: Send + 'static> Runtime<A> {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        fetcher: Arc<dyn Fetcher>,
        tx: mpsc::UnboundedSender<A>,
    ) -> Self {
        Self { store, fetcher, tx }
    }

    /// Wire the HTTP-backed store and fetcher described by `config`.
    pub fn from_config(
        config: &GroveConfig,
        tx: mpsc::UnboundedSender<A>,
    ) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: config.tls.clone(),
            timeout: config.timeout,
        };

        let mut couch = CouchClient::new(config.recipes_local.clone(), &transport)?;
        if let Some(auth) = &config.auth {
            if auth.username.is_empty() || auth.password.expose_secret().is_empty() {
                return Err(CoreError::Config {
                    message: "database credentials need both a username and a password".into(),
                });
            }
            couch = couch.with_credentials(auth.username.clone(), auth.password.clone());
        }
        let remote = RemoteClient::new(&transport)?;

        debug!(
            local = %config.recipes_local,
            latest = %config.latest_url,
            "runtime configured"
        );

        Ok(Self::new(
            Arc::new(CouchStore::new(couch)),
            Arc::new(HttpFetcher::new(remote, config.start_recipe_url.clone())),
            tx,
        ))
    }

    /// Start every task in `effects`.
    ///
    /// Must be called from within a tokio runtime when `effects` holds any
    /// I/O task.
    pub fn run(&self, effects: Effects<A>) {
        for task in effects {
            self.spawn(task);
        }
    }

    fn spawn(&self, task: Task<A>) {
        debug!(kind = task.kind(), "running effect");
        let tx = self.tx.clone();
        match task {
            Task::Send(action) => deliver(&tx, action),
            Task::Get { url, then } => {
                let fetcher = Arc::clone(&self.fetcher);
                tokio::spawn(async move {
                    let result = fetcher.get(url).await;
                    deliver(&tx, then(result));
                });
            }
            Task::Restore { then } => {
                let store = Arc::clone(&self.store);
                tokio::spawn(async move {
                    let result = store.restore().await;
                    deliver(&tx, then(result));
                });
            }
            Task::Put { recipe, then } => {
                let store = Arc::clone(&self.store);
                tokio::spawn(async move {
                    let result = store.put(recipe).await;
                    deliver(&tx, then(result));
                });
            }
            Task::Sync { origin, then } => {
                let store = Arc::clone(&self.store);
                tokio::spawn(async move {
                    let result = store.sync(origin).await;
                    deliver(&tx, then(result));
                });
            }
            Task::StartRecipe { id, then } => {
                let fetcher = Arc::clone(&self.fetcher);
                tokio::spawn(async move {
                    let result = fetcher.start_recipe(id).await;
                    deliver(&tx, then(result));
                });
            }
        }
    }
}

fn deliver<A>(tx: &mpsc::UnboundedSender<A>, action: A) {
    if tx.send(action).is_err() {
        trace!("action dropped, event loop has shut down");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{FetchError, StoreError};
    use crate::fetch::MemoryFetcher;
    use crate::model::{DataPoint, Recipe, RecordSet, Variable};
    use crate::recipes;
    use crate::store::MemoryStore;
    use url::Url;

    struct Harness<A> {
        runtime: Runtime<A>,
        rx: mpsc::UnboundedReceiver<A>,
        store: Arc<MemoryStore>,
        fetcher: Arc<MemoryFetcher>,
    }

    fn harness<A: Send + 'static>(store: MemoryStore) -> Harness<A> {
        let (tx, rx) = mpsc::unbounded_channel();
        let store = Arc::new(store);
        let fetcher = Arc::new(MemoryFetcher::new());
        let runtime = Runtime::new(
            Arc::clone(&store) as Arc<dyn DocumentStore>,
            Arc::clone(&fetcher) as Arc<dyn Fetcher>,
            tx,
        );
        Harness {
            runtime,
            rx,
            store,
            fetcher,
        }
    }

    #[tokio::test]
    async fn send_is_delivered_immediately() {
        let mut h = harness::<u32>(MemoryStore::new());
        h.runtime.run(Effects::send(7));
        assert_eq!(h.rx.try_recv().unwrap(), 7);
    }

    #[tokio::test]
    async fn restore_feeds_result_back() {
        let mut h = harness(MemoryStore::with_recipes([Recipe::new("basil", "Basil")]));
        h.runtime.run(Effects::restore(recipes::Action::RestoredRecipes));

        let Some(recipes::Action::RestoredRecipes(Ok(docs))) = h.rx.recv().await else {
            panic!("expected restored recipes");
        };
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "basil");
    }

    #[tokio::test]
    async fn put_writes_to_store() {
        let mut h = harness(MemoryStore::new());
        let recipe = Recipe::new("kale", "Kale");
        h.runtime.run(Effects::put(recipe, |r| r));

        let confirmation = h.rx.recv().await.unwrap().unwrap();
        assert_eq!(confirmation.id, "kale");
        assert_eq!(h.store.get("kale").unwrap().rev, Some(confirmation.rev));
    }

    #[tokio::test]
    async fn sync_failure_is_reported() {
        let mut h = harness(MemoryStore::new());
        h.store.fail_sync(StoreError::Sync("unauthorized".into()));
        let origin = Url::parse("http://origin.local/recipes").unwrap();
        h.runtime.run(Effects::sync(origin, |r| r));

        assert_eq!(
            h.rx.recv().await.unwrap(),
            Err(StoreError::Sync("unauthorized".into()))
        );
    }

    #[tokio::test]
    async fn get_and_start_use_fetcher() {
        let mut h = harness(MemoryStore::new());
        let set = RecordSet::new(vec![DataPoint::new(Variable::AirTemperature, 20.0)]);
        h.fetcher.push(Ok(set.clone()));
        let url = Url::parse("http://device.local/latest").unwrap();

        h.runtime.run(Effects::get(url.clone(), |r| r.map(|s| s.rows.len())));
        assert_eq!(h.rx.recv().await.unwrap(), Ok(1));
        assert_eq!(h.fetcher.fetched(), vec![url]);

        h.fetcher.fail_start(FetchError::Status {
            status: 500,
            message: "busy".into(),
        });
        h.runtime.run(Effects::start_recipe("basil", |r| r.map(|()| 0)));
        assert!(h.rx.recv().await.unwrap().is_err());
        assert_eq!(h.fetcher.started(), vec!["basil".to_owned()]);
    }

    #[tokio::test]
    async fn closed_channel_does_not_panic() {
        let h = harness::<u32>(MemoryStore::new());
        drop(h.rx);
        h.runtime.run(Effects::send(1));
    }
}
