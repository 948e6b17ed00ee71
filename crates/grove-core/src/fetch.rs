// ── Remote fetch gateway ──
//
// Reads of the latest-readings view and the recipe start command. The
// HTTP implementation wraps `grove_api::RemoteClient`; `MemoryFetcher`
// serves canned answers in tests.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::future::BoxFuture;
use grove_api::RemoteClient;
use url::Url;

use crate::error::FetchError;
use crate::model::RecordSet;

pub trait Fetcher: Send + Sync {
    fn get(&self, url: Url) -> BoxFuture<'_, Result<RecordSet, FetchError>>;

    fn start_recipe(&self, id: String) -> BoxFuture<'_, Result<(), FetchError>>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: RemoteClient,
    start_url: Url,
}

impl HttpFetcher {
    pub fn new(client: RemoteClient, start_url: Url) -> Self {
        Self { client, start_url }
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: Url) -> BoxFuture<'_, Result<RecordSet, FetchError>> {
        Box::pin(async move {
            let view = self.client.query_view::<serde_json::Value>(&url).await?;
            Ok(RecordSet::from(view))
        })
    }

    fn start_recipe(&self, id: String) -> BoxFuture<'_, Result<(), FetchError>> {
        Box::pin(async move {
            self.client
                .start_recipe(&self.start_url, &id)
                .await
                .map_err(FetchError::from)
        })
    }
}

#[derive(Debug, Default)]
struct Script {
    answers: VecDeque<Result<RecordSet, FetchError>>,
    start_result: Option<FetchError>,
    fetched: Vec<Url>,
    started: Vec<String>,
}

/// Fetcher replaying queued answers. An empty queue answers with an empty
/// record set.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    script: Mutex<Script>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, answer: Result<RecordSet, FetchError>) {
        self.lock().answers.push_back(answer);
    }

    pub fn fail_start(&self, err: FetchError) {
        self.lock().start_result = Some(err);
    }

    pub fn fetched(&self) -> Vec<Url> {
        self.lock().fetched.clone()
    }

    pub fn started(&self) -> Vec<String> {
        self.lock().started.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_now(&self, url: Url) -> Result<RecordSet, FetchError> {
        let mut script = self.lock();
        script.fetched.push(url);
        script
            .answers
            .pop_front()
            .unwrap_or_else(|| Ok(RecordSet::default()))
    }

    fn start_now(&self, id: String) -> Result<(), FetchError> {
        let mut script = self.lock();
        script.started.push(id);
        script.start_result.clone().map_or(Ok(()), Err)
    }
}

impl Fetcher for MemoryFetcher {
    fn get(&self, url: Url) -> BoxFuture<'_, Result<RecordSet, FetchError>> {
        Box::pin(async move { self.get_now(url) })
    }

    fn start_recipe(&self, id: String) -> BoxFuture<'_, Result<(), FetchError>> {
        Box::pin(async move { self.start_now(id) })
    }
}
