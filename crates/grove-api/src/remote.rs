// Remote view and command client
//
// Reads map/reduce view results (`{"rows": [{"value": ...}]}`) such as the
// latest environmental readings, and posts small JSON commands to the
// device API (e.g. starting a recipe).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{Error, preview};
use crate::transport::{TransportConfig, read_json};

/// Response of a view query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct ViewResponse<T> {
    #[serde(default)]
    pub total_rows: Option<u64>,
    #[serde(default)]
    pub rows: Vec<ViewRow<T>>,
}

/// One emitted view row. Only `value` is required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewRow<T> {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub key: serde_json::Value,
    pub value: T,
}

/// Plain HTTP client for views and command endpoints.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
}

impl RemoteClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self::with_client(transport.build_client()?))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// GET a view and decode its rows.
    pub async fn query_view<T: DeserializeOwned>(&self, url: &Url) -> Result<ViewResponse<T>, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url.clone()).send().await?;
        read_json(resp).await
    }

    /// POST a JSON command. Any 2xx counts as accepted; the body is ignored.
    pub async fn post_command<B: Serialize + Sync>(&self, url: &Url, body: &B) -> Result<(), Error> {
        debug!("POST {}", url);
        let resp = self.http.post(url.clone()).json(body).send().await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(Error::Status {
            status: status.as_u16(),
            message: preview(&body),
        })
    }

    /// Ask the device API to start the recipe with the given document id.
    pub async fn start_recipe(&self, url: &Url, recipe_id: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        struct StartRecipe<'a> {
            recipe_id: &'a str,
        }

        self.post_command(url, &StartRecipe { recipe_id }).await
    }
}
