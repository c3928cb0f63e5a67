//! Molecule search backend client
//!
//! Two calls, both attempted exactly once:
//! - `GET /models` → JSON array of option names
//! - `POST /search` → `{grid_html, SMILES, o_dist, svg}`

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::{ConfigError, Endpoint, SearchFailure, TransportKind};
use crate::model::{MoleculeResult, SearchRequest};

/// Content type sent with every search body
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// The backend as the session controller sees it
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Option names for the filter panel, in backend order
    async fn fetch_models(&self) -> Result<Vec<String>, SearchFailure>;

    /// Run one search
    async fn search(&self, request: &SearchRequest) -> Result<MoleculeResult, SearchFailure>;
}

/// reqwest-backed implementation of [`SearchBackend`]
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    client: Client,
    models_url: String,
    search_url: String,
}

impl HttpSearchClient {
    /// Build a client for the configured backend
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            models_url: config.models_url(),
            search_url: config.search_url(),
        })
    }

    pub fn models_url(&self) -> &str {
        &self.models_url
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    #[instrument(skip_all, fields(url = %self.models_url))]
    async fn fetch_models(&self) -> Result<Vec<String>, SearchFailure> {
        let response = self
            .client
            .get(&self.models_url)
            .send()
            .await
            .map_err(|e| transport(Endpoint::Models, e))?;

        let names: Vec<String> = read_json(Endpoint::Models, response).await?;
        debug!(count = names.len(), "fetched option names");
        Ok(names)
    }

    #[instrument(skip_all, fields(url = %self.search_url, query = %request.query))]
    async fn search(&self, request: &SearchRequest) -> Result<MoleculeResult, SearchFailure> {
        let body = serde_json::to_vec(request).map_err(|e| {
            SearchFailure::transport(Endpoint::Search, TransportKind::Other, e.to_string())
        })?;

        let response = self
            .client
            .post(&self.search_url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| transport(Endpoint::Search, e))?;

        let result: MoleculeResult = read_json(Endpoint::Search, response).await?;
        debug!(smiles = %result.smiles, "search succeeded");
        Ok(result)
    }
}

/// Non-2xx → `Http` with the raw body; unreadable or malformed body → `Transport`
async fn read_json<T>(endpoint: Endpoint, response: Response) -> Result<T, SearchFailure>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SearchFailure::http(
            endpoint,
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            body,
        ));
    }

    let text = response.text().await.map_err(|e| transport(endpoint, e))?;
    serde_json::from_str(&text).map_err(|e| {
        SearchFailure::transport(
            endpoint,
            TransportKind::Decode,
            format!("invalid response body: {}", e),
        )
    })
}

fn transport(endpoint: Endpoint, err: reqwest::Error) -> SearchFailure {
    let kind = if err.is_connect() {
        TransportKind::Connect
    } else if err.is_decode() || err.is_body() {
        TransportKind::Decode
    } else {
        TransportKind::Other
    };
    SearchFailure::transport(endpoint, kind, err.to_string())
}
