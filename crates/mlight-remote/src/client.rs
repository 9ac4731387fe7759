//! NeuronBrowser client
//!
//! Posts the two query shapes the engine needs and converts the wire rows
//! into index input. Requests carry a timeout; a timed-out request surfaces
//! as a transport error and is fatal like any other.

use crate::error::RemoteError;
use crate::wire::{BrainAreasData, Envelope, InjectionsData};
use mlight_core::{AreaRow, InjectionRow};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Injections query: sample date, neuron identity pairs, injection area
pub const INJECTIONS_QUERY: &str =
    "{injections {sample {sampleDate} neurons {idString tag} brainArea {name}}}";

/// Brain-area query: the full hierarchy as (id, name, parent) rows
pub const BRAIN_AREAS_QUERY: &str = "{brainAreas {structureId name parentStructureId}}";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the metadata service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Query endpoint URL
    pub base_url: String,
    /// Bearer token, required outside the dev manifold
    pub bearer_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Config for `base_url` with the default timeout and no auth
    #[inline]
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Attach a bearer token
    #[inline]
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Override the request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the NeuronBrowser metadata service
#[derive(Debug)]
pub struct NeuronBrowserClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl NeuronBrowserClient {
    /// Build a client from `config`
    ///
    /// # Errors
    /// Propagates HTTP client construction failures.
    pub fn new(config: ClientConfig) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Fetch all injection rows
    ///
    /// # Errors
    /// Any transport, status, or decode failure.
    pub async fn fetch_injections(&self) -> Result<Vec<InjectionRow>, RemoteError> {
        let data: InjectionsData = self.query(INJECTIONS_QUERY).await?;
        let rows: Vec<InjectionRow> = data.injections.into_iter().map(Into::into).collect();
        tracing::info!(count = rows.len(), "fetched injection rows");
        Ok(rows)
    }

    /// Fetch the full brain-area hierarchy
    ///
    /// # Errors
    /// Any transport, status, or decode failure.
    pub async fn fetch_brain_areas(&self) -> Result<Vec<AreaRow>, RemoteError> {
        let data: BrainAreasData = self.query(BRAIN_AREAS_QUERY).await?;
        let rows: Vec<AreaRow> = data.brain_areas.into_iter().map(Into::into).collect();
        tracing::info!(count = rows.len(), "fetched brain-area rows");
        Ok(rows)
    }

    async fn query<T: DeserializeOwned>(&self, query: &str) -> Result<T, RemoteError> {
        let mut request = self
            .http
            .post(&self.config.base_url)
            .json(&serde_json::json!({ "query": query }));
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                code: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        envelope.data.ok_or(RemoteError::MissingData)
    }
}
