// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::instrument::MusicalInstrument;
use crate::services::search::{ClusterInfo, Result, SearchBackend, SearchError};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

/// Elasticsearch REST client bound to a single index
pub struct ElasticsearchClient {
    http: reqwest::Client,
    base_url: Url,
    index: String,
}

#[derive(Debug, Deserialize)]
struct RawClusterInfo {
    #[serde(default)]
    cluster_name: Option<String>,
    #[serde(default)]
    version: Option<RawVersion>,
}

#[derive(Debug, Deserialize)]
struct RawVersion {
    #[serde(default)]
    number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<Value>,
}

impl ElasticsearchClient {
    /// Create a client for `host`, which may omit the scheme (`es01:9200`).
    ///
    /// No connection is made here; see [`SearchBackend::info`].
    pub fn new(host: &str, index: String, timeout: Duration) -> anyhow::Result<Self> {
        let url = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };

        let mut base_url =
            Url::parse(&url).with_context(|| format!("Invalid Elasticsearch URL: {url}"))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            index,
        })
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SearchError::BackendUnavailable(format!("Invalid endpoint {path}: {e}")))
    }

    /// Bulk-index instruments, refreshing the index so they are searchable
    /// immediately. Returns the number of documents sent.
    pub async fn index_documents(&self, docs: &[MusicalInstrument]) -> anyhow::Result<usize> {
        if docs.is_empty() {
            return Ok(0);
        }

        let mut ndjson = Vec::new();
        for doc in docs {
            serde_json::to_writer(&mut ndjson, &json!({ "index": { "_index": self.index } }))?;
            ndjson.push(b'\n');
            serde_json::to_writer(&mut ndjson, doc)?;
            ndjson.push(b'\n');
        }

        let mut url = self.endpoint(&format!("{}/_bulk", self.index))?;
        url.query_pairs_mut().append_pair("refresh", "true");

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(ndjson)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(rejected(status.as_u16(), &body).into());
        }

        let bulk: RawBulkResponse =
            serde_json::from_slice(&body).context("Failed to parse bulk response")?;
        if bulk.errors {
            let failed = bulk
                .items
                .iter()
                .filter(|item| item.pointer("/index/error").is_some())
                .count();
            anyhow::bail!("{} of {} documents failed to index", failed, docs.len());
        }

        tracing::info!(count = docs.len(), index = %self.index, "Indexed documents");
        Ok(docs.len())
    }
}

#[async_trait]
impl SearchBackend for ElasticsearchClient {
    async fn search(&self, body: &Value) -> Result<Vec<u8>> {
        let mut url = self.endpoint(&format!("{}/_search", self.index))?;
        url.query_pairs_mut().append_pair("track_total_hits", "true");

        let payload = serde_json::to_vec(body).map_err(|e| {
            SearchError::BackendUnavailable(format!("Failed to encode query: {e}"))
        })?;

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let err = rejected(status.as_u16(), &bytes);
            tracing::warn!(status = status.as_u16(), error = %err, "Search rejected by backend");
            return Err(err);
        }

        Ok(bytes.to_vec())
    }

    async fn info(&self) -> Result<ClusterInfo> {
        let response = self
            .http
            .get(self.base_url.clone())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(rejected(status.as_u16(), &bytes));
        }

        let raw: RawClusterInfo = serde_json::from_slice(&bytes).map_err(|e| {
            SearchError::MalformedBackendResponse(format!("invalid cluster info: {e}"))
        })?;

        let version = raw
            .version
            .and_then(|v| v.number)
            .ok_or_else(|| {
                SearchError::MalformedBackendResponse(
                    "cluster info has no version number".to_string(),
                )
            })?;

        Ok(ClusterInfo {
            cluster_name: raw.cluster_name,
            version,
        })
    }
}

fn transport_error(e: reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::BackendTimeout(e.to_string())
    } else {
        SearchError::BackendUnavailable(e.to_string())
    }
}

/// Build a rejection from an Elasticsearch error body, which is usually
/// `{"error": {"type": ..., "reason": ...}, "status": N}` but may be plain text.
fn rejected(status: u16, body: &[u8]) -> SearchError {
    let reason = match serde_json::from_slice::<Value>(body) {
        Ok(value) => match &value["error"] {
            Value::Object(error) => format!(
                "{}: {}",
                error.get("type").and_then(Value::as_str).unwrap_or("unknown"),
                error
                    .get("reason")
                    .and_then(Value::as_str)
                    .unwrap_or("no reason given")
            ),
            Value::String(message) => message.clone(),
            _ => value.to_string(),
        },
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    };

    SearchError::BackendRejected { status, reason }
}
