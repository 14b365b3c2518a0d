// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::search::{SearchRequest, SearchResponse};
use crate::services::query_builder::{build_query, search_body};
use crate::services::result_mapper::map_response;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Failures of a search round trip, after the request body has been accepted
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Malformed backend response: {0}")]
    MalformedBackendResponse(String),

    #[error("Search backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Search backend timed out: {0}")]
    BackendTimeout(String),

    #[error("Search backend rejected the request ({status}): {reason}")]
    BackendRejected { status: u16, reason: String },
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Identity of the cluster behind a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterInfo {
    pub cluster_name: Option<String>,
    pub version: String,
}

/// Document-search engine reachable through a query/response protocol.
///
/// Implemented by [`ElasticsearchClient`](crate::services::elasticsearch::ElasticsearchClient);
/// tests substitute an in-memory stub.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a `_search` with the given JSON body against the instrument index
    /// and return the raw response body.
    async fn search(&self, body: &Value) -> Result<Vec<u8>>;

    /// Fetch cluster name and version.
    async fn info(&self) -> Result<ClusterInfo>;
}

/// Runs client search requests against an injected backend
#[derive(Clone)]
pub struct SearchService {
    backend: Arc<dyn SearchBackend>,
}

impl SearchService {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Translate the request, execute it, and map the hits
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let query = build_query(request);
        let body = search_body(query.as_ref());

        tracing::debug!(
            leaves = query.as_ref().map_or(0, |q| q.leaf_count()),
            query = %body,
            "Built search query"
        );

        let raw = self.backend.search(&body).await?;
        let response = map_response(&raw)?;

        tracing::info!(
            took = %response.took,
            hits = %response.hits,
            returned = response.results.len(),
            "Search completed"
        );

        Ok(response)
    }

    pub async fn cluster_info(&self) -> Result<ClusterInfo> {
        self.backend.info().await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Backend returning a fixed outcome and recording every query body
    pub struct StubBackend {
        reply: Box<dyn Fn() -> Result<Vec<u8>> + Send + Sync>,
        pub bodies: Mutex<Vec<Value>>,
    }

    impl StubBackend {
        pub fn replying(body: Value) -> Self {
            let bytes = serde_json::to_vec(&body).unwrap();
            Self::with_reply(move || Ok(bytes.clone()))
        }

        pub fn with_reply(
            reply: impl Fn() -> Result<Vec<u8>> + Send + Sync + 'static,
        ) -> Self {
            Self {
                reply: Box::new(reply),
                bodies: Mutex::new(Vec::new()),
            }
        }

        pub fn last_body(&self) -> Value {
            self.bodies.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl SearchBackend for StubBackend {
        async fn search(&self, body: &Value) -> Result<Vec<u8>> {
            self.bodies.lock().unwrap().push(body.clone());
            (self.reply)()
        }

        async fn info(&self) -> Result<ClusterInfo> {
            Ok(ClusterInfo {
                cluster_name: Some("stub".to_string()),
                version: "8.15.0".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StubBackend;
    use super::*;
    use serde_json::json;

    fn telecaster_hits() -> Value {
        json!({
            "took": 4,
            "hits": {
                "total": {"value": 1, "relation": "eq"},
                "hits": [{
                    "_id": "1",
                    "_source": {
                        "make": "Fender",
                        "model": "Telecaster",
                        "genres": ["rock", "blues"],
                        "categories": [{"categoryName": "guitar", "subCategories": ["electric"]}]
                    }
                }]
            }
        })
    }

    #[tokio::test]
    async fn test_search_term_sends_single_should_branch() {
        let backend = Arc::new(StubBackend::replying(telecaster_hits()));
        let service = SearchService::new(backend.clone());

        let request: SearchRequest = serde_json::from_str(r#"{"search":"Telecaster"}"#).unwrap();
        let response = service.search(&request).await.unwrap();

        assert_eq!(response.took, "4ms");
        assert_eq!(response.hits, "1");
        assert_eq!(response.results[0].model.as_deref(), Some("Telecaster"));

        let body = backend.last_body();
        let should = body["query"]["bool"]["should"].as_array().unwrap();
        assert_eq!(should.len(), 5);
        assert!(should.iter().all(|clause| {
            clause["match"]
                .as_object()
                .is_some_and(|m| m.values().all(|v| v == "Telecaster"))
        }));
        assert!(body["query"]["bool"].get("must").is_none());
    }

    #[tokio::test]
    async fn test_filters_send_single_must_branch() {
        let backend = Arc::new(StubBackend::replying(telecaster_hits()));
        let service = SearchService::new(backend.clone());

        let request: SearchRequest = serde_json::from_str(
            r#"{"filters":{"make":"Gibson","categories":[{"categoryName":"guitar","subCategories":["acoustic","electric"]}]}}"#,
        )
        .unwrap();
        service.search(&request).await.unwrap();

        assert_eq!(
            backend.last_body(),
            json!({
                "query": {
                    "bool": {
                        "must": [
                            {"term": {"make.keyword": "Gibson"}},
                            {"term": {"categories.categoryName.keyword": "guitar"}},
                            {"terms": {"categories.subCategories.keyword": ["acoustic", "electric"]}}
                        ]
                    }
                }
            })
        );
    }

    #[tokio::test]
    async fn test_empty_request_sends_match_all() {
        let backend = Arc::new(StubBackend::replying(json!({"took": 1, "hits": {"hits": []}})));
        let service = SearchService::new(backend.clone());

        let response = service.search(&SearchRequest::default()).await.unwrap();

        assert!(response.results.is_empty());
        assert_eq!(backend.last_body(), json!({"query": {"match_all": {}}}));
    }

    #[tokio::test]
    async fn test_backend_error_propagates() {
        let backend = Arc::new(StubBackend::with_reply(|| {
            Err(SearchError::BackendUnavailable("connection refused".to_string()))
        }));
        let service = SearchService::new(backend);

        let err = service.search(&SearchRequest::default()).await.unwrap_err();
        assert!(matches!(err, SearchError::BackendUnavailable(_)));
    }

    #[tokio::test]
    async fn test_malformed_backend_response_propagates() {
        let backend = Arc::new(StubBackend::replying(json!({"took": 1})));
        let service = SearchService::new(backend);

        let err = service.search(&SearchRequest::default()).await.unwrap_err();
        assert!(matches!(err, SearchError::MalformedBackendResponse(_)));
    }

    #[tokio::test]
    async fn test_concurrent_searches_do_not_interfere() {
        let backend = Arc::new(StubBackend::replying(telecaster_hits()));
        let service = SearchService::new(backend.clone());

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    let request = SearchRequest {
                        search: Some(format!("term-{i}")),
                        filters: None,
                    };
                    service.search(&request).await.unwrap()
                })
            })
            .collect();

        for handle in handles {
            let response = handle.await.unwrap();
            assert_eq!(response.results.len(), 1);
        }
        assert_eq!(backend.bodies.lock().unwrap().len(), 10);
    }
}
