// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Reshaping of Elasticsearch `_search` responses into client results.
//!
//! The response is decoded through a partial schema: only the hit list and
//! each hit's `_source` are required. Instrument fields inside a source are
//! read leniently and coerced to strings where the index holds other scalars.

use crate::models::instrument::{Category, MusicalInstrument};
use crate::models::search::SearchResponse;
use crate::services::search::SearchError;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    took: Option<Value>,
    #[serde(default)]
    hits: Option<RawHits>,
}

#[derive(Debug, Deserialize)]
struct RawHits {
    /// A bare number on old clusters, `{"value": n, "relation": "eq"}` since 7.0
    #[serde(default)]
    total: Option<Value>,
    #[serde(default)]
    hits: Option<Vec<RawHit>>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id", default)]
    id: Option<Value>,
    #[serde(rename = "_source", default)]
    source: Option<Map<String, Value>>,
}

/// Map a raw `_search` response body to the client response.
pub fn map_response(body: &[u8]) -> Result<SearchResponse, SearchError> {
    let raw: RawSearchResponse = serde_json::from_slice(body)
        .map_err(|e| SearchError::MalformedBackendResponse(format!("invalid JSON: {e}")))?;

    let hits = raw.hits.ok_or_else(|| {
        SearchError::MalformedBackendResponse("response has no `hits` object".to_string())
    })?;
    let hit_list = hits.hits.ok_or_else(|| {
        SearchError::MalformedBackendResponse("response has no `hits.hits` list".to_string())
    })?;

    let took = raw.took.as_ref().and_then(as_integer).unwrap_or(0);
    let total = hits.total.as_ref().and_then(total_hits).unwrap_or(0);

    let mut results = Vec::with_capacity(hit_list.len());
    for (position, hit) in hit_list.into_iter().enumerate() {
        let source = hit.source.ok_or_else(|| {
            SearchError::MalformedBackendResponse(format!("hit {position} has no `_source`"))
        })?;

        let instrument = map_instrument(&source);
        tracing::debug!(
            id = %hit.id.as_ref().and_then(scalar_string).unwrap_or_default(),
            instrument = ?instrument,
            "Mapped search hit"
        );
        results.push(instrument);
    }

    Ok(SearchResponse {
        took: format!("{took}ms"),
        hits: total.to_string(),
        results,
    })
}

fn map_instrument(source: &Map<String, Value>) -> MusicalInstrument {
    MusicalInstrument {
        make: source.get("make").and_then(scalar_string),
        model: source.get("model").and_then(scalar_string),
        genres: source.get("genres").map(string_list).unwrap_or_default(),
        categories: source.get("categories").map(categories).unwrap_or_default(),
    }
}

fn categories(value: &Value) -> Vec<Category> {
    match value {
        Value::Array(items) => items.iter().filter_map(category).collect(),
        Value::Object(_) => category(value).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn category(value: &Value) -> Option<Category> {
    let entry = value.as_object()?;
    Some(Category {
        category_name: entry.get("categoryName").and_then(scalar_string),
        sub_categories: entry
            .get("subCategories")
            .map(string_list)
            .unwrap_or_default(),
    })
}

/// Elasticsearch stores a single value and a one-element array identically,
/// so a bare scalar counts as a list of one.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_string).collect(),
        other => scalar_string(other).into_iter().collect(),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn total_hits(value: &Value) -> Option<u64> {
    match value {
        Value::Object(total) => total.get("value").and_then(as_integer),
        other => as_integer(other),
    }
}

fn as_integer(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
}
