// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::instrument::MusicalInstrument;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /query`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// Free-text term matched against every searchable field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact-match constraints, all of which must hold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<InstrumentFilters>,
}

/// Structured filters. Absent or empty fields add no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Matches instruments tagged with any of these genres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryFilter>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Matches any of these sub-categories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_categories: Option<Vec<String>>,
}

/// Body of a successful `POST /query` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    /// Backend processing time, e.g. `"12ms"`
    pub took: String,
    /// Total number of matching documents, e.g. `"42"`
    pub hits: String,
    /// Matching instruments in backend relevance order
    pub results: Vec<MusicalInstrument>,
}
