// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Translation of client search requests into Elasticsearch boolean queries.
//!
//! [`build_query`] produces a backend-agnostic [`QueryExpression`] tree;
//! [`search_body`] renders it as the JSON body of a `_search` call.

use crate::models::search::{CategoryFilter, InstrumentFilters, SearchRequest};
use serde_json::{json, Value};

/// Fields a free-text term is matched against, in clause order.
pub const SEARCHABLE_FIELDS: [&str; 5] = [
    "make",
    "model",
    "genres",
    "categories.categoryName",
    "categories.subCategories",
];

const MAKE_KEYWORD: &str = "make.keyword";
const MODEL_KEYWORD: &str = "model.keyword";
const GENRES_KEYWORD: &str = "genres.keyword";
const CATEGORY_NAME_KEYWORD: &str = "categories.categoryName.keyword";
const SUB_CATEGORIES_KEYWORD: &str = "categories.subCategories.keyword";

/// A boolean query tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryExpression {
    /// Full-text match of `value` against one analysed field
    Match { field: &'static str, value: String },
    /// Exact match on a keyword field
    Term { field: &'static str, value: String },
    /// Exact match of any of `values` on a keyword field
    Terms {
        field: &'static str,
        values: Vec<String>,
    },
    /// Every child must match
    AllOf(Vec<QueryExpression>),
    /// At least one child must match
    AnyOf(Vec<QueryExpression>),
}

impl QueryExpression {
    /// Number of leaf clauses in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            QueryExpression::Match { .. }
            | QueryExpression::Term { .. }
            | QueryExpression::Terms { .. } => 1,
            QueryExpression::AllOf(children) | QueryExpression::AnyOf(children) => {
                children.iter().map(QueryExpression::leaf_count).sum()
            }
        }
    }

    /// Render as Elasticsearch query DSL.
    pub fn to_elasticsearch(&self) -> Value {
        match self {
            QueryExpression::Match { field, value } => json!({ "match": { *field: value } }),
            QueryExpression::Term { field, value } => json!({ "term": { *field: value } }),
            QueryExpression::Terms { field, values } => json!({ "terms": { *field: values } }),
            QueryExpression::AllOf(children) => json!({
                "bool": {
                    "must": children.iter().map(QueryExpression::to_elasticsearch).collect::<Vec<_>>()
                }
            }),
            QueryExpression::AnyOf(children) => json!({
                "bool": {
                    "should": children.iter().map(QueryExpression::to_elasticsearch).collect::<Vec<_>>(),
                    "minimum_should_match": 1
                }
            }),
        }
    }
}

/// Build the query for a search request.
///
/// Returns `None` when the request carries neither a search term nor any
/// non-empty filter. Callers render that as match-all.
pub fn build_query(request: &SearchRequest) -> Option<QueryExpression> {
    let text = request.search.as_deref().and_then(text_branch);
    let filters = request.filters.as_ref().and_then(filter_branch);

    match (text, filters) {
        (Some(text), Some(filters)) => Some(QueryExpression::AllOf(vec![text, filters])),
        (Some(branch), None) | (None, Some(branch)) => Some(branch),
        (None, None) => None,
    }
}

/// JSON body for the `_search` endpoint.
pub fn search_body(query: Option<&QueryExpression>) -> Value {
    match query {
        Some(query) => json!({ "query": query.to_elasticsearch() }),
        None => json!({ "query": { "match_all": {} } }),
    }
}

fn text_branch(term: &str) -> Option<QueryExpression> {
    if term.is_empty() {
        return None;
    }

    let clauses = SEARCHABLE_FIELDS
        .into_iter()
        .map(|field| QueryExpression::Match {
            field,
            value: term.to_string(),
        })
        .collect();

    Some(QueryExpression::AnyOf(clauses))
}

fn filter_branch(filters: &InstrumentFilters) -> Option<QueryExpression> {
    let mut clauses = Vec::new();

    if let Some(make) = non_empty(filters.make.as_deref()) {
        clauses.push(term(MAKE_KEYWORD, make));
    }
    if let Some(model) = non_empty(filters.model.as_deref()) {
        clauses.push(term(MODEL_KEYWORD, model));
    }
    if let Some(genres) = non_empty_values(filters.genres.as_deref()) {
        clauses.push(QueryExpression::Terms {
            field: GENRES_KEYWORD,
            values: genres,
        });
    }
    for category in filters.categories.iter().flatten() {
        clauses.extend(category_clauses(category));
    }

    if clauses.is_empty() {
        None
    } else {
        Some(QueryExpression::AllOf(clauses))
    }
}

fn category_clauses(category: &CategoryFilter) -> Vec<QueryExpression> {
    let mut clauses = Vec::with_capacity(2);

    if let Some(name) = non_empty(category.category_name.as_deref()) {
        clauses.push(term(CATEGORY_NAME_KEYWORD, name));
    }
    if let Some(sub_categories) = non_empty_values(category.sub_categories.as_deref()) {
        clauses.push(QueryExpression::Terms {
            field: SUB_CATEGORIES_KEYWORD,
            values: sub_categories,
        });
    }

    clauses
}

fn term(field: &'static str, value: &str) -> QueryExpression {
    QueryExpression::Term {
        field,
        value: value.to_string(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn non_empty_values(values: Option<&[String]>) -> Option<Vec<String>> {
    let values: Vec<String> = values?
        .iter()
        .filter(|v| !v.is_empty())
        .cloned()
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
