// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! HTTP error mapping. Every error is answered with a plain-text body.

use crate::services::search::SearchError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequestBody(String),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("Failed to serialize response: {0}")]
    Serialization(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Search(SearchError::BackendTimeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Search(_) => StatusCode::BAD_GATEWAY,
            ApiError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::InvalidRequestBody(msg) => {
                tracing::warn!(error = %msg, "Rejected request body");
            }
            ApiError::Search(err) => {
                tracing::error!(error = %err, status = status.as_u16(), "Search failed");
            }
            ApiError::Serialization(msg) => {
                tracing::error!(error = %msg, "Response serialization failed");
            }
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
