// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;
use stockroom_server_db::DbError;
use stockroom_server_search_elastic::SearchError;

/// Errors a request handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// Product store read failed.
	#[error("Database error: {0}")]
	Db(#[from] DbError),

	/// Search engine call failed.
	#[error("Search error: {0}")]
	Search(#[from] SearchError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl ErrorResponse {
	fn new(error: &str, message: &str) -> Self {
		Self {
			error: error.to_string(),
			message: message.to_string(),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, body) = match &self {
			ServerError::Db(e) => {
				tracing::error!(error = %e, "database error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("database_error", "A database error occurred"),
				)
			}
			ServerError::Search(SearchError::Timeout) => {
				tracing::error!("search engine timed out");
				(
					StatusCode::GATEWAY_TIMEOUT,
					ErrorResponse::new("upstream_timeout", "The search engine did not respond in time"),
				)
			}
			ServerError::Search(e) => {
				tracing::error!(error = %e, "search engine error");
				(
					StatusCode::BAD_GATEWAY,
					ErrorResponse::new("search_error", "The search engine request failed"),
				)
			}
		};

		(status, Json(body)).into_response()
	}
}
