// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the search engine client.

use reqwest::StatusCode;
use stockroom_common_http::{is_retryable_status, RetryableError};
use thiserror::Error;

/// Errors that can occur when talking to the search engine.
#[derive(Debug, Error)]
pub enum SearchError {
	/// The HTTP client could not be constructed.
	#[error("Failed to build HTTP client: {0}")]
	ClientBuild(#[source] reqwest::Error),

	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	/// Request timed out.
	#[error("Request timed out")]
	Timeout,

	/// The engine answered with a non-success status.
	#[error("Search engine error: {status} - {message}")]
	ApiError { status: u16, message: String },

	/// The response body was not the shape we expect.
	#[error("Invalid response from search engine: {0}")]
	InvalidResponse(String),

	/// A document could not be encoded for submission.
	#[error("Failed to encode document: {0}")]
	Serialization(#[from] serde_json::Error),

	/// The index name cannot be used in a request path.
	#[error("Invalid index name '{0}'")]
	InvalidIndexName(String),
}

impl RetryableError for SearchError {
	fn is_retryable(&self) -> bool {
		match self {
			SearchError::Network(e) => e.is_retryable(),
			SearchError::Timeout => true,
			SearchError::ApiError { status, .. } => StatusCode::from_u16(*status)
				.map(is_retryable_status)
				.unwrap_or(false),
			SearchError::ClientBuild(_)
			| SearchError::InvalidResponse(_)
			| SearchError::Serialization(_)
			| SearchError::InvalidIndexName(_) => false,
		}
	}
}
