// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Router construction and shared application state.

use std::sync::Arc;

use axum::{routing::get, Router};
use stockroom_server_config::ServerConfig;
use stockroom_server_db::ProductStore;
use stockroom_server_search_elastic::{ElasticClient, RetryConfig, SearchError};

use crate::routes;

/// Handles every handler needs; cloned per request.
#[derive(Clone)]
pub struct AppState {
	pub products: Arc<dyn ProductStore>,
	pub search: Arc<ElasticClient>,
	pub index_name: String,
}

impl AppState {
	pub fn new(
		products: Arc<dyn ProductStore>,
		search: Arc<ElasticClient>,
		index_name: impl Into<String>,
	) -> Self {
		Self {
			products,
			search,
			index_name: index_name.into(),
		}
	}
}

/// Builds the search client described by `config.search`.
pub fn create_search_client(config: &ServerConfig) -> Result<ElasticClient, SearchError> {
	let search = &config.search;
	Ok(
		ElasticClient::with_timeout(&search.url, std::time::Duration::from_secs(search.timeout_secs))?
			.with_max_hits(search.max_hits)
			.with_retry_config(RetryConfig::with_max_attempts(search.retry_max_attempts)),
	)
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/products", get(routes::products::list_products))
		.route("/products/filter", get(routes::products::filter_products))
		.route(
			"/products/create-indexes",
			get(routes::products::create_indexes),
		)
		.with_state(state)
}
