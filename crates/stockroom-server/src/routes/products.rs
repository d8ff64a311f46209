// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Product listing, filtered search and index build handlers.

use axum::{
	extract::{Query, State},
	Json,
};
use stockroom_common_product::Product;
use stockroom_server_search_elastic::{build_query, IndexReport, ProductFilter};

use crate::{api::AppState, error::ServerError};

/// Raw query string of `GET /products/filter`. `price` stays text so a
/// malformed value disables the ceiling instead of rejecting the request.
#[derive(Debug, Default, PartialEq)]
pub struct FilterParams {
	pub category: Option<String>,
	pub name: Option<String>,
	pub price: Option<String>,
}

impl FilterParams {
	/// Picks the first value of each known key; repeats and unknown keys are
	/// ignored, so no query string is ever rejected.
	pub fn from_pairs(pairs: &[(String, String)]) -> Self {
		let first = |key: &str| {
			pairs
				.iter()
				.find(|(k, _)| k == key)
				.map(|(_, v)| v.clone())
		};
		Self {
			category: first("category"),
			name: first("name"),
			price: first("price"),
		}
	}

	pub fn to_filter(&self) -> ProductFilter {
		ProductFilter::from_params(
			self.category.as_deref(),
			self.name.as_deref(),
			self.price.as_deref(),
		)
	}
}

/// GET /products - Every product in the store, in id order.
#[tracing::instrument(skip(state))]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ServerError> {
	let products = state.products.list_products().await?;
	tracing::debug!(count = products.len(), "list_products: returning products");
	Ok(Json(products))
}

/// GET /products/filter - Products in the index matching every supplied criterion.
#[tracing::instrument(skip(state))]
pub async fn filter_products(
	State(state): State<AppState>,
	Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Product>>, ServerError> {
	let filter = FilterParams::from_pairs(&pairs).to_filter();
	let query = build_query(&filter);
	let products = state.search.search(&state.index_name, &query).await?;
	tracing::debug!(count = products.len(), "filter_products: returning matches");
	Ok(Json(products))
}

/// GET /products/create-indexes - Copies every stored product into the index.
#[tracing::instrument(skip(state))]
pub async fn create_indexes(State(state): State<AppState>) -> Result<Json<IndexReport>, ServerError> {
	let products = state.products.list_products().await?;
	tracing::info!(
		count = products.len(),
		index = %state.index_name,
		"create_indexes: indexing products"
	);
	let report = state.search.build_index(&state.index_name, &products).await?;
	Ok(Json(report))
}
