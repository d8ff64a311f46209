// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Elasticsearch REST client for the product index.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use stockroom_common_http::{retry, RetryConfig};
use stockroom_common_product::{index_name_problem, Product};
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::SearchError;
use crate::query::BoolQuery;
use crate::types::{
	ClusterInfo, ErrorBody, HitsTotal, IndexReport, RawHit, RootResponse, SearchRequestBody,
	SearchResponseBody,
};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// The engine's default `index.max_result_window`.
const DEFAULT_MAX_HITS: u32 = 10_000;

/// Client for writing product documents to, and searching, a named index.
#[derive(Debug, Clone)]
pub struct ElasticClient {
	http_client: Client,
	base_url: String,
	max_hits: u32,
	retry_config: RetryConfig,
}

impl ElasticClient {
	/// Creates a client for the engine at `base_url` with the default timeout.
	pub fn new(base_url: impl Into<String>) -> Result<Self, SearchError> {
		Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
	}

	pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SearchError> {
		let http_client = stockroom_common_http::new_client_with_timeout(timeout)
			.map_err(SearchError::ClientBuild)?;

		let base_url: String = base_url.into();
		Ok(Self {
			http_client,
			base_url: base_url.trim_end_matches('/').to_string(),
			max_hits: DEFAULT_MAX_HITS,
			retry_config: RetryConfig::default(),
		})
	}

	/// Sets how many hits each search request fetches.
	pub fn with_max_hits(mut self, max_hits: u32) -> Self {
		self.max_hits = max_hits;
		self
	}

	/// Sets a custom retry configuration for transport-level calls.
	pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
		self.retry_config = config;
		self
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Checks the engine is reachable and reports its cluster name and version.
	#[instrument(skip(self), fields(url = %self.base_url))]
	pub async fn ping(&self) -> Result<ClusterInfo, SearchError> {
		let url = format!("{}/", self.base_url);
		let body = self
			.execute("ping", || self.http_client.get(&url))
			.await?;

		let root: RootResponse = serde_json::from_str(&body).map_err(|e| {
			error!(error = %e, "Failed to parse cluster info");
			SearchError::InvalidResponse(format!("JSON parse error: {e}"))
		})?;

		Ok(ClusterInfo {
			cluster_name: root.cluster_name,
			version: root.version.number,
		})
	}

	/// Writes every product into `index`, one request at a time, keyed by the
	/// product id so a rebuild overwrites instead of duplicating. The first
	/// failed submission aborts the build; documents already written stay.
	#[instrument(skip(self, products), fields(count = products.len()))]
	pub async fn build_index(
		&self,
		index: &str,
		products: &[Product],
	) -> Result<IndexReport, SearchError> {
		validate_index_name(index)?;

		for product in products {
			self.index_document(index, product).await.map_err(|e| {
				error!(product_id = product.id, error = %e, "Indexing aborted");
				e
			})?;
		}

		if !products.is_empty() {
			self.refresh(index).await?;
		}

		info!(index, indexed = products.len(), "Index build completed");
		Ok(IndexReport {
			index: index.to_string(),
			indexed: products.len(),
		})
	}

	/// Upserts one product document under its own id.
	#[instrument(skip(self, product), fields(product_id = product.id))]
	pub async fn index_document(&self, index: &str, product: &Product) -> Result<(), SearchError> {
		validate_index_name(index)?;
		let url = format!("{}/{}/_doc/{}", self.base_url, index, product.id);
		let body = serde_json::to_vec(product)?;

		self.execute("index_document", || {
			self.http_client
				.put(&url)
				.header(reqwest::header::CONTENT_TYPE, "application/json")
				.body(body.clone())
		})
		.await?;

		trace!("document indexed");
		Ok(())
	}

	/// Makes recent writes to `index` visible to search.
	#[instrument(skip(self))]
	pub async fn refresh(&self, index: &str) -> Result<(), SearchError> {
		validate_index_name(index)?;
		let url = format!("{}/{}/_refresh", self.base_url, index);
		self.execute("refresh", || self.http_client.post(&url))
			.await?;
		Ok(())
	}

	/// Runs `query` against `index` and decodes every hit into a product.
	///
	/// Results are fetched `max_hits` at a time, best score first and then by
	/// product id, following `search_after` until every match has been read.
	/// A hit whose source does not decode is logged and left out; the rest
	/// are returned.
	#[instrument(skip(self, query), fields(match_all = query.is_match_all()))]
	pub async fn search(&self, index: &str, query: &BoolQuery) -> Result<Vec<Product>, SearchError> {
		validate_index_name(index)?;
		let url = format!("{}/{}/_search", self.base_url, index);
		let sort = json!([{"_score": "desc"}, {"id": {"order": "asc", "missing": "_last"}}]);
		let page_size = self.max_hits.max(1);

		let mut products = Vec::new();
		let mut received: u64 = 0;
		let mut total: Option<u64> = None;
		let mut search_after: Option<Value> = None;
		let mut pages = 0u32;

		loop {
			let request = SearchRequestBody {
				query,
				size: page_size,
				sort: &sort,
				track_total_hits: true,
				search_after: search_after.as_ref(),
			};
			let payload = serde_json::to_vec(&request)?;
			trace!(body = %String::from_utf8_lossy(&payload), "Search request");

			let body = self
				.execute("search", || {
					self.http_client
						.post(&url)
						.header(reqwest::header::CONTENT_TYPE, "application/json")
						.body(payload.clone())
				})
				.await?;

			let response: SearchResponseBody = serde_json::from_str(&body).map_err(|e| {
				error!(error = %e, "Failed to parse search response");
				SearchError::InvalidResponse(format!("JSON parse error: {e}"))
			})?;

			pages += 1;
			if total.is_none() {
				total = response.hits.total.as_ref().map(HitsTotal::value);
			}
			let page_len = response.hits.hits.len();
			received += page_len as u64;
			let next_after = response.hits.hits.last().and_then(|hit| hit.sort.clone());
			products.extend(response.hits.hits.into_iter().filter_map(decode_hit));

			let more_expected = total.map_or(true, |t| received < t);
			if page_len < page_size as usize || !more_expected {
				break;
			}
			match next_after {
				Some(after) => search_after = Some(after),
				None => break,
			}
		}

		if let Some(total) = total.filter(|t| received < *t) {
			warn!(total, received, "Search returned fewer hits than matched");
		}

		debug!(
			hits = received,
			decoded = products.len(),
			pages,
			"Search completed successfully"
		);
		Ok(products)
	}

	/// Sends the request built by `build` (rebuilt per attempt) with retries,
	/// returning the body of a successful response.
	async fn execute<F>(&self, operation: &str, build: F) -> Result<String, SearchError>
	where
		F: Fn() -> RequestBuilder,
	{
		retry(&self.retry_config, operation, || {
			let request = build();
			async move { send(request).await }
		})
		.await
	}
}

fn decode_hit(hit: RawHit) -> Option<Product> {
	let doc_id = hit.id.unwrap_or_default();
	let Some(source) = hit.source else {
		warn!(doc_id = %doc_id, "Skipping hit without _source");
		return None;
	};
	match serde_json::from_value::<Product>(source) {
		Ok(product) => Some(product),
		Err(e) => {
			warn!(doc_id = %doc_id, error = %e, "Skipping undecodable hit");
			None
		}
	}
}

async fn send(request: RequestBuilder) -> Result<String, SearchError> {
	let response = request.send().await.map_err(|e| {
		if e.is_timeout() {
			error!("Request timed out");
			return SearchError::Timeout;
		}
		error!(error = %e, "Network error during search engine request");
		SearchError::Network(e)
	})?;

	let status = response.status();
	debug!(status = %status, "Received response from search engine");

	let body = response.text().await.map_err(|e| {
		error!(error = %e, "Failed to read response body");
		SearchError::Network(e)
	})?;

	if !status.is_success() {
		let message = serde_json::from_str::<ErrorBody>(&body)
			.map(|b| b.error.describe())
			.unwrap_or(body);
		error!(status = status.as_u16(), message = %message, "Search engine error");
		return Err(SearchError::ApiError {
			status: status.as_u16(),
			message,
		});
	}

	Ok(body)
}

/// Rejects index names the engine would refuse or that cannot be placed in
/// a request path.
pub fn validate_index_name(index: &str) -> Result<(), SearchError> {
	match index_name_problem(index) {
		Some(problem) => {
			debug!(index, problem, "rejected index name");
			Err(SearchError::InvalidIndexName(index.to_string()))
		}
		None => Ok(()),
	}
}
