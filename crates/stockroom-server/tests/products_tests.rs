// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for the product endpoints.
//!
//! Tests cover:
//! - Listing straight from the store
//! - Building the index from the store and searching it with filters
//! - Failure propagation from the store and the search engine

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
	body::Body,
	http::{Request, StatusCode},
	Router,
};
use serde_json::{json, Value};
use stockroom_common_product::{NewProduct, Product};
use stockroom_server::{create_router, AppState};
use stockroom_server_db::testing::create_product_test_pool;
use stockroom_server_db::{DbError, ProductRepository, ProductStore};
use stockroom_server_search_elastic::testing::FakeSearchEngine;
use stockroom_server_search_elastic::{ElasticClient, RetryConfig};
use tower::ServiceExt;
use wiremock::MockServer;

const INDEX: &str = "products_index";

struct TestApp {
	router: Router,
	repo: ProductRepository,
	engine: FakeSearchEngine,
	_server: MockServer,
}

impl TestApp {
	async fn get(&self, uri: &str) -> (StatusCode, Value) {
		let response = self
			.router
			.clone()
			.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
			.await
			.unwrap();
		let status = response.status();
		let body = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		(status, serde_json::from_slice(&body).unwrap())
	}

	async fn insert(&self, name: &str, category: &str, price: f64) -> Product {
		self.repo
			.insert_product(&NewProduct::new(name, category, price))
			.await
			.unwrap()
	}

	/// Inserts the three-product catalogue used across the filter tests.
	async fn with_beer_catalogue(self) -> Self {
		self.insert("Pilsner", "Lager", 4.50).await;
		self.insert("Stout", "Ale", 6.00).await;
		self.insert("IPA", "Ale", 5.50).await;
		let (status, _) = self.get("/products/create-indexes").await;
		assert_eq!(status, StatusCode::OK);
		self
	}
}

fn search_client(server: &MockServer) -> ElasticClient {
	ElasticClient::with_timeout(server.uri(), Duration::from_secs(5))
		.unwrap()
		.with_retry_config(RetryConfig::disabled())
}

async fn setup_test_app() -> TestApp {
	setup_test_app_with_page_size(10_000).await
}

async fn setup_test_app_with_page_size(max_hits: u32) -> TestApp {
	let pool = create_product_test_pool().await;
	let repo = ProductRepository::new(pool);
	let (server, engine) = FakeSearchEngine::start().await;
	let state = AppState::new(
		Arc::new(repo.clone()),
		Arc::new(search_client(&server).with_max_hits(max_hits)),
		INDEX,
	);
	TestApp {
		router: create_router(state),
		repo,
		engine,
		_server: server,
	}
}

fn ids(body: &Value) -> BTreeSet<i64> {
	body.as_array()
		.expect("array body")
		.iter()
		.map(|p| p["id"].as_i64().expect("numeric id"))
		.collect()
}

// ============================================================================
// GET /products
// ============================================================================

#[tokio::test]
async fn test_list_products_empty_store_is_empty_array() {
	let app = setup_test_app().await;
	let (status, body) = app.get("/products").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_products_returns_every_row_in_id_order() {
	let app = setup_test_app().await;
	app.insert("Pilsner", "Lager", 4.50).await;
	app.insert("Stout", "Ale", 6.00).await;

	let (status, body) = app.get("/products").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		body,
		json!([
			{"id": 1, "name": "Pilsner", "category": "Lager", "price": 4.5},
			{"id": 2, "name": "Stout", "category": "Ale", "price": 6.0}
		])
	);
}

// ============================================================================
// GET /products/create-indexes
// ============================================================================

#[tokio::test]
async fn test_create_indexes_reports_count() {
	let app = setup_test_app().await;
	app.insert("Pilsner", "Lager", 4.50).await;
	app.insert("Stout", "Ale", 6.00).await;

	let (status, body) = app.get("/products/create-indexes").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({"index": INDEX, "indexed": 2}));
	assert_eq!(app.engine.document_count(INDEX), 2);
}

#[tokio::test]
async fn test_create_indexes_rerun_does_not_duplicate() {
	let app = setup_test_app().await.with_beer_catalogue().await;
	let (status, _) = app.get("/products/create-indexes").await;
	assert_eq!(status, StatusCode::OK);

	assert_eq!(app.engine.document_count(INDEX), 3);
	let (_, body) = app.get("/products/filter").await;
	assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_create_indexes_with_empty_store() {
	let app = setup_test_app().await;
	let (status, body) = app.get("/products/create-indexes").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["indexed"], 0);
	assert!(app.engine.requests().is_empty());
}

// ============================================================================
// GET /products/filter
// ============================================================================

#[tokio::test]
async fn test_filter_without_criteria_returns_all_indexed() {
	let app = setup_test_app().await.with_beer_catalogue().await;
	let (status, body) = app.get("/products/filter").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(ids(&body), BTreeSet::from([1, 2, 3]));
}

#[tokio::test]
async fn test_filter_category_and_price_scenario() {
	let app = setup_test_app().await.with_beer_catalogue().await;
	let (status, body) = app.get("/products/filter?category=Ale&price=5.50").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		body,
		json!([{"id": 3, "name": "IPA", "category": "Ale", "price": 5.5}])
	);
}

#[tokio::test]
async fn test_filter_criteria_are_conjunctive() {
	let app = setup_test_app().await.with_beer_catalogue().await;

	let (_, body) = app.get("/products/filter?category=Lager&price=5.00").await;
	assert_eq!(ids(&body), BTreeSet::from([1]));

	let (_, body) = app.get("/products/filter?category=Lager&price=4.00").await;
	assert_eq!(ids(&body), BTreeSet::new());
}

#[tokio::test]
async fn test_filter_returns_every_match_beyond_page_size() {
	let app = setup_test_app_with_page_size(3).await;
	for n in 1..=5 {
		app.insert(&format!("Brew {n}"), "Ale", 5.0).await;
	}
	let (_, report) = app.get("/products/create-indexes").await;
	assert_eq!(report["indexed"], 5);

	let (status, body) = app.get("/products/filter").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(ids(&body), BTreeSet::from([1, 2, 3, 4, 5]));
	assert_eq!(body.as_array().unwrap().len(), 5);

	let (_, body) = app.get("/products/filter?category=Ale").await;
	assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_filter_repeated_params_use_first_value() {
	let app = setup_test_app().await.with_beer_catalogue().await;

	let (status, body) = app.get("/products/filter?price=5&price=abc").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(ids(&body), BTreeSet::from([1]));

	let (status, body) = app.get("/products/filter?price=abc&price=abc").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(ids(&body), BTreeSet::from([1, 2, 3]));

	let (status, body) = app
		.get("/products/filter?category=Lager&category=Ale&price=4.50")
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(ids(&body), BTreeSet::from([1]));
}

#[tokio::test]
async fn test_filter_price_boundary_is_inclusive() {
	let app = setup_test_app().await.with_beer_catalogue().await;
	let (_, body) = app.get("/products/filter?price=4.50").await;
	assert_eq!(ids(&body), BTreeSet::from([1]));
}

#[tokio::test]
async fn test_filter_malformed_price_is_ignored() {
	let app = setup_test_app().await.with_beer_catalogue().await;
	let (status, with_garbage) = app.get("/products/filter?category=Ale&price=abc").await;
	let (_, without) = app.get("/products/filter?category=Ale").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(ids(&with_garbage), ids(&without));
	assert_eq!(ids(&without), BTreeSet::from([2, 3]));
}

#[tokio::test]
async fn test_filter_by_name() {
	let app = setup_test_app().await.with_beer_catalogue().await;
	let (_, body) = app.get("/products/filter?name=stout").await;
	assert_eq!(ids(&body), BTreeSet::from([2]));
}

#[tokio::test]
async fn test_filter_empty_params_are_unconstrained() {
	let app = setup_test_app().await.with_beer_catalogue().await;
	let (_, body) = app.get("/products/filter?category=&name=&price=").await;
	assert_eq!(ids(&body), BTreeSet::from([1, 2, 3]));
}

#[tokio::test]
async fn test_filter_skips_undecodable_documents() {
	let app = setup_test_app().await.with_beer_catalogue().await;
	app.engine.insert_raw(
		INDEX,
		"99",
		json!({"id": "ninety-nine", "name": "Mystery", "category": "Ale", "price": 1.0}),
	);

	let (status, body) = app.get("/products/filter?category=Ale").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(ids(&body), BTreeSet::from([2, 3]));
}

#[tokio::test]
async fn test_filter_before_index_exists_is_bad_gateway() {
	let app = setup_test_app().await;
	let (status, body) = app.get("/products/filter?category=Ale").await;
	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(body["error"], "search_error");
	assert!(!body.to_string().contains("index_not_found_exception"));
}

#[tokio::test]
async fn test_filter_engine_failure_is_bad_gateway() {
	let app = setup_test_app().await.with_beer_catalogue().await;
	app.engine.fail_searches_with(500);

	let (status, body) = app.get("/products/filter").await;
	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert!(!body.to_string().contains("all shards failed"));
}

// ============================================================================
// Store failures
// ============================================================================

struct BrokenStore;

#[async_trait]
impl ProductStore for BrokenStore {
	async fn list_products(&self) -> Result<Vec<Product>, DbError> {
		Err(DbError::Internal("connection refused".to_string()))
	}

	async fn count_products(&self) -> Result<i64, DbError> {
		Err(DbError::Internal("connection refused".to_string()))
	}
}

async fn broken_store_app() -> (Router, FakeSearchEngine, MockServer) {
	let (server, engine) = FakeSearchEngine::start().await;
	let state = AppState::new(
		Arc::new(BrokenStore),
		Arc::new(search_client(&server)),
		INDEX,
	);
	(create_router(state), engine, server)
}

#[tokio::test]
async fn test_store_failure_on_list_is_internal_error() {
	let (router, _engine, _server) = broken_store_app().await;
	let response = router
		.oneshot(Request::builder().uri("/products").body(Body::empty()).unwrap())
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

	let body = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	let body: Value = serde_json::from_slice(&body).unwrap();
	assert_eq!(body["error"], "database_error");
	assert!(!body.to_string().contains("connection refused"));
}

#[tokio::test]
async fn test_store_failure_on_create_indexes_writes_nothing() {
	let (router, engine, _server) = broken_store_app().await;
	let response = router
		.oneshot(
			Request::builder()
				.uri("/products/create-indexes")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert!(engine.requests().is_empty());
}
