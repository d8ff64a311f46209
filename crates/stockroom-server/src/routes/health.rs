// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
	api::AppState,
	health::{self, HealthComponents, HealthResponse, HealthStatus},
};

/// GET /health - Database and search engine reachability.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let overall_start = tokio::time::Instant::now();

	let (database, search) = tokio::join!(
		health::check_database(state.products.as_ref()),
		health::check_search(&state.search)
	);

	let components = HealthComponents { database, search };
	let status = health::aggregate_status(&components);

	let response = HealthResponse {
		status,
		duration_ms: overall_start.elapsed().as_millis() as u64,
		version: env!("CARGO_PKG_VERSION"),
		components,
	};

	let http_status = match status {
		HealthStatus::Healthy => StatusCode::OK,
		HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};

	(http_status, Json(response))
}
