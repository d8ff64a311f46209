// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health check types and component checking logic.

use std::time::Duration;

use serde::Serialize;
use stockroom_server_db::ProductStore;
use stockroom_server_search_elastic::ElasticClient;
use tokio::time::{timeout, Instant};

const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(2);
const SEARCH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Health status for components and overall system.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
	pub status: HealthStatus,
	pub latency_ms: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub product_count: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchHealth {
	pub status: HealthStatus,
	pub latency_ms: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub cluster_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthComponents {
	pub database: DatabaseHealth,
	pub search: SearchHealth,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub duration_ms: u64,
	pub version: &'static str,
	pub components: HealthComponents,
}

pub async fn check_database(store: &dyn ProductStore) -> DatabaseHealth {
	let start = Instant::now();
	let result = timeout(DB_CHECK_TIMEOUT, store.count_products()).await;
	let latency_ms = start.elapsed().as_millis() as u64;

	match result {
		Ok(Ok(count)) => DatabaseHealth {
			status: HealthStatus::Healthy,
			latency_ms,
			product_count: Some(count),
			error: None,
		},
		Ok(Err(e)) => DatabaseHealth {
			status: HealthStatus::Unhealthy,
			latency_ms,
			product_count: None,
			error: Some(e.to_string()),
		},
		Err(_) => DatabaseHealth {
			status: HealthStatus::Unhealthy,
			latency_ms,
			product_count: None,
			error: Some("database health check timed out".to_string()),
		},
	}
}

pub async fn check_search(client: &ElasticClient) -> SearchHealth {
	let start = Instant::now();
	let result = timeout(SEARCH_CHECK_TIMEOUT, client.ping()).await;
	let latency_ms = start.elapsed().as_millis() as u64;

	match result {
		Ok(Ok(info)) => SearchHealth {
			status: HealthStatus::Healthy,
			latency_ms,
			cluster_name: Some(info.cluster_name),
			version: Some(info.version),
			error: None,
		},
		Ok(Err(e)) => SearchHealth {
			status: HealthStatus::Unhealthy,
			latency_ms,
			cluster_name: None,
			version: None,
			error: Some(e.to_string()),
		},
		Err(_) => SearchHealth {
			status: HealthStatus::Unhealthy,
			latency_ms,
			cluster_name: None,
			version: None,
			error: Some("search health check timed out".to_string()),
		},
	}
}

/// Unhealthy if any component is.
pub fn aggregate_status(components: &HealthComponents) -> HealthStatus {
	let statuses = [components.database.status, components.search.status];
	if statuses.contains(&HealthStatus::Unhealthy) {
		HealthStatus::Unhealthy
	} else {
		HealthStatus::Healthy
	}
}
