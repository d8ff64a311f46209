// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Search engine configuration section.

use serde::{Deserialize, Serialize};
use stockroom_common_product::index_name_problem;

const DEFAULT_URL: &str = "http://localhost:9201";
const DEFAULT_INDEX: &str = "products_index";
/// The engine's default `index.max_result_window`.
const DEFAULT_MAX_HITS: u32 = 10_000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub index: Option<String>,
	#[serde(default)]
	pub max_hits: Option<u32>,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
	#[serde(default)]
	pub retry_max_attempts: Option<u32>,
}

impl SearchConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.index.is_some() {
			self.index = other.index;
		}
		if other.max_hits.is_some() {
			self.max_hits = other.max_hits;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
		if other.retry_max_attempts.is_some() {
			self.retry_max_attempts = other.retry_max_attempts;
		}
	}

	pub fn finalize(self) -> SearchConfig {
		SearchConfig {
			url: self
				.url
				.map(|u| u.trim_end_matches('/').to_string())
				.unwrap_or_else(|| DEFAULT_URL.to_string()),
			index: self.index.unwrap_or_else(|| DEFAULT_INDEX.to_string()),
			max_hits: self.max_hits.unwrap_or(DEFAULT_MAX_HITS),
			timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
			retry_max_attempts: self.retry_max_attempts.unwrap_or(DEFAULT_RETRY_MAX_ATTEMPTS),
		}
	}
}

/// Search engine connection and query settings (runtime, fully resolved).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
	/// Base URL of the engine's REST endpoint, without trailing slash.
	pub url: String,
	/// Name of the index holding product documents.
	pub index: String,
	/// Hits fetched per search request; larger result sets are paged.
	pub max_hits: u32,
	pub timeout_secs: u64,
	pub retry_max_attempts: u32,
}

impl Default for SearchConfig {
	fn default() -> Self {
		SearchConfigLayer::default().finalize()
	}
}

impl SearchConfig {
	pub(crate) fn validate(&self) -> Result<(), String> {
		if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
			return Err(format!("search url '{}' must be http(s)", self.url));
		}
		if let Some(problem) = index_name_problem(&self.index) {
			return Err(format!("search index name '{}' {problem}", self.index));
		}
		if self.max_hits == 0 {
			return Err("search max_hits must be greater than zero".to_string());
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = SearchConfig::default();
		assert_eq!(config.url, "http://localhost:9201");
		assert_eq!(config.index, "products_index");
		assert_eq!(config.max_hits, 10_000);
		assert_eq!(config.timeout_secs, 30);
		assert_eq!(config.retry_max_attempts, 3);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_trailing_slash_is_trimmed() {
		let layer = SearchConfigLayer {
			url: Some("http://es.internal:9200/".to_string()),
			..Default::default()
		};
		assert_eq!(layer.finalize().url, "http://es.internal:9200");
	}

	#[test]
	fn test_layer_merge() {
		let mut base = SearchConfigLayer {
			url: Some("http://a:9200".to_string()),
			index: Some("old".to_string()),
			..Default::default()
		};
		base.merge(SearchConfigLayer {
			index: Some("new".to_string()),
			max_hits: Some(50),
			..Default::default()
		});
		let config = base.finalize();
		assert_eq!(config.url, "http://a:9200");
		assert_eq!(config.index, "new");
		assert_eq!(config.max_hits, 50);
	}

	#[test]
	fn test_deserialize_partial() {
		let layer: SearchConfigLayer = toml::from_str(
			r#"
index = "beers"
max_hits = 250
"#,
		)
		.unwrap();
		assert_eq!(layer.index.as_deref(), Some("beers"));
		assert_eq!(layer.max_hits, Some(250));
		assert!(layer.url.is_none());
	}

	#[test]
	fn test_validation_rejects_bad_values() {
		let mut config = SearchConfig::default();
		config.max_hits = 0;
		assert!(config.validate().is_err());

		let mut config = SearchConfig::default();
		config.url = "localhost:9200".to_string();
		assert!(config.validate().is_err());

		let mut config = SearchConfig::default();
		config.index = " ".to_string();
		assert!(config.validate().is_err());
	}

	#[test]
	fn test_validation_applies_index_naming_rules() {
		for index in ["Products", "_products", "beer/lager", "a,b"] {
			let mut config = SearchConfig::default();
			config.index = index.to_string();
			let err = config.validate().unwrap_err();
			assert!(err.contains(index), "{err}");
		}

		let mut config = SearchConfig::default();
		config.index = "beers-2024".to_string();
		assert!(config.validate().is_ok());
	}
}
