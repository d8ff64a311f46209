// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the Stockroom server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`STOCKROOM_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use stockroom_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Indexing into {} at {}", config.search.index, config.search.url);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub search: SearchConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`STOCKROOM_SERVER_*`)
/// 2. Config file (`/etc/stockroom/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merge the given sources in precedence order and resolve the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let search = layer.search.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	search.validate().map_err(ConfigError::Validation)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		search_url = %search.url,
		search_index = %search.index,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		search,
		logging,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	struct FixedSource {
		precedence: Precedence,
		layer: ServerConfigLayer,
	}

	impl ConfigSource for FixedSource {
		fn name(&self) -> &'static str {
			"fixed"
		}

		fn precedence(&self) -> Precedence {
			self.precedence
		}

		fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
			Ok(self.layer.clone())
		}
	}

	fn index_layer(index: &str) -> ServerConfigLayer {
		ServerConfigLayer {
			search: Some(SearchConfigLayer {
				index: Some(index.to_string()),
				..Default::default()
			}),
			..Default::default()
		}
	}

	#[test]
	fn test_socket_addr() {
		let config = ServerConfig {
			http: HttpConfig {
				host: "127.0.0.1".to_string(),
				port: 9000,
			},
			..Default::default()
		};
		assert_eq!(config.socket_addr(), "127.0.0.1:9000");
	}

	#[test]
	fn test_higher_precedence_wins_regardless_of_order() {
		let config = load_from_sources(vec![
			Box::new(FixedSource {
				precedence: Precedence::Environment,
				layer: index_layer("from-env"),
			}),
			Box::new(FixedSource {
				precedence: Precedence::ConfigFile,
				layer: index_layer("from-file"),
			}),
		])
		.unwrap();
		assert_eq!(config.search.index, "from-env");
	}

	#[test]
	fn test_file_values_apply_over_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("server.toml");
		std::fs::write(
			&path,
			r#"
[search]
url = "http://search.internal:9200"
max_hits = 100
"#,
		)
		.unwrap();

		let config = load_from_sources(vec![
			Box::new(DefaultsSource),
			Box::new(TomlSource::new(&path)),
		])
		.unwrap();
		assert_eq!(config.search.url, "http://search.internal:9200");
		assert_eq!(config.search.max_hits, 100);
		assert_eq!(config.search.index, "products_index");
		assert_eq!(config.http.port, 8080);
	}

	#[test]
	fn test_invalid_search_config_is_rejected() {
		let layer = ServerConfigLayer {
			search: Some(SearchConfigLayer {
				max_hits: Some(0),
				..Default::default()
			}),
			..Default::default()
		};
		let result = load_from_sources(vec![Box::new(FixedSource {
			precedence: Precedence::ConfigFile,
			layer,
		})]);
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_uppercase_index_name_fails_at_load() {
		let layer = ServerConfigLayer {
			search: Some(SearchConfigLayer {
				index: Some("Products".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		let result = load_from_sources(vec![Box::new(FixedSource {
			precedence: Precedence::Environment,
			layer,
		})]);
		match result {
			Err(ConfigError::Validation(message)) => assert!(message.contains("lowercase")),
			other => panic!("expected validation error, got {other:?}"),
		}
	}
}
