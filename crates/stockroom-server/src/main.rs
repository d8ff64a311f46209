// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Stockroom product server binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use stockroom_server::{create_router, create_search_client, AppState};
use stockroom_server_db::{ProductGenerator, ProductRepository};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

/// Stockroom server - product listing and filtered search over HTTP.
#[derive(Parser, Debug)]
#[command(
	name = "stockroom-server",
	about = "Stockroom product search server",
	version
)]
struct Args {
	/// Config file to use instead of /etc/stockroom/server.toml
	#[arg(long, env = "STOCKROOM_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Insert generated products into the database and exit
	Seed {
		/// Number of products to insert
		#[arg(long, default_value_t = 1000)]
		count: usize,

		/// Seed for the product generator, for reproducible catalogues
		#[arg(long)]
		rng_seed: Option<u64>,
	},
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => stockroom_server_config::load_config_with_file(path)?,
		None => stockroom_server_config::load_config()?,
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	let pool = stockroom_server_db::create_pool(&config.database.url).await?;
	stockroom_server_db::run_migrations(&pool).await?;
	let repository = ProductRepository::new(pool);

	if let Some(Command::Seed { count, rng_seed }) = args.command {
		let mut generator = match rng_seed {
			Some(seed) => ProductGenerator::with_seed(seed),
			None => ProductGenerator::new(),
		};
		let inserted = repository.seed_products(count, &mut generator).await?;
		let total = repository.count_products().await?;
		tracing::info!(inserted = inserted.len(), total, "seed complete");
		return Ok(());
	}

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		search = %config.search.url,
		"starting stockroom-server"
	);

	let search = create_search_client(&config)?;
	let cluster = search.ping().await?;
	tracing::info!(
		cluster_name = %cluster.cluster_name,
		version = %cluster.version,
		"connected to search engine"
	);

	let state = AppState::new(
		Arc::new(repository),
		Arc::new(search),
		config.search.index.clone(),
	);

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
