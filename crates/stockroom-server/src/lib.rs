// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Stockroom product server.
//!
//! Serves the product catalogue straight from SQLite, copies it into an
//! Elasticsearch index on demand, and answers filtered searches from that
//! index.

pub mod api;
pub mod error;
pub mod health;
pub mod routes;

pub use api::{create_router, create_search_client, AppState};
pub use error::ServerError;
pub use stockroom_server_config::ServerConfig;
