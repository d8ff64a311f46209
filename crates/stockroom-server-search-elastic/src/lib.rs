// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Elasticsearch client for the Stockroom product index.
//!
//! This crate writes product documents into a named index, composes the
//! conjunctive filter query used by the product search endpoint, and decodes
//! search hits back into [`Product`](stockroom_common_product::Product)s.

pub mod client;
pub mod error;
pub mod query;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::{validate_index_name, ElasticClient};
pub use error::SearchError;
pub use query::{build_query, parse_max_price, BoolQuery, Clause, ProductFilter};
pub use stockroom_common_http::RetryConfig;
pub use types::{ClusterInfo, IndexReport};
