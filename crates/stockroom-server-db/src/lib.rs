// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # stockroom-server-db
//!
//! Persistence layer for the Stockroom product catalogue using SQLite via sqlx.
//!
//! ## Repository Pattern
//!
//! - **[`ProductStore`] trait**: the read interface the HTTP layer depends on
//! - **[`ProductRepository`] struct**: concrete implementation holding a `SqlitePool`
//!
//! ## Error Handling
//!
//! | Variant | When to use |
//! |---------|-------------|
//! | `Sqlx` | Let sqlx errors (query and row decode failures) propagate via `?` |
//! | `Internal` | Invalid configuration such as an unparseable database URL |
//!
//! Nothing in this crate aborts the process; every failure reaches the caller.

pub mod error;
pub mod pool;
pub mod product;
pub mod seed;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{DbError, Result};
pub use pool::{create_pool, run_migrations};
pub use product::{ProductRepository, ProductStore};
pub use seed::ProductGenerator;
