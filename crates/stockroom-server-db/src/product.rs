// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Product repository: the relational source of truth for the search index.

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, Row};
use stockroom_common_product::{NewProduct, Product};

use crate::error::DbError;
use crate::seed::ProductGenerator;

#[derive(Clone)]
pub struct ProductRepository {
	pool: SqlitePool,
}

impl ProductRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// Full, unconditional scan of the `products` table in id order.
	#[tracing::instrument(skip(self))]
	pub async fn list_products(&self) -> Result<Vec<Product>, DbError> {
		let rows = sqlx::query("SELECT id, name, category, price FROM products ORDER BY id")
			.fetch_all(&self.pool)
			.await?;

		let products = rows
			.iter()
			.map(row_to_product)
			.collect::<Result<Vec<_>, _>>()?;

		tracing::debug!(count = products.len(), "listed products");
		Ok(products)
	}

	#[tracing::instrument(skip(self, product), fields(name = %product.name))]
	pub async fn insert_product(&self, product: &NewProduct) -> Result<Product, DbError> {
		let result = sqlx::query("INSERT INTO products (name, category, price) VALUES (?1, ?2, ?3)")
			.bind(&product.name)
			.bind(&product.category)
			.bind(product.price)
			.execute(&self.pool)
			.await?;

		Ok(product.clone().with_id(result.last_insert_rowid()))
	}

	#[tracing::instrument(skip(self))]
	pub async fn count_products(&self) -> Result<i64, DbError> {
		let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
			.fetch_one(&self.pool)
			.await?;
		Ok(count)
	}

	/// Insert `count` generated products in a single transaction.
	#[tracing::instrument(skip(self, generator))]
	pub async fn seed_products(
		&self,
		count: usize,
		generator: &mut ProductGenerator,
	) -> Result<Vec<Product>, DbError> {
		let mut tx = self.pool.begin().await?;
		let mut inserted = Vec::with_capacity(count);

		for _ in 0..count {
			let product = generator.next_product();
			let result =
				sqlx::query("INSERT INTO products (name, category, price) VALUES (?1, ?2, ?3)")
					.bind(&product.name)
					.bind(&product.category)
					.bind(product.price)
					.execute(&mut *tx)
					.await?;
			inserted.push(product.with_id(result.last_insert_rowid()));
		}

		tx.commit().await?;
		tracing::info!(count = inserted.len(), "seeded products");
		Ok(inserted)
	}
}

fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, DbError> {
	Ok(Product {
		id: row.try_get("id")?,
		name: row.try_get("name")?,
		category: row.try_get("category")?,
		price: row.try_get("price")?,
	})
}

#[async_trait]
pub trait ProductStore: Send + Sync {
	async fn list_products(&self) -> Result<Vec<Product>, DbError>;
	async fn count_products(&self) -> Result<i64, DbError>;
}

#[async_trait]
impl ProductStore for ProductRepository {
	async fn list_products(&self) -> Result<Vec<Product>, DbError> {
		self.list_products().await
	}

	async fn count_products(&self) -> Result<i64, DbError> {
		self.count_products().await
	}
}
