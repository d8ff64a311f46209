// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

/// A product as stored in the relational store and mirrored into the search
/// index. The JSON encoding is exactly `{id, name, category, price}` in both
/// places, so an indexed document decodes straight back into this type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
	/// Assigned by the store on insert; never changes afterwards.
	pub id: i64,
	pub name: String,
	pub category: String,
	pub price: f64,
}

/// A product that has not been inserted yet and so has no identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
	pub name: String,
	pub category: String,
	pub price: f64,
}

impl NewProduct {
	pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
		Self {
			name: name.into(),
			category: category.into(),
			price,
		}
	}

	pub fn with_id(self, id: i64) -> Product {
		Product {
			id,
			name: self.name,
			category: self.category,
			price: self.price,
		}
	}
}
