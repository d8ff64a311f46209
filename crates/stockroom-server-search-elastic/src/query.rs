// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Filter composition for product searches.
//!
//! A [`ProductFilter`] carries the three optional criteria accepted by the
//! filter endpoint. [`build_query`] turns it into a conjunctive [`BoolQuery`]:
//! text criteria become scored `match` clauses under `must`, the price ceiling
//! becomes a non-scoring `range` clause under `filter`. A query with no
//! clauses matches every document.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

pub const CATEGORY_FIELD: &str = "category";
pub const NAME_FIELD: &str = "name";
pub const PRICE_FIELD: &str = "price";

/// Criteria for a filtered product search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
	pub category: Option<String>,
	pub name: Option<String>,
	/// Inclusive ceiling; only applied when strictly greater than zero.
	pub max_price: f64,
}

impl ProductFilter {
	/// Builds a filter from raw request parameters. Empty strings count as
	/// absent and an unusable price disables the price ceiling.
	pub fn from_params(category: Option<&str>, name: Option<&str>, price: Option<&str>) -> Self {
		Self {
			category: non_empty(category),
			name: non_empty(name),
			max_price: parse_max_price(price),
		}
	}

	pub fn has_price_ceiling(&self) -> bool {
		self.max_price > 0.0
	}
}

fn non_empty(value: Option<&str>) -> Option<String> {
	value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Parses the `price` parameter. Absent, malformed and non-finite input all
/// yield `0.0`, which means "no price constraint" rather than an error.
pub fn parse_max_price(raw: Option<&str>) -> f64 {
	raw.and_then(|s| s.parse::<f64>().ok())
		.filter(|p| p.is_finite())
		.unwrap_or(0.0)
}

/// A single leaf criterion inside a bool query.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
	/// Tokenized, relevance-scored text match on one field.
	Match { field: String, query: String },
	/// Upper bound, inclusive.
	RangeLte { field: String, lte: f64 },
}

impl Serialize for Clause {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut outer = serializer.serialize_map(Some(1))?;
		match self {
			Clause::Match { field, query } => {
				outer.serialize_entry("match", &SingleEntry(field, query))?;
			}
			Clause::RangeLte { field, lte } => {
				outer.serialize_entry("range", &SingleEntry(field, &Lte { lte: *lte }))?;
			}
		}
		outer.end()
	}
}

struct SingleEntry<'a, V>(&'a str, &'a V);

impl<V: Serialize> Serialize for SingleEntry<'_, V> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(1))?;
		map.serialize_entry(self.0, self.1)?;
		map.end()
	}
}

#[derive(Serialize)]
struct Lte {
	lte: f64,
}

/// Conjunctive boolean query: every `must` clause has to match (and scores),
/// every `filter` clause has to match (without scoring).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
	must: Vec<Clause>,
	filter: Vec<Clause>,
}

impl BoolQuery {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn must(mut self, clause: Clause) -> Self {
		self.must.push(clause);
		self
	}

	pub fn filter(mut self, clause: Clause) -> Self {
		self.filter.push(clause);
		self
	}

	pub fn must_clauses(&self) -> &[Clause] {
		&self.must
	}

	pub fn filter_clauses(&self) -> &[Clause] {
		&self.filter
	}

	/// True when the query has no clauses and so matches every document.
	pub fn is_match_all(&self) -> bool {
		self.must.is_empty() && self.filter.is_empty()
	}
}

impl Serialize for BoolQuery {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		#[derive(Serialize)]
		struct Body<'a> {
			#[serde(skip_serializing_if = "no_clauses")]
			must: &'a [Clause],
			#[serde(skip_serializing_if = "no_clauses")]
			filter: &'a [Clause],
		}

		let mut outer = serializer.serialize_map(Some(1))?;
		outer.serialize_entry(
			"bool",
			&Body {
				must: &self.must,
				filter: &self.filter,
			},
		)?;
		outer.end()
	}
}

fn no_clauses(clauses: &&[Clause]) -> bool {
	clauses.is_empty()
}

/// Composes the bool query for `filter`.
pub fn build_query(filter: &ProductFilter) -> BoolQuery {
	let mut query = BoolQuery::new();

	if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
		query = query.must(Clause::Match {
			field: CATEGORY_FIELD.to_string(),
			query: category.to_string(),
		});
	}

	if let Some(name) = filter.name.as_deref().filter(|n| !n.is_empty()) {
		query = query.must(Clause::Match {
			field: NAME_FIELD.to_string(),
			query: name.to_string(),
		});
	}

	if filter.has_price_ceiling() {
		query = query.filter(Clause::RangeLte {
			field: PRICE_FIELD.to_string(),
			lte: filter.max_price,
		});
	}

	query
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use serde_json::json;

	#[test]
	fn no_criteria_is_match_all() {
		let query = build_query(&ProductFilter::default());
		assert!(query.is_match_all());
		assert_eq!(serde_json::to_value(&query).unwrap(), json!({"bool": {}}));
	}

	#[test]
	fn category_and_price_compose_conjunctively() {
		let filter = ProductFilter::from_params(Some("Lager"), None, Some("5.00"));
		let query = build_query(&filter);

		assert_eq!(
			serde_json::to_value(&query).unwrap(),
			json!({
				"bool": {
					"must": [{"match": {"category": "Lager"}}],
					"filter": [{"range": {"price": {"lte": 5.0}}}]
				}
			})
		);
	}

	#[test]
	fn all_three_criteria() {
		let filter = ProductFilter::from_params(Some("Ale"), Some("IPA"), Some("5.5"));
		let query = build_query(&filter);

		assert_eq!(query.must_clauses().len(), 2);
		assert_eq!(
			query.filter_clauses(),
			[Clause::RangeLte {
				field: "price".to_string(),
				lte: 5.5
			}]
		);
		assert_eq!(
			serde_json::to_value(&query).unwrap()["bool"]["must"][1],
			json!({"match": {"name": "IPA"}})
		);
	}

	#[test]
	fn malformed_price_matches_absent_price() {
		let with_garbage = ProductFilter::from_params(Some("Ale"), None, Some("abc"));
		let without = ProductFilter::from_params(Some("Ale"), None, None);
		assert_eq!(with_garbage, without);
		assert_eq!(build_query(&with_garbage), build_query(&without));
	}

	#[test]
	fn price_parsing_edge_cases() {
		assert_eq!(parse_max_price(None), 0.0);
		assert_eq!(parse_max_price(Some("")), 0.0);
		assert_eq!(parse_max_price(Some("abc")), 0.0);
		assert_eq!(parse_max_price(Some("NaN")), 0.0);
		assert_eq!(parse_max_price(Some("inf")), 0.0);
		assert_eq!(parse_max_price(Some("-3")), -3.0);
		assert_eq!(parse_max_price(Some("5.50")), 5.5);
	}

	#[test]
	fn non_positive_price_disables_ceiling() {
		for raw in ["0", "-1", "0.0"] {
			let query = build_query(&ProductFilter::from_params(None, None, Some(raw)));
			assert!(query.is_match_all(), "price {raw} should not filter");
		}
	}

	#[test]
	fn empty_strings_are_ignored() {
		let filter = ProductFilter::from_params(Some(""), Some(""), Some(""));
		assert_eq!(filter, ProductFilter::default());

		let direct = ProductFilter {
			category: Some(String::new()),
			name: Some(String::new()),
			max_price: 0.0,
		};
		assert!(build_query(&direct).is_match_all());
	}

	proptest! {
		#[test]
		fn clause_counts_follow_criteria(
			category in proptest::option::of(".{0,12}"),
			name in proptest::option::of(".{0,12}"),
			price in proptest::num::f64::ANY,
		) {
			let filter = ProductFilter {
				category: category.clone(),
				name: name.clone(),
				max_price: price,
			};
			let query = build_query(&filter);

			let expected_must = [category, name]
				.iter()
				.filter(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
				.count();
			prop_assert_eq!(query.must_clauses().len(), expected_must);
			prop_assert_eq!(query.filter_clauses().len(), usize::from(price > 0.0));
		}

		#[test]
		fn any_price_text_parses_without_error(raw in ".{0,16}") {
			let price = parse_max_price(Some(&raw));
			prop_assert!(price.is_finite());
		}
	}
}
