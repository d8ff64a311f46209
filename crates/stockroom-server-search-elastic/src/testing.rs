// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-process stand-in for the search engine, served through wiremock.
//!
//! [`FakeSearchEngine`] keeps documents per index and evaluates the subset of
//! the query DSL that [`build_query`](crate::query::build_query) emits:
//! `match` (any lowercase token in common), `range` with `lte`, and paging
//! through `size` and `search_after`. Writes become searchable only after
//! `_refresh`, like the real engine.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{json, Value};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const FAKE_CLUSTER_NAME: &str = "stockroom-test";
pub const FAKE_VERSION: &str = "7.17.0";

#[derive(Debug, Default)]
struct FakeIndex {
	visible: Vec<(String, Value)>,
	pending: Vec<(String, Value)>,
}

impl FakeIndex {
	fn upsert(docs: &mut Vec<(String, Value)>, id: String, source: Value) {
		match docs.iter_mut().find(|(existing, _)| *existing == id) {
			Some(slot) => slot.1 = source,
			None => docs.push((id, source)),
		}
	}

	fn refresh(&mut self) {
		for (id, source) in std::mem::take(&mut self.pending) {
			Self::upsert(&mut self.visible, id, source);
		}
	}
}

#[derive(Debug, Default)]
struct State {
	indices: BTreeMap<String, FakeIndex>,
	search_failure: Option<u16>,
	requests: Vec<String>,
}

/// Shared handle to the fake engine; clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct FakeSearchEngine {
	state: Arc<Mutex<State>>,
}

impl FakeSearchEngine {
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts a mock server answering every request with this engine.
	pub async fn start() -> (MockServer, Self) {
		let server = MockServer::start().await;
		let engine = Self::new();
		Mock::given(any())
			.respond_with(engine.clone())
			.mount(&server)
			.await;
		(server, engine)
	}

	/// Stores a searchable document without going through the HTTP API.
	pub fn insert_raw(&self, index: &str, id: &str, source: Value) {
		let mut state = self.lock();
		let idx = state.indices.entry(index.to_string()).or_default();
		FakeIndex::upsert(&mut idx.visible, id.to_string(), source);
	}

	/// Number of searchable documents in `index`.
	pub fn document_count(&self, index: &str) -> usize {
		self.lock()
			.indices
			.get(index)
			.map_or(0, |idx| idx.visible.len())
	}

	pub fn has_index(&self, index: &str) -> bool {
		self.lock().indices.contains_key(index)
	}

	/// Makes every subsequent `_search` answer with `status`.
	pub fn fail_searches_with(&self, status: u16) {
		self.lock().search_failure = Some(status);
	}

	/// `METHOD path` of every request seen, in arrival order.
	pub fn requests(&self) -> Vec<String> {
		self.lock().requests.clone()
	}

	fn lock(&self) -> MutexGuard<'_, State> {
		match self.state.lock() {
			Ok(guard) => guard,
			Err(poisoned) => poisoned.into_inner(),
		}
	}
}

impl Respond for FakeSearchEngine {
	fn respond(&self, request: &Request) -> ResponseTemplate {
		let method = request.method.as_str().to_string();
		let path = request.url.path().to_string();
		let mut state = self.lock();
		state.requests.push(format!("{method} {path}"));

		let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
		match (method.as_str(), segments.as_slice()) {
			("GET", [""]) => ResponseTemplate::new(200).set_body_json(json!({
				"name": "fake-node",
				"cluster_name": FAKE_CLUSTER_NAME,
				"version": {"number": FAKE_VERSION},
				"tagline": "You Know, for Search"
			})),
			("PUT", [index, "_doc", id]) => {
				let source: Value = match serde_json::from_slice(&request.body) {
					Ok(source) => source,
					Err(e) => return error_response(400, "mapper_parsing_exception", &e.to_string()),
				};
				let idx = state.indices.entry((*index).to_string()).or_default();
				FakeIndex::upsert(&mut idx.pending, (*id).to_string(), source);
				ResponseTemplate::new(201).set_body_json(json!({
					"_index": index,
					"_id": id,
					"result": "created"
				}))
			}
			("POST", [index, "_refresh"]) => match state.indices.get_mut(*index) {
				Some(idx) => {
					idx.refresh();
					ResponseTemplate::new(200).set_body_json(json!({"_shards": {"failed": 0}}))
				}
				None => index_not_found(index),
			},
			("POST", [index, "_search"]) => {
				if let Some(status) = state.search_failure {
					return error_response(status, "search_phase_execution_exception", "all shards failed");
				}
				let Some(idx) = state.indices.get(*index) else {
					return index_not_found(index);
				};
				let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
				ResponseTemplate::new(200).set_body_json(search(idx, &body))
			}
			_ => error_response(400, "illegal_argument_exception", "unsupported request"),
		}
	}
}

/// Position of a hit in the fixed result order: best score first, then
/// numeric `id` ascending with documents lacking one last, then `_id`.
#[derive(Debug, Clone, PartialEq)]
struct SortKey {
	score: f64,
	id: Option<i64>,
	doc_id: String,
}

impl SortKey {
	fn from_search_after(value: &Value) -> Option<Self> {
		let values = value.as_array()?;
		Some(Self {
			score: values.first()?.as_f64()?,
			id: values.get(1).and_then(Value::as_i64),
			doc_id: values.get(2).and_then(Value::as_str).unwrap_or_default().to_string(),
		})
	}

	fn to_value(&self) -> Value {
		json!([self.score, self.id, self.doc_id])
	}
}

fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
	b.score
		.partial_cmp(&a.score)
		.unwrap_or(Ordering::Equal)
		.then_with(|| match (a.id, b.id) {
			(Some(x), Some(y)) => x.cmp(&y),
			(Some(_), None) => Ordering::Less,
			(None, Some(_)) => Ordering::Greater,
			(None, None) => Ordering::Equal,
		})
		.then_with(|| a.doc_id.cmp(&b.doc_id))
}

fn search(idx: &FakeIndex, body: &Value) -> Value {
	let size = body["size"].as_u64().unwrap_or(10) as usize;
	let bool_query = &body["query"]["bool"];
	let must = clauses(&bool_query["must"]);
	let filter = clauses(&bool_query["filter"]);
	let after = SortKey::from_search_after(&body["search_after"]);

	let mut matched: Vec<(SortKey, &Value)> = idx
		.visible
		.iter()
		.filter_map(|(id, source)| {
			if !filter.iter().all(|c| range_matches(c, source)) {
				return None;
			}
			let mut score = 0;
			for clause in &must {
				score += match_score(clause, source)?;
			}
			let key = SortKey {
				score: score as f64,
				id: source["id"].as_i64(),
				doc_id: id.clone(),
			};
			Some((key, source))
		})
		.collect();
	matched.sort_by(|a, b| compare_keys(&a.0, &b.0));

	let total = matched.len();
	let hits: Vec<Value> = matched
		.into_iter()
		.filter(|(key, _)| {
			after
				.as_ref()
				.map_or(true, |after| compare_keys(key, after) == Ordering::Greater)
		})
		.take(size)
		.map(|(key, source)| {
			let sort = key.to_value();
			json!({
				"_index": "fake",
				"_id": key.doc_id,
				"_score": key.score,
				"_source": source,
				"sort": sort
			})
		})
		.collect();

	json!({
		"took": 1,
		"timed_out": false,
		"hits": {"total": {"value": total, "relation": "eq"}, "hits": hits}
	})
}

fn clauses(value: &Value) -> Vec<&Value> {
	value.as_array().map(|a| a.iter().collect()).unwrap_or_default()
}

fn single_entry(value: &Value) -> Option<(&String, &Value)> {
	value.as_object().and_then(|m| m.iter().next())
}

/// Number of query tokens found in the field, or `None` when none are.
fn match_score(clause: &Value, source: &Value) -> Option<usize> {
	let (field, query) = single_entry(&clause["match"])?;
	let text = match &source[field] {
		Value::String(s) => s.clone(),
		Value::Null => return None,
		other => other.to_string(),
	};
	let field_tokens = tokenize(&text);
	let hits = tokenize(query.as_str()?)
		.iter()
		.filter(|t| field_tokens.contains(t))
		.count();
	(hits > 0).then_some(hits)
}

fn range_matches(clause: &Value, source: &Value) -> bool {
	let Some((field, bounds)) = single_entry(&clause["range"]) else {
		return false;
	};
	match (source[field].as_f64(), bounds["lte"].as_f64()) {
		(Some(value), Some(lte)) => value <= lte,
		_ => false,
	}
}

fn tokenize(text: &str) -> Vec<String> {
	text.split(|c: char| !c.is_alphanumeric())
		.filter(|t| !t.is_empty())
		.map(str::to_lowercase)
		.collect()
}

fn index_not_found(index: &str) -> ResponseTemplate {
	error_response(404, "index_not_found_exception", &format!("no such index [{index}]"))
}

fn error_response(status: u16, kind: &str, reason: &str) -> ResponseTemplate {
	ResponseTemplate::new(status).set_body_json(json!({
		"error": {"type": kind, "reason": reason},
		"status": status
	}))
}
