// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Public result types and the subset of the engine's wire format we read.

use serde::{Deserialize, Serialize};

/// Identity of the cluster answering at the configured URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
	pub cluster_name: String,
	pub version: String,
}

/// Outcome of a bulk index build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexReport {
	pub index: String,
	pub indexed: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RootResponse {
	pub cluster_name: String,
	pub version: RootVersion,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RootVersion {
	pub number: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchRequestBody<'a, Q: Serialize> {
	pub query: &'a Q,
	pub size: u32,
	pub sort: &'a serde_json::Value,
	pub track_total_hits: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub search_after: Option<&'a serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponseBody {
	pub hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HitsEnvelope {
	#[serde(default)]
	pub total: Option<HitsTotal>,
	#[serde(default)]
	pub hits: Vec<RawHit>,
}

/// `hits.total`: an object on current engines, a bare count on 6.x.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum HitsTotal {
	Object { value: u64 },
	Count(u64),
}

impl HitsTotal {
	pub fn value(&self) -> u64 {
		match self {
			HitsTotal::Object { value } | HitsTotal::Count(value) => *value,
		}
	}
}

/// A hit with its source left undecoded so one bad document cannot fail
/// the whole response.
#[derive(Debug, Deserialize)]
pub(crate) struct RawHit {
	#[serde(rename = "_id", default)]
	pub id: Option<String>,
	#[serde(rename = "_source", default)]
	pub source: Option<serde_json::Value>,
	/// Sort values of this hit, echoed back as `search_after` for the next page.
	#[serde(default)]
	pub sort: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
	pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorDetail {
	Structured {
		#[serde(rename = "type")]
		kind: String,
		reason: Option<String>,
	},
	Plain(String),
}

impl ErrorDetail {
	pub fn describe(&self) -> String {
		match self {
			ErrorDetail::Structured {
				kind,
				reason: Some(reason),
			} => format!("{kind}: {reason}"),
			ErrorDetail::Structured { kind, reason: None } => kind.clone(),
			ErrorDetail::Plain(message) => message.clone(),
		}
	}
}
