// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Naming rules for the search index that mirrors the product table.

const FORBIDDEN_INDEX_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ' ', ',', '#', ':'];

/// Why `name` cannot be used as an index name, or `None` if it can.
///
/// Rejects names that do not fit in a request path or that the engine
/// refuses: empty, `.`/`..`, uppercase, a leading `-`/`_`/`+`, or reserved
/// characters.
pub fn index_name_problem(name: &str) -> Option<&'static str> {
	if name.is_empty() {
		return Some("must not be empty");
	}
	if name == "." || name == ".." {
		return Some("must not be '.' or '..'");
	}
	if name.starts_with(['-', '_', '+']) {
		return Some("must not start with '-', '_' or '+'");
	}
	if name.chars().any(char::is_uppercase) {
		return Some("must be lowercase");
	}
	if name.chars().any(|c| FORBIDDEN_INDEX_CHARS.contains(&c)) {
		return Some("contains a reserved character");
	}
	None
}
