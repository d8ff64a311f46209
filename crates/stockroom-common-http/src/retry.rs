// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Bounded retry with exponential backoff for transport-level calls.

use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Status codes worth another attempt: throttling, timeouts and gateway trouble.
const RETRYABLE_STATUSES: [StatusCode; 6] = [
	StatusCode::TOO_MANY_REQUESTS,
	StatusCode::REQUEST_TIMEOUT,
	StatusCode::INTERNAL_SERVER_ERROR,
	StatusCode::BAD_GATEWAY,
	StatusCode::SERVICE_UNAVAILABLE,
	StatusCode::GATEWAY_TIMEOUT,
];

#[derive(Debug, Clone)]
pub struct RetryConfig {
	pub max_attempts: u32,
	pub base_delay: Duration,
	pub max_delay: Duration,
	pub backoff_factor: f64,
	pub jitter: bool,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			base_delay: Duration::from_millis(200),
			max_delay: Duration::from_secs(5),
			backoff_factor: 2.0,
			jitter: true,
		}
	}
}

impl RetryConfig {
	/// Default backoff with a different attempt budget. Zero is treated as one.
	pub fn with_max_attempts(max_attempts: u32) -> Self {
		Self {
			max_attempts: max_attempts.max(1),
			..Self::default()
		}
	}

	/// A single attempt, no retries.
	pub fn disabled() -> Self {
		Self::with_max_attempts(1)
	}
}

pub trait RetryableError {
	fn is_retryable(&self) -> bool;
}

/// Whether an HTTP status returned by a remote service is transient.
pub fn is_retryable_status(status: StatusCode) -> bool {
	RETRYABLE_STATUSES.contains(&status)
}

impl RetryableError for reqwest::Error {
	fn is_retryable(&self) -> bool {
		if self.is_timeout() || self.is_connect() {
			return true;
		}
		self.status().is_some_and(is_retryable_status)
	}
}

fn calculate_delay(cfg: &RetryConfig, attempt: u32) -> Duration {
	let exponential = cfg.base_delay.as_secs_f64() * cfg.backoff_factor.powi(attempt as i32);
	let capped = exponential.min(cfg.max_delay.as_secs_f64());

	if cfg.jitter {
		Duration::from_secs_f64(capped * (0.5 + fastrand::f64()))
	} else {
		Duration::from_secs_f64(capped)
	}
}

/// Runs `f` until it succeeds, fails with a non-retryable error, or the
/// attempt budget in `cfg` is spent. `operation` labels the log lines.
pub async fn retry<F, Fut, T, E>(cfg: &RetryConfig, operation: &str, mut f: F) -> Result<T, E>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T, E>>,
	E: RetryableError + std::fmt::Display,
{
	let max_attempts = cfg.max_attempts.max(1);
	let mut attempt = 0;

	loop {
		attempt += 1;
		let err = match f().await {
			Ok(value) => {
				if attempt > 1 {
					debug!(operation, attempt, "succeeded after retry");
				}
				return Ok(value);
			}
			Err(err) => err,
		};

		if !err.is_retryable() {
			debug!(operation, attempt, error = %err, "non-retryable error");
			return Err(err);
		}

		if attempt >= max_attempts {
			warn!(operation, attempt, max_attempts, error = %err, "retry budget exhausted");
			return Err(err);
		}

		let delay = calculate_delay(cfg, attempt - 1);
		warn!(
			operation,
			attempt,
			max_attempts,
			delay_ms = delay.as_millis() as u64,
			error = %err,
			"transient error, retrying"
		);
		tokio::time::sleep(delay).await;
	}
}
