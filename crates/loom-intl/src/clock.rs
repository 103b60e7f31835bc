// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wall-clock sources.

use chrono::Utc;

/// Source of the current time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
	fn now_ms(&self) -> f64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now_ms(&self) -> f64 {
		Utc::now().timestamp_millis() as f64
	}
}

/// A clock that follows tokio's notion of time from a fixed epoch origin.
///
/// Under a paused runtime (`start_paused = true`) it advances only when tokio
/// auto-advances or `tokio::time::advance` is called.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
	origin_ms: f64,
	origin: tokio::time::Instant,
}

impl TokioClock {
	pub fn new(origin_ms: f64) -> Self {
		Self {
			origin_ms,
			origin: tokio::time::Instant::now(),
		}
	}
}

impl Clock for TokioClock {
	fn now_ms(&self) -> f64 {
		self.origin_ms + self.origin.elapsed().as_millis() as f64
	}
}
