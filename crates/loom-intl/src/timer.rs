// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cancellable one-shot timers.

use std::fmt;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::trace;

use loom_intl_core::{IntlError, Result};

/// Work run when a timer fires.
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Schedules a task to run once after a delay.
pub trait Timer: Send + Sync {
	fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle;
}

/// Handle to a scheduled task.
///
/// Dropping the handle does not cancel the task; call [`TimerHandle::cancel`].
pub struct TimerHandle {
	cancel: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl TimerHandle {
	pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
		Self {
			cancel: Some(Box::new(cancel)),
		}
	}

	/// Prevents the task from running if it has not run yet.
	pub fn cancel(mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}

impl fmt::Debug for TimerHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TimerHandle")
			.field("armed", &self.cancel.is_some())
			.finish()
	}
}

/// Timer backed by `tokio::time::sleep` on a spawned task.
#[derive(Debug, Clone)]
pub struct TokioTimer {
	handle: Handle,
}

impl TokioTimer {
	pub fn new(handle: Handle) -> Self {
		Self { handle }
	}

	/// Uses the runtime the caller is running on.
	pub fn current() -> Result<Self> {
		Handle::try_current()
			.map(Self::new)
			.map_err(|e| IntlError::PlatformUnavailable(e.to_string()))
	}
}

impl Timer for TokioTimer {
	fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
		trace!(delay_ms = delay.as_millis() as u64, "scheduling timer");
		let join = self.handle.spawn(async move {
			tokio::time::sleep(delay).await;
			task();
		});
		TimerHandle::new(move || join.abort())
	}
}
