// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! A manually driven clock and timer for deterministic tests.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::clock::Clock;
use crate::timer::{Timer, TimerHandle, TimerTask};

struct State {
	now_ms: i64,
	next_id: u64,
	pending: BTreeMap<(i64, u64), TimerTask>,
}

/// Clock and timer whose time only moves on [`VirtualClock::advance`].
///
/// Tasks due at the same instant run in scheduling order. Tasks run without
/// the internal lock held, so they may schedule or cancel further timers.
#[derive(Clone)]
pub struct VirtualClock {
	state: Arc<Mutex<State>>,
}

impl VirtualClock {
	pub fn new(start_ms: i64) -> Self {
		Self {
			state: Arc::new(Mutex::new(State {
				now_ms: start_ms,
				next_id: 0,
				pending: BTreeMap::new(),
			})),
		}
	}

	pub fn now(&self) -> i64 {
		self.state.lock().now_ms
	}

	/// Moves time forward by `by`, running every task that falls due.
	pub fn advance(&self, by: Duration) {
		let target = self.state.lock().now_ms + by.as_millis() as i64;
		loop {
			let task = {
				let mut state = self.state.lock();
				match state.pending.first_key_value() {
					Some((&(due, _), _)) if due <= target => {
						state.now_ms = due;
						state.pending.pop_first().map(|(_, task)| task)
					}
					_ => None,
				}
			};
			match task {
				Some(task) => task(),
				None => break,
			}
		}
		self.state.lock().now_ms = target;
	}

	/// Number of tasks scheduled and not yet run or cancelled.
	pub fn pending_timers(&self) -> usize {
		self.state.lock().pending.len()
	}

	/// Due time of the earliest pending task.
	pub fn next_due(&self) -> Option<i64> {
		self.state
			.lock()
			.pending
			.first_key_value()
			.map(|(&(due, _), _)| due)
	}
}

impl Clock for VirtualClock {
	fn now_ms(&self) -> f64 {
		self.now() as f64
	}
}

impl Timer for VirtualClock {
	fn schedule(&self, delay: Duration, task: TimerTask) -> TimerHandle {
		let key = {
			let mut state = self.state.lock();
			let key = (state.now_ms + delay.as_millis() as i64, state.next_id);
			state.next_id += 1;
			state.pending.insert(key, task);
			key
		};
		let weak: Weak<Mutex<State>> = Arc::downgrade(&self.state);
		TimerHandle::new(move || {
			if let Some(state) = weak.upgrade() {
				state.lock().pending.remove(&key);
			}
		})
	}
}

impl fmt::Debug for VirtualClock {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.lock();
		f.debug_struct("VirtualClock")
			.field("now_ms", &state.now_ms)
			.field("pending", &state.pending.len())
			.finish()
	}
}
