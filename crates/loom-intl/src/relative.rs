// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Self-updating relative-time labels.
//!
//! A [`RelativeTimeScheduler`] renders "5 minutes ago" style labels and
//! re-renders them at the next moment the label could change, but never more
//! often than the configured refresh interval.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use loom_intl_core::RelativeUnit;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::context::FormatContext;
use crate::format::{RelativeFormatOptions, TimeValue};
use crate::timer::{Timer, TimerHandle};

pub const DEFAULT_UPDATE_INTERVAL_MS: i64 = 10_000;

/// Largest delay a timer accepts (`i32::MAX` milliseconds).
pub const MAX_TIMER_DELAY_MS: i64 = 2_147_483_647;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
	/// No refresh pending.
	Idle,
	/// A refresh timer is pending.
	Scheduled,
	/// The refresh interval is non-positive; the label is frozen.
	Disabled,
}

/// Milliseconds until the label for `subject_ms` may next change, floored at
/// `interval_ms` and capped at [`MAX_TIMER_DELAY_MS`].
///
/// Returns `None` when no refresh should be scheduled: a non-positive interval
/// or a non-finite timestamp.
pub fn next_refresh_delay(
	subject_ms: f64,
	now_ms: f64,
	interval_ms: i64,
	units: Option<RelativeUnit>,
) -> Option<i64> {
	if interval_ms <= 0 || !subject_ms.is_finite() || !now_ms.is_finite() {
		return None;
	}

	let delta = subject_ms - now_ms;
	let unit_ms = units.unwrap_or_else(|| RelativeUnit::select(delta)).millis() as f64;
	let rem = (delta % unit_ms).abs();
	let boundary = if delta < 0.0 { unit_ms - rem } else { rem };

	let delay = boundary.max(interval_ms as f64).min(MAX_TIMER_DELAY_MS as f64);
	Some(delay.ceil() as i64)
}

/// Inputs of a relative-time label.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeTimeProps {
	pub value: TimeValue,
	/// Minimum time between refreshes. Non-positive disables refreshing.
	pub update_interval_ms: i64,
	pub options: RelativeFormatOptions,
	/// Reference instant for the first render, instead of the context's
	/// `now()`.
	pub initial_now: Option<f64>,
}

impl RelativeTimeProps {
	pub fn new(value: impl Into<TimeValue>) -> Self {
		Self {
			value: value.into(),
			update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
			options: RelativeFormatOptions::default(),
			initial_now: None,
		}
	}

	pub fn with_update_interval(mut self, interval_ms: i64) -> Self {
		self.update_interval_ms = interval_ms;
		self
	}

	pub fn with_options(mut self, options: RelativeFormatOptions) -> Self {
		self.options = options;
		self
	}

	pub fn with_initial_now(mut self, initial_now: f64) -> Self {
		self.initial_now = Some(initial_now);
		self
	}
}

/// Called with the new label whenever a refresh changes it.
pub type LabelListener = Arc<dyn Fn(&str) + Send + Sync>;

struct Inner {
	context: FormatContext,
	timer: Arc<dyn Timer>,
	props: RelativeTimeProps,
	now: f64,
	label: String,
	state: SchedulerState,
	pending: Option<TimerHandle>,
	generation: u64,
	listener: Option<LabelListener>,
}

/// One label render. Captured under the scheduler lock and run after it is
/// released; formatting may call the user's `on_error` sink.
struct RenderJob {
	context: FormatContext,
	value: TimeValue,
	options: RelativeFormatOptions,
	generation: u64,
}

impl RenderJob {
	fn run(&self) -> String {
		self.context.format_relative(self.value.clone(), &self.options)
	}
}

impl Inner {
	/// Captures a render at `self.now` for the current generation.
	fn render_job(&self) -> RenderJob {
		RenderJob {
			context: self.context.clone(),
			value: self.props.value.clone(),
			options: RelativeFormatOptions {
				now: Some(self.now),
				..self.props.options.clone()
			},
			generation: self.generation,
		}
	}

	fn clear_pending(&mut self) {
		self.generation += 1;
		if let Some(handle) = self.pending.take() {
			handle.cancel();
		}
	}

	fn changed_label(&self) -> Option<(LabelListener, String)> {
		self.listener
			.as_ref()
			.map(|listener| (Arc::clone(listener), self.label.clone()))
	}
}

/// Per-consumer relative-time refresh state machine.
///
/// Dropping the scheduler cancels any pending refresh.
pub struct RelativeTimeScheduler {
	inner: Arc<Mutex<Inner>>,
}

impl RelativeTimeScheduler {
	/// Renders the initial label. No refresh is scheduled until
	/// [`start`](Self::start).
	pub fn new(context: FormatContext, timer: Arc<dyn Timer>, props: RelativeTimeProps) -> Self {
		let now = props
			.initial_now
			.filter(|n| n.is_finite())
			.unwrap_or_else(|| context.now());
		let mut inner = Inner {
			context,
			timer,
			props,
			now,
			label: String::new(),
			state: SchedulerState::Idle,
			pending: None,
			generation: 0,
			listener: None,
		};
		inner.label = inner.render_job().run();
		Self {
			inner: Arc::new(Mutex::new(inner)),
		}
	}

	/// Registers the callback invoked when a refresh changes the label.
	pub fn on_label_change(&self, listener: impl Fn(&str) + Send + Sync + 'static) {
		self.inner.lock().listener = Some(Arc::new(listener));
	}

	/// Activates the scheduler.
	pub fn start(&self) {
		let mut inner = self.inner.lock();
		arm(&self.inner, &mut inner);
	}

	/// Applies new props: cancels any pending refresh, re-renders at the
	/// context's current `now()` and re-evaluates scheduling.
	pub fn set_props(&self, props: RelativeTimeProps) {
		let job = {
			let mut inner = self.inner.lock();
			if inner.props == props {
				return;
			}
			inner.clear_pending();
			let value_changed = inner.props.value != props.value;
			inner.props = props;
			if value_changed {
				inner.now = inner.context.now();
			}
			inner.render_job()
		};
		let label = job.run();
		commit(&self.inner, job.generation, label);
	}

	/// Cancels any pending refresh and returns to [`SchedulerState::Idle`].
	pub fn cancel(&self) {
		let mut inner = self.inner.lock();
		inner.clear_pending();
		inner.state = SchedulerState::Idle;
	}

	pub fn label(&self) -> String {
		self.inner.lock().label.clone()
	}

	pub fn state(&self) -> SchedulerState {
		self.inner.lock().state
	}

	/// The `now` the current label was rendered at.
	pub fn rendered_now(&self) -> f64 {
		self.inner.lock().now
	}
}

impl Drop for RelativeTimeScheduler {
	fn drop(&mut self) {
		let mut inner = self.inner.lock();
		inner.clear_pending();
		inner.state = SchedulerState::Idle;
	}
}

impl fmt::Debug for RelativeTimeScheduler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let inner = self.inner.lock();
		f.debug_struct("RelativeTimeScheduler")
			.field("label", &inner.label)
			.field("state", &inner.state)
			.field("now", &inner.now)
			.finish()
	}
}

/// Evaluates the transition rules and schedules the next refresh.
fn arm(shared: &Arc<Mutex<Inner>>, inner: &mut Inner) {
	inner.clear_pending();

	if inner.props.update_interval_ms <= 0 {
		trace!("refresh disabled");
		inner.state = SchedulerState::Disabled;
		return;
	}

	let delay = next_refresh_delay(
		inner.props.value.epoch_millis(),
		inner.now,
		inner.props.update_interval_ms,
		inner.props.options.options.units,
	);
	let Some(delay) = delay else {
		inner.state = SchedulerState::Idle;
		return;
	};

	let generation = inner.generation;
	let weak: Weak<Mutex<Inner>> = Arc::downgrade(shared);
	trace!(delay_ms = delay, "scheduling relative time refresh");
	inner.pending = Some(inner.timer.schedule(
		Duration::from_millis(delay as u64),
		Box::new(move || refresh(weak, generation)),
	));
	inner.state = SchedulerState::Scheduled;
}

fn refresh(weak: Weak<Mutex<Inner>>, generation: u64) {
	let Some(shared) = weak.upgrade() else {
		return;
	};
	let job = {
		let mut inner = shared.lock();
		if inner.generation != generation || inner.state != SchedulerState::Scheduled {
			debug!("ignoring stale relative time refresh");
			return;
		}
		inner.pending = None;
		inner.now = inner.context.now();
		inner.render_job()
	};
	let label = job.run();
	commit(&shared, job.generation, label);
}

/// Stores a rendered label, re-arms and notifies the listener outside the
/// lock. A render overtaken by `set_props`, `cancel` or drop is discarded.
fn commit(shared: &Arc<Mutex<Inner>>, generation: u64, label: String) {
	let notify = {
		let mut inner = shared.lock();
		if inner.generation != generation {
			debug!("discarding superseded relative time label");
			return;
		}
		let changed = inner.label != label;
		inner.label = label;
		arm(shared, &mut inner);
		changed.then(|| inner.changed_label()).flatten()
	};
	if let Some((listener, label)) = notify {
		listener(&label);
	}
}

/// Renders `value` relative to `context.now()`, calls `on_label_change` on
/// every later change and keeps refreshing until the returned scheduler is
/// cancelled or dropped.
pub fn schedule_relative_refresh(
	context: FormatContext,
	timer: Arc<dyn Timer>,
	value: impl Into<TimeValue>,
	refresh_interval_ms: i64,
	on_label_change: impl Fn(&str) + Send + Sync + 'static,
) -> RelativeTimeScheduler {
	let props = RelativeTimeProps::new(value).with_update_interval(refresh_interval_ms);
	let scheduler = RelativeTimeScheduler::new(context, timer, props);
	scheduler.on_label_change(on_label_change);
	scheduler.start();
	scheduler
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::provider::ScopeProvider;
	use crate::virtual_clock::VirtualClock;
	use loom_intl_core::{ConfigProps, OnError, StaticLocaleRegistry};
	use proptest::prelude::*;
	use once_cell::sync::OnceCell;
	use std::sync::mpsc;
	use std::thread;

	const START: i64 = 1_700_000_000_000;

	struct Harness {
		clock: VirtualClock,
		provider: ScopeProvider,
		errors: Arc<Mutex<Vec<String>>>,
	}

	fn harness() -> Harness {
		let clock = VirtualClock::new(START);
		let errors = Arc::new(Mutex::new(Vec::new()));
		let sink_errors = Arc::clone(&errors);
		let provider = ScopeProvider::builder()
			.basic_platform()
			.locale_registry(Arc::new(StaticLocaleRegistry::new(["en"])))
			.clock(Arc::new(clock.clone()))
			.props(
				ConfigProps::new()
					.with_locale("en")
					.with_on_error(OnError::new(move |e| sink_errors.lock().push(e.to_string()))),
			)
			.build()
			.unwrap();
		provider.activate();
		Harness {
			clock,
			provider,
			errors,
		}
	}

	fn labels() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync + 'static) {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = Arc::clone(&seen);
		(seen, move |label: &str| sink.lock().push(label.to_string()))
	}

	#[test]
	fn delay_at_minute_boundary() {
		let now = START as f64;
		assert_eq!(next_refresh_delay(now - 59_000.0, now, 1, None), Some(1_000));
		assert_eq!(next_refresh_delay(now - 59_500.0, now, 1, None), Some(500));
		assert_eq!(next_refresh_delay(now - 59_000.0, now, 10_000, None), Some(10_000));
	}

	#[test]
	fn delay_for_future_subject() {
		let now = START as f64;
		assert_eq!(next_refresh_delay(now + 90_000.0, now, 1, None), Some(30_000));
		assert_eq!(next_refresh_delay(now + 1_000.0, now, 1, None), Some(1));
	}

	#[test]
	fn delay_is_capped() {
		let now = START as f64;
		let ten_years = 10.0 * 365.0 * 86_400_000.0;
		assert_eq!(
			next_refresh_delay(now - ten_years - 1.0, now, 1, None),
			Some(MAX_TIMER_DELAY_MS)
		);
	}

	#[test]
	fn no_delay_without_interval_or_timestamp() {
		let now = START as f64;
		assert_eq!(next_refresh_delay(now, now, 0, None), None);
		assert_eq!(next_refresh_delay(f64::NAN, now, 1, None), None);
	}

	#[test]
	fn refreshes_when_crossing_minute_boundary() {
		let h = harness();
		let (seen, listener) = labels();
		let scheduler = schedule_relative_refresh(
			h.provider.context(),
			Arc::new(h.clock.clone()),
			(START - 59_000) as f64,
			1,
			listener,
		);

		assert_eq!(scheduler.label(), "59 seconds ago");
		assert_eq!(scheduler.state(), SchedulerState::Scheduled);
		assert_eq!(h.clock.next_due(), Some(START + 1_000));

		h.clock.advance(Duration::from_millis(1_000));

		assert_eq!(scheduler.label(), "1 minute ago");
		assert_eq!(*seen.lock(), vec!["1 minute ago".to_string()]);
		assert_eq!(h.clock.next_due(), Some(START + 61_000));
	}

	#[test]
	fn unchanged_label_does_not_notify() {
		let h = harness();
		let (seen, listener) = labels();
		let year = RelativeUnit::Year.millis();
		let scheduler = schedule_relative_refresh(
			h.provider.context(),
			Arc::new(h.clock.clone()),
			(START - year - 1_000) as f64,
			1,
			listener,
		);
		assert_eq!(scheduler.label(), "last year");
		assert_eq!(h.clock.next_due(), Some(START + MAX_TIMER_DELAY_MS));

		h.clock.advance(Duration::from_millis(MAX_TIMER_DELAY_MS as u64));

		assert_eq!(scheduler.label(), "last year");
		assert!(seen.lock().is_empty());
		assert_eq!(scheduler.state(), SchedulerState::Scheduled);
		assert_eq!(h.clock.pending_timers(), 1);
	}

	#[test]
	fn zero_interval_freezes_label() {
		let h = harness();
		let (seen, listener) = labels();
		let subject = (START - 30_000) as f64;
		let scheduler = schedule_relative_refresh(
			h.provider.context(),
			Arc::new(h.clock.clone()),
			subject,
			1,
			listener,
		);

		scheduler.set_props(RelativeTimeProps::new(subject).with_update_interval(0));
		let frozen = scheduler.label();
		h.clock.advance(Duration::from_secs(3_600));

		assert_eq!(scheduler.state(), SchedulerState::Disabled);
		assert_eq!(h.clock.pending_timers(), 0);
		assert_eq!(scheduler.label(), frozen);
		assert!(seen.lock().is_empty());
	}

	#[test]
	fn invalid_subject_reports_once_and_recovers() {
		let h = harness();
		let scheduler = RelativeTimeScheduler::new(
			h.provider.context(),
			Arc::new(h.clock.clone()),
			RelativeTimeProps::new(f64::NAN).with_update_interval(1),
		);
		scheduler.start();

		assert_eq!(
			*h.errors.lock(),
			vec![
				"Error formatting relative time.\nRangeError: The date value provided to \
				 RelativeTimeFormat#format() is not in valid range."
					.to_string()
			]
		);
		assert_eq!(scheduler.label(), "Invalid Date");
		assert_eq!(scheduler.state(), SchedulerState::Idle);
		assert_eq!(h.clock.pending_timers(), 0);

		scheduler.set_props(
			RelativeTimeProps::new((START - 2 * 60_000) as f64).with_update_interval(1),
		);

		assert_eq!(scheduler.label(), "2 minutes ago");
		assert_eq!(scheduler.state(), SchedulerState::Scheduled);
		assert_eq!(h.errors.lock().len(), 1);
	}

	#[test]
	fn error_sink_may_read_the_scheduler() {
		let clock = VirtualClock::new(START);
		let target: Arc<OnceCell<Weak<RelativeTimeScheduler>>> = Arc::new(OnceCell::new());
		let seen = Arc::new(Mutex::new(Vec::new()));
		let (sink_target, sink_seen) = (Arc::clone(&target), Arc::clone(&seen));
		let provider = ScopeProvider::builder()
			.basic_platform()
			.locale_registry(Arc::new(StaticLocaleRegistry::new(["en"])))
			.clock(Arc::new(clock.clone()))
			.props(ConfigProps::new().with_locale("en").with_on_error(OnError::new(
				move |_| {
					if let Some(scheduler) = sink_target.get().and_then(Weak::upgrade) {
						sink_seen.lock().push((scheduler.label(), scheduler.state()));
					}
				},
			)))
			.build()
			.unwrap();
		provider.activate();

		let scheduler = Arc::new(RelativeTimeScheduler::new(
			provider.context(),
			Arc::new(clock.clone()),
			RelativeTimeProps::new((START - 60_000) as f64).with_update_interval(1),
		));
		scheduler.start();
		target.set(Arc::downgrade(&scheduler)).unwrap();

		let (done_tx, done_rx) = mpsc::channel();
		let worker = Arc::clone(&scheduler);
		thread::spawn(move || {
			worker.set_props(RelativeTimeProps::new(f64::NAN).with_update_interval(1));
			let _ = done_tx.send(());
		});
		done_rx
			.recv_timeout(Duration::from_secs(5))
			.expect("set_props finished while the error sink read the scheduler");

		assert_eq!(
			*seen.lock(),
			vec![("1 minute ago".to_string(), SchedulerState::Scheduled)]
		);
		assert_eq!(scheduler.label(), "Invalid Date");
		assert_eq!(scheduler.state(), SchedulerState::Idle);
		assert_eq!(clock.pending_timers(), 0);
	}

	#[test]
	fn cancel_and_drop_release_timers() {
		let h = harness();
		let timer: Arc<dyn Timer> = Arc::new(h.clock.clone());
		let scheduler = schedule_relative_refresh(
			h.provider.context(),
			Arc::clone(&timer),
			(START - 10_000) as f64,
			1,
			|_| {},
		);
		assert_eq!(h.clock.pending_timers(), 1);

		scheduler.cancel();
		assert_eq!(scheduler.state(), SchedulerState::Idle);
		assert_eq!(h.clock.pending_timers(), 0);

		scheduler.start();
		assert_eq!(h.clock.pending_timers(), 1);
		drop(scheduler);
		assert_eq!(h.clock.pending_timers(), 0);
	}

	#[test]
	fn equal_props_do_not_reschedule() {
		let h = harness();
		let props = RelativeTimeProps::new((START - 10_000) as f64).with_update_interval(1);
		let scheduler = RelativeTimeScheduler::new(
			h.provider.context(),
			Arc::new(h.clock.clone()),
			props.clone(),
		);
		scheduler.start();
		let due = h.clock.next_due();

		h.clock.advance(Duration::from_millis(100));
		scheduler.set_props(props);

		assert_eq!(h.clock.next_due(), due);
	}

	#[test]
	fn initial_now_sets_first_render() {
		let h = harness();
		let scheduler = RelativeTimeScheduler::new(
			h.provider.context(),
			Arc::new(h.clock.clone()),
			RelativeTimeProps::new(0.0).with_initial_now(3_600_000.0),
		);
		assert_eq!(scheduler.label(), "1 hour ago");
		assert_eq!(scheduler.rendered_now(), 3_600_000.0);
	}

	proptest! {
		#[test]
		fn delay_stays_within_bounds(
			offset in -400_000_000_000i64..400_000_000_000i64,
			interval in 1i64..1_000_000,
		) {
			let now = START as f64;
			let delay = next_refresh_delay(now + offset as f64, now, interval, None).unwrap();
			prop_assert!(delay >= interval);
			prop_assert!(delay <= MAX_TIMER_DELAY_MS);
			let unit = RelativeUnit::select(offset as f64).millis();
			prop_assert!(delay <= unit.max(interval));
		}
	}
}
