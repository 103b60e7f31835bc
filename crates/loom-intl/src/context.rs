// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The unit of configuration propagated through a scope tree.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use loom_intl_core::{
	Configuration, FormatterCache, IntlError, LocaleRegistry, MessageValues, PluralCategory,
	PluralOptions, Result,
};
use parking_lot::Mutex;

use crate::clock::Clock;
use crate::format::{
	self, DateFormatOptions, MessageDescriptor, NumberFormatOptions, RelativeFormatOptions,
	TimeValue,
};

/// `now()` for one scope: frozen at `initial_now` until the scope is
/// activated, the live clock afterwards.
pub(crate) struct NowSource {
	initial_now: f64,
	active: AtomicBool,
	clock: Arc<dyn Clock>,
}

impl NowSource {
	pub(crate) fn new(initial_now: f64, clock: Arc<dyn Clock>) -> Self {
		Self {
			initial_now,
			active: AtomicBool::new(false),
			clock,
		}
	}

	pub(crate) fn now(&self) -> f64 {
		if self.active.load(Ordering::Acquire) {
			self.clock.now_ms()
		} else {
			self.initial_now
		}
	}

	pub(crate) fn activate(&self) {
		self.active.store(true, Ordering::Release);
	}

	pub(crate) fn is_active(&self) -> bool {
		self.active.load(Ordering::Acquire)
	}
}

/// Per-scope state a context is assembled from.
pub struct ScopeState {
	pub(crate) formatters: Arc<FormatterCache>,
	pub(crate) now: Arc<NowSource>,
	pub(crate) clock: Arc<dyn Clock>,
	pub(crate) registry: Arc<dyn LocaleRegistry>,
	last: Mutex<Option<FormatContext>>,
}

impl ScopeState {
	pub fn new(
		formatters: Arc<FormatterCache>,
		initial_now: f64,
		clock: Arc<dyn Clock>,
		registry: Arc<dyn LocaleRegistry>,
	) -> Self {
		Self {
			formatters,
			now: Arc::new(NowSource::new(initial_now, Arc::clone(&clock))),
			clock,
			registry,
			last: Mutex::new(None),
		}
	}

	/// Switches `now()` from the frozen initial value to the live clock.
	pub fn activate(&self) {
		self.now.activate();
	}
}

/// Binds `config` and the scope state into a [`FormatContext`].
///
/// Returns the previously built context when `config` is the same allocation
/// as last time.
pub fn get_format_context(config: &Arc<Configuration>, state: &ScopeState) -> FormatContext {
	let mut last = state.last.lock();
	if let Some(ctx) = last.as_ref() {
		if Arc::ptr_eq(&ctx.inner.config, config) {
			return ctx.clone();
		}
	}

	let ctx = FormatContext {
		inner: Arc::new(ContextInner {
			config: Arc::clone(config),
			formatters: Arc::clone(&state.formatters),
			now: Arc::clone(&state.now),
			clock: Arc::clone(&state.clock),
			registry: Arc::clone(&state.registry),
		}),
	};
	*last = Some(ctx.clone());
	ctx
}

struct ContextInner {
	config: Arc<Configuration>,
	formatters: Arc<FormatterCache>,
	now: Arc<NowSource>,
	clock: Arc<dyn Clock>,
	registry: Arc<dyn LocaleRegistry>,
}

/// Resolved configuration plus bound formatting operations.
///
/// Cheap to clone. A context is never mutated; reconfiguring a scope
/// publishes a new one.
#[derive(Clone)]
pub struct FormatContext {
	inner: Arc<ContextInner>,
}

impl FormatContext {
	/// Returns the nearest context, or [`IntlError::MissingContext`] when no
	/// provider exists in the ancestry.
	pub fn require(ctx: Option<&FormatContext>) -> Result<&FormatContext> {
		ctx.ok_or(IntlError::MissingContext)
	}

	pub fn config(&self) -> &Arc<Configuration> {
		&self.inner.config
	}

	pub fn locale(&self) -> &str {
		&self.inner.config.locale
	}

	pub fn formatters(&self) -> &Arc<FormatterCache> {
		&self.inner.formatters
	}

	pub fn clock(&self) -> &Arc<dyn Clock> {
		&self.inner.clock
	}

	pub fn registry(&self) -> &Arc<dyn LocaleRegistry> {
		&self.inner.registry
	}

	/// Current time in epoch milliseconds as seen by this scope.
	pub fn now(&self) -> f64 {
		self.inner.now.now()
	}

	/// True once the owning provider has been activated.
	pub fn is_live(&self) -> bool {
		self.inner.now.is_active()
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	pub fn format_date(&self, value: impl Into<TimeValue>, options: &DateFormatOptions) -> String {
		format::format_date(&self.inner.config, &self.inner.formatters, &value.into(), options)
	}

	pub fn format_time(&self, value: impl Into<TimeValue>, options: &DateFormatOptions) -> String {
		format::format_time(&self.inner.config, &self.inner.formatters, &value.into(), options)
	}

	pub fn format_number(&self, value: f64, options: &NumberFormatOptions) -> String {
		format::format_number(&self.inner.config, &self.inner.formatters, value, options)
	}

	pub fn format_relative(
		&self,
		value: impl Into<TimeValue>,
		options: &RelativeFormatOptions,
	) -> String {
		format::format_relative(
			&self.inner.config,
			&self.inner.formatters,
			&value.into(),
			options,
			self.now(),
		)
	}

	pub fn format_plural(&self, value: f64, options: &PluralOptions) -> PluralCategory {
		format::format_plural(&self.inner.config, &self.inner.formatters, value, options)
	}

	pub fn format_message(&self, descriptor: &MessageDescriptor, values: &MessageValues) -> String {
		format::format_message(&self.inner.config, &self.inner.formatters, descriptor, values)
	}

	pub fn format_html_message(
		&self,
		descriptor: &MessageDescriptor,
		values: &MessageValues,
	) -> String {
		format::format_html_message(&self.inner.config, &self.inner.formatters, descriptor, values)
	}
}

impl fmt::Debug for FormatContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormatContext")
			.field("config", &self.inner.config)
			.field("formatters", &self.inner.formatters)
			.field("now", &self.now())
			.finish()
	}
}
