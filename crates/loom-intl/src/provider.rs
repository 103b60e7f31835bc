// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scope providers: nodes of the scope tree that publish a [`FormatContext`].

use std::fmt;
use std::sync::Arc;

use loom_intl_core::{
	ConfigProps, ConfigResolver, FormatterCache, FormatterFactory, IntlError, LocaleRegistry,
	Result,
};
use tracing::{debug, instrument};

use crate::clock::{Clock, SystemClock};
use crate::context::{get_format_context, FormatContext, ScopeState};
use crate::platform::BasicPlatform;

/// Builder for a [`ScopeProvider`].
///
/// A root scope needs a formatting platform. A child scope built with
/// [`ScopeProviderBuilder::parent`] reuses its ancestor's formatter cache,
/// clock and locale registry instead.
#[derive(Default)]
pub struct ScopeProviderBuilder {
	props: ConfigProps,
	platform: Option<Arc<dyn FormatterFactory>>,
	registry: Option<Arc<dyn LocaleRegistry>>,
	clock: Option<Arc<dyn Clock>>,
	initial_now: Option<f64>,
	parent: Option<FormatContext>,
}

impl ScopeProviderBuilder {
	pub fn props(mut self, props: ConfigProps) -> Self {
		self.props = props;
		self
	}

	pub fn platform(mut self, platform: Arc<dyn FormatterFactory>) -> Self {
		self.platform = Some(platform);
		self
	}

	/// Uses [`BasicPlatform`] and its plural-rule locale registry.
	pub fn basic_platform(mut self) -> Self {
		self.platform = Some(Arc::new(BasicPlatform::new()));
		if self.registry.is_none() {
			self.registry = Some(BasicPlatform::locale_registry());
		}
		self
	}

	pub fn locale_registry(mut self, registry: Arc<dyn LocaleRegistry>) -> Self {
		self.registry = Some(registry);
		self
	}

	pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = Some(clock);
		self
	}

	/// Overrides the frozen pre-activation `now()`. Non-finite values are
	/// ignored.
	pub fn initial_now(mut self, initial_now: f64) -> Self {
		self.initial_now = Some(initial_now);
		self
	}

	pub fn parent(mut self, parent: FormatContext) -> Self {
		self.parent = Some(parent);
		self
	}

	#[instrument(skip_all)]
	pub fn build(self) -> Result<ScopeProvider> {
		let (formatters, clock, registry) = match &self.parent {
			Some(parent) => (
				Arc::clone(parent.formatters()),
				self.clock.unwrap_or_else(|| Arc::clone(parent.clock())),
				self.registry.unwrap_or_else(|| Arc::clone(parent.registry())),
			),
			None => {
				let platform = self.platform.ok_or_else(|| {
					IntlError::PlatformUnavailable(
						"no formatter factory configured for the root scope".to_string(),
					)
				})?;
				(
					Arc::new(FormatterCache::new(platform)),
					self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
					self.registry
						.unwrap_or_else(|| BasicPlatform::locale_registry() as Arc<dyn LocaleRegistry>),
				)
			}
		};

		let initial_now = self
			.initial_now
			.filter(|now| now.is_finite())
			.or_else(|| self.parent.as_ref().map(FormatContext::now))
			.unwrap_or_else(|| clock.now_ms());

		let mut resolver = ConfigResolver::new(Arc::clone(&registry));
		let config = resolver.resolve(&self.props, self.parent.as_ref().map(FormatContext::config));
		let state = ScopeState::new(formatters, initial_now, clock, registry);
		let context = get_format_context(&config, &state);
		debug!(locale = %config.locale, initial_now, "scope provider built");

		Ok(ScopeProvider {
			props: self.props,
			parent: self.parent,
			resolver,
			state,
			context,
		})
	}
}

/// A node in the scope tree.
///
/// Holds its explicit props and its nearest ancestor's context, and
/// republishes its own context whenever either changes. Identical inputs
/// republish the identical context.
pub struct ScopeProvider {
	props: ConfigProps,
	parent: Option<FormatContext>,
	resolver: ConfigResolver,
	state: ScopeState,
	context: FormatContext,
}

impl ScopeProvider {
	pub fn builder() -> ScopeProviderBuilder {
		ScopeProviderBuilder::default()
	}

	/// Builder for a child scope inheriting from this one.
	pub fn child(&self, props: ConfigProps) -> ScopeProviderBuilder {
		ScopeProviderBuilder::default()
			.props(props)
			.parent(self.context())
	}

	/// The currently published context.
	pub fn context(&self) -> FormatContext {
		self.context.clone()
	}

	pub fn props(&self) -> &ConfigProps {
		&self.props
	}

	/// Switches this scope's `now()` to the live clock.
	#[instrument(skip_all)]
	pub fn activate(&self) {
		debug!(locale = %self.context.locale(), "scope provider activated");
		self.state.activate();
	}

	/// Replaces the explicit props and republishes.
	#[instrument(skip_all)]
	pub fn reconfigure(&mut self, props: ConfigProps) -> FormatContext {
		self.props = props;
		self.republish()
	}

	/// Records a new ancestor context and republishes.
	#[instrument(skip_all)]
	pub fn inherit(&mut self, parent: FormatContext) -> FormatContext {
		self.parent = Some(parent);
		self.republish()
	}

	fn republish(&mut self) -> FormatContext {
		let config = self
			.resolver
			.resolve(&self.props, self.parent.as_ref().map(FormatContext::config));
		let context = get_format_context(&config, &self.state);
		if !context.ptr_eq(&self.context) {
			debug!(locale = %config.locale, "publishing new format context");
		}
		self.context = context.clone();
		context
	}
}

impl fmt::Debug for ScopeProvider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ScopeProvider")
			.field("props", &self.props)
			.field("context", &self.context)
			.finish()
	}
}
