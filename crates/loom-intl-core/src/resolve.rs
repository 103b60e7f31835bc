// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration resolution.

use std::sync::Arc;

use tracing::debug;

use crate::config::{
	empty_formats, empty_messages, ConfigProps, Configuration, DEFAULT_LOCALE,
	DEFAULT_TEXT_COMPONENT,
};
use crate::error::IntlError;
use crate::locale::LocaleRegistry;

/// Resolve the effective configuration for a scope.
///
/// Resolution order (highest to lowest priority):
/// 1. Fields set in `explicit`
/// 2. The `inherited` configuration of the nearest ancestor scope
/// 3. Built-in defaults
///
/// When the resulting locale has no registered data, `on_error` is called once
/// with [`IntlError::MissingLocaleData`] and the configuration falls back to
/// `default_locale`, `default_formats` and the shared empty message table.
pub fn resolve_config(
	explicit: &ConfigProps,
	inherited: Option<&Configuration>,
	registry: &dyn LocaleRegistry,
) -> Configuration {
	let mut layer = inherited.map(ConfigProps::from).unwrap_or_default();
	layer.merge(explicit.clone());
	finalize(layer, registry)
}

fn finalize(layer: ConfigProps, registry: &dyn LocaleRegistry) -> Configuration {
	let default_locale = layer
		.default_locale
		.unwrap_or_else(|| DEFAULT_LOCALE.to_string());
	let default_formats = layer.default_formats.unwrap_or_else(empty_formats);
	let on_error = layer.on_error.unwrap_or_default();
	let time_zone = layer.time_zone;
	let text_component = layer
		.text_component
		.unwrap_or_else(|| DEFAULT_TEXT_COMPONENT.to_string());

	match layer.locale {
		Some(locale) if registry.has_locale(&locale) => Configuration {
			locale,
			time_zone,
			formats: layer.formats.unwrap_or_else(empty_formats),
			messages: layer.messages.unwrap_or_else(empty_messages),
			text_component,
			default_locale,
			default_formats,
			on_error,
		},
		requested => {
			let requested = requested.unwrap_or_else(|| "<unset>".to_string());
			debug!(
				locale = %requested,
				default_locale = %default_locale,
				"no locale data registered, using default locale"
			);
			on_error.report(IntlError::MissingLocaleData {
				locale: requested,
				default_locale: default_locale.clone(),
			});

			Configuration {
				locale: default_locale.clone(),
				time_zone,
				formats: Arc::clone(&default_formats),
				messages: empty_messages(),
				text_component,
				default_locale,
				default_formats,
				on_error,
			}
		}
	}
}

struct Resolved {
	explicit: ConfigProps,
	inherited: Option<Arc<Configuration>>,
	config: Arc<Configuration>,
}

/// Memoizing front end to [`resolve_config`].
///
/// Returns the previously resolved `Arc` when the explicit props are equal and
/// the inherited configuration is the same allocation, so unchanged inputs
/// never produce a new configuration identity or repeat a locale warning.
pub struct ConfigResolver {
	registry: Arc<dyn LocaleRegistry>,
	last: Option<Resolved>,
}

impl ConfigResolver {
	pub fn new(registry: Arc<dyn LocaleRegistry>) -> Self {
		Self {
			registry,
			last: None,
		}
	}

	pub fn registry(&self) -> &Arc<dyn LocaleRegistry> {
		&self.registry
	}

	pub fn resolve(
		&mut self,
		explicit: &ConfigProps,
		inherited: Option<&Arc<Configuration>>,
	) -> Arc<Configuration> {
		if let Some(last) = &self.last {
			let same_parent = match (&last.inherited, inherited) {
				(Some(a), Some(b)) => Arc::ptr_eq(a, b),
				(None, None) => true,
				_ => false,
			};
			if same_parent && last.explicit == *explicit {
				return Arc::clone(&last.config);
			}
		}

		let config = Arc::new(resolve_config(
			explicit,
			inherited.map(Arc::as_ref),
			self.registry.as_ref(),
		));
		self.last = Some(Resolved {
			explicit: explicit.clone(),
			inherited: inherited.cloned(),
			config: Arc::clone(&config),
		});
		config
	}
}
