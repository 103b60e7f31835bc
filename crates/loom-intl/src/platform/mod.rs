// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The bundled formatting platform.
//!
//! [`BasicPlatform`] renders English patterns for dates, numbers and relative
//! time regardless of locale, uses CLDR plural rules from `intl_pluralrules`
//! and compiles messages with `fluent-bundle`. Embedders with real locale
//! data supply their own [`FormatterFactory`].

mod date;
mod message;
mod number;
mod plural;
mod relative_time;

use std::sync::Arc;

use intl_pluralrules::{PluralRuleType, PluralRules};
use loom_intl_core::{
	DateTimeFormat, DateTimeOptions, FormatError, FormatterFactory, Formats, MessageFormat,
	NumberFormat, NumberOptions, PluralOptions, PluralSelect, RelativeTimeFormat,
	RelativeTimeOptions, StaticLocaleRegistry,
};
use once_cell::sync::Lazy;
use tracing::debug;

use date::BasicDateTimeFormat;
use message::FluentMessageFormat;
use number::BasicNumberFormat;
use plural::BasicPluralSelect;
use relative_time::BasicRelativeTimeFormat;

static LOCALE_REGISTRY: Lazy<Arc<StaticLocaleRegistry>> = Lazy::new(|| {
	let locales = PluralRules::get_locales(PluralRuleType::CARDINAL);
	debug!(count = locales.len(), "building locale registry from plural rules");
	Arc::new(StaticLocaleRegistry::new(
		locales.iter().map(ToString::to_string),
	))
});

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicPlatform;

impl BasicPlatform {
	pub fn new() -> Self {
		Self
	}

	/// Registry of every locale with CLDR plural rules.
	pub fn locale_registry() -> Arc<StaticLocaleRegistry> {
		Arc::clone(&LOCALE_REGISTRY)
	}
}

impl FormatterFactory for BasicPlatform {
	fn date_time(
		&self,
		locale: &str,
		options: &DateTimeOptions,
	) -> Result<Arc<dyn DateTimeFormat>, FormatError> {
		debug!(locale, "creating date/time formatter");
		Ok(Arc::new(BasicDateTimeFormat::new(options)?))
	}

	fn number(
		&self,
		locale: &str,
		options: &NumberOptions,
	) -> Result<Arc<dyn NumberFormat>, FormatError> {
		debug!(locale, "creating number formatter");
		Ok(Arc::new(BasicNumberFormat::new(options)?))
	}

	fn message(
		&self,
		locale: &str,
		template: &str,
		_formats: &Formats,
	) -> Result<Arc<dyn MessageFormat>, FormatError> {
		debug!(locale, "compiling message template");
		Ok(Arc::new(FluentMessageFormat::new(locale, template)?))
	}

	fn relative_time(
		&self,
		locale: &str,
		options: &RelativeTimeOptions,
	) -> Result<Arc<dyn RelativeTimeFormat>, FormatError> {
		debug!(locale, "creating relative time formatter");
		Ok(Arc::new(BasicRelativeTimeFormat::new(options)))
	}

	fn plural(
		&self,
		locale: &str,
		options: &PluralOptions,
	) -> Result<Arc<dyn PluralSelect>, FormatError> {
		debug!(locale, "creating plural selector");
		Ok(Arc::new(BasicPluralSelect::new(locale, options)?))
	}
}
