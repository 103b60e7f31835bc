// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Formatting operations bound into a [`FormatContext`](crate::FormatContext).
//!
//! Every operation reports failures to the configuration's `on_error` sink and
//! returns a fallback string instead of an error.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use loom_intl_core::{
	Configuration, DateTimeOptions, FormatError, FormatOperation, FormatterCache, Formats,
	IntlError, MessageValue, MessageValues, NumberOptions, NumericWidth, PluralCategory,
	PluralOptions, RelativeTimeOptions,
};
use tracing::trace;

/// A point in time to format.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeValue {
	/// Milliseconds since the Unix epoch. May be non-finite.
	Millis(f64),
	Instant(DateTime<Utc>),
	/// RFC 3339 or RFC 2822 text.
	Text(String),
}

impl TimeValue {
	/// Milliseconds since the Unix epoch, or NaN when the value is unparsable.
	pub fn epoch_millis(&self) -> f64 {
		match self {
			TimeValue::Millis(ms) => *ms,
			TimeValue::Instant(instant) => instant.timestamp_millis() as f64,
			TimeValue::Text(text) => DateTime::parse_from_rfc3339(text)
				.or_else(|_| DateTime::parse_from_rfc2822(text))
				.map(|dt| dt.timestamp_millis() as f64)
				.unwrap_or(f64::NAN),
		}
	}
}

/// Default string representation, used as the fallback when formatting fails.
impl fmt::Display for TimeValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let ms = self.epoch_millis();
		let instant = ms
			.is_finite()
			.then(|| DateTime::<Utc>::from_timestamp_millis(ms.trunc() as i64))
			.flatten();
		match instant {
			Some(instant) => f.write_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true)),
			None => f.write_str("Invalid Date"),
		}
	}
}

impl From<f64> for TimeValue {
	fn from(value: f64) -> Self {
		TimeValue::Millis(value)
	}
}

impl From<i64> for TimeValue {
	fn from(value: i64) -> Self {
		TimeValue::Millis(value as f64)
	}
}

impl From<DateTime<Utc>> for TimeValue {
	fn from(value: DateTime<Utc>) -> Self {
		TimeValue::Instant(value)
	}
}

impl From<&str> for TimeValue {
	fn from(value: &str) -> Self {
		TimeValue::Text(value.to_string())
	}
}

impl From<String> for TimeValue {
	fn from(value: String) -> Self {
		TimeValue::Text(value)
	}
}

/// Per-call options: an optional named preset plus explicit fields that
/// override it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOptions<T> {
	pub format: Option<String>,
	pub options: T,
}

impl<T: Default> FormatOptions<T> {
	pub fn named(format: impl Into<String>) -> Self {
		Self {
			format: Some(format.into()),
			options: T::default(),
		}
	}
}

impl<T> From<T> for FormatOptions<T> {
	fn from(options: T) -> Self {
		Self {
			format: None,
			options,
		}
	}
}

pub type DateFormatOptions = FormatOptions<DateTimeOptions>;
pub type NumberFormatOptions = FormatOptions<NumberOptions>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelativeFormatOptions {
	pub format: Option<String>,
	/// Reference instant; defaults to the context's `now()`.
	pub now: Option<f64>,
	pub options: RelativeTimeOptions,
}

/// Identifies a message and its source-language fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDescriptor {
	pub id: String,
	pub default_message: Option<String>,
	pub description: Option<String>,
}

impl MessageDescriptor {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Default::default()
		}
	}

	pub fn with_default_message(mut self, default_message: impl Into<String>) -> Self {
		self.default_message = Some(default_message.into());
		self
	}
}

fn named_format<'a, T>(
	config: &Configuration,
	presets: &'a BTreeMap<String, T>,
	category: &'static str,
	name: Option<&str>,
) -> Option<&'a T> {
	let name = name?;
	let preset = presets.get(name);
	if preset.is_none() {
		config.on_error.report(IntlError::MissingNamedFormat {
			category,
			name: name.to_string(),
		});
	}
	preset
}

fn report(config: &Configuration, operation: FormatOperation, source: FormatError) {
	config
		.on_error
		.report(IntlError::Format { operation, source });
}

fn date_time_options(
	config: &Configuration,
	presets: &BTreeMap<String, DateTimeOptions>,
	category: &'static str,
	options: &DateFormatOptions,
) -> DateTimeOptions {
	let defaults = named_format(config, presets, category, options.format.as_deref())
		.cloned()
		.unwrap_or_default();
	let mut resolved = options.options.clone().or(&defaults);
	if resolved.time_zone.is_none() {
		resolved.time_zone = config.time_zone.clone();
	}
	resolved
}

pub(crate) fn format_date(
	config: &Configuration,
	formatters: &FormatterCache,
	value: &TimeValue,
	options: &DateFormatOptions,
) -> String {
	let resolved = date_time_options(config, &config.formats.date, "date", options);
	formatters
		.date_time(&config.locale, &resolved)
		.and_then(|f| f.format(value.epoch_millis()))
		.unwrap_or_else(|e| {
			report(config, FormatOperation::Date, e);
			value.to_string()
		})
}

pub(crate) fn format_time(
	config: &Configuration,
	formatters: &FormatterCache,
	value: &TimeValue,
	options: &DateFormatOptions,
) -> String {
	let mut resolved = date_time_options(config, &config.formats.time, "time", options);
	if !resolved.has_time_fields() {
		resolved.hour = Some(NumericWidth::Numeric);
		resolved.minute = Some(NumericWidth::Numeric);
	}
	formatters
		.date_time(&config.locale, &resolved)
		.and_then(|f| f.format(value.epoch_millis()))
		.unwrap_or_else(|e| {
			report(config, FormatOperation::Time, e);
			value.to_string()
		})
}

pub(crate) fn format_number(
	config: &Configuration,
	formatters: &FormatterCache,
	value: f64,
	options: &NumberFormatOptions,
) -> String {
	let defaults = named_format(config, &config.formats.number, "number", options.format.as_deref())
		.cloned()
		.unwrap_or_default();
	let resolved = options.options.clone().or(&defaults);
	match formatters.number(&config.locale, &resolved) {
		Ok(formatter) => formatter.format(value),
		Err(e) => {
			report(config, FormatOperation::Number, e);
			value.to_string()
		}
	}
}

pub(crate) fn format_relative(
	config: &Configuration,
	formatters: &FormatterCache,
	value: &TimeValue,
	options: &RelativeFormatOptions,
	now: f64,
) -> String {
	let defaults =
		named_format(config, &config.formats.relative, "relative", options.format.as_deref())
			.cloned()
			.unwrap_or_default();
	let resolved = options.options.clone().or(&defaults);
	let now = options.now.filter(|n| n.is_finite()).unwrap_or(now);
	formatters
		.relative_time(&config.locale, &resolved)
		.and_then(|f| f.format(value.epoch_millis(), now))
		.unwrap_or_else(|e| {
			report(config, FormatOperation::RelativeTime, e);
			value.to_string()
		})
}

pub(crate) fn format_plural(
	config: &Configuration,
	formatters: &FormatterCache,
	value: f64,
	options: &PluralOptions,
) -> PluralCategory {
	formatters
		.plural(&config.locale, options)
		.and_then(|f| f.select(value))
		.unwrap_or_else(|e| {
			report(config, FormatOperation::Plural, e);
			PluralCategory::Other
		})
}

fn compile(
	formatters: &FormatterCache,
	locale: &str,
	template: &str,
	formats: &Formats,
	values: &MessageValues,
) -> Result<String, FormatError> {
	formatters
		.message(locale, template, formats)
		.and_then(|f| f.format(values))
}

pub(crate) fn format_message(
	config: &Configuration,
	formatters: &FormatterCache,
	descriptor: &MessageDescriptor,
	values: &MessageValues,
) -> String {
	let id = descriptor.id.as_str();
	let default_message = descriptor.default_message.as_deref();
	let message = config.message(id);
	let has_default = default_message.is_some();

	let mut formatted = None;
	match message {
		Some(template) => {
			match compile(formatters, &config.locale, template, &config.formats, values) {
				Ok(out) => formatted = Some(out),
				Err(source) => config.on_error.report(IntlError::MessageFormat {
					id: id.to_string(),
					locale: config.locale.clone(),
					has_default,
					source,
				}),
			}
		}
		None => {
			let same_locale = config.locale.eq_ignore_ascii_case(&config.default_locale);
			if !has_default || !same_locale {
				config.on_error.report(IntlError::MissingMessage {
					id: id.to_string(),
					locale: config.locale.clone(),
					has_default,
				});
			}
		}
	}
	formatted = formatted.filter(|out| !out.is_empty());

	if formatted.is_none() {
		if let Some(template) = default_message {
			trace!(id, "formatting default message");
			match compile(
				formatters,
				&config.default_locale,
				template,
				&config.default_formats,
				values,
			) {
				Ok(out) => formatted = Some(out).filter(|out| !out.is_empty()),
				Err(source) => config.on_error.report(IntlError::DefaultMessageFormat {
					id: id.to_string(),
					source,
				}),
			}
		}
	}

	match formatted {
		Some(out) => out,
		None => {
			config.on_error.report(IntlError::MessageFallback {
				id: id.to_string(),
				uses_source: message.is_some() || has_default,
			});
			message
				.filter(|m| !m.is_empty())
				.or(default_message.filter(|m| !m.is_empty()))
				.unwrap_or(id)
				.to_string()
		}
	}
}

pub(crate) fn format_html_message(
	config: &Configuration,
	formatters: &FormatterCache,
	descriptor: &MessageDescriptor,
	values: &MessageValues,
) -> String {
	let escaped = values
		.iter()
		.map(|(name, value)| {
			let value = match value {
				MessageValue::Text(text) => MessageValue::Text(escape_html(text)),
				other => other.clone(),
			};
			(name.clone(), value)
		})
		.collect();
	format_message(config, formatters, descriptor, &escaped)
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'>' => out.push_str("&gt;"),
			'<' => out.push_str("&lt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#x27;"),
			c => out.push(c),
		}
	}
	out
}
