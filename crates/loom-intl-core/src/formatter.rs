// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Platform formatter interfaces.
//!
//! The engine never constructs formatters itself. A [`FormatterFactory`] is
//! injected at the root scope and every construction goes through the
//! [`FormatterCache`](crate::FormatterCache).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Formats;
use crate::error::FormatError;
use crate::options::{DateTimeOptions, NumberOptions, PluralOptions, RelativeTimeOptions};

/// Kinds of formatter the cache distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatterKind {
	DateTime,
	Number,
	Message,
	RelativeTime,
	Plural,
}

/// CLDR plural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
	Zero,
	One,
	Two,
	Few,
	Many,
	Other,
}

impl PluralCategory {
	pub fn as_str(self) -> &'static str {
		match self {
			PluralCategory::Zero => "zero",
			PluralCategory::One => "one",
			PluralCategory::Two => "two",
			PluralCategory::Few => "few",
			PluralCategory::Many => "many",
			PluralCategory::Other => "other",
		}
	}
}

impl fmt::Display for PluralCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// An argument interpolated into a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageValue {
	Text(String),
	Number(f64),
}

impl From<&str> for MessageValue {
	fn from(value: &str) -> Self {
		MessageValue::Text(value.to_string())
	}
}

impl From<String> for MessageValue {
	fn from(value: String) -> Self {
		MessageValue::Text(value)
	}
}

impl From<f64> for MessageValue {
	fn from(value: f64) -> Self {
		MessageValue::Number(value)
	}
}

impl From<i64> for MessageValue {
	fn from(value: i64) -> Self {
		MessageValue::Number(value as f64)
	}
}

impl From<i32> for MessageValue {
	fn from(value: i32) -> Self {
		MessageValue::Number(f64::from(value))
	}
}

/// Named message arguments.
pub type MessageValues = BTreeMap<String, MessageValue>;

pub trait DateTimeFormat: Send + Sync {
	/// Formats an instant given in milliseconds since the Unix epoch.
	fn format(&self, epoch_ms: f64) -> Result<String, FormatError>;
}

pub trait NumberFormat: Send + Sync {
	fn format(&self, value: f64) -> String;
}

pub trait MessageFormat: Send + Sync {
	fn format(&self, values: &MessageValues) -> Result<String, FormatError>;
}

pub trait RelativeTimeFormat: Send + Sync {
	/// Describes `epoch_ms` relative to `now_ms`.
	fn format(&self, epoch_ms: f64, now_ms: f64) -> Result<String, FormatError>;
}

pub trait PluralSelect: Send + Sync {
	fn select(&self, value: f64) -> Result<PluralCategory, FormatError>;
}

/// Constructs platform formatters. Construction may be expensive and may
/// reject invalid options.
pub trait FormatterFactory: Send + Sync {
	fn date_time(
		&self,
		locale: &str,
		options: &DateTimeOptions,
	) -> Result<Arc<dyn DateTimeFormat>, FormatError>;

	fn number(&self, locale: &str, options: &NumberOptions)
		-> Result<Arc<dyn NumberFormat>, FormatError>;

	fn message(
		&self,
		locale: &str,
		template: &str,
		formats: &Formats,
	) -> Result<Arc<dyn MessageFormat>, FormatError>;

	fn relative_time(
		&self,
		locale: &str,
		options: &RelativeTimeOptions,
	) -> Result<Arc<dyn RelativeTimeFormat>, FormatError>;

	fn plural(&self, locale: &str, options: &PluralOptions)
		-> Result<Arc<dyn PluralSelect>, FormatError>;
}
