// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types and the error sink used by scoped formatting.
//!
//! Only [`IntlError::PlatformUnavailable`] and configuration-source failures
//! are ever returned as `Err`. Everything else is handed to the configured
//! [`OnError`] sink and masked behind a fallback string so rendering can
//! proceed.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::Lazy;
use thiserror::Error;

/// Result type for intl operations.
pub type Result<T> = std::result::Result<T, IntlError>;

/// Failure raised by a formatter implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
	#[error("RangeError: {0}")]
	Range(String),

	#[error("TypeError: {0}")]
	Type(String),

	#[error("MessageError: {0}")]
	Message(String),
}

/// The formatting operation that produced a [`FormatError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatOperation {
	Date,
	Time,
	Number,
	RelativeTime,
	Plural,
}

impl fmt::Display for FormatOperation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			FormatOperation::Date => "date",
			FormatOperation::Time => "time",
			FormatOperation::Number => "number",
			FormatOperation::RelativeTime => "relative time",
			FormatOperation::Plural => "plural",
		};
		f.write_str(name)
	}
}

/// Errors that can occur while resolving configuration or formatting values.
#[derive(Debug, Error)]
pub enum IntlError {
	#[error("The formatting platform must be available at startup: {0}")]
	PlatformUnavailable(String),

	#[error(
		"Missing locale data for locale: \"{locale}\". Using default locale: \"{default_locale}\" as fallback."
	)]
	MissingLocaleData {
		locale: String,
		default_locale: String,
	},

	#[error("Error formatting {operation}.\n{source}")]
	Format {
		operation: FormatOperation,
		#[source]
		source: FormatError,
	},

	#[error("No {category} format named: {name}")]
	MissingNamedFormat { category: &'static str, name: String },

	#[error(
		"Error formatting message: \"{id}\" for locale: \"{locale}\"{}\n{source}",
		fallback_suffix(.has_default)
	)]
	MessageFormat {
		id: String,
		locale: String,
		has_default: bool,
		#[source]
		source: FormatError,
	},

	#[error("Missing message: \"{id}\" for locale: \"{locale}\"{}", fallback_suffix(.has_default))]
	MissingMessage {
		id: String,
		locale: String,
		has_default: bool,
	},

	#[error("Error formatting the default message for: \"{id}\"\n{source}")]
	DefaultMessageFormat {
		id: String,
		#[source]
		source: FormatError,
	},

	#[error(
		"Cannot format message: \"{id}\", using message {} as fallback.",
		fallback_source(.uses_source)
	)]
	MessageFallback { id: String, uses_source: bool },

	#[error("Could not find required format context. A scope provider needs to exist in the ancestry.")]
	MissingContext,

	#[error("failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config file {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },
}

fn fallback_suffix(has_default: &bool) -> &'static str {
	if *has_default {
		", using default message as fallback."
	} else {
		""
	}
}

fn fallback_source(uses_source: &bool) -> &'static str {
	if *uses_source {
		"source"
	} else {
		"id"
	}
}

type Handler = dyn Fn(&IntlError) + Send + Sync;

static DEFAULT_ON_ERROR: Lazy<OnError> = Lazy::new(|| OnError::new(log_error));

fn log_error(err: &IntlError) {
	tracing::error!(error = %err, "intl error");
}

/// Error sink invoked for every recoverable intl error.
///
/// Two sinks compare equal only when they share the same handler allocation,
/// so a configuration carrying an unchanged sink stays equal across
/// re-resolution.
#[derive(Clone)]
pub struct OnError(Arc<Handler>);

impl OnError {
	pub fn new(handler: impl Fn(&IntlError) + Send + Sync + 'static) -> Self {
		Self(Arc::new(handler))
	}

	/// Hands `err` to the handler.
	pub fn report(&self, err: IntlError) {
		(self.0)(&err);
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		std::ptr::eq(
			Arc::as_ptr(&self.0) as *const (),
			Arc::as_ptr(&other.0) as *const (),
		)
	}
}

/// The shared default sink, which logs through `tracing` and continues.
impl Default for OnError {
	fn default() -> Self {
		DEFAULT_ON_ERROR.clone()
	}
}

impl PartialEq for OnError {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl fmt::Debug for OnError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("OnError(..)")
	}
}
