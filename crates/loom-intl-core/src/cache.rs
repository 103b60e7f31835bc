// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Memoized formatter construction.
//!
//! Entries are keyed by formatter kind plus the JSON serialization of the
//! constructor arguments, so two option values with equal content share one
//! formatter. Each key owns a [`OnceCell`]: concurrent callers asking for the
//! same key wait for a single construction instead of racing.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use crate::config::Formats;
use crate::error::FormatError;
use crate::formatter::{
	DateTimeFormat, FormatterFactory, FormatterKind, MessageFormat, NumberFormat, PluralSelect,
	RelativeTimeFormat,
};
use crate::options::{DateTimeOptions, NumberOptions, PluralOptions, RelativeTimeOptions};

type Slot<T> = Arc<OnceCell<Arc<T>>>;

struct Memo<T: ?Sized> {
	kind: FormatterKind,
	slots: Mutex<HashMap<String, Slot<T>>>,
}

impl<T: ?Sized> Memo<T> {
	fn new(kind: FormatterKind) -> Self {
		Self {
			kind,
			slots: Mutex::new(HashMap::new()),
		}
	}

	fn get_or_try_init<A, F>(&self, args: &A, build: F) -> Result<Arc<T>, FormatError>
	where
		A: Serialize + ?Sized,
		F: FnOnce() -> Result<Arc<T>, FormatError>,
	{
		let key = cache_key(args)?;
		let slot = {
			let mut slots = self.slots.lock();
			Arc::clone(slots.entry(key.clone()).or_default())
		};

		// Index lock is not held during construction.
		let built = slot.get_or_try_init(|| {
			debug!(kind = ?self.kind, "constructing formatter");
			build()
		});
		match built {
			Ok(formatter) => Ok(Arc::clone(formatter)),
			Err(e) => {
				self.evict_empty(&key, &slot);
				Err(e)
			}
		}
	}

	/// Drops `slot` from the index unless another caller has since filled it.
	fn evict_empty(&self, key: &str, slot: &Slot<T>) {
		let mut slots = self.slots.lock();
		let unfilled = slots
			.get(key)
			.is_some_and(|current| Arc::ptr_eq(current, slot) && current.get().is_none());
		if unfilled {
			slots.remove(key);
		}
	}

	#[cfg(test)]
	fn slot_count(&self) -> usize {
		self.slots.lock().len()
	}

	fn len(&self) -> usize {
		self.slots
			.lock()
			.values()
			.filter(|slot| slot.get().is_some())
			.count()
	}
}

fn cache_key<A: Serialize + ?Sized>(args: &A) -> Result<String, FormatError> {
	serde_json::to_string(args).map_err(|e| FormatError::Type(e.to_string()))
}

/// Formatter cache shared by every scope below the one that created it.
pub struct FormatterCache {
	factory: Arc<dyn FormatterFactory>,
	date_time: Memo<dyn DateTimeFormat>,
	number: Memo<dyn NumberFormat>,
	message: Memo<dyn MessageFormat>,
	relative_time: Memo<dyn RelativeTimeFormat>,
	plural: Memo<dyn PluralSelect>,
}

impl FormatterCache {
	pub fn new(factory: Arc<dyn FormatterFactory>) -> Self {
		Self {
			factory,
			date_time: Memo::new(FormatterKind::DateTime),
			number: Memo::new(FormatterKind::Number),
			message: Memo::new(FormatterKind::Message),
			relative_time: Memo::new(FormatterKind::RelativeTime),
			plural: Memo::new(FormatterKind::Plural),
		}
	}

	pub fn factory(&self) -> &Arc<dyn FormatterFactory> {
		&self.factory
	}

	pub fn date_time(
		&self,
		locale: &str,
		options: &DateTimeOptions,
	) -> Result<Arc<dyn DateTimeFormat>, FormatError> {
		self.date_time
			.get_or_try_init(&(locale, options), || self.factory.date_time(locale, options))
	}

	pub fn number(
		&self,
		locale: &str,
		options: &NumberOptions,
	) -> Result<Arc<dyn NumberFormat>, FormatError> {
		self.number
			.get_or_try_init(&(locale, options), || self.factory.number(locale, options))
	}

	pub fn message(
		&self,
		locale: &str,
		template: &str,
		formats: &Formats,
	) -> Result<Arc<dyn MessageFormat>, FormatError> {
		self.message.get_or_try_init(&(template, locale, formats), || {
			self.factory.message(locale, template, formats)
		})
	}

	pub fn relative_time(
		&self,
		locale: &str,
		options: &RelativeTimeOptions,
	) -> Result<Arc<dyn RelativeTimeFormat>, FormatError> {
		self.relative_time.get_or_try_init(&(locale, options), || {
			self.factory.relative_time(locale, options)
		})
	}

	pub fn plural(
		&self,
		locale: &str,
		options: &PluralOptions,
	) -> Result<Arc<dyn PluralSelect>, FormatError> {
		self.plural
			.get_or_try_init(&(locale, options), || self.factory.plural(locale, options))
	}

	/// Number of constructed formatters of `kind`.
	pub fn len_of(&self, kind: FormatterKind) -> usize {
		match kind {
			FormatterKind::DateTime => self.date_time.len(),
			FormatterKind::Number => self.number.len(),
			FormatterKind::Message => self.message.len(),
			FormatterKind::RelativeTime => self.relative_time.len(),
			FormatterKind::Plural => self.plural.len(),
		}
	}

	/// Total number of constructed formatters.
	pub fn len(&self) -> usize {
		[
			FormatterKind::DateTime,
			FormatterKind::Number,
			FormatterKind::Message,
			FormatterKind::RelativeTime,
			FormatterKind::Plural,
		]
		.into_iter()
		.map(|kind| self.len_of(kind))
		.sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl fmt::Debug for FormatterCache {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormatterCache")
			.field("formatters", &self.len())
			.finish_non_exhaustive()
	}
}
