// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale data lookup.

use std::collections::HashSet;

use parking_lot::RwLock;
use unic_langid::LanguageIdentifier;

/// Answers whether locale data is registered for a tag.
pub trait LocaleRegistry: Send + Sync {
	fn has_locale(&self, tag: &str) -> bool;
}

/// In-memory registry of locale tags.
///
/// Lookups are case-insensitive and fall back through the tag's parents, so
/// registering `fr` also covers `fr-FR` and `fr-CA`.
#[derive(Debug, Default)]
pub struct StaticLocaleRegistry {
	tags: RwLock<HashSet<String>>,
}

impl StaticLocaleRegistry {
	pub fn new<I, S>(tags: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let tags = tags.into_iter().map(|t| normalize(t.as_ref())).collect();
		Self {
			tags: RwLock::new(tags),
		}
	}

	/// Registers locale data for `tag`.
	pub fn add(&self, tag: &str) {
		self.tags.write().insert(normalize(tag));
	}

	pub fn len(&self) -> usize {
		self.tags.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.tags.read().is_empty()
	}
}

impl LocaleRegistry for StaticLocaleRegistry {
	fn has_locale(&self, tag: &str) -> bool {
		let normalized = normalize(tag);
		if normalized.is_empty() {
			return false;
		}

		let tags = self.tags.read();
		let mut parts: Vec<&str> = normalized.split('-').collect();
		while !parts.is_empty() {
			if tags.contains(&parts.join("-")) {
				return true;
			}
			parts.pop();
		}
		false
	}
}

fn normalize(tag: &str) -> String {
	tag.trim().replace('_', "-").to_lowercase()
}

/// Returns true if `tag` is a syntactically valid BCP-47 language identifier.
pub fn is_well_formed(tag: &str) -> bool {
	!tag.is_empty() && tag.parse::<LanguageIdentifier>().is_ok()
}
