// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use loom_intl_core::{PluralCategory, PluralOptions};

use crate::context::FormatContext;

/// Per-category texts for a pluralized label. `other` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluralTexts {
	pub zero: Option<String>,
	pub one: Option<String>,
	pub two: Option<String>,
	pub few: Option<String>,
	pub many: Option<String>,
	pub other: String,
}

impl PluralTexts {
	pub fn new(other: impl Into<String>) -> Self {
		Self {
			other: other.into(),
			..Default::default()
		}
	}

	pub fn with(mut self, category: PluralCategory, text: impl Into<String>) -> Self {
		let text = Some(text.into());
		match category {
			PluralCategory::Zero => self.zero = text,
			PluralCategory::One => self.one = text,
			PluralCategory::Two => self.two = text,
			PluralCategory::Few => self.few = text,
			PluralCategory::Many => self.many = text,
			PluralCategory::Other => self.other = text.unwrap_or_default(),
		}
		self
	}

	/// The text for `category`, or `other` when that category has none.
	pub fn select(&self, category: PluralCategory) -> &str {
		let text = match category {
			PluralCategory::Zero => self.zero.as_deref(),
			PluralCategory::One => self.one.as_deref(),
			PluralCategory::Two => self.two.as_deref(),
			PluralCategory::Few => self.few.as_deref(),
			PluralCategory::Many => self.many.as_deref(),
			PluralCategory::Other => None,
		};
		text.unwrap_or(&self.other)
	}

	/// Selects the text for `value` under the context's plural rules.
	pub fn format(&self, ctx: &FormatContext, value: f64, options: &PluralOptions) -> &str {
		self.select(ctx.format_plural(value, options))
	}
}
