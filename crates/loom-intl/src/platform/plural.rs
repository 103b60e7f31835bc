// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use intl_pluralrules::{PluralCategory as CldrCategory, PluralRuleType, PluralRules};
use loom_intl_core::{FormatError, PluralCategory, PluralOptions, PluralSelect, PluralStyle};
use unic_langid::LanguageIdentifier;

/// Plural-rule selector over the CLDR rules shipped with `intl_pluralrules`.
pub(crate) struct BasicPluralSelect {
	rules: PluralRules,
}

impl BasicPluralSelect {
	pub(crate) fn new(locale: &str, options: &PluralOptions) -> Result<Self, FormatError> {
		let langid: LanguageIdentifier = locale.parse().map_err(|_| {
			FormatError::Range(format!("Incorrect locale information provided: {locale}"))
		})?;
		let style = options.style.unwrap_or_default();

		let language_only = LanguageIdentifier::from_parts(langid.language, None, None, &[]);
		let rules = PluralRules::create(langid, rule_type(style))
			.or_else(|_| PluralRules::create(language_only, rule_type(style)))
			.map_err(|e| FormatError::Range(format!("{e}: {locale}")))?;

		Ok(Self { rules })
	}
}

fn rule_type(style: PluralStyle) -> PluralRuleType {
	match style {
		PluralStyle::Cardinal => PluralRuleType::CARDINAL,
		PluralStyle::Ordinal => PluralRuleType::ORDINAL,
	}
}

impl PluralSelect for BasicPluralSelect {
	fn select(&self, value: f64) -> Result<PluralCategory, FormatError> {
		if !value.is_finite() {
			return Err(FormatError::Range(format!("Invalid plural operand: {value}")));
		}
		let category = self
			.rules
			.select(value.to_string().as_str())
			.map_err(|e| FormatError::Range(e.to_string()))?;

		Ok(match category {
			CldrCategory::ZERO => PluralCategory::Zero,
			CldrCategory::ONE => PluralCategory::One,
			CldrCategory::TWO => PluralCategory::Two,
			CldrCategory::FEW => PluralCategory::Few,
			CldrCategory::MANY => PluralCategory::Many,
			CldrCategory::OTHER => PluralCategory::Other,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn english_cardinals() {
		let select = BasicPluralSelect::new("en", &PluralOptions::default()).unwrap();
		assert_eq!(select.select(1.0).unwrap(), PluralCategory::One);
		assert_eq!(select.select(0.0).unwrap(), PluralCategory::Other);
		assert_eq!(select.select(5.0).unwrap(), PluralCategory::Other);
	}

	#[test]
	fn english_ordinals() {
		let select = BasicPluralSelect::new(
			"en",
			&PluralOptions {
				style: Some(PluralStyle::Ordinal),
			},
		)
		.unwrap();
		assert_eq!(select.select(2.0).unwrap(), PluralCategory::Two);
		assert_eq!(select.select(3.0).unwrap(), PluralCategory::Few);
		assert_eq!(select.select(11.0).unwrap(), PluralCategory::Other);
	}

	#[test]
	fn region_falls_back_to_language_rules() {
		let select = BasicPluralSelect::new("ar-EG", &PluralOptions::default()).unwrap();
		assert_eq!(select.select(2.0).unwrap(), PluralCategory::Two);
	}

	#[test]
	fn non_finite_is_range_error() {
		let select = BasicPluralSelect::new("en", &PluralOptions::default()).unwrap();
		assert!(select.select(f64::NAN).is_err());
	}
}
