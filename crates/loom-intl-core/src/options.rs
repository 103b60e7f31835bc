// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Constructor options for the platform formatters.
//!
//! Options double as formatter cache keys, so every type here serializes
//! deterministically and skips unset fields.

use serde::{Deserialize, Serialize};

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const MONTH_MS: i64 = 30 * DAY_MS;
const YEAR_MS: i64 = 365 * DAY_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericWidth {
	#[serde(rename = "numeric")]
	Numeric,
	#[serde(rename = "2-digit")]
	TwoDigit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextWidth {
	Narrow,
	Short,
	Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonthWidth {
	#[serde(rename = "numeric")]
	Numeric,
	#[serde(rename = "2-digit")]
	TwoDigit,
	#[serde(rename = "narrow")]
	Narrow,
	#[serde(rename = "short")]
	Short,
	#[serde(rename = "long")]
	Long,
}

impl MonthWidth {
	pub fn is_textual(self) -> bool {
		matches!(self, MonthWidth::Narrow | MonthWidth::Short | MonthWidth::Long)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneNameWidth {
	Short,
	Long,
}

/// Options for date and time formatters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DateTimeOptions {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub weekday: Option<TextWidth>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub era: Option<TextWidth>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub year: Option<NumericWidth>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub month: Option<MonthWidth>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub day: Option<NumericWidth>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub hour: Option<NumericWidth>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub minute: Option<NumericWidth>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub second: Option<NumericWidth>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub time_zone_name: Option<ZoneNameWidth>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub hour12: Option<bool>,
	/// IANA time zone, e.g. `"Europe/Paris"`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub time_zone: Option<String>,
}

impl DateTimeOptions {
	/// Fills every unset field from `defaults`.
	pub fn or(self, defaults: &Self) -> Self {
		Self {
			weekday: self.weekday.or(defaults.weekday),
			era: self.era.or(defaults.era),
			year: self.year.or(defaults.year),
			month: self.month.or(defaults.month),
			day: self.day.or(defaults.day),
			hour: self.hour.or(defaults.hour),
			minute: self.minute.or(defaults.minute),
			second: self.second.or(defaults.second),
			time_zone_name: self.time_zone_name.or(defaults.time_zone_name),
			hour12: self.hour12.or(defaults.hour12),
			time_zone: self.time_zone.or_else(|| defaults.time_zone.clone()),
		}
	}

	pub fn has_date_fields(&self) -> bool {
		self.weekday.is_some()
			|| self.era.is_some()
			|| self.year.is_some()
			|| self.month.is_some()
			|| self.day.is_some()
	}

	pub fn has_time_fields(&self) -> bool {
		self.hour.is_some() || self.minute.is_some() || self.second.is_some()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NumberStyle {
	#[default]
	Decimal,
	Percent,
	Currency,
}

/// Options for number formatters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberOptions {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub style: Option<NumberStyle>,
	/// ISO 4217 code, required with [`NumberStyle::Currency`].
	#[serde(skip_serializing_if = "Option::is_none")]
	pub currency: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub use_grouping: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub minimum_integer_digits: Option<u8>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub minimum_fraction_digits: Option<u8>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub maximum_fraction_digits: Option<u8>,
}

impl NumberOptions {
	pub fn or(self, defaults: &Self) -> Self {
		Self {
			style: self.style.or(defaults.style),
			currency: self.currency.or_else(|| defaults.currency.clone()),
			use_grouping: self.use_grouping.or(defaults.use_grouping),
			minimum_integer_digits: self.minimum_integer_digits.or(defaults.minimum_integer_digits),
			minimum_fraction_digits: self
				.minimum_fraction_digits
				.or(defaults.minimum_fraction_digits),
			maximum_fraction_digits: self
				.maximum_fraction_digits
				.or(defaults.maximum_fraction_digits),
		}
	}
}

/// Units a relative-time label can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativeUnit {
	Second,
	Minute,
	Hour,
	Day,
	Month,
	Year,
}

impl RelativeUnit {
	/// Length of one unit in milliseconds. Months are 30 days, years 365.
	pub const fn millis(self) -> i64 {
		match self {
			RelativeUnit::Second => SECOND_MS,
			RelativeUnit::Minute => MINUTE_MS,
			RelativeUnit::Hour => HOUR_MS,
			RelativeUnit::Day => DAY_MS,
			RelativeUnit::Month => MONTH_MS,
			RelativeUnit::Year => YEAR_MS,
		}
	}

	/// Picks the largest unit that still yields a non-zero count for `delta_ms`.
	pub fn select(delta_ms: f64) -> Self {
		let abs = delta_ms.abs();
		if abs < MINUTE_MS as f64 {
			RelativeUnit::Second
		} else if abs < HOUR_MS as f64 {
			RelativeUnit::Minute
		} else if abs < DAY_MS as f64 {
			RelativeUnit::Hour
		} else if abs < MONTH_MS as f64 {
			RelativeUnit::Day
		} else if abs < YEAR_MS as f64 {
			RelativeUnit::Month
		} else {
			RelativeUnit::Year
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			RelativeUnit::Second => "second",
			RelativeUnit::Minute => "minute",
			RelativeUnit::Hour => "hour",
			RelativeUnit::Day => "day",
			RelativeUnit::Month => "month",
			RelativeUnit::Year => "year",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RelativeStyle {
	/// Prefers phrases such as "now" or "yesterday" where they exist.
	#[default]
	#[serde(rename = "best-fit")]
	BestFit,
	#[serde(rename = "numeric")]
	Numeric,
}

/// Options for relative-time formatters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RelativeTimeOptions {
	/// Forces a unit instead of selecting one from the distance.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub units: Option<RelativeUnit>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub style: Option<RelativeStyle>,
}

impl RelativeTimeOptions {
	pub fn or(self, defaults: &Self) -> Self {
		Self {
			units: self.units.or(defaults.units),
			style: self.style.or(defaults.style),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PluralStyle {
	#[default]
	Cardinal,
	Ordinal,
}

/// Options for plural-rule selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PluralOptions {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub style: Option<PluralStyle>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn explicit_date_fields_win_over_defaults() {
		let defaults = DateTimeOptions {
			year: Some(NumericWidth::Numeric),
			month: Some(MonthWidth::Long),
			time_zone: Some("UTC".to_string()),
			..Default::default()
		};
		let explicit = DateTimeOptions {
			month: Some(MonthWidth::Short),
			..Default::default()
		};

		let merged = explicit.or(&defaults);

		assert_eq!(merged.month, Some(MonthWidth::Short));
		assert_eq!(merged.year, Some(NumericWidth::Numeric));
		assert_eq!(merged.time_zone.as_deref(), Some("UTC"));
	}

	#[test]
	fn unset_fields_are_not_serialized() {
		let options = DateTimeOptions {
			year: Some(NumericWidth::TwoDigit),
			..Default::default()
		};
		assert_eq!(
			serde_json::to_string(&options).unwrap(),
			r#"{"year":"2-digit"}"#
		);
	}

	#[test]
	fn select_unit_boundaries() {
		assert_eq!(RelativeUnit::select(-59_000.0), RelativeUnit::Second);
		assert_eq!(RelativeUnit::select(-60_000.0), RelativeUnit::Minute);
		assert_eq!(RelativeUnit::select(3_599_999.0), RelativeUnit::Minute);
		assert_eq!(RelativeUnit::select(3_600_000.0), RelativeUnit::Hour);
		assert_eq!(RelativeUnit::select(-86_400_000.0), RelativeUnit::Day);
		assert_eq!(RelativeUnit::select(40.0 * 86_400_000.0), RelativeUnit::Month);
		assert_eq!(RelativeUnit::select(-400.0 * 86_400_000.0), RelativeUnit::Year);
	}

	#[test]
	fn relative_style_uses_kebab_names() {
		let options: RelativeTimeOptions =
			toml::from_str("units = \"minute\"\nstyle = \"best-fit\"").unwrap();
		assert_eq!(options.units, Some(RelativeUnit::Minute));
		assert_eq!(options.style, Some(RelativeStyle::BestFit));
	}

	proptest! {
		/// The selected unit never exceeds the distance it describes.
		#[test]
		fn selected_unit_fits_delta(delta in -1.0e12f64..1.0e12f64) {
			let unit = RelativeUnit::select(delta);
			if unit != RelativeUnit::Second {
				prop_assert!(delta.abs() >= unit.millis() as f64);
			}
		}
	}
}
