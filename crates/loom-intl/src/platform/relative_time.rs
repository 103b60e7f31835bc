// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use loom_intl_core::{FormatError, RelativeStyle, RelativeTimeFormat, RelativeTimeOptions, RelativeUnit};

/// English relative-time labels.
///
/// The count is the number of whole units between the two instants, so a
/// label only changes when a unit boundary is crossed.
#[derive(Debug)]
pub(crate) struct BasicRelativeTimeFormat {
	units: Option<RelativeUnit>,
	style: RelativeStyle,
}

impl BasicRelativeTimeFormat {
	pub(crate) fn new(options: &RelativeTimeOptions) -> Self {
		Self {
			units: options.units,
			style: options.style.unwrap_or_default(),
		}
	}
}

impl RelativeTimeFormat for BasicRelativeTimeFormat {
	fn format(&self, epoch_ms: f64, now_ms: f64) -> Result<String, FormatError> {
		if !epoch_ms.is_finite() || !now_ms.is_finite() {
			return Err(FormatError::Range(
				"The date value provided to RelativeTimeFormat#format() is not in valid range."
					.to_string(),
			));
		}

		let delta = epoch_ms - now_ms;
		let unit = self.units.unwrap_or_else(|| RelativeUnit::select(delta));
		let count = (delta.abs() / unit.millis() as f64).floor() as i64;
		let past = delta < 0.0;

		if self.style == RelativeStyle::BestFit {
			if let Some(phrase) = phrase(unit, count, past) {
				return Ok(phrase.to_string());
			}
		}

		let name = unit.as_str();
		let plural = if count == 1 { "" } else { "s" };
		Ok(if past {
			format!("{count} {name}{plural} ago")
		} else {
			format!("in {count} {name}{plural}")
		})
	}
}

fn phrase(unit: RelativeUnit, count: i64, past: bool) -> Option<&'static str> {
	match (unit, count, past) {
		(RelativeUnit::Second, 0, _) => Some("now"),
		(RelativeUnit::Minute, 0, _) => Some("this minute"),
		(RelativeUnit::Hour, 0, _) => Some("this hour"),
		(RelativeUnit::Day, 0, _) => Some("today"),
		(RelativeUnit::Day, 1, true) => Some("yesterday"),
		(RelativeUnit::Day, 1, false) => Some("tomorrow"),
		(RelativeUnit::Month, 0, _) => Some("this month"),
		(RelativeUnit::Month, 1, true) => Some("last month"),
		(RelativeUnit::Month, 1, false) => Some("next month"),
		(RelativeUnit::Year, 0, _) => Some("this year"),
		(RelativeUnit::Year, 1, true) => Some("last year"),
		(RelativeUnit::Year, 1, false) => Some("next year"),
		_ => None,
	}
}
