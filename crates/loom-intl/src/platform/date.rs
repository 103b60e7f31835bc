// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use loom_intl_core::{
	DateTimeFormat, DateTimeOptions, FormatError, MonthWidth, NumericWidth, TextWidth,
	ZoneNameWidth,
};

/// English-pattern date/time formatter over `chrono-tz`.
#[derive(Debug)]
pub(crate) struct BasicDateTimeFormat {
	options: DateTimeOptions,
	tz: Tz,
}

impl BasicDateTimeFormat {
	pub(crate) fn new(options: &DateTimeOptions) -> Result<Self, FormatError> {
		let tz = match options.time_zone.as_deref() {
			Some(name) => name
				.parse::<Tz>()
				.map_err(|_| FormatError::Range(format!("Invalid time zone specified: {name}")))?,
			None => Tz::UTC,
		};

		let mut options = options.clone();
		if !options.has_date_fields() && !options.has_time_fields() {
			options.year = Some(NumericWidth::Numeric);
			options.month = Some(MonthWidth::Numeric);
			options.day = Some(NumericWidth::Numeric);
		}

		Ok(Self { options, tz })
	}

	fn render(&self, dt: &DateTime<Tz>) -> String {
		let date = self.render_date(dt);
		let time = self.render_time(dt);
		let mut out = match (date.is_empty(), time.is_empty()) {
			(false, false) => format!("{date}, {time}"),
			(false, true) => date,
			_ => time,
		};

		if let Some(width) = self.options.time_zone_name {
			let zone = match width {
				ZoneNameWidth::Short => dt.format("%Z").to_string(),
				ZoneNameWidth::Long => self.tz.name().to_string(),
			};
			if !out.is_empty() {
				out.push(' ');
			}
			out.push_str(&zone);
		}
		out
	}

	fn render_date(&self, dt: &DateTime<Tz>) -> String {
		let o = &self.options;
		let year = o.year.map(|w| numeric(dt, w, "%Y", "%y"));
		let day = o.day.map(|w| numeric(dt, w, "%-d", "%d"));

		let mut body = match o.month {
			Some(month) if month.is_textual() => {
				let mut out = match month {
					MonthWidth::Short => dt.format("%b").to_string(),
					MonthWidth::Narrow => initial(&dt.format("%B").to_string()),
					_ => dt.format("%B").to_string(),
				};
				if let Some(day) = &day {
					out.push(' ');
					out.push_str(day);
				}
				if let Some(year) = &year {
					if day.is_some() {
						out.push(',');
					}
					out.push(' ');
					out.push_str(year);
				}
				out
			}
			month => {
				let month = month.map(|w| match w {
					MonthWidth::TwoDigit => dt.format("%m").to_string(),
					_ => dt.format("%-m").to_string(),
				});
				[month, day, year]
					.into_iter()
					.flatten()
					.collect::<Vec<_>>()
					.join("/")
			}
		};

		if let Some(era) = o.era {
			let label = match (era, dt.year() > 0) {
				(TextWidth::Long, true) => "Anno Domini",
				(TextWidth::Long, false) => "Before Christ",
				(TextWidth::Short, true) => "AD",
				(TextWidth::Short, false) => "BC",
				(TextWidth::Narrow, true) => "A",
				(TextWidth::Narrow, false) => "B",
			};
			if !body.is_empty() {
				body.push(' ');
			}
			body.push_str(label);
		}

		let weekday = o.weekday.map(|w| match w {
			TextWidth::Long => dt.format("%A").to_string(),
			TextWidth::Short => dt.format("%a").to_string(),
			TextWidth::Narrow => initial(&dt.format("%A").to_string()),
		});
		match weekday {
			Some(weekday) if body.is_empty() => weekday,
			Some(weekday) => format!("{weekday}, {body}"),
			None => body,
		}
	}

	fn render_time(&self, dt: &DateTime<Tz>) -> String {
		let o = &self.options;
		if !o.has_time_fields() {
			return String::new();
		}

		let hour12 = o.hour12.unwrap_or(true);
		let mut parts = Vec::with_capacity(3);
		if let Some(width) = o.hour {
			parts.push(if hour12 {
				numeric(dt, width, "%-I", "%I")
			} else {
				numeric(dt, width, "%-H", "%H")
			});
		}
		if let Some(width) = o.minute {
			if parts.is_empty() {
				parts.push(numeric(dt, width, "%-M", "%M"));
			} else {
				parts.push(dt.format("%M").to_string());
			}
		}
		if o.second.is_some() {
			parts.push(dt.format("%S").to_string());
		}

		let mut out = parts.join(":");
		if hour12 && o.hour.is_some() {
			out.push(' ');
			out.push_str(&dt.format("%p").to_string());
		}
		out
	}
}

impl DateTimeFormat for BasicDateTimeFormat {
	fn format(&self, epoch_ms: f64) -> Result<String, FormatError> {
		if !epoch_ms.is_finite() {
			return Err(invalid_time());
		}
		let utc = DateTime::<Utc>::from_timestamp_millis(epoch_ms.trunc() as i64)
			.ok_or_else(invalid_time)?;
		Ok(self.render(&utc.with_timezone(&self.tz)))
	}
}

fn invalid_time() -> FormatError {
	FormatError::Range("Invalid time value".to_string())
}

fn numeric(dt: &DateTime<Tz>, width: NumericWidth, numeric: &str, two_digit: &str) -> String {
	match width {
		NumericWidth::Numeric => dt.format(numeric).to_string(),
		NumericWidth::TwoDigit => dt.format(two_digit).to_string(),
	}
}

fn initial(word: &str) -> String {
	word.chars().take(1).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	// 2024-01-02T15:04:05Z, a Tuesday.
	const INSTANT: f64 = 1_704_207_845_000.0;

	fn format(options: DateTimeOptions) -> String {
		BasicDateTimeFormat::new(&options)
			.unwrap()
			.format(INSTANT)
			.unwrap()
	}

	#[test]
	fn defaults_to_numeric_date() {
		assert_eq!(format(DateTimeOptions::default()), "1/2/2024");
	}

	#[test]
	fn long_month_date() {
		let text = format(DateTimeOptions {
			weekday: Some(TextWidth::Long),
			year: Some(NumericWidth::Numeric),
			month: Some(MonthWidth::Long),
			day: Some(NumericWidth::Numeric),
			..Default::default()
		});
		assert_eq!(text, "Tuesday, January 2, 2024");
	}

	#[test]
	fn short_month_without_day() {
		let text = format(DateTimeOptions {
			year: Some(NumericWidth::Numeric),
			month: Some(MonthWidth::Short),
			..Default::default()
		});
		assert_eq!(text, "Jan 2024");
	}

	#[test]
	fn twelve_hour_time() {
		let text = format(DateTimeOptions {
			hour: Some(NumericWidth::Numeric),
			minute: Some(NumericWidth::Numeric),
			..Default::default()
		});
		assert_eq!(text, "3:04 PM");
	}

	#[test]
	fn twenty_four_hour_time_in_zone() {
		let text = format(DateTimeOptions {
			hour: Some(NumericWidth::TwoDigit),
			minute: Some(NumericWidth::TwoDigit),
			second: Some(NumericWidth::TwoDigit),
			hour12: Some(false),
			time_zone: Some("Europe/Paris".to_string()),
			..Default::default()
		});
		assert_eq!(text, "16:04:05");
	}

	#[test]
	fn date_and_time_with_zone_name() {
		let text = format(DateTimeOptions {
			year: Some(NumericWidth::Numeric),
			month: Some(MonthWidth::Numeric),
			day: Some(NumericWidth::Numeric),
			hour: Some(NumericWidth::Numeric),
			minute: Some(NumericWidth::Numeric),
			time_zone_name: Some(ZoneNameWidth::Short),
			..Default::default()
		});
		assert_eq!(text, "1/2/2024, 3:04 PM UTC");
	}

	#[test]
	fn unknown_time_zone_is_range_error() {
		let err = BasicDateTimeFormat::new(&DateTimeOptions {
			time_zone: Some("Mars/Olympus".to_string()),
			..Default::default()
		})
		.unwrap_err();
		assert!(matches!(err, FormatError::Range(_)));
	}

	#[test]
	fn non_finite_instant_is_range_error() {
		let formatter = BasicDateTimeFormat::new(&DateTimeOptions::default()).unwrap();
		assert_eq!(formatter.format(f64::NAN), Err(invalid_time()));
		assert_eq!(formatter.format(f64::INFINITY), Err(invalid_time()));
	}
}
