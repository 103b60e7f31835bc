// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use loom_intl_core::{FormatError, NumberFormat, NumberOptions, NumberStyle};

const MAX_FRACTION_DIGITS: usize = 20;
const MAX_INTEGER_DIGITS: usize = 21;

/// English-pattern decimal, percent and currency formatter.
#[derive(Debug)]
pub(crate) struct BasicNumberFormat {
	style: NumberStyle,
	currency_prefix: String,
	grouping: bool,
	min_integer: usize,
	min_fraction: usize,
	max_fraction: usize,
}

impl BasicNumberFormat {
	pub(crate) fn new(options: &NumberOptions) -> Result<Self, FormatError> {
		let style = options.style.unwrap_or_default();

		let (currency_prefix, (default_min, default_max)) = match style {
			NumberStyle::Currency => {
				let code = options.currency.as_deref().ok_or_else(|| {
					FormatError::Type("Currency code is required with currency style.".to_string())
				})?;
				if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
					return Err(FormatError::Range(format!("Invalid currency code : {code}")));
				}
				let code = code.to_ascii_uppercase();
				let digits = currency_digits(&code);
				(currency_prefix(&code), (digits, digits))
			}
			NumberStyle::Percent => (String::new(), (0, 0)),
			NumberStyle::Decimal => (String::new(), (0, 3)),
		};

		let min_integer = usize::from(options.minimum_integer_digits.unwrap_or(1));
		if !(1..=MAX_INTEGER_DIGITS).contains(&min_integer) {
			return Err(FormatError::Range(
				"minimumIntegerDigits value is out of range.".to_string(),
			));
		}

		let min = options.minimum_fraction_digits.map(usize::from);
		let max = options.maximum_fraction_digits.map(usize::from);
		if min.is_some_and(|d| d > MAX_FRACTION_DIGITS) {
			return Err(FormatError::Range(
				"minimumFractionDigits value is out of range.".to_string(),
			));
		}
		if max.is_some_and(|d| d > MAX_FRACTION_DIGITS) {
			return Err(FormatError::Range(
				"maximumFractionDigits value is out of range.".to_string(),
			));
		}
		let (min_fraction, max_fraction) = match (min, max) {
			(Some(min), Some(max)) if min > max => {
				return Err(FormatError::Range(
					"maximumFractionDigits value is out of range.".to_string(),
				))
			}
			(Some(min), Some(max)) => (min, max),
			(Some(min), None) => (min, min.max(default_max)),
			(None, Some(max)) => (default_min.min(max), max),
			(None, None) => (default_min, default_max),
		};

		Ok(Self {
			style,
			currency_prefix,
			grouping: options.use_grouping.unwrap_or(true),
			min_integer,
			min_fraction,
			max_fraction,
		})
	}

	fn digits(&self, abs: f64) -> String {
		if abs.is_infinite() {
			return "∞".to_string();
		}

		let fixed = format!("{:.*}", self.max_fraction, abs);
		let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

		let mut fraction = frac_part.to_string();
		while fraction.len() > self.min_fraction && fraction.ends_with('0') {
			fraction.pop();
		}

		let mut integer = format!("{int_part:0>width$}", width = self.min_integer);
		if self.grouping {
			integer = group_thousands(&integer);
		}

		if fraction.is_empty() {
			integer
		} else {
			format!("{integer}.{fraction}")
		}
	}
}

impl NumberFormat for BasicNumberFormat {
	fn format(&self, value: f64) -> String {
		if value.is_nan() {
			return "NaN".to_string();
		}

		let scaled = match self.style {
			NumberStyle::Percent => value * 100.0,
			_ => value,
		};
		let sign = if scaled < 0.0 { "-" } else { "" };
		let digits = self.digits(scaled.abs());

		match self.style {
			NumberStyle::Decimal => format!("{sign}{digits}"),
			NumberStyle::Percent => format!("{sign}{digits}%"),
			NumberStyle::Currency => format!("{sign}{}{digits}", self.currency_prefix),
		}
	}
}

fn group_thousands(digits: &str) -> String {
	let len = digits.len();
	let mut out = String::with_capacity(len + len / 3);
	for (i, c) in digits.chars().enumerate() {
		if i > 0 && (len - i) % 3 == 0 {
			out.push(',');
		}
		out.push(c);
	}
	out
}

fn currency_prefix(code: &str) -> String {
	match code {
		"USD" => "$".to_string(),
		"EUR" => "€".to_string(),
		"GBP" => "£".to_string(),
		"JPY" => "¥".to_string(),
		other => format!("{other}\u{a0}"),
	}
}

fn currency_digits(code: &str) -> usize {
	match code {
		"JPY" | "KRW" | "VND" | "CLP" | "ISK" => 0,
		"BHD" | "KWD" | "OMR" | "JOD" | "TND" => 3,
		_ => 2,
	}
}
