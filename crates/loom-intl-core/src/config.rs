// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scope configuration: the explicit [`ConfigProps`] layer and the fully
//! resolved [`Configuration`].

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::OnError;
use crate::options::{DateTimeOptions, NumberOptions, RelativeTimeOptions};

pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_TEXT_COMPONENT: &str = "div";

/// Message id to template.
pub type Messages = BTreeMap<String, String>;

static EMPTY_MESSAGES: Lazy<Arc<Messages>> = Lazy::new(|| Arc::new(Messages::new()));
static EMPTY_FORMATS: Lazy<Arc<Formats>> = Lazy::new(|| Arc::new(Formats::default()));

/// The shared empty message table.
///
/// Every resolution that falls back to empty messages hands out this same
/// allocation.
pub fn empty_messages() -> Arc<Messages> {
	Arc::clone(&EMPTY_MESSAGES)
}

pub fn empty_formats() -> Arc<Formats> {
	Arc::clone(&EMPTY_FORMATS)
}

/// Named format presets per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Formats {
	pub date: BTreeMap<String, DateTimeOptions>,
	pub time: BTreeMap<String, DateTimeOptions>,
	pub number: BTreeMap<String, NumberOptions>,
	pub relative: BTreeMap<String, RelativeTimeOptions>,
}

impl Formats {
	pub fn is_empty(&self) -> bool {
		self.date.is_empty() && self.time.is_empty() && self.number.is_empty() && self.relative.is_empty()
	}

	pub fn with_date(mut self, name: impl Into<String>, options: DateTimeOptions) -> Self {
		self.date.insert(name.into(), options);
		self
	}

	pub fn with_time(mut self, name: impl Into<String>, options: DateTimeOptions) -> Self {
		self.time.insert(name.into(), options);
		self
	}

	pub fn with_number(mut self, name: impl Into<String>, options: NumberOptions) -> Self {
		self.number.insert(name.into(), options);
		self
	}

	pub fn with_relative(mut self, name: impl Into<String>, options: RelativeTimeOptions) -> Self {
		self.relative.insert(name.into(), options);
		self
	}
}

/// Explicit configuration supplied to a scope.
///
/// Unset fields never shadow inherited values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigProps {
	pub locale: Option<String>,
	pub time_zone: Option<String>,
	pub formats: Option<Arc<Formats>>,
	pub messages: Option<Arc<Messages>>,
	pub text_component: Option<String>,
	pub default_locale: Option<String>,
	pub default_formats: Option<Arc<Formats>>,
	#[serde(skip)]
	pub on_error: Option<OnError>,
}

impl ConfigProps {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
		self.locale = Some(locale.into());
		self
	}

	pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
		self.time_zone = Some(time_zone.into());
		self
	}

	pub fn with_formats(mut self, formats: impl Into<Arc<Formats>>) -> Self {
		self.formats = Some(formats.into());
		self
	}

	pub fn with_messages<K, V>(mut self, messages: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		let messages: Messages = messages
			.into_iter()
			.map(|(k, v)| (k.into(), v.into()))
			.collect();
		self.messages = Some(Arc::new(messages));
		self
	}

	pub fn with_shared_messages(mut self, messages: Arc<Messages>) -> Self {
		self.messages = Some(messages);
		self
	}

	pub fn with_text_component(mut self, text_component: impl Into<String>) -> Self {
		self.text_component = Some(text_component.into());
		self
	}

	pub fn with_default_locale(mut self, default_locale: impl Into<String>) -> Self {
		self.default_locale = Some(default_locale.into());
		self
	}

	pub fn with_default_formats(mut self, formats: impl Into<Arc<Formats>>) -> Self {
		self.default_formats = Some(formats.into());
		self
	}

	pub fn with_on_error(mut self, on_error: OnError) -> Self {
		self.on_error = Some(on_error);
		self
	}

	/// Overlays every set field of `other` onto `self`.
	pub fn merge(&mut self, other: Self) {
		if other.locale.is_some() {
			self.locale = other.locale;
		}
		if other.time_zone.is_some() {
			self.time_zone = other.time_zone;
		}
		if other.formats.is_some() {
			self.formats = other.formats;
		}
		if other.messages.is_some() {
			self.messages = other.messages;
		}
		if other.text_component.is_some() {
			self.text_component = other.text_component;
		}
		if other.default_locale.is_some() {
			self.default_locale = other.default_locale;
		}
		if other.default_formats.is_some() {
			self.default_formats = other.default_formats;
		}
		if other.on_error.is_some() {
			self.on_error = other.on_error;
		}
	}
}

impl From<&Configuration> for ConfigProps {
	fn from(config: &Configuration) -> Self {
		Self {
			locale: Some(config.locale.clone()),
			time_zone: config.time_zone.clone(),
			formats: Some(Arc::clone(&config.formats)),
			messages: Some(Arc::clone(&config.messages)),
			text_component: Some(config.text_component.clone()),
			default_locale: Some(config.default_locale.clone()),
			default_formats: Some(Arc::clone(&config.default_formats)),
			on_error: Some(config.on_error.clone()),
		}
	}
}

/// Fully resolved scope configuration. Every field is populated.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
	/// BCP-47 tag with registered locale data.
	pub locale: String,
	pub time_zone: Option<String>,
	pub formats: Arc<Formats>,
	pub messages: Arc<Messages>,
	/// Element name used when a consumer renders plain text.
	pub text_component: String,
	pub default_locale: String,
	pub default_formats: Arc<Formats>,
	pub on_error: OnError,
}

impl Configuration {
	pub fn message(&self, id: &str) -> Option<&str> {
		self.messages.get(id).map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::options::{MonthWidth, NumericWidth};

	#[test]
	fn merge_overlays_only_set_fields() {
		let mut base = ConfigProps::new()
			.with_locale("fr-FR")
			.with_time_zone("Europe/Paris");
		base.merge(ConfigProps::new().with_time_zone("UTC"));

		assert_eq!(base.locale.as_deref(), Some("fr-FR"));
		assert_eq!(base.time_zone.as_deref(), Some("UTC"));
	}

	#[test]
	fn empty_messages_are_shared() {
		assert!(Arc::ptr_eq(&empty_messages(), &empty_messages()));
	}

	#[test]
	fn props_deserialize_from_toml() {
		let props: ConfigProps = toml::from_str(
			r#"
locale = "fr-FR"
time_zone = "Europe/Paris"

[messages]
greeting = "Bonjour"

[formats.date.short]
month = "short"
day = "numeric"
"#,
		)
		.unwrap();

		assert_eq!(props.locale.as_deref(), Some("fr-FR"));
		assert_eq!(
			props.messages.as_ref().and_then(|m| m.get("greeting")).map(String::as_str),
			Some("Bonjour")
		);
		let short = &props.formats.as_ref().unwrap().date["short"];
		assert_eq!(short.month, Some(MonthWidth::Short));
		assert_eq!(short.day, Some(NumericWidth::Numeric));
		assert!(props.on_error.is_none());
	}

	#[test]
	fn formats_builder_registers_presets() {
		let formats = Formats::default().with_date(
			"year-only",
			DateTimeOptions {
				year: Some(NumericWidth::Numeric),
				..Default::default()
			},
		);
		assert!(!formats.is_empty());
		assert!(formats.date.contains_key("year-only"));
	}
}
