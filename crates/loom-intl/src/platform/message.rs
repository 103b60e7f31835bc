// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use loom_intl_core::{FormatError, MessageFormat, MessageValue, MessageValues};
use unic_langid::LanguageIdentifier;

const MESSAGE_ID: &str = "message";

/// Message formatter that compiles a single template as a Fluent message.
///
/// Templates use Fluent placeable syntax, e.g. `Hello, { $name }!`.
pub(crate) struct FluentMessageFormat {
	bundle: Option<FluentBundle<FluentResource>>,
	verbatim: String,
}

impl FluentMessageFormat {
	pub(crate) fn new(locale: &str, template: &str) -> Result<Self, FormatError> {
		if template.trim().is_empty() {
			return Ok(Self {
				bundle: None,
				verbatim: template.to_string(),
			});
		}

		let langid: LanguageIdentifier = locale.parse().unwrap_or_default();
		let resource = FluentResource::try_new(to_ftl(template)).map_err(|(_, errors)| {
			FormatError::Message(join(errors.iter().map(ToString::to_string)))
		})?;

		let mut bundle = FluentBundle::new_concurrent(vec![langid]);
		bundle.set_use_isolating(false);
		bundle
			.add_resource(resource)
			.map_err(|errors| FormatError::Message(join(errors.iter().map(ToString::to_string))))?;

		if bundle
			.get_message(MESSAGE_ID)
			.and_then(|message| message.value())
			.is_none()
		{
			return Err(FormatError::Message(format!(
				"template does not produce a message value: {template}"
			)));
		}

		Ok(Self {
			bundle: Some(bundle),
			verbatim: String::new(),
		})
	}
}

impl MessageFormat for FluentMessageFormat {
	fn format(&self, values: &MessageValues) -> Result<String, FormatError> {
		let Some(bundle) = &self.bundle else {
			return Ok(self.verbatim.clone());
		};
		let pattern = bundle
			.get_message(MESSAGE_ID)
			.and_then(|message| message.value())
			.ok_or_else(|| FormatError::Message("message value missing".to_string()))?;

		let mut args = FluentArgs::new();
		for (name, value) in values {
			match value {
				MessageValue::Text(text) => args.set(name.as_str(), FluentValue::from(text.as_str())),
				MessageValue::Number(number) => args.set(name.as_str(), FluentValue::from(*number)),
			}
		}

		let mut errors = vec![];
		let formatted = bundle.format_pattern(pattern, Some(&args), &mut errors);
		if !errors.is_empty() {
			return Err(FormatError::Message(join(errors.iter().map(ToString::to_string))));
		}
		Ok(formatted.into_owned())
	}
}

fn to_ftl(template: &str) -> String {
	let mut source = format!("{MESSAGE_ID} =");
	for (i, line) in template.lines().enumerate() {
		source.push_str(if i == 0 { " " } else { "\n    " });
		source.push_str(line);
	}
	source.push('\n');
	source
}

fn join(messages: impl Iterator<Item = String>) -> String {
	messages.collect::<Vec<_>>().join("; ")
}
