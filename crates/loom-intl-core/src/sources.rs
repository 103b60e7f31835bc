// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Root-scope configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::config::ConfigProps;
use crate::error::{IntlError, Result};
use crate::locale::is_well_formed;

pub const ENV_PREFIX: &str = "LOOM_INTL";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ConfigProps>;
}

/// Built-in defaults source. Contributes nothing; defaults are applied at
/// resolution time.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ConfigProps> {
		debug!("loading defaults");
		Ok(ConfigProps::default())
	}
}

/// TOML file source. A missing file yields an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ConfigProps> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ConfigProps::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| IntlError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let props: ConfigProps = toml::from_str(&content).map_err(|e| IntlError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed config props from TOML");
		Ok(props)
	}
}

/// Environment variable source.
///
/// Convention: `<PREFIX>_LOCALE`, `<PREFIX>_TIME_ZONE`,
/// `<PREFIX>_DEFAULT_LOCALE`, `<PREFIX>_TEXT_COMPONENT`.
pub struct EnvSource {
	prefix: String,
}

impl EnvSource {
	pub fn new() -> Self {
		Self::with_prefix(ENV_PREFIX)
	}

	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
		}
	}

	fn var(&self, field: &str) -> Option<String> {
		env_var(&format!("{}_{field}", self.prefix))
	}

	fn locale_var(&self, field: &str) -> Result<Option<String>> {
		let key = format!("{}_{field}", self.prefix);
		match env_var(&key) {
			Some(tag) if !is_well_formed(&tag) => Err(IntlError::InvalidValue {
				key,
				message: format!("invalid locale tag '{tag}'"),
			}),
			other => Ok(other),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ConfigProps> {
		debug!(prefix = %self.prefix, "loading environment variables");
		Ok(ConfigProps {
			locale: self.locale_var("LOCALE")?,
			time_zone: self.var("TIME_ZONE"),
			default_locale: self.locale_var("DEFAULT_LOCALE")?,
			text_component: self.var("TEXT_COMPONENT"),
			..ConfigProps::default()
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Merges `sources` in precedence order into a single root layer.
pub fn load_props(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ConfigProps> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ConfigProps::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}
	Ok(merged)
}

/// Load root-scope props with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`LOOM_INTL_*`)
/// 2. Config file at `config_path`
/// 3. Built-in defaults
pub fn load_props_with_file(config_path: impl Into<PathBuf>) -> Result<ConfigProps> {
	load_props(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource::new()),
	])
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	fn write_toml(content: &str) -> NamedTempFile {
		let mut file = NamedTempFile::new().unwrap();
		file.write_all(content.as_bytes()).unwrap();
		file
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let props = DefaultsSource.load().unwrap();
		assert_eq!(props, ConfigProps::default());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let props = TomlSource::new("/nonexistent/intl.toml").load().unwrap();
		assert!(props.locale.is_none());
	}

	#[test]
	fn test_toml_source_reads_props() {
		let file = write_toml(
			r#"
locale = "de-DE"
text_component = "span"

[messages]
farewell = "Tschüss"
"#,
		);

		let props = TomlSource::new(file.path()).load().unwrap();

		assert_eq!(props.locale.as_deref(), Some("de-DE"));
		assert_eq!(props.text_component.as_deref(), Some("span"));
		assert_eq!(
			props.messages.unwrap().get("farewell").map(String::as_str),
			Some("Tschüss")
		);
	}

	#[test]
	fn test_toml_source_parse_error() {
		let file = write_toml("locale = [");
		let err = TomlSource::new(file.path()).load().unwrap_err();
		assert!(matches!(err, IntlError::TomlParse { .. }));
	}

	#[test]
	fn test_env_source_reads_prefixed_vars() {
		std::env::set_var("LOOM_INTL_TEST_READ_LOCALE", "pt-BR");
		std::env::set_var("LOOM_INTL_TEST_READ_TIME_ZONE", "America/Sao_Paulo");

		let props = EnvSource::with_prefix("LOOM_INTL_TEST_READ").load().unwrap();

		assert_eq!(props.locale.as_deref(), Some("pt-BR"));
		assert_eq!(props.time_zone.as_deref(), Some("America/Sao_Paulo"));
		assert!(props.default_locale.is_none());
	}

	#[test]
	fn test_env_source_rejects_malformed_locale() {
		std::env::set_var("LOOM_INTL_TEST_BAD_LOCALE", "not a tag");

		let err = EnvSource::with_prefix("LOOM_INTL_TEST_BAD").load().unwrap_err();

		match err {
			IntlError::InvalidValue { key, .. } => assert_eq!(key, "LOOM_INTL_TEST_BAD_LOCALE"),
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn test_environment_overrides_file() {
		let file = write_toml("locale = \"fr\"\ntime_zone = \"Europe/Paris\"\n");
		std::env::set_var("LOOM_INTL_TEST_MERGE_LOCALE", "es");

		let props = load_props(vec![
			Box::new(EnvSource::with_prefix("LOOM_INTL_TEST_MERGE")),
			Box::new(TomlSource::new(file.path())),
			Box::new(DefaultsSource),
		])
		.unwrap();

		assert_eq!(props.locale.as_deref(), Some("es"));
		assert_eq!(props.time_zone.as_deref(), Some("Europe/Paris"));
	}
}
