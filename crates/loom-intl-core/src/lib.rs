// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for Loom scoped formatting.
//!
//! This crate holds everything that does not depend on a concrete formatting
//! platform or async runtime:
//!
//! - [`ConfigProps`] and [`Configuration`]: the explicit and resolved scope
//!   configuration
//! - [`resolve_config`] and [`ConfigResolver`]: inheritance plus locale
//!   fallback
//! - [`FormatterFactory`] and the formatter traits a platform implements
//! - [`FormatterCache`]: memoized formatter construction shared by a scope tree
//! - [`sources`]: layered TOML/environment loading for the root scope
//!
//! # Example
//!
//! ```
//! use loom_intl_core::{resolve_config, ConfigProps, StaticLocaleRegistry};
//!
//! let registry = StaticLocaleRegistry::new(["en", "fr"]);
//! let root = resolve_config(&ConfigProps::new().with_locale("fr-FR"), None, &registry);
//! let child = resolve_config(&ConfigProps::new().with_time_zone("UTC"), Some(&root), &registry);
//!
//! assert_eq!(child.locale, "fr-FR");
//! assert_eq!(child.time_zone.as_deref(), Some("UTC"));
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod formatter;
pub mod locale;
pub mod options;
pub mod resolve;
pub mod sources;

pub use cache::FormatterCache;
pub use config::{
	empty_formats, empty_messages, ConfigProps, Configuration, Formats, Messages, DEFAULT_LOCALE,
	DEFAULT_TEXT_COMPONENT,
};
pub use error::{FormatError, FormatOperation, IntlError, OnError, Result};
pub use formatter::{
	DateTimeFormat, FormatterFactory, FormatterKind, MessageFormat, MessageValue, MessageValues,
	NumberFormat, PluralCategory, PluralSelect, RelativeTimeFormat,
};
pub use locale::{is_well_formed, LocaleRegistry, StaticLocaleRegistry};
pub use options::{
	DateTimeOptions, MonthWidth, NumberOptions, NumberStyle, NumericWidth, PluralOptions,
	PluralStyle, RelativeStyle, RelativeTimeOptions, RelativeUnit, TextWidth, ZoneNameWidth,
};
pub use resolve::{resolve_config, ConfigResolver};
pub use sources::{load_props, load_props_with_file, ConfigSource, EnvSource, Precedence, TomlSource};
