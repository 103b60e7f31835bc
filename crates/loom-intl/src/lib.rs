// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scoped locale-aware formatting for Loom.
//!
//! A tree of [`ScopeProvider`]s resolves configuration (locale, time zone,
//! named formats, messages) by inheritance and publishes a [`FormatContext`]
//! per scope. Every scope in a tree shares one formatter cache.
//!
//! # Features
//!
//! - **Inherited configuration**: children overlay their explicit props on the
//!   nearest ancestor's resolved configuration
//! - **Locale fallback**: unregistered locales fall back to the default locale
//!   and report once through `on_error`
//! - **Memoized formatters**: identical requests reuse one formatter
//! - **Self-updating relative time**: [`RelativeTimeScheduler`] refreshes
//!   "5 minutes ago" labels at unit boundaries
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use loom_intl::{ConfigProps, MessageDescriptor, MessageValues, ScopeProvider, VirtualClock};
//!
//! let root = ScopeProvider::builder()
//!     .basic_platform()
//!     .clock(Arc::new(VirtualClock::new(0)))
//!     .props(ConfigProps::new().with_locale("en").with_messages([("hi", "Hi { $name }")]))
//!     .build()?;
//! let child = root.child(ConfigProps::new().with_time_zone("UTC")).build()?;
//!
//! let mut values = MessageValues::new();
//! values.insert("name".to_string(), "Ada".into());
//! assert_eq!(child.context().format_message(&MessageDescriptor::new("hi"), &values), "Hi Ada");
//! # Ok::<(), loom_intl::IntlError>(())
//! ```

mod clock;
mod context;
mod format;
mod platform;
mod plural;
mod provider;
mod relative;
mod timer;
mod virtual_clock;

pub use clock::{Clock, SystemClock, TokioClock};
pub use context::{get_format_context, FormatContext, ScopeState};
pub use format::{
	escape_html, DateFormatOptions, FormatOptions, MessageDescriptor, NumberFormatOptions,
	RelativeFormatOptions, TimeValue,
};
pub use platform::BasicPlatform;
pub use plural::PluralTexts;
pub use provider::{ScopeProvider, ScopeProviderBuilder};
pub use relative::{
	next_refresh_delay, schedule_relative_refresh, LabelListener, RelativeTimeProps,
	RelativeTimeScheduler, SchedulerState, DEFAULT_UPDATE_INTERVAL_MS, MAX_TIMER_DELAY_MS,
};
pub use timer::{Timer, TimerHandle, TimerTask, TokioTimer};
pub use virtual_clock::VirtualClock;

// Re-export core types for convenience
pub use loom_intl_core::{
	load_props, load_props_with_file, resolve_config, ConfigProps, ConfigResolver, ConfigSource,
	Configuration, DateTimeOptions, EnvSource, FormatError, FormatOperation, FormatterCache,
	FormatterFactory, FormatterKind, Formats, IntlError, LocaleRegistry, MessageValue,
	MessageValues, MonthWidth, NumberOptions, NumberStyle, NumericWidth, OnError, PluralCategory,
	PluralOptions, PluralStyle, Precedence, RelativeStyle, RelativeTimeOptions, RelativeUnit,
	Result, StaticLocaleRegistry, TextWidth, TomlSource, ZoneNameWidth,
};
