// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration inheritance across a three-level scope tree.

use std::sync::Arc;

use loom_intl::{
	ConfigProps, DateFormatOptions, DateTimeOptions, FormatContext, Formats, FormatterKind,
	IntlError, MessageDescriptor, MessageValues, NumberFormatOptions, NumberOptions, NumberStyle,
	NumericWidth, OnError, ScopeProvider, StaticLocaleRegistry, VirtualClock,
};
use parking_lot::Mutex;

// 2024-01-02T15:04:05Z
const INSTANT: f64 = 1_704_207_845_000.0;

struct Tree {
	errors: Arc<Mutex<Vec<String>>>,
	root: ScopeProvider,
	section: ScopeProvider,
	leaf: ScopeProvider,
}

fn tree() -> Tree {
	let errors = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&errors);
	let formats = Formats::default()
		.with_number(
			"usd",
			NumberOptions {
				style: Some(NumberStyle::Currency),
				currency: Some("USD".to_string()),
				..Default::default()
			},
		)
		.with_date(
			"year",
			DateTimeOptions {
				year: Some(NumericWidth::Numeric),
				..Default::default()
			},
		);

	let root = ScopeProvider::builder()
		.basic_platform()
		.locale_registry(Arc::new(StaticLocaleRegistry::new(["en", "fr", "de"])))
		.clock(Arc::new(VirtualClock::new(INSTANT as i64)))
		.props(
			ConfigProps::new()
				.with_locale("en")
				.with_formats(formats)
				.with_messages([("title", "Inbox"), ("unread", "{ $count } unread")])
				.with_on_error(OnError::new(move |e| sink.lock().push(e.to_string()))),
		)
		.build()
		.unwrap();
	let section = root
		.child(ConfigProps::new().with_time_zone("Asia/Tokyo"))
		.build()
		.unwrap();
	let leaf = section
		.child(ConfigProps::new().with_locale("fr-FR"))
		.build()
		.unwrap();

	Tree {
		errors,
		root,
		section,
		leaf,
	}
}

#[test]
fn leaf_sees_every_ancestor_layer() {
	let t = tree();
	let config = t.leaf.context().config().clone();

	assert_eq!(config.locale, "fr-FR");
	assert_eq!(config.time_zone.as_deref(), Some("Asia/Tokyo"));
	assert_eq!(config.message("title"), Some("Inbox"));
	assert!(config.formats.number.contains_key("usd"));
	assert!(t.errors.lock().is_empty());
}

#[test]
fn named_formats_resolve_from_the_root() {
	let t = tree();
	let ctx = t.leaf.context();

	assert_eq!(ctx.format_number(1234.5, &NumberFormatOptions::named("usd")), "$1,234.50");
	assert_eq!(ctx.format_date(INSTANT, &DateFormatOptions::named("year")), "2024");
}

#[test]
fn time_zone_applies_below_its_scope_only() {
	let t = tree();
	let hour = DateFormatOptions::from(DateTimeOptions {
		hour: Some(NumericWidth::Numeric),
		hour12: Some(false),
		..Default::default()
	});

	assert_eq!(t.root.context().format_time(INSTANT, &hour), "15");
	assert_eq!(t.section.context().format_time(INSTANT, &hour), "0");
	assert_eq!(t.leaf.context().format_time(INSTANT, &hour), "0");
}

#[test]
fn whole_tree_shares_one_cache() {
	let t = tree();
	let options = NumberFormatOptions::default();

	t.root.context().format_number(1.0, &options);
	t.section.context().format_number(2.0, &options);

	let cache = t.leaf.context().formatters().clone();
	assert!(Arc::ptr_eq(&cache, t.root.context().formatters()));
	assert_eq!(cache.len_of(FormatterKind::Number), 1);
}

#[test]
fn reconfiguring_the_root_reaches_descendants_through_inherit() {
	let mut t = tree();
	let before = t.leaf.context();

	let root_ctx = t.root.reconfigure(ConfigProps::new().with_locale("de"));
	let section_ctx = t.section.inherit(root_ctx);
	let leaf_ctx = t.leaf.inherit(section_ctx);

	assert_eq!(t.section.context().locale(), "de");
	assert_eq!(leaf_ctx.locale(), "fr-FR");
	assert_eq!(leaf_ctx.config().time_zone.as_deref(), Some("Asia/Tokyo"));
	assert!(leaf_ctx.config().message("title").is_none());
	assert!(!leaf_ctx.ptr_eq(&before));
}

#[test]
fn message_falls_back_when_missing_in_catalog() {
	let t = tree();
	let mut values = MessageValues::new();
	values.insert("count".to_string(), 3_i64.into());

	let ctx = t.root.context();
	assert_eq!(ctx.format_message(&MessageDescriptor::new("unread"), &values), "3 unread");
	assert_eq!(
		ctx.format_message(
			&MessageDescriptor::new("archived").with_default_message("Archived"),
			&values
		),
		"Archived"
	);
	assert!(t.errors.lock().is_empty());
}

#[test]
fn consumer_without_provider_gets_missing_context() {
	let nearest: Option<&FormatContext> = None;
	assert!(matches!(
		FormatContext::require(nearest),
		Err(IntlError::MissingContext)
	));
}
