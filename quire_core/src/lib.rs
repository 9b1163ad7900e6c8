// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout-attribute caching and invalidation for collection layouts.
//!
//! `quire_core` separates *what* a collection layout computes from *when* it
//! computes it. A concrete layout supplies geometry through the
//! [`LayoutStrategy`](strategy::LayoutStrategy) hooks; the
//! [`MetaLayout`](engine::MetaLayout) engine memoizes every answer, evicts
//! exactly what an invalidation names, and manages the short-lived attributes
//! used to animate update batches and layout-to-layout transitions. It is
//! `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   CollectionHost (counts, bounds)
//!       │
//!       ▼
//!   MetaLayout::prepare() ──► Geometry (counts + content size)
//!       │
//!       ▼
//!   query ──► AttributeCache / RectAttributeCache ──miss──► LayoutStrategy
//!       ▲
//!       │ evict
//!   InvalidationContext ◄── host edits, bounds changes
//!
//!   prepare_for_updates / transition::prepare_for_transition_*
//!       ──► transient cache ──► finalize_* (purge)
//! ```
//!
//! **[`engine`]**: [`MetaLayout`](engine::MetaLayout): prepare, invalidate,
//! cached queries, update batches.
//!
//! **[`cache`]**: Point cache keyed by usage, kind, and index path; exact
//! rectangle cache.
//!
//! **[`strategy`]**: Calculation hooks a concrete layout implements.
//!
//! **[`host`]**: The [`CollectionHost`](host::CollectionHost) trait a
//! collection surface implements.
//!
//! **[`context`]**: [`InvalidationContext`](context::InvalidationContext),
//! the description of what changed.
//!
//! **[`transition`]**: Weakly linked sibling layouts and the coordinator
//! that seeds transition attributes.
//!
//! **[`update`]**: Update items and the dimension-altering classifier.
//!
//! **[`validate`]**: Cell index-path validation.
//!
//! **[`attributes`]**, **[`index_path`]**, **[`geometry`]**, **[`config`]**:
//! Value types.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! lifecycle instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-lookup
//!   cache events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod attributes;
pub mod cache;
pub mod config;
pub mod context;
pub mod engine;
pub mod geometry;
pub mod host;
pub mod index_path;
pub mod strategy;
pub mod trace;
pub mod transition;
pub mod update;
pub mod validate;

#[cfg(test)]
mod testing;
