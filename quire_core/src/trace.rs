// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the layout lifecycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! engine calls at each lifecycle step. All method bodies default to no-ops,
//! so implementing only the events you care about is fine.
//!
//! [`Tracer`] owns an optional boxed [`TraceSink`]. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing and installed sinks
//! are dropped. When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! Validation failures are reported here rather than returned: an item query
//! with a bad index path degrades to "no attributes", and
//! [`TraceSink::on_validation_failure`] is where a host logs or asserts.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates per-lookup [`LookupEvent`] and
//!   [`RectQueryEvent`] events plus the corresponding `TraceSink` methods.

use alloc::boxed::Box;

use kurbo::Size;
#[cfg(feature = "trace-rich")]
use kurbo::Rect;

#[cfg(feature = "trace-rich")]
use crate::attributes::ElementCategory;
#[cfg(feature = "trace-rich")]
use crate::cache::Usage;
use crate::index_path::IndexPath;
use crate::validate::IndexPathValidationError;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which branch an invalidation took.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvalidationScope {
    /// Everything was dropped and the layout returned to not-prepared.
    Reset,
    /// A context requested a full rebuild (everything or data-source counts).
    Full,
    /// Only named elements were evicted.
    Targeted,
}

/// Which batch lifecycle an event belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BatchKind {
    /// An insert/delete/move/reload update batch.
    Update,
    /// A layout-to-layout transition.
    Transition,
}

/// Which side of a transition a layout is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionDirection {
    /// The layout is being transitioned *to*; it seeds initial attributes.
    Incoming,
    /// The layout is being transitioned *away from*; it seeds final attributes.
    Outgoing,
}

/// How a cached lookup was satisfied.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LookupOutcome {
    /// Served from the cache.
    Hit,
    /// Computed by a strategy hook and cached.
    Computed,
    /// Transient lookup with nothing seeded.
    Missing,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the geometry snapshot is (re)built.
#[derive(Clone, Copy, Debug)]
pub struct PrepareEvent {
    /// Number of sections read from the host.
    pub section_count: usize,
    /// Total number of items read from the host.
    pub item_count: usize,
    /// Content size computed by the strategy.
    pub content_size: Size,
}

/// Emitted after an invalidation is applied.
#[derive(Clone, Copy, Debug)]
pub struct InvalidateEvent {
    /// Which branch ran.
    pub scope: InvalidationScope,
    /// Cell entries evicted by a targeted invalidation.
    pub evicted_items: usize,
    /// Supplementary entries evicted by a targeted invalidation.
    pub evicted_supplementary: usize,
    /// Decoration entries evicted by a targeted invalidation.
    pub evicted_decoration: usize,
    /// Content size after the invalidation.
    pub content_size: Size,
}

/// Emitted when an item query fails index-path validation.
#[derive(Clone, Copy, Debug)]
pub struct ValidationFailureEvent<'a> {
    /// The rejected index path.
    pub index_path: IndexPath,
    /// Why it was rejected.
    pub error: &'a IndexPathValidationError,
}

/// Emitted when an update batch starts.
#[derive(Clone, Copy, Debug)]
pub struct UpdateBatchEvent {
    /// Number of update items in the batch.
    pub item_count: usize,
    /// Initial-for-appearing entries seeded for pure insertions.
    pub seeded_initial: usize,
    /// Final-for-disappearing entries seeded for pure deletions.
    pub seeded_final: usize,
}

/// Emitted when a transition prepares one side.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEvent {
    /// Which side this layout is on.
    pub direction: TransitionDirection,
    /// Elements visible in the viewport that were seeded.
    pub seeded: usize,
    /// How many of those came from the sibling layout.
    pub from_sibling: usize,
}

/// Emitted when an update batch or transition ends.
#[derive(Clone, Copy, Debug)]
pub struct BatchEndEvent {
    /// Which lifecycle ended.
    pub kind: BatchKind,
    /// Transient entries purged.
    pub purged: usize,
}

/// A single cached attribute lookup.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct LookupEvent {
    /// Element category looked up.
    pub category: ElementCategory,
    /// Usage looked up.
    pub usage: Usage,
    /// Index path looked up.
    pub index_path: IndexPath,
    /// How it was satisfied.
    pub outcome: LookupOutcome,
}

/// A single rectangle query.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct RectQueryEvent {
    /// Queried rectangle.
    pub rect: Rect,
    /// Whether it was served from the cache.
    pub outcome: LookupOutcome,
    /// Number of elements returned.
    pub count: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after the geometry snapshot is built.
    fn on_prepare(&mut self, e: &PrepareEvent) {
        _ = e;
    }

    /// Called after an invalidation is applied.
    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        _ = e;
    }

    /// Called when an item query fails validation.
    fn on_validation_failure(&mut self, e: &ValidationFailureEvent<'_>) {
        _ = e;
    }

    /// Called after an update batch seeds its transient attributes.
    fn on_update_batch(&mut self, e: &UpdateBatchEvent) {
        _ = e;
    }

    /// Called after a transition seeds its transient attributes.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called when an update batch or transition is finalized.
    fn on_batch_end(&mut self, e: &BatchEndEvent) {
        _ = e;
    }

    /// Called for every cached lookup (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_lookup(&mut self, e: &LookupEvent) {
        _ = e;
    }

    /// Called for every rectangle query (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_rect_query(&mut self, e: &RectQueryEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Owner of an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns `true` if events reach a sink.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Removes and returns the installed sink.
    #[inline]
    pub fn take(&mut self) -> Option<Box<dyn TraceSink>> {
        #[cfg(feature = "trace")]
        {
            self.sink.take()
        }
        #[cfg(not(feature = "trace"))]
        {
            None
        }
    }

    /// Emits a [`PrepareEvent`].
    #[inline]
    pub fn prepare(&mut self, e: &PrepareEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_prepare(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`InvalidateEvent`].
    #[inline]
    pub fn invalidate(&mut self, e: &InvalidateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_invalidate(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ValidationFailureEvent`].
    #[inline]
    pub fn validation_failure(&mut self, e: &ValidationFailureEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_validation_failure(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UpdateBatchEvent`].
    #[inline]
    pub fn update_batch(&mut self, e: &UpdateBatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_update_batch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BatchEndEvent`].
    #[inline]
    pub fn batch_end(&mut self, e: &BatchEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_batch_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LookupEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn lookup(&mut self, e: &LookupEvent) {
        if let Some(s) = &mut self.sink {
            s.on_lookup(e);
        }
    }

    /// Emits a [`RectQueryEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn rect_query(&mut self, e: &RectQueryEvent) {
        if let Some(s) = &mut self.sink {
            s.on_rect_query(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
