// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The caching layout engine.
//!
//! [`MetaLayout`] wraps a [`LayoutStrategy`] and answers every attribute query
//! a collection host makes, computing through the strategy only on a cache
//! miss. It owns:
//!
//! - the geometry snapshot (data-source counts and content size),
//! - one [`AttributeCache`] per element category plus a
//!   [`RectAttributeCache`] for rectangle queries,
//! - the update-batch phase and the weak sibling links used by
//!   [`transition`](crate::transition),
//! - an optional [`TraceSink`] behind a [`Tracer`].
//!
//! # Lifecycle
//!
//! ```text
//!   NotPrepared ──prepare()──▶ Prepared
//!        ▲                        │
//!        └──invalidate_layout()───┘
//!
//!   invalidate(full ctx)      : clear all caches, rebuild snapshot, Prepared
//!   invalidate(targeted ctx)  : evict named entries, adjust content size
//! ```
//!
//! Queries prepare on demand, so a host can skip the explicit `prepare()`.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use kurbo::{Rect, Size};

use crate::attributes::{ElementCategory, LayoutAttributes};
use crate::cache::{AttributeCache, RectAttributeCache, Usage};
use crate::config::LayoutConfig;
use crate::context::InvalidationContext;
use crate::geometry::{DataSourceCounts, Geometry, adjusted_content_size};
use crate::host::CollectionHost;
use crate::index_path::{ElementKind, IndexPath};
use crate::strategy::{FinalUsage, InitialUsage, LayoutStrategy};
#[cfg(feature = "trace-rich")]
use crate::trace::{LookupEvent, LookupOutcome, RectQueryEvent};
use crate::trace::{
    BatchEndEvent, BatchKind, InvalidateEvent, InvalidationScope, PrepareEvent, TraceSink, Tracer,
    TransitionEvent, UpdateBatchEvent, ValidationFailureEvent,
};
use crate::transition::TransitionLayout;
use crate::update::UpdateItem;
use crate::validate::{IndexPathValidationError, validate_index_path};

/// Weak handle to a sibling layout taking part in a transition.
pub type SiblingLink<A> = Weak<RefCell<dyn TransitionLayout<A>>>;

/// Whether an update batch is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UpdatePhase {
    /// No batch in flight.
    #[default]
    Idle,
    /// Between [`MetaLayout::prepare_for_updates`] and
    /// [`MetaLayout::finalize_updates`].
    Updating,
}

/// Element category selector for the point caches.
#[derive(Clone, Copy)]
enum Slot<'k> {
    Item,
    Supplementary(&'k ElementKind),
    Decoration(&'k ElementKind),
}

impl<'k> Slot<'k> {
    fn kind(self) -> Option<&'k ElementKind> {
        match self {
            Self::Item => None,
            Self::Supplementary(kind) | Self::Decoration(kind) => Some(kind),
        }
    }

    #[cfg(feature = "trace-rich")]
    fn category(self) -> ElementCategory {
        match self {
            Self::Item => ElementCategory::Cell,
            Self::Supplementary(_) => ElementCategory::SupplementaryView,
            Self::Decoration(_) => ElementCategory::DecorationView,
        }
    }
}

/// A caching layout engine driving one [`LayoutStrategy`].
pub struct MetaLayout<S: LayoutStrategy> {
    strategy: S,
    config: LayoutConfig,
    host: Option<Rc<dyn CollectionHost>>,
    items: AttributeCache<S::Attributes>,
    supplementary: AttributeCache<S::Attributes>,
    decorations: AttributeCache<S::Attributes>,
    rects: RectAttributeCache<S::Attributes>,
    geometry: Geometry,
    prepared: bool,
    phase: UpdatePhase,
    pub(crate) source: Option<SiblingLink<S::Attributes>>,
    pub(crate) destination: Option<SiblingLink<S::Attributes>>,
    tracer: Tracer,
}

impl<S: LayoutStrategy> fmt::Debug for MetaLayout<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetaLayout")
            .field("config", &self.config)
            .field("has_host", &self.host.is_some())
            .field("geometry", &self.geometry)
            .field("prepared", &self.prepared)
            .field("phase", &self.phase)
            .field("items", &self.items.len(Usage::Layout))
            .field("supplementary", &self.supplementary.len(Usage::Layout))
            .field("decorations", &self.decorations.len(Usage::Layout))
            .field("rects", &self.rects.len())
            .field("has_source", &self.source.is_some())
            .field("has_destination", &self.destination.is_some())
            .field("tracer", &self.tracer)
            .finish_non_exhaustive()
    }
}

impl<S: LayoutStrategy> MetaLayout<S> {
    /// Creates an engine with the default [`LayoutConfig`].
    #[must_use]
    pub fn new(strategy: S) -> Self {
        Self::with_config(strategy, LayoutConfig::default())
    }

    /// Creates an engine with an explicit config.
    #[must_use]
    pub fn with_config(strategy: S, config: LayoutConfig) -> Self {
        Self {
            strategy,
            config,
            host: None,
            items: AttributeCache::new(),
            supplementary: AttributeCache::new(),
            decorations: AttributeCache::new(),
            rects: RectAttributeCache::new(),
            geometry: Geometry::default(),
            prepared: false,
            phase: UpdatePhase::Idle,
            source: None,
            destination: None,
            tracer: Tracer::none(),
        }
    }

    /// Attaches the host and drops everything computed against a previous one.
    pub fn attach_host(&mut self, host: Rc<dyn CollectionHost>) {
        self.host = Some(host);
        self.invalidate_layout();
    }

    /// Returns the attached host.
    #[must_use]
    pub fn host(&self) -> Option<&Rc<dyn CollectionHost>> {
        self.host.as_ref()
    }

    /// Installs a trace sink. A no-op unless the `trace` feature is enabled.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer = Tracer::new(sink);
    }

    /// Removes and returns the installed trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.tracer.take()
    }

    /// Returns the strategy.
    #[must_use]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Returns the config.
    #[must_use]
    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    /// Returns `true` once the geometry snapshot is current.
    #[must_use]
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Returns the geometry snapshot. Stale while not prepared.
    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Returns the content size, preparing first if needed.
    ///
    /// # Panics
    ///
    /// Panics if the engine is not prepared and no host is attached.
    pub fn content_size(&mut self) -> Size {
        self.prepare();
        self.geometry.content_size
    }

    /// Returns the update-batch phase.
    #[must_use]
    pub fn update_phase(&self) -> UpdatePhase {
        self.phase
    }

    #[track_caller]
    fn required_host(&self) -> &Rc<dyn CollectionHost> {
        match &self.host {
            Some(host) => host,
            None => panic!("MetaLayout has no CollectionHost attached"),
        }
    }

    pub(crate) fn viewport(&self) -> Rect {
        self.required_host().bounds()
    }

    /// Builds the geometry snapshot if it is not current.
    ///
    /// # Panics
    ///
    /// Panics if no host is attached.
    pub fn prepare(&mut self) {
        if self.prepared {
            return;
        }
        let host = self.required_host();
        let counts = DataSourceCounts::from_host(host.as_ref());
        let content_size = self.strategy.content_size(&counts, host.bounds());
        self.tracer.prepare(&PrepareEvent {
            section_count: counts.section_count,
            item_count: counts.item_count,
            content_size,
        });
        self.geometry = Geometry {
            counts,
            content_size,
        };
        self.prepared = true;
    }

    fn clear_caches(&mut self) {
        self.items.remove_all();
        self.supplementary.remove_all();
        self.decorations.remove_all();
        self.rects.remove_all();
    }

    /// Drops every cached attribute and returns to not-prepared.
    pub fn invalidate_layout(&mut self) {
        self.clear_caches();
        self.prepared = false;
        self.tracer.invalidate(&InvalidateEvent {
            scope: InvalidationScope::Reset,
            evicted_items: 0,
            evicted_supplementary: 0,
            evicted_decoration: 0,
            content_size: self.geometry.content_size,
        });
    }

    /// Applies an invalidation context.
    ///
    /// A full context (everything or data-source counts) clears every cache
    /// and rebuilds the snapshot immediately. A targeted context evicts the
    /// listed entries and adjusts the content size by
    /// `content_size_adjustment`. The rectangle cache is cleared either way.
    ///
    /// # Panics
    ///
    /// Panics if no host is attached.
    pub fn invalidate(&mut self, context: &InvalidationContext) {
        if context.is_full() {
            self.clear_caches();
            self.prepared = false;
            self.prepare();
            self.tracer.invalidate(&InvalidateEvent {
                scope: InvalidationScope::Full,
                evicted_items: 0,
                evicted_supplementary: 0,
                evicted_decoration: 0,
                content_size: self.geometry.content_size,
            });
            return;
        }

        self.rects.remove_all();

        let mut evicted_items = 0;
        for &path in context.invalidated_item_index_paths.iter().flatten() {
            evicted_items += usize::from(self.items.set(Usage::Layout, None, path, None).is_some());
        }
        let evicted_supplementary = evict_kinds(
            &mut self.supplementary,
            context.invalidated_supplementary_index_paths.as_ref(),
        );
        let evicted_decoration = evict_kinds(
            &mut self.decorations,
            context.invalidated_decoration_index_paths.as_ref(),
        );

        let viewport = self.viewport().size();
        self.geometry.content_size = adjusted_content_size(
            self.geometry.content_size,
            context.content_size_adjustment.y,
            viewport,
        );

        self.tracer.invalidate(&InvalidateEvent {
            scope: InvalidationScope::Targeted,
            evicted_items,
            evicted_supplementary,
            evicted_decoration,
            content_size: self.geometry.content_size,
        });
    }

    /// Builds the context for a viewport change to `new_bounds`.
    ///
    /// When the size changes, `content_size_adjustment` is the difference
    /// between the content size the strategy computes for `new_bounds` and the
    /// current content size. Otherwise the context adjusts nothing.
    ///
    /// # Panics
    ///
    /// Panics if no host is attached.
    #[must_use]
    pub fn invalidation_context_for_bounds_change(&self, new_bounds: Rect) -> InvalidationContext {
        let mut context = InvalidationContext::new();
        if new_bounds.size() != self.viewport().size() {
            let new_size = self
                .strategy
                .content_size(&self.geometry.counts, new_bounds);
            context.content_size_adjustment =
                new_size.to_vec2() - self.geometry.content_size.to_vec2();
        }
        context
    }

    /// Invalidates for a viewport change and reports whether the size changed.
    ///
    /// # Panics
    ///
    /// Panics if no host is attached.
    pub fn should_invalidate_for_bounds_change(&mut self, new_bounds: Rect) -> bool {
        let context = self.invalidation_context_for_bounds_change(new_bounds);
        self.invalidate(&context);
        new_bounds.size() != self.viewport().size()
    }

    /// Returns every element intersecting `rect`, cached by exact rectangle.
    ///
    /// # Panics
    ///
    /// Panics if the engine is not prepared and no host is attached.
    pub fn layout_attributes_for_elements_in(&mut self, rect: Rect) -> &[S::Attributes] {
        self.prepare();
        let Self {
            strategy,
            host,
            rects,
            geometry,
            tracer,
            ..
        } = self;
        let viewport = host.as_ref().map(|h| h.bounds());
        let (attributes, computed) =
            rects.get_or_insert_with(rect, || strategy.attributes_in_rect(rect, &geometry.inputs(viewport)));
        #[cfg(feature = "trace-rich")]
        tracer.rect_query(&RectQueryEvent {
            rect,
            outcome: if computed {
                LookupOutcome::Computed
            } else {
                LookupOutcome::Hit
            },
            count: attributes.len(),
        });
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = (tracer, computed);
        }
        attributes
    }

    /// Checks `index_path` against the snapshot, preparing first.
    ///
    /// # Panics
    ///
    /// Panics if the engine is not prepared and no host is attached.
    pub fn validate(&mut self, index_path: IndexPath) -> Result<(), IndexPathValidationError> {
        self.prepare();
        validate_index_path(index_path, &self.geometry.counts, self.config.section_range)
    }

    /// Returns the resting attributes of a cell, or the validation failure.
    ///
    /// # Panics
    ///
    /// Panics if the engine is not prepared and no host is attached.
    pub fn try_item_attributes(
        &mut self,
        index_path: IndexPath,
    ) -> Result<&S::Attributes, IndexPathValidationError> {
        self.validate(index_path)?;
        Ok(self.permanent(Slot::Item, index_path))
    }

    /// Returns the resting attributes of a cell.
    ///
    /// An invalid index path yields `None` and is reported to the trace sink.
    /// Without the `trace` feature the report is dropped; call
    /// [`try_item_attributes`](Self::try_item_attributes) to receive the
    /// [`IndexPathValidationError`] directly.
    ///
    /// # Panics
    ///
    /// Panics if the engine is not prepared and no host is attached.
    pub fn item_attributes(&mut self, index_path: IndexPath) -> Option<&S::Attributes> {
        if let Err(error) = self.validate(index_path) {
            self.tracer.validation_failure(&ValidationFailureEvent {
                index_path,
                error: &error,
            });
            return None;
        }
        Some(self.permanent(Slot::Item, index_path))
    }

    /// Returns the resting attributes of a supplementary view.
    ///
    /// # Panics
    ///
    /// Panics if the strategy does not provide supplementary views, or if the
    /// engine is not prepared and no host is attached.
    pub fn supplementary_attributes(
        &mut self,
        kind: &ElementKind,
        index_path: IndexPath,
    ) -> &S::Attributes {
        self.permanent(Slot::Supplementary(kind), index_path)
    }

    /// Returns the resting attributes of a decoration view.
    ///
    /// # Panics
    ///
    /// Panics if the strategy does not provide decoration views, or if the
    /// engine is not prepared and no host is attached.
    pub fn decoration_attributes(
        &mut self,
        kind: &ElementKind,
        index_path: IndexPath,
    ) -> &S::Attributes {
        self.permanent(Slot::Decoration(kind), index_path)
    }

    fn permanent(&mut self, slot: Slot<'_>, index_path: IndexPath) -> &S::Attributes {
        self.prepare();
        let Self {
            strategy,
            host,
            items,
            supplementary,
            decorations,
            geometry,
            tracer,
            ..
        } = self;
        let viewport = host.as_ref().map(|h| h.bounds());
        let inputs = geometry.inputs(viewport);
        let (attributes, computed) = match slot {
            Slot::Item => items.get_or_insert_with(Usage::Layout, None, index_path, || {
                strategy.item_attributes(index_path, &inputs)
            }),
            Slot::Supplementary(kind) => {
                supplementary.get_or_insert_with(Usage::Layout, Some(kind), index_path, || {
                    strategy.supplementary_attributes(kind, index_path, &inputs)
                })
            }
            Slot::Decoration(kind) => {
                decorations.get_or_insert_with(Usage::Layout, Some(kind), index_path, || {
                    strategy.decoration_attributes(kind, index_path, &inputs)
                })
            }
        };
        #[cfg(feature = "trace-rich")]
        tracer.lookup(&LookupEvent {
            category: slot.category(),
            usage: Usage::Layout,
            index_path,
            outcome: if computed {
                LookupOutcome::Computed
            } else {
                LookupOutcome::Hit
            },
        });
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = (tracer, computed);
        }
        attributes
    }

    fn transient(&mut self, slot: Slot<'_>, usage: Usage, index_path: IndexPath) -> Option<&S::Attributes> {
        let cache = match slot {
            Slot::Item => &self.items,
            Slot::Supplementary(_) => &self.supplementary,
            Slot::Decoration(_) => &self.decorations,
        };
        let found = cache.get(usage, slot.kind(), index_path);
        #[cfg(feature = "trace-rich")]
        self.tracer.lookup(&LookupEvent {
            category: slot.category(),
            usage,
            index_path,
            outcome: if found.is_some() {
                LookupOutcome::Hit
            } else {
                LookupOutcome::Missing
            },
        });
        found
    }

    /// Returns the seeded starting attributes of an appearing cell.
    ///
    /// Never computes: only entries seeded by an update batch or transition
    /// are returned.
    pub fn initial_item_attributes(&mut self, index_path: IndexPath) -> Option<&S::Attributes> {
        self.transient(Slot::Item, Usage::InitialForAppearing, index_path)
    }

    /// Returns the seeded ending attributes of a disappearing cell.
    pub fn final_item_attributes(&mut self, index_path: IndexPath) -> Option<&S::Attributes> {
        self.transient(Slot::Item, Usage::FinalForDisappearing, index_path)
    }

    /// Returns the seeded starting attributes of an appearing supplementary view.
    pub fn initial_supplementary_attributes(
        &mut self,
        kind: &ElementKind,
        index_path: IndexPath,
    ) -> Option<&S::Attributes> {
        self.transient(Slot::Supplementary(kind), Usage::InitialForAppearing, index_path)
    }

    /// Returns the seeded ending attributes of a disappearing supplementary view.
    pub fn final_supplementary_attributes(
        &mut self,
        kind: &ElementKind,
        index_path: IndexPath,
    ) -> Option<&S::Attributes> {
        self.transient(Slot::Supplementary(kind), Usage::FinalForDisappearing, index_path)
    }

    /// Returns the seeded starting attributes of an appearing decoration view.
    pub fn initial_decoration_attributes(
        &mut self,
        kind: &ElementKind,
        index_path: IndexPath,
    ) -> Option<&S::Attributes> {
        self.transient(Slot::Decoration(kind), Usage::InitialForAppearing, index_path)
    }

    /// Returns the seeded ending attributes of a disappearing decoration view.
    pub fn final_decoration_attributes(
        &mut self,
        kind: &ElementKind,
        index_path: IndexPath,
    ) -> Option<&S::Attributes> {
        self.transient(Slot::Decoration(kind), Usage::FinalForDisappearing, index_path)
    }

    /// Starts an update batch.
    ///
    /// Pure insertions seed initial-for-appearing cell attributes through
    /// [`LayoutStrategy::initial_item_attributes`]; pure deletions seed
    /// final-for-disappearing cell attributes through
    /// [`LayoutStrategy::final_item_attributes`]. Moves and reloads seed
    /// nothing.
    ///
    /// # Panics
    ///
    /// Panics if the batch contains an insertion or deletion and the strategy
    /// lacks the matching hook, or if the engine is not prepared and no host
    /// is attached.
    pub fn prepare_for_updates(&mut self, updates: &[UpdateItem]) {
        self.prepare();
        self.phase = UpdatePhase::Updating;

        let viewport = self.host.as_ref().map(|h| h.bounds());
        let inputs = self.geometry.inputs(viewport);
        let mut seeded_initial = 0;
        let mut seeded_final = 0;
        for update in updates {
            if let Some(at) = update.pure_insertion() {
                let attributes = self
                    .strategy
                    .initial_item_attributes(at, InitialUsage::Insertion, &inputs);
                self.items
                    .set(Usage::InitialForAppearing, None, at, Some(attributes));
                seeded_initial += 1;
            } else if let Some(at) = update.pure_deletion() {
                let attributes = self
                    .strategy
                    .final_item_attributes(at, FinalUsage::Deletion, &inputs);
                self.items
                    .set(Usage::FinalForDisappearing, None, at, Some(attributes));
                seeded_final += 1;
            }
        }

        self.tracer.update_batch(&UpdateBatchEvent {
            item_count: updates.len(),
            seeded_initial,
            seeded_final,
        });
    }

    /// Ends an update batch, purging every transient entry.
    pub fn finalize_updates(&mut self) {
        let purged = self.purge_transient();
        self.phase = UpdatePhase::Idle;
        self.tracer.batch_end(&BatchEndEvent {
            kind: BatchKind::Update,
            purged,
        });
    }

    /// Ends a layout transition, purging every transient entry.
    pub fn finalize_transition(&mut self) {
        let purged = self.purge_transient();
        self.tracer.batch_end(&BatchEndEvent {
            kind: BatchKind::Transition,
            purged,
        });
    }

    fn purge_transient(&mut self) -> usize {
        let mut purged = 0;
        for cache in [&mut self.items, &mut self.supplementary, &mut self.decorations] {
            purged += cache.len(Usage::InitialForAppearing) + cache.len(Usage::FinalForDisappearing);
            cache.remove_all_transient();
        }
        purged
    }

    /// Returns the number of transient entries across all categories.
    #[must_use]
    pub fn transient_len(&self) -> usize {
        [&self.items, &self.supplementary, &self.decorations]
            .iter()
            .map(|c| c.len(Usage::InitialForAppearing) + c.len(Usage::FinalForDisappearing))
            .sum()
    }

    /// Stores a transient record for `attributes`' element.
    ///
    /// The category and kind are read from the record itself.
    pub(crate) fn seed(&mut self, usage: Usage, attributes: S::Attributes) {
        debug_assert!(usage.is_transient(), "only transient usages are seeded");
        let index_path = attributes.index_path();
        let kind = attributes.kind().cloned();
        let cache = match attributes.category() {
            ElementCategory::Cell => &mut self.items,
            ElementCategory::SupplementaryView => &mut self.supplementary,
            ElementCategory::DecorationView => &mut self.decorations,
        };
        cache.set(usage, kind.as_ref(), index_path, Some(attributes));
    }

    pub(crate) fn trace_transition(&mut self, event: &TransitionEvent) {
        self.tracer.transition(event);
    }

    /// Returns the source layout of the current transition, if still alive.
    #[must_use]
    pub fn source_layout(&self) -> Option<Rc<RefCell<dyn TransitionLayout<S::Attributes>>>> {
        self.source.as_ref().and_then(Weak::upgrade)
    }

    /// Returns the destination layout of the current transition, if still alive.
    #[must_use]
    pub fn destination_layout(&self) -> Option<Rc<RefCell<dyn TransitionLayout<S::Attributes>>>> {
        self.destination.as_ref().and_then(Weak::upgrade)
    }
}

fn evict_kinds<A>(
    cache: &mut AttributeCache<A>,
    paths: Option<&BTreeMap<ElementKind, Vec<IndexPath>>>,
) -> usize {
    let mut evicted = 0;
    for (kind, paths) in paths.into_iter().flatten() {
        for &path in paths {
            evicted += usize::from(cache.set(Usage::Layout, Some(kind), path, None).is_some());
        }
    }
    evicted
}
