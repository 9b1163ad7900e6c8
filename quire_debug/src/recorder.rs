// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! An engine owns its trace sink, so [`RecorderSink`] keeps its log behind a
//! shared handle: install one clone with
//! [`MetaLayout::set_trace_sink`](quire_core::engine::MetaLayout::set_trace_sink)
//! and read the log through another.
//!
//! ```rust,ignore
//! let recorder = RecorderSink::new();
//! layout.set_trace_sink(Box::new(recorder.clone()));
//! layout.prepare();
//! assert!(matches!(recorder.events()[0], RecordedEvent::Prepare(_)));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use quire_core::index_path::IndexPath;
use quire_core::trace::{
    BatchEndEvent, InvalidateEvent, LookupEvent, PrepareEvent, RectQueryEvent, TraceSink,
    TransitionEvent, UpdateBatchEvent, ValidationFailureEvent,
};
use quire_core::validate::IndexPathValidationError;

/// One recorded trace event.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`PrepareEvent`].
    Prepare(PrepareEvent),
    /// An [`InvalidateEvent`].
    Invalidate(InvalidateEvent),
    /// An owned copy of a [`ValidationFailureEvent`].
    ValidationFailure {
        /// The rejected index path.
        index_path: IndexPath,
        /// Why it was rejected.
        error: IndexPathValidationError,
    },
    /// An [`UpdateBatchEvent`].
    UpdateBatch(UpdateBatchEvent),
    /// A [`TransitionEvent`].
    Transition(TransitionEvent),
    /// A [`BatchEndEvent`].
    BatchEnd(BatchEndEvent),
    /// A [`LookupEvent`].
    Lookup(LookupEvent),
    /// A [`RectQueryEvent`].
    RectQuery(RectQueryEvent),
}

impl RecordedEvent {
    /// Short event name, as used by the pretty printer and the JSON exporter.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Prepare(_) => "prepare",
            Self::Invalidate(_) => "invalidate",
            Self::ValidationFailure { .. } => "validation_failure",
            Self::UpdateBatch(_) => "update_batch",
            Self::Transition(_) => "transition",
            Self::BatchEnd(_) => "batch_end",
            Self::Lookup(_) => "lookup",
            Self::RectQuery(_) => "rect_query",
        }
    }
}

/// A [`TraceSink`] that appends every event to a shared log.
///
/// Clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    log: Rc<RefCell<Vec<RecordedEvent>>>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.log.borrow().clone()
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// Drops every recorded event.
    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    fn push(&self, event: RecordedEvent) {
        self.log.borrow_mut().push(event);
    }
}

impl TraceSink for RecorderSink {
    fn on_prepare(&mut self, e: &PrepareEvent) {
        self.push(RecordedEvent::Prepare(*e));
    }

    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        self.push(RecordedEvent::Invalidate(*e));
    }

    fn on_validation_failure(&mut self, e: &ValidationFailureEvent<'_>) {
        self.push(RecordedEvent::ValidationFailure {
            index_path: e.index_path,
            error: e.error.clone(),
        });
    }

    fn on_update_batch(&mut self, e: &UpdateBatchEvent) {
        self.push(RecordedEvent::UpdateBatch(*e));
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.push(RecordedEvent::Transition(*e));
    }

    fn on_batch_end(&mut self, e: &BatchEndEvent) {
        self.push(RecordedEvent::BatchEnd(*e));
    }

    fn on_lookup(&mut self, e: &LookupEvent) {
        self.push(RecordedEvent::Lookup(*e));
    }

    fn on_rect_query(&mut self, e: &RectQueryEvent) {
        self.push(RecordedEvent::RectQuery(*e));
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use quire_core::cache::Usage;
    use quire_core::context::InvalidationContext;
    use quire_core::engine::MetaLayout;
    use quire_core::index_path::ElementKind;
    use quire_core::trace::{BatchKind, InvalidationScope, LookupOutcome};
    use quire_core::update::UpdateItem;
    use quire_harness::{FixedHost, ListStrategy};

    use super::*;

    fn recorded_layout(items: usize) -> (MetaLayout<ListStrategy>, RecorderSink) {
        let recorder = RecorderSink::new();
        let mut layout = MetaLayout::new(ListStrategy::new(44.0));
        layout.attach_host(Rc::new(FixedHost::new(&[items], 320.0, 480.0)));
        layout.set_trace_sink(Box::new(recorder.clone()));
        (layout, recorder)
    }

    #[test]
    fn clones_share_one_log() {
        let recorder = RecorderSink::new();
        let mut installed = recorder.clone();
        installed.on_batch_end(&BatchEndEvent {
            kind: BatchKind::Update,
            purged: 0,
        });
        assert_eq!(recorder.len(), 1);
        recorder.clear();
        assert!(installed.is_empty());
    }

    #[test]
    fn records_prepare_and_lookups() {
        let (mut layout, recorder) = recorded_layout(10);
        layout.item_attributes(IndexPath::new(0, 2));
        layout.item_attributes(IndexPath::new(0, 2));

        let events = recorder.events();
        assert!(
            matches!(events[0], RecordedEvent::Prepare(PrepareEvent { item_count: 10, .. })),
            "got {events:?}"
        );
        let outcomes: Vec<LookupOutcome> = events
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Lookup(l) if l.usage == Usage::Layout => Some(l.outcome),
                _ => None,
            })
            .collect();
        assert_eq!(outcomes, [LookupOutcome::Computed, LookupOutcome::Hit]);
    }

    #[test]
    fn records_validation_failures() {
        let (mut layout, recorder) = recorded_layout(5);
        assert!(layout.item_attributes(IndexPath::new(0, 5)).is_none());
        let failure = recorder.events().into_iter().find_map(|e| match e {
            RecordedEvent::ValidationFailure { index_path, error } => Some((index_path, error)),
            _ => None,
        });
        assert!(
            matches!(
                failure,
                Some((
                    IndexPath { section: 0, item: 5 },
                    IndexPathValidationError::NoSuchItem { .. }
                ))
            ),
            "got {failure:?}"
        );
    }

    #[test]
    fn records_targeted_eviction_counts() {
        let (mut layout, recorder) = recorded_layout(10);
        let header = ElementKind::from(quire_harness::HEADER_KIND);
        layout.item_attributes(IndexPath::new(0, 1));
        layout.supplementary_attributes(&header, IndexPath::new(0, 0));

        let mut context = InvalidationContext::new();
        context.invalidate_items([IndexPath::new(0, 1), IndexPath::new(0, 9)]);
        context.invalidate_supplementary_elements(&header, [IndexPath::new(0, 0)]);
        layout.invalidate(&context);

        let last = recorder.events().pop();
        assert!(
            matches!(
                last,
                Some(RecordedEvent::Invalidate(InvalidateEvent {
                    scope: InvalidationScope::Targeted,
                    evicted_items: 1,
                    evicted_supplementary: 1,
                    evicted_decoration: 0,
                    ..
                }))
            ),
            "only cached entries count as evicted; got {last:?}"
        );
    }

    #[test]
    fn records_update_batch_lifecycle() {
        let (mut layout, recorder) = recorded_layout(10);
        layout.prepare_for_updates(&[
            UpdateItem::insert(IndexPath::new(0, 3)),
            UpdateItem::delete(IndexPath::new(0, 8)),
        ]);
        layout.finalize_updates();

        let names: Vec<&str> = recorder.events().iter().map(RecordedEvent::name).collect();
        assert_eq!(names, ["prepare", "update_batch", "batch_end"]);
        assert!(matches!(
            recorder.events().last(),
            Some(RecordedEvent::BatchEnd(BatchEndEvent {
                kind: BatchKind::Update,
                purged: 2,
            }))
        ));
    }
}
