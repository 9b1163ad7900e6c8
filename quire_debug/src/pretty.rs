// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use quire_core::attributes::ElementCategory;
use quire_core::cache::Usage;
use quire_core::trace::{
    BatchEndEvent, BatchKind, InvalidateEvent, InvalidationScope, LookupEvent, LookupOutcome,
    PrepareEvent, RectQueryEvent, TraceSink, TransitionDirection, TransitionEvent,
    UpdateBatchEvent, ValidationFailureEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn scope_name(scope: InvalidationScope) -> &'static str {
    match scope {
        InvalidationScope::Reset => "reset",
        InvalidationScope::Full => "full",
        InvalidationScope::Targeted => "targeted",
    }
}

fn batch_name(kind: BatchKind) -> &'static str {
    match kind {
        BatchKind::Update => "update",
        BatchKind::Transition => "transition",
    }
}

fn category_name(category: ElementCategory) -> &'static str {
    match category {
        ElementCategory::Cell => "cell",
        ElementCategory::SupplementaryView => "supplementary",
        ElementCategory::DecorationView => "decoration",
    }
}

fn usage_name(usage: Usage) -> &'static str {
    match usage {
        Usage::Layout => "layout",
        Usage::InitialForAppearing => "initial",
        Usage::FinalForDisappearing => "final",
    }
}

fn outcome_name(outcome: LookupOutcome) -> &'static str {
    match outcome {
        LookupOutcome::Hit => "hit",
        LookupOutcome::Computed => "computed",
        LookupOutcome::Missing => "missing",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_prepare(&mut self, e: &PrepareEvent) {
        let _ = writeln!(
            self.writer,
            "[prepare] sections={} items={} content={}x{}",
            e.section_count, e.item_count, e.content_size.width, e.content_size.height,
        );
    }

    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        let _ = writeln!(
            self.writer,
            "[invalidate:{}] evicted items={} supplementary={} decoration={} content={}x{}",
            scope_name(e.scope),
            e.evicted_items,
            e.evicted_supplementary,
            e.evicted_decoration,
            e.content_size.width,
            e.content_size.height,
        );
    }

    fn on_validation_failure(&mut self, e: &ValidationFailureEvent<'_>) {
        let _ = writeln!(self.writer, "[invalid] {}: {}", e.index_path, e.error);
    }

    fn on_update_batch(&mut self, e: &UpdateBatchEvent) {
        let _ = writeln!(
            self.writer,
            "[update:begin] items={} seeded initial={} final={}",
            e.item_count, e.seeded_initial, e.seeded_final,
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let direction = match e.direction {
            TransitionDirection::Incoming => "in",
            TransitionDirection::Outgoing => "out",
        };
        let _ = writeln!(
            self.writer,
            "[transition:{direction}] seeded={} from_sibling={}",
            e.seeded, e.from_sibling,
        );
    }

    fn on_batch_end(&mut self, e: &BatchEndEvent) {
        let _ = writeln!(
            self.writer,
            "[{}:end] purged={}",
            batch_name(e.kind),
            e.purged,
        );
    }

    fn on_lookup(&mut self, e: &LookupEvent) {
        let _ = writeln!(
            self.writer,
            "[lookup] {} {} {} {}",
            category_name(e.category),
            usage_name(e.usage),
            e.index_path,
            outcome_name(e.outcome),
        );
    }

    fn on_rect_query(&mut self, e: &RectQueryEvent) {
        let _ = writeln!(
            self.writer,
            "[rect] ({}, {}, {}, {}) {} count={}",
            e.rect.x0,
            e.rect.y0,
            e.rect.x1,
            e.rect.y1,
            outcome_name(e.outcome),
            e.count,
        );
    }
}
