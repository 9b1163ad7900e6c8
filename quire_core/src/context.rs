// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Invalidation contexts: descriptors of what changed.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::Vec2;

use crate::index_path::{ElementKind, IndexPath};

/// Describes what a [`MetaLayout::invalidate`](crate::engine::MetaLayout::invalidate)
/// call must throw away.
///
/// A context with either [`invalidate_everything`](Self::invalidate_everything)
/// or [`invalidate_data_source_counts`](Self::invalidate_data_source_counts)
/// set triggers a full rebuild. Otherwise only the listed elements are
/// evicted and the content size is adjusted by
/// [`content_size_adjustment`](Self::content_size_adjustment).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvalidationContext {
    /// Drop everything and rebuild the geometry snapshot.
    pub invalidate_everything: bool,
    /// The host's section/item counts changed.
    pub invalidate_data_source_counts: bool,
    /// Cells to evict.
    pub invalidated_item_index_paths: Option<Vec<IndexPath>>,
    /// Supplementary views to evict, per kind.
    pub invalidated_supplementary_index_paths: Option<BTreeMap<ElementKind, Vec<IndexPath>>>,
    /// Decoration views to evict, per kind.
    pub invalidated_decoration_index_paths: Option<BTreeMap<ElementKind, Vec<IndexPath>>>,
    /// Change to apply to the content size on a targeted invalidation.
    pub content_size_adjustment: Vec2,
}

impl InvalidationContext {
    /// Creates a context that invalidates nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that invalidates everything.
    #[must_use]
    pub fn everything() -> Self {
        Self {
            invalidate_everything: true,
            ..Self::default()
        }
    }

    /// Creates a context signalling that data-source counts changed.
    #[must_use]
    pub fn data_source_counts() -> Self {
        Self {
            invalidate_data_source_counts: true,
            ..Self::default()
        }
    }

    /// Returns `true` if this context requires a full rebuild.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.invalidate_everything || self.invalidate_data_source_counts
    }

    /// Adds cells to evict.
    pub fn invalidate_items(&mut self, index_paths: impl IntoIterator<Item = IndexPath>) {
        self.invalidated_item_index_paths
            .get_or_insert_with(Vec::new)
            .extend(index_paths);
    }

    /// Adds supplementary views of `kind` to evict.
    pub fn invalidate_supplementary_elements(
        &mut self,
        kind: impl Into<ElementKind>,
        index_paths: impl IntoIterator<Item = IndexPath>,
    ) {
        self.invalidated_supplementary_index_paths
            .get_or_insert_with(BTreeMap::new)
            .entry(kind.into())
            .or_default()
            .extend(index_paths);
    }

    /// Adds decoration views of `kind` to evict.
    pub fn invalidate_decoration_elements(
        &mut self,
        kind: impl Into<ElementKind>,
        index_paths: impl IntoIterator<Item = IndexPath>,
    ) {
        self.invalidated_decoration_index_paths
            .get_or_insert_with(BTreeMap::new)
            .entry(kind.into())
            .or_default()
            .extend(index_paths);
    }

    /// Returns the context with `content_size_adjustment` replaced.
    #[must_use]
    pub fn with_content_size_adjustment(mut self, adjustment: Vec2) -> Self {
        self.content_size_adjustment = adjustment;
        self
    }
}
