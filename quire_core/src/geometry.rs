// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The geometry snapshot: data-source counts plus content size.

use alloc::collections::BTreeMap;

use kurbo::{Rect, Size};

use crate::host::CollectionHost;

/// Item count per section, keyed by section index.
pub type SectionItemMap = BTreeMap<usize, usize>;

/// Data-source counts captured from the host.
///
/// `item_count` is the sum of the map's values and `section_count` is its
/// length.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSourceCounts {
    /// Total number of items across all sections.
    pub item_count: usize,
    /// Number of sections.
    pub section_count: usize,
    /// Items per section.
    pub section_item_map: SectionItemMap,
}

impl DataSourceCounts {
    /// Reads every section and item count from `host`.
    #[must_use]
    pub fn from_host(host: &dyn CollectionHost) -> Self {
        let section_count = host.number_of_sections();
        let mut section_item_map = SectionItemMap::new();
        let mut item_count = 0;
        for section in 0..section_count {
            let items = host.number_of_items(section);
            section_item_map.insert(section, items);
            item_count += items;
        }
        Self {
            item_count,
            section_count,
            section_item_map,
        }
    }

    /// Builds counts from per-section item counts.
    #[must_use]
    pub fn from_sections(items_per_section: &[usize]) -> Self {
        Self {
            item_count: items_per_section.iter().sum(),
            section_count: items_per_section.len(),
            section_item_map: items_per_section.iter().copied().enumerate().collect(),
        }
    }

    /// Returns the item count of `section`, if the map has it.
    #[inline]
    #[must_use]
    pub fn items_in(&self, section: usize) -> Option<usize> {
        self.section_item_map.get(&section).copied()
    }
}

/// The engine's geometry snapshot.
///
/// Built lazily on first prepare and rebuilt on full invalidation; a targeted
/// invalidation only adjusts `content_size`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    /// Counts captured from the host.
    pub counts: DataSourceCounts,
    /// Total scrollable content size.
    pub content_size: Size,
}

impl Geometry {
    /// Returns the hook view of this snapshot.
    #[inline]
    #[must_use]
    pub fn inputs(&self, viewport: Option<Rect>) -> LayoutInputs<'_> {
        LayoutInputs {
            counts: &self.counts,
            content_size: self.content_size,
            viewport,
        }
    }
}

/// Read-only view handed to strategy hooks.
#[derive(Clone, Copy, Debug)]
pub struct LayoutInputs<'a> {
    /// Current data-source counts.
    pub counts: &'a DataSourceCounts,
    /// Current content size (zero while the snapshot is being built).
    pub content_size: Size,
    /// Host viewport, when a host is attached.
    pub viewport: Option<Rect>,
}

/// Computes the content size after a targeted invalidation.
///
/// The width snaps to the viewport; the height grows or shrinks by the
/// adjustment but never below the viewport height.
#[must_use]
pub fn adjusted_content_size(old: Size, adjustment_height: f64, viewport: Size) -> Size {
    Size::new(
        viewport.width,
        (old.height + adjustment_height).max(viewport.height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Host;

    impl CollectionHost for Host {
        fn number_of_sections(&self) -> usize {
            3
        }

        fn number_of_items(&self, section: usize) -> usize {
            [4, 0, 2][section]
        }

        fn bounds(&self) -> Rect {
            Rect::ZERO
        }
    }

    #[test]
    fn counts_from_host_are_consistent() {
        let counts = DataSourceCounts::from_host(&Host);
        assert_eq!(counts.section_count, 3);
        assert_eq!(counts.item_count, 6);
        assert_eq!(counts.section_item_map.len(), counts.section_count);
        assert_eq!(
            counts.section_item_map.values().sum::<usize>(),
            counts.item_count
        );
        assert_eq!(counts, DataSourceCounts::from_sections(&[4, 0, 2]));
    }

    #[test]
    fn content_size_adjustment_shrinks_height() {
        let size = adjusted_content_size(
            Size::new(300.0, 1000.0),
            -50.0,
            Size::new(320.0, 480.0),
        );
        assert_eq!(size, Size::new(320.0, 950.0));
    }

    #[test]
    fn content_size_adjustment_clamps_to_viewport() {
        let size = adjusted_content_size(
            Size::new(320.0, 500.0),
            -400.0,
            Size::new(320.0, 480.0),
        );
        assert_eq!(size, Size::new(320.0, 480.0));
    }
}
