// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::cell::Cell;

use kurbo::{Rect, Size};
use quire_core::attributes::{Attributes, LayoutAttributes};
use quire_core::geometry::{DataSourceCounts, LayoutInputs};
use quire_core::index_path::{ElementKind, IndexPath};
use quire_core::strategy::{FinalUsage, InitialUsage, LayoutStrategy};

/// Supplementary kind of the per-section header.
pub const HEADER_KIND: &str = "header";

/// Decoration kind of the per-section background.
pub const BACKGROUND_KIND: &str = "section-background";

/// Strategy hooks counted by [`ListStrategy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    /// [`LayoutStrategy::attributes_in_rect`].
    AttributesInRect,
    /// [`LayoutStrategy::item_attributes`].
    ItemAttributes,
    /// [`LayoutStrategy::content_size`].
    ContentSize,
    /// [`LayoutStrategy::initial_item_attributes`].
    InitialItem,
    /// [`LayoutStrategy::final_item_attributes`].
    FinalItem,
    /// [`LayoutStrategy::supplementary_attributes`].
    Supplementary,
    /// [`LayoutStrategy::initial_supplementary_attributes`] and
    /// [`LayoutStrategy::final_supplementary_attributes`].
    TransientSupplementary,
    /// [`LayoutStrategy::decoration_attributes`].
    Decoration,
    /// [`LayoutStrategy::initial_decoration_attributes`] and
    /// [`LayoutStrategy::final_decoration_attributes`].
    TransientDecoration,
}

const HOOK_COUNT: usize = 9;

/// A single-column list.
///
/// Each section is a header of `header_height` followed by its rows, stacked
/// top to bottom at full viewport width, with a background decoration
/// spanning the whole section. Appearing and disappearing elements fade (alpha
/// `0.0`) in place; animated bounds changes keep them opaque.
///
/// Every hook invocation is counted, see [`calls`](Self::calls).
#[derive(Debug)]
pub struct ListStrategy {
    row_height: f64,
    header_height: f64,
    x_offset: f64,
    calls: [Cell<usize>; HOOK_COUNT],
}

impl ListStrategy {
    /// Creates a list of `row_height` rows without headers.
    #[must_use]
    pub fn new(row_height: f64) -> Self {
        Self {
            row_height,
            header_height: 0.0,
            x_offset: 0.0,
            calls: core::array::from_fn(|_| Cell::new(0)),
        }
    }

    /// Returns the list with section headers of `height`.
    #[must_use]
    pub fn with_header_height(mut self, height: f64) -> Self {
        self.header_height = height;
        self
    }

    /// Returns the list shifted right by `x`, so two lists over the same data
    /// produce distinguishable frames.
    #[must_use]
    pub fn with_x_offset(mut self, x: f64) -> Self {
        self.x_offset = x;
        self
    }

    /// Number of times `hook` has run.
    #[must_use]
    pub fn calls(&self, hook: Hook) -> usize {
        self.calls[hook as usize].get()
    }

    /// Resets every counter to zero.
    pub fn reset_calls(&self) {
        for count in &self.calls {
            count.set(0);
        }
    }

    fn count(&self, hook: Hook) {
        let count = &self.calls[hook as usize];
        count.set(count.get() + 1);
    }

    fn section_height(&self, items: usize) -> f64 {
        self.header_height + items as f64 * self.row_height
    }

    fn section_top(&self, section: usize, counts: &DataSourceCounts) -> f64 {
        counts
            .section_item_map
            .range(..section)
            .map(|(_, &items)| self.section_height(items))
            .sum()
    }

    fn width(inputs: &LayoutInputs<'_>) -> f64 {
        inputs.viewport.map_or(0.0, |v| v.width())
    }

    fn band(&self, y0: f64, height: f64, inputs: &LayoutInputs<'_>) -> Rect {
        Rect::new(
            self.x_offset,
            y0,
            self.x_offset + Self::width(inputs),
            y0 + height,
        )
    }

    fn cell(&self, index_path: IndexPath, inputs: &LayoutInputs<'_>) -> Attributes {
        let top = self.section_top(index_path.section, inputs.counts) + self.header_height;
        let y0 = top + index_path.item as f64 * self.row_height;
        Attributes::for_cell(index_path).with_frame(self.band(y0, self.row_height, inputs))
    }

    fn header(&self, kind: &ElementKind, section: usize, inputs: &LayoutInputs<'_>) -> Attributes {
        let top = self.section_top(section, inputs.counts);
        Attributes::for_supplementary(kind.clone(), IndexPath::new(section, 0))
            .with_frame(self.band(top, self.header_height, inputs))
            .with_z_index(1)
    }

    fn background(&self, kind: &ElementKind, section: usize, inputs: &LayoutInputs<'_>) -> Attributes {
        let top = self.section_top(section, inputs.counts);
        let items = inputs.counts.items_in(section).unwrap_or(0);
        Attributes::for_decoration(kind.clone(), IndexPath::new(section, 0))
            .with_frame(self.band(top, self.section_height(items), inputs))
            .with_z_index(-1)
    }
}

fn intersects_vertically(frame: Rect, rect: Rect) -> bool {
    frame.y1 > rect.y0 && frame.y0 < rect.y1
}

fn appearing(attributes: Attributes, animated_bounds: bool) -> Attributes {
    if animated_bounds {
        attributes
    } else {
        attributes.with_alpha(0.0)
    }
}

impl LayoutStrategy for ListStrategy {
    type Attributes = Attributes;

    fn attributes_in_rect(&self, rect: Rect, inputs: &LayoutInputs<'_>) -> Vec<Attributes> {
        self.count(Hook::AttributesInRect);
        let header_kind = ElementKind::from(HEADER_KIND);
        let background_kind = ElementKind::from(BACKGROUND_KIND);

        let mut out = Vec::new();
        for (&section, &items) in &inputs.counts.section_item_map {
            let background = self.background(&background_kind, section, inputs);
            if !intersects_vertically(background.frame, rect) {
                continue;
            }
            out.push(background);
            if self.header_height > 0.0 {
                let header = self.header(&header_kind, section, inputs);
                if intersects_vertically(header.frame, rect) {
                    out.push(header);
                }
            }
            for item in 0..items {
                let cell = self.cell(IndexPath::new(section, item), inputs);
                if intersects_vertically(cell.frame, rect) {
                    out.push(cell);
                }
            }
        }
        out
    }

    fn item_attributes(&self, index_path: IndexPath, inputs: &LayoutInputs<'_>) -> Attributes {
        self.count(Hook::ItemAttributes);
        self.cell(index_path, inputs)
    }

    fn content_size(&self, counts: &DataSourceCounts, viewport: Rect) -> Size {
        self.count(Hook::ContentSize);
        let height: f64 = counts
            .section_item_map
            .values()
            .map(|&items| self.section_height(items))
            .sum();
        Size::new(viewport.width(), height.max(viewport.height()))
    }

    fn provides_supplementary(&self, kind: &ElementKind) -> bool {
        self.header_height > 0.0 && kind.as_str() == HEADER_KIND
    }

    fn provides_decoration(&self, kind: &ElementKind) -> bool {
        kind.as_str() == BACKGROUND_KIND
    }

    fn initial_item_attributes(
        &self,
        index_path: IndexPath,
        usage: InitialUsage,
        inputs: &LayoutInputs<'_>,
    ) -> Attributes {
        self.count(Hook::InitialItem);
        appearing(
            self.cell(index_path, inputs),
            usage == InitialUsage::AnimatedBoundsChange,
        )
    }

    fn final_item_attributes(
        &self,
        index_path: IndexPath,
        usage: FinalUsage,
        inputs: &LayoutInputs<'_>,
    ) -> Attributes {
        self.count(Hook::FinalItem);
        appearing(
            self.cell(index_path, inputs),
            usage == FinalUsage::AnimatedBoundsChange,
        )
    }

    fn supplementary_attributes(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        inputs: &LayoutInputs<'_>,
    ) -> Attributes {
        self.count(Hook::Supplementary);
        self.header(kind, index_path.section, inputs)
    }

    fn initial_supplementary_attributes(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        usage: InitialUsage,
        inputs: &LayoutInputs<'_>,
    ) -> Attributes {
        self.count(Hook::TransientSupplementary);
        appearing(
            self.header(kind, index_path.section, inputs),
            usage == InitialUsage::AnimatedBoundsChange,
        )
    }

    fn final_supplementary_attributes(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        usage: FinalUsage,
        inputs: &LayoutInputs<'_>,
    ) -> Attributes {
        self.count(Hook::TransientSupplementary);
        appearing(
            self.header(kind, index_path.section, inputs),
            usage == FinalUsage::AnimatedBoundsChange,
        )
    }

    fn decoration_attributes(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        inputs: &LayoutInputs<'_>,
    ) -> Attributes {
        self.count(Hook::Decoration);
        self.background(kind, index_path.section, inputs)
    }

    fn initial_decoration_attributes(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        usage: InitialUsage,
        inputs: &LayoutInputs<'_>,
    ) -> Attributes {
        self.count(Hook::TransientDecoration);
        appearing(
            self.background(kind, index_path.section, inputs),
            usage == InitialUsage::AnimatedBoundsChange,
        )
    }

    fn final_decoration_attributes(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        usage: FinalUsage,
        inputs: &LayoutInputs<'_>,
    ) -> Attributes {
        self.count(Hook::TransientDecoration);
        appearing(
            self.background(kind, index_path.section, inputs),
            usage == FinalUsage::AnimatedBoundsChange,
        )
    }
}
