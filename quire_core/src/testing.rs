// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles shared by the engine and transition tests.

use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::{Rect, Size};

use crate::attributes::{Attributes, LayoutAttributes};
use crate::geometry::{DataSourceCounts, LayoutInputs};
use crate::host::CollectionHost;
use crate::index_path::{ElementKind, IndexPath};
use crate::strategy::{FinalUsage, InitialUsage, LayoutStrategy};

pub(crate) const HEADER: &str = "header";
pub(crate) const BACKGROUND: &str = "background";

pub(crate) struct TestHost {
    pub(crate) sections: RefCell<Vec<usize>>,
    pub(crate) bounds: Cell<Rect>,
}

impl TestHost {
    pub(crate) fn new(sections: &[usize], bounds: Rect) -> Self {
        Self {
            sections: RefCell::new(sections.to_vec()),
            bounds: Cell::new(bounds),
        }
    }
}

impl CollectionHost for TestHost {
    fn number_of_sections(&self) -> usize {
        self.sections.borrow().len()
    }

    fn number_of_items(&self, section: usize) -> usize {
        self.sections.borrow()[section]
    }

    fn bounds(&self) -> Rect {
        self.bounds.get()
    }
}

/// Fixed-height rows stacked top to bottom, plus a zero-height header and a
/// background per section.
#[derive(Default)]
pub(crate) struct Rows {
    pub(crate) row_height: f64,
    pub(crate) item_calls: Cell<usize>,
    pub(crate) rect_calls: Cell<usize>,
    pub(crate) content_size_calls: Cell<usize>,
    pub(crate) supplementary_calls: Cell<usize>,
    pub(crate) decoration_calls: Cell<usize>,
    /// Added to every frame's `x0`, so two strategies can be told apart.
    pub(crate) x_offset: f64,
}

impl Rows {
    pub(crate) fn new(row_height: f64) -> Self {
        Self {
            row_height,
            ..Self::default()
        }
    }

    fn row(&self, index_path: IndexPath, counts: &DataSourceCounts) -> usize {
        let before: usize = counts
            .section_item_map
            .range(..index_path.section)
            .map(|(_, items)| items)
            .sum();
        before + index_path.item
    }

    fn frame(&self, index_path: IndexPath, inputs: &LayoutInputs<'_>) -> Rect {
        let width = inputs.viewport.map_or(0.0, |v| v.width());
        let y = self.row(index_path, inputs.counts) as f64 * self.row_height;
        Rect::new(self.x_offset, y, self.x_offset + width, y + self.row_height)
    }
}

impl LayoutStrategy for Rows {
    type Attributes = Attributes;

    fn attributes_in_rect(&self, rect: Rect, inputs: &LayoutInputs<'_>) -> Vec<Attributes> {
        self.rect_calls.set(self.rect_calls.get() + 1);
        let mut out = Vec::new();
        for (&section, &items) in &inputs.counts.section_item_map {
            for item in 0..items {
                let path = IndexPath::new(section, item);
                let frame = self.frame(path, inputs);
                if frame.y1 > rect.y0 && frame.y0 < rect.y1 {
                    out.push(Attributes::for_cell(path).with_frame(frame));
                }
            }
        }
        out
    }

    fn item_attributes(&self, index_path: IndexPath, inputs: &LayoutInputs<'_>) -> Attributes {
        self.item_calls.set(self.item_calls.get() + 1);
        Attributes::for_cell(index_path).with_frame(self.frame(index_path, inputs))
    }

    fn content_size(&self, counts: &DataSourceCounts, viewport: Rect) -> Size {
        self.content_size_calls
            .set(self.content_size_calls.get() + 1);
        Size::new(viewport.width(), counts.item_count as f64 * self.row_height)
    }

    fn provides_supplementary(&self, kind: &ElementKind) -> bool {
        kind.as_str() == HEADER
    }

    fn provides_decoration(&self, kind: &ElementKind) -> bool {
        kind.as_str() == BACKGROUND
    }

    fn initial_item_attributes(
        &self,
        index_path: IndexPath,
        _usage: InitialUsage,
        inputs: &LayoutInputs<'_>,
    ) -> Attributes {
        self.item_attributes(index_path, inputs).with_alpha(0.0)
    }

    fn final_item_attributes(
        &self,
        index_path: IndexPath,
        _usage: FinalUsage,
        inputs: &LayoutInputs<'_>,
    ) -> Attributes {
        self.item_attributes(index_path, inputs).with_alpha(0.0)
    }

    fn supplementary_attributes(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        inputs: &LayoutInputs<'_>,
    ) -> Attributes {
        self.supplementary_calls
            .set(self.supplementary_calls.get() + 1);
        let frame = self.frame(index_path, inputs);
        Attributes::for_supplementary(kind.clone(), index_path)
            .with_frame(Rect::new(frame.x0, frame.y0, frame.x1, frame.y0))
    }
    fn decoration_attributes(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        inputs: &LayoutInputs<'_>,
    ) -> Attributes {
        self.decoration_calls.set(self.decoration_calls.get() + 1);
        let first = IndexPath::new(index_path.section, 0);
        let items = inputs.counts.items_in(index_path.section).unwrap_or(0);
        let top = self.frame(first, inputs);
        Attributes::for_decoration(kind.clone(), first)
            .with_frame(Rect::new(
                top.x0,
                top.y0,
                top.x1,
                top.y0 + items as f64 * self.row_height,
            ))
            .with_z_index(-1)
    }
}

/// Cells only: the three required hooks and nothing else.
pub(crate) struct Plain {
    pub(crate) row_height: f64,
    pub(crate) x_offset: f64,
}

impl LayoutStrategy for Plain {
    type Attributes = Attributes;

    fn attributes_in_rect(&self, rect: Rect, inputs: &LayoutInputs<'_>) -> Vec<Attributes> {
        let mut out = Vec::new();
        for (&section, &items) in &inputs.counts.section_item_map {
            for item in 0..items {
                let attributes = self.item_attributes(IndexPath::new(section, item), inputs);
                if attributes.frame.y1 > rect.y0 && attributes.frame.y0 < rect.y1 {
                    out.push(attributes);
                }
            }
        }
        out
    }

    fn item_attributes(&self, index_path: IndexPath, _inputs: &LayoutInputs<'_>) -> Attributes {
        let y = index_path.item as f64 * self.row_height;
        Attributes::for_cell(index_path).with_frame(Rect::new(
            self.x_offset,
            y,
            self.x_offset + 100.0,
            y + self.row_height,
        ))
    }

    fn content_size(&self, counts: &DataSourceCounts, viewport: Rect) -> Size {
        Size::new(viewport.width(), counts.item_count as f64 * self.row_height)
    }
}
