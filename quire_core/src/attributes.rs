// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout attribute records.
//!
//! The engine never looks inside an attribute record beyond its identity:
//! the [`ElementCategory`], optional [`ElementKind`], and [`IndexPath`]. A
//! concrete layout binds its record type once, at compile time, through
//! [`LayoutStrategy::Attributes`](crate::strategy::LayoutStrategy::Attributes).
//! [`Attributes`] is the stock record and is sufficient for most layouts.

use core::cmp::Ordering;

use kurbo::{Affine, Rect};

use crate::index_path::{ElementKind, IndexPath};

/// What sort of view an attribute record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementCategory {
    /// A data-driven cell. Cells have no kind.
    Cell,
    /// A supplementary view such as a section header or footer.
    SupplementaryView,
    /// A decoration view owned by the layout.
    DecorationView,
}

/// Identity and construction contract for layout attribute records.
pub trait LayoutAttributes: Clone {
    /// Creates an empty record for the cell at `index_path`.
    fn for_cell(index_path: IndexPath) -> Self;

    /// Creates an empty record for a supplementary view of `kind`.
    fn for_supplementary(kind: ElementKind, index_path: IndexPath) -> Self;

    /// Creates an empty record for a decoration view of `kind`.
    fn for_decoration(kind: ElementKind, index_path: IndexPath) -> Self;

    /// The category of element this record describes.
    fn category(&self) -> ElementCategory;

    /// The element kind, or `None` for cells.
    fn kind(&self) -> Option<&ElementKind>;

    /// The element's index path.
    fn index_path(&self) -> IndexPath;
}

/// Geometry and presentation state for one element.
#[derive(Clone, Debug, PartialEq)]
pub struct Attributes {
    category: ElementCategory,
    kind: Option<ElementKind>,
    index_path: IndexPath,
    /// Frame in content coordinates.
    pub frame: Rect,
    /// Transform applied around the frame's center.
    pub transform: Affine,
    /// Opacity in `0.0..=1.0`.
    pub alpha: f64,
    /// Stacking order; higher values draw on top.
    pub z_index: i32,
    /// Whether the element is hidden.
    pub hidden: bool,
}

impl Attributes {
    fn new(category: ElementCategory, kind: Option<ElementKind>, index_path: IndexPath) -> Self {
        Self {
            category,
            kind,
            index_path,
            frame: Rect::ZERO,
            transform: Affine::IDENTITY,
            alpha: 1.0,
            z_index: 0,
            hidden: false,
        }
    }

    /// Returns the record with `frame` replaced.
    #[must_use]
    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }

    /// Returns the record with `alpha` replaced.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Returns the record with `z_index` replaced.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

impl LayoutAttributes for Attributes {
    fn for_cell(index_path: IndexPath) -> Self {
        Self::new(ElementCategory::Cell, None, index_path)
    }

    fn for_supplementary(kind: ElementKind, index_path: IndexPath) -> Self {
        Self::new(ElementCategory::SupplementaryView, Some(kind), index_path)
    }

    fn for_decoration(kind: ElementKind, index_path: IndexPath) -> Self {
        Self::new(ElementCategory::DecorationView, Some(kind), index_path)
    }

    fn category(&self) -> ElementCategory {
        self.category
    }

    fn kind(&self) -> Option<&ElementKind> {
        self.kind.as_ref()
    }

    fn index_path(&self) -> IndexPath {
        self.index_path
    }
}

/// Returns whether two records describe the same element.
///
/// Two records match when they share a kind and an index path. This is the
/// equality used when merging attribute lists produced by different passes.
#[must_use]
pub fn is_same_element<A: LayoutAttributes>(a: &A, b: &A) -> bool {
    a.kind() == b.kind() && a.index_path() == b.index_path()
}

/// Merge ordering for attribute lists.
///
/// Cells sort before supplementary views, which sort before decoration views.
/// Within one category, records sort by index path.
#[must_use]
pub fn merge_order<A: LayoutAttributes>(a: &A, b: &A) -> Ordering {
    a.category()
        .cmp(&b.category())
        .then_with(|| a.index_path().cmp(&b.index_path()))
}
