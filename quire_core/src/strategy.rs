// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Calculation hooks supplied by a concrete layout.
//!
//! [`MetaLayout`](crate::engine::MetaLayout) owns caching, invalidation, and
//! the batch/transition lifecycles; a [`LayoutStrategy`] owns the geometry.
//! The engine calls a hook only on a cache miss (or when seeding transient
//! attributes), and stores whatever it returns.
//!
//! Hooks take `&self` and receive a [`LayoutInputs`] view of the geometry
//! snapshot. They must not reach back into the engine that is calling them.
//!
//! # Required and optional hooks
//!
//! Every layout must answer rectangle queries, item queries, and content size.
//! The remaining hooks default to a panic naming the missing hook: asking a
//! layout for supplementary or decoration geometry it never declared is a
//! configuration error, not a runtime condition. A layout declares the
//! supplementary and decoration kinds it places through
//! [`LayoutStrategy::provides_supplementary`] and
//! [`LayoutStrategy::provides_decoration`].

use alloc::vec::Vec;

use kurbo::{Rect, Size};

use crate::attributes::LayoutAttributes;
use crate::geometry::{DataSourceCounts, LayoutInputs};
use crate::index_path::{ElementKind, IndexPath};

/// Why initial attributes for an appearing element are being computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InitialUsage {
    /// The element is being inserted by an update batch.
    Insertion,
    /// The element is appearing during an animated bounds change.
    AnimatedBoundsChange,
    /// The element is appearing during a layout-to-layout transition.
    TransitionIn,
}

/// Why final attributes for a disappearing element are being computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FinalUsage {
    /// The element is being deleted by an update batch.
    Deletion,
    /// The element is disappearing during an animated bounds change.
    AnimatedBoundsChange,
    /// The element is disappearing during a layout-to-layout transition.
    TransitionOut,
}

#[cold]
#[track_caller]
fn missing_hook(hook: &str) -> ! {
    panic!("{hook} is not provided by this layout strategy")
}

/// Geometry hooks for one concrete layout.
pub trait LayoutStrategy {
    /// The attribute record this layout produces.
    type Attributes: LayoutAttributes;

    /// Returns every element intersecting `rect`.
    fn attributes_in_rect(&self, rect: Rect, inputs: &LayoutInputs<'_>) -> Vec<Self::Attributes>;

    /// Returns the resting attributes of the cell at `index_path`.
    fn item_attributes(
        &self,
        index_path: IndexPath,
        inputs: &LayoutInputs<'_>,
    ) -> Self::Attributes;

    /// Returns the total content size for `counts` inside `viewport`.
    ///
    /// `viewport` is the host's bounds; during a bounds-change evaluation it
    /// is the proposed new bounds.
    fn content_size(&self, counts: &DataSourceCounts, viewport: Rect) -> Size;

    /// Returns `true` if this layout places supplementary views of `kind`.
    ///
    /// A layout answering `false` is never asked for that kind's geometry on
    /// behalf of a transition sibling. Defaults to `false`.
    fn provides_supplementary(&self, kind: &ElementKind) -> bool {
        _ = kind;
        false
    }

    /// Returns `true` if this layout places decoration views of `kind`.
    ///
    /// Defaults to `false`.
    fn provides_decoration(&self, kind: &ElementKind) -> bool {
        _ = kind;
        false
    }

    /// Returns where an appearing cell starts.
    ///
    /// # Panics
    ///
    /// The default implementation panics.
    fn initial_item_attributes(
        &self,
        index_path: IndexPath,
        usage: InitialUsage,
        inputs: &LayoutInputs<'_>,
    ) -> Self::Attributes {
        _ = (index_path, usage, inputs);
        missing_hook("initial_item_attributes")
    }

    /// Returns where a disappearing cell ends.
    ///
    /// # Panics
    ///
    /// The default implementation panics.
    fn final_item_attributes(
        &self,
        index_path: IndexPath,
        usage: FinalUsage,
        inputs: &LayoutInputs<'_>,
    ) -> Self::Attributes {
        _ = (index_path, usage, inputs);
        missing_hook("final_item_attributes")
    }

    /// Returns the resting attributes of a supplementary view.
    ///
    /// # Panics
    ///
    /// The default implementation panics.
    fn supplementary_attributes(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        inputs: &LayoutInputs<'_>,
    ) -> Self::Attributes {
        _ = (kind, index_path, inputs);
        missing_hook("supplementary_attributes")
    }

    /// Returns where an appearing supplementary view starts.
    ///
    /// # Panics
    ///
    /// The default implementation panics.
    fn initial_supplementary_attributes(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        usage: InitialUsage,
        inputs: &LayoutInputs<'_>,
    ) -> Self::Attributes {
        _ = (kind, index_path, usage, inputs);
        missing_hook("initial_supplementary_attributes")
    }

    /// Returns where a disappearing supplementary view ends.
    ///
    /// # Panics
    ///
    /// The default implementation panics.
    fn final_supplementary_attributes(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        usage: FinalUsage,
        inputs: &LayoutInputs<'_>,
    ) -> Self::Attributes {
        _ = (kind, index_path, usage, inputs);
        missing_hook("final_supplementary_attributes")
    }

    /// Returns the resting attributes of a decoration view.
    ///
    /// # Panics
    ///
    /// The default implementation panics.
    fn decoration_attributes(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        inputs: &LayoutInputs<'_>,
    ) -> Self::Attributes {
        _ = (kind, index_path, inputs);
        missing_hook("decoration_attributes")
    }

    /// Returns where an appearing decoration view starts.
    ///
    /// # Panics
    ///
    /// The default implementation panics.
    fn initial_decoration_attributes(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        usage: InitialUsage,
        inputs: &LayoutInputs<'_>,
    ) -> Self::Attributes {
        _ = (kind, index_path, usage, inputs);
        missing_hook("initial_decoration_attributes")
    }

    /// Returns where a disappearing decoration view ends.
    ///
    /// # Panics
    ///
    /// The default implementation panics.
    fn final_decoration_attributes(
        &self,
        kind: &ElementKind,
        index_path: IndexPath,
        usage: FinalUsage,
        inputs: &LayoutInputs<'_>,
    ) -> Self::Attributes {
        _ = (kind, index_path, usage, inputs);
        missing_hook("final_decoration_attributes")
    }
}
