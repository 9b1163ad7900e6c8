// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for collection integrations.
//!
//! A *host* is the scrolling collection surface a layout is attached to. The
//! engine asks it for exactly three things:
//!
//! - **Section count** and **per-section item counts**, read when the
//!   geometry snapshot is (re)built during
//!   [`prepare`](crate::engine::MetaLayout::prepare) or a count-invalidating
//!   [`invalidate`](crate::engine::MetaLayout::invalidate).
//! - **Viewport bounds**, read when a targeted invalidation adjusts the
//!   content size, when a bounds change is evaluated, and when a transition
//!   seeds transient attributes for the visible elements.
//!
//! Everything else (view recycling, rendering, the data source itself) stays
//! on the host side.
//!
//! # Attachment
//!
//! A layout holds its host as `Rc<dyn CollectionHost>` via
//! [`attach_host`](crate::engine::MetaLayout::attach_host). Running any of the
//! operations above without an attached host is an integration error: the
//! layout cannot produce correct geometry, so it panics instead of substituting
//! defaults.

use kurbo::Rect;

/// A collection surface that a layout measures against.
///
/// Implementations are expected to be cheap to query; the engine reads counts
/// once per snapshot rebuild and bounds once per operation.
///
/// # Wiring pseudocode
///
/// ```rust,ignore
/// let host: Rc<dyn CollectionHost> = Rc::new(MyCollection::new());
/// let layout = Rc::new(RefCell::new(MetaLayout::new(MyStrategy::default())));
/// layout.borrow_mut().attach_host(host.clone());
///
/// // Layout pass
/// let visible = layout.borrow_mut().layout_attributes_for_elements_in(host.bounds());
///
/// // Data changed
/// layout.borrow_mut().invalidate(&InvalidationContext::data_source_counts());
/// ```
pub trait CollectionHost {
    /// Returns the number of sections.
    fn number_of_sections(&self) -> usize;

    /// Returns the number of items in `section`.
    fn number_of_items(&self, section: usize) -> usize;

    /// Returns the visible viewport in content coordinates.
    fn bounds(&self) -> Rect;
}
