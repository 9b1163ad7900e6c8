// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::{Rect, Vec2};
use quire_core::host::CollectionHost;

/// A [`CollectionHost`] with caller-controlled counts and bounds.
///
/// Mutators take `&self`, so a test can keep an `Rc<FixedHost>` next to the
/// layout it is attached to and edit the collection between calls.
#[derive(Debug)]
pub struct FixedHost {
    sections: RefCell<Vec<usize>>,
    bounds: Cell<Rect>,
    count_reads: Cell<usize>,
}

impl FixedHost {
    /// Creates a host with `sections[i]` items in section `i` and a viewport
    /// of `width` by `height` at the origin.
    #[must_use]
    pub fn new(sections: &[usize], width: f64, height: f64) -> Self {
        Self {
            sections: RefCell::new(sections.to_vec()),
            bounds: Cell::new(Rect::new(0.0, 0.0, width, height)),
            count_reads: Cell::new(0),
        }
    }

    /// Replaces every section count.
    pub fn set_sections(&self, sections: &[usize]) {
        *self.sections.borrow_mut() = sections.to_vec();
    }

    /// Sets the item count of one section.
    ///
    /// # Panics
    ///
    /// Panics if `section` does not exist.
    pub fn set_items(&self, section: usize, items: usize) {
        self.sections.borrow_mut()[section] = items;
    }

    /// Replaces the viewport.
    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }

    /// Moves the viewport by `delta` without resizing it.
    pub fn scroll_by(&self, delta: Vec2) {
        self.bounds.set(self.bounds.get() + delta);
    }

    /// Number of times the section count has been read.
    #[must_use]
    pub fn count_reads(&self) -> usize {
        self.count_reads.get()
    }
}

impl CollectionHost for FixedHost {
    fn number_of_sections(&self) -> usize {
        self.count_reads.set(self.count_reads.get() + 1);
        self.sections.borrow().len()
    }

    fn number_of_items(&self, section: usize) -> usize {
        self.sections.borrow().get(section).copied().unwrap_or(0)
    }

    fn bounds(&self) -> Rect {
        self.bounds.get()
    }
}
