// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout-to-layout transitions.
//!
//! When a host swaps one layout for another, the incoming layout seeds
//! *initial* attributes for everything it shows and the outgoing layout seeds
//! *final* attributes for everything it showed, each preferring the other
//! side's resting geometry so elements animate between the two arrangements.
//!
//! Layouts take part as shared handles, `Rc<RefCell<dyn TransitionLayout<A>>>`.
//! The two sides point at each other through [`Weak`] links
//! ([`SiblingLink`]), set reciprocally by
//! [`prepare_for_transition_from`] and [`prepare_for_transition_to`]. Neither
//! side keeps the other alive.
//!
//! ```text
//!   old ──destination──▶ new
//!   old ◀────source───── new        (both Weak)
//! ```
//!
//! A sibling does not have to be a [`MetaLayout`]: anything implementing
//! [`TransitionLayout`] can answer resting-attribute queries, and may ignore
//! the links.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::attributes::{ElementCategory, LayoutAttributes};
use crate::cache::Usage;
use crate::engine::{MetaLayout, SiblingLink};
use crate::index_path::{ElementKind, IndexPath};
use crate::strategy::LayoutStrategy;
use crate::trace::{TransitionDirection, TransitionEvent};

/// Shared handle to a layout taking part in a transition.
pub type LayoutHandle<A> = Rc<RefCell<dyn TransitionLayout<A>>>;

/// The view a transition has of the layout on the other side.
pub trait TransitionLayout<A: LayoutAttributes> {
    /// Returns the resting attributes of a cell, if the layout has one there.
    fn resting_item_attributes(&mut self, index_path: IndexPath) -> Option<A>;

    /// Returns the resting attributes of a supplementary view, or `None` if
    /// the layout places no such view.
    fn resting_supplementary_attributes(
        &mut self,
        kind: &ElementKind,
        index_path: IndexPath,
    ) -> Option<A>;

    /// Returns the resting attributes of a decoration view, or `None` if the
    /// layout places no such view.
    fn resting_decoration_attributes(
        &mut self,
        kind: &ElementKind,
        index_path: IndexPath,
    ) -> Option<A>;

    /// Returns this layout's resting attributes for the element `element`
    /// describes (same category, kind, and index path).
    fn resting_attributes_matching(&mut self, element: &A) -> Option<A> {
        let index_path = element.index_path();
        match (element.category(), element.kind()) {
            (ElementCategory::Cell, _) => self.resting_item_attributes(index_path),
            (ElementCategory::SupplementaryView, Some(kind)) => {
                self.resting_supplementary_attributes(kind, index_path)
            }
            (ElementCategory::DecorationView, Some(kind)) => {
                self.resting_decoration_attributes(kind, index_path)
            }
            _ => None,
        }
    }

    /// Records the layout this one is transitioning from.
    fn set_source_layout(&mut self, source: SiblingLink<A>) {
        _ = source;
    }

    /// Records the layout this one is transitioning to.
    fn set_destination_layout(&mut self, destination: SiblingLink<A>) {
        _ = destination;
    }
}

impl<S: LayoutStrategy> TransitionLayout<S::Attributes> for MetaLayout<S> {
    fn resting_item_attributes(&mut self, index_path: IndexPath) -> Option<S::Attributes> {
        self.item_attributes(index_path).cloned()
    }

    fn resting_supplementary_attributes(
        &mut self,
        kind: &ElementKind,
        index_path: IndexPath,
    ) -> Option<S::Attributes> {
        if !self.strategy().provides_supplementary(kind) || !self.has_section(index_path) {
            return None;
        }
        Some(self.supplementary_attributes(kind, index_path).clone())
    }

    fn resting_decoration_attributes(
        &mut self,
        kind: &ElementKind,
        index_path: IndexPath,
    ) -> Option<S::Attributes> {
        if !self.strategy().provides_decoration(kind) || !self.has_section(index_path) {
            return None;
        }
        Some(self.decoration_attributes(kind, index_path).clone())
    }

    fn set_source_layout(&mut self, source: SiblingLink<S::Attributes>) {
        self.source = Some(source);
    }

    fn set_destination_layout(&mut self, destination: SiblingLink<S::Attributes>) {
        self.destination = Some(destination);
    }
}

impl<S: LayoutStrategy> MetaLayout<S> {
    fn has_section(&mut self, index_path: IndexPath) -> bool {
        self.prepare();
        index_path.section < self.geometry().counts.section_count
    }
}

#[track_caller]
fn assert_distinct<S, A>(layout: &Rc<RefCell<MetaLayout<S>>>, sibling: &LayoutHandle<A>)
where
    S: LayoutStrategy<Attributes = A>,
    A: LayoutAttributes,
{
    assert!(
        !core::ptr::addr_eq(Rc::as_ptr(layout), Rc::as_ptr(sibling)),
        "a layout cannot transition to or from itself"
    );
}

/// Prepares `layout` to replace `old`.
///
/// Links the pair (`layout.source = old`, `old.destination = layout`), then
/// seeds initial-for-appearing attributes for every element `layout` shows in
/// the host's current bounds. Each element starts where `old` rests it, or
/// where `layout` itself rests it when `old` has no such element.
///
/// # Panics
///
/// Panics if `layout` and `old` are the same handle, if `layout` has no host
/// attached, or if a resting query on either side panics.
pub fn prepare_for_transition_from<S>(
    layout: &Rc<RefCell<MetaLayout<S>>>,
    old: &LayoutHandle<S::Attributes>,
) where
    S: LayoutStrategy + 'static,
{
    assert_distinct(layout, old);
    let this: LayoutHandle<S::Attributes> = layout.clone();
    layout.borrow_mut().source = Some(Rc::downgrade(old));
    old.borrow_mut().set_destination_layout(Rc::downgrade(&this));
    seed_from_sibling(layout, old, TransitionDirection::Incoming);
}

/// Prepares `layout` to be replaced by `new`.
///
/// Links the pair (`layout.destination = new`, `new.source = layout`), then
/// seeds final-for-disappearing attributes for every element `layout` shows
/// in the host's current bounds, preferring where `new` rests each element.
///
/// # Panics
///
/// Panics if `layout` and `new` are the same handle, if `layout` has no host
/// attached, or if a resting query on either side panics.
pub fn prepare_for_transition_to<S>(
    layout: &Rc<RefCell<MetaLayout<S>>>,
    new: &LayoutHandle<S::Attributes>,
) where
    S: LayoutStrategy + 'static,
{
    assert_distinct(layout, new);
    let this: LayoutHandle<S::Attributes> = layout.clone();
    layout.borrow_mut().destination = Some(Rc::downgrade(new));
    new.borrow_mut().set_source_layout(Rc::downgrade(&this));
    seed_from_sibling(layout, new, TransitionDirection::Outgoing);
}

fn seed_from_sibling<S: LayoutStrategy>(
    layout: &Rc<RefCell<MetaLayout<S>>>,
    sibling: &LayoutHandle<S::Attributes>,
    direction: TransitionDirection,
) {
    let usage = match direction {
        TransitionDirection::Incoming => Usage::InitialForAppearing,
        TransitionDirection::Outgoing => Usage::FinalForDisappearing,
    };

    let elements: Vec<S::Attributes> = {
        let mut this = layout.borrow_mut();
        let bounds = this.viewport();
        this.layout_attributes_for_elements_in(bounds).to_vec()
    };

    let mut from_sibling = 0;
    for element in &elements {
        let theirs = sibling.borrow_mut().resting_attributes_matching(element);
        let mut this = layout.borrow_mut();
        let attributes = match theirs {
            Some(attributes) => {
                from_sibling += 1;
                attributes
            }
            None => this
                .resting_attributes_matching(element)
                .unwrap_or_else(|| element.clone()),
        };
        this.seed(usage, attributes);
    }

    layout.borrow_mut().trace_transition(&TransitionEvent {
        direction,
        seeded: elements.len(),
        from_sibling,
    });
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::attributes::Attributes;
    use crate::testing::{BACKGROUND, HEADER, Plain, Rows, TestHost};

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 320.0, 200.0);

    fn rows_at(x_offset: f64, sections: &[usize]) -> Rc<RefCell<MetaLayout<Rows>>> {
        let strategy = Rows {
            x_offset,
            ..Rows::new(40.0)
        };
        let mut layout = MetaLayout::new(strategy);
        layout.attach_host(Rc::new(TestHost::new(sections, VIEWPORT)));
        Rc::new(RefCell::new(layout))
    }

    /// A sibling that knows nothing and keeps no links.
    struct Blank;

    impl TransitionLayout<Attributes> for Blank {
        fn resting_item_attributes(&mut self, _: IndexPath) -> Option<Attributes> {
            None
        }

        fn resting_supplementary_attributes(
            &mut self,
            _: &ElementKind,
            _: IndexPath,
        ) -> Option<Attributes> {
            None
        }

        fn resting_decoration_attributes(
            &mut self,
            _: &ElementKind,
            _: IndexPath,
        ) -> Option<Attributes> {
            None
        }
    }

    #[test]
    fn incoming_layout_starts_from_old_geometry() {
        let old = rows_at(100.0, &[10]);
        let new = rows_at(0.0, &[10]);
        let old_handle: LayoutHandle<Attributes> = old.clone();

        prepare_for_transition_from(&new, &old_handle);

        let mut new = new.borrow_mut();
        for item in 0..5 {
            let initial = new.initial_item_attributes(IndexPath::new(0, item)).cloned();
            assert_eq!(
                initial.map(|a| a.frame.x0),
                Some(100.0),
                "item {item} should start at the old layout's frame"
            );
        }
        assert!(
            new.initial_item_attributes(IndexPath::new(0, 5)).is_none(),
            "only elements in the bounds are seeded"
        );
    }

    #[test]
    fn links_are_reciprocal_and_weak() {
        let old = rows_at(100.0, &[10]);
        let new = rows_at(0.0, &[10]);
        let old_handle: LayoutHandle<Attributes> = old.clone();
        let new_handle: LayoutHandle<Attributes> = new.clone();

        prepare_for_transition_from(&new, &old_handle);

        let source = new.borrow().source_layout();
        assert!(
            source.is_some_and(|s| Rc::ptr_eq(&s, &old_handle)),
            "new.source is old"
        );
        let destination = old.borrow().destination_layout();
        assert!(
            destination.is_some_and(|d| Rc::ptr_eq(&d, &new_handle)),
            "old.destination is new"
        );

        drop(old_handle);
        drop(old);
        assert!(
            new.borrow().source_layout().is_none(),
            "links do not keep the sibling alive"
        );
    }

    #[test]
    fn missing_sibling_elements_fall_back_to_own_geometry() {
        let old = rows_at(100.0, &[2]);
        let new = rows_at(0.0, &[10]);
        let old_handle: LayoutHandle<Attributes> = old.clone();

        prepare_for_transition_from(&new, &old_handle);

        let mut new = new.borrow_mut();
        let from_old = new.initial_item_attributes(IndexPath::new(0, 1)).cloned();
        let own = new.initial_item_attributes(IndexPath::new(0, 3)).cloned();
        assert_eq!(from_old.map(|a| a.frame.x0), Some(100.0));
        assert_eq!(own.map(|a| a.frame.x0), Some(0.0));
    }

    #[test]
    fn outgoing_layout_ends_at_new_geometry() {
        let old = rows_at(0.0, &[10]);
        let new = rows_at(60.0, &[10]);
        let new_handle: LayoutHandle<Attributes> = new.clone();

        prepare_for_transition_to(&old, &new_handle);

        assert!(new.borrow().source_layout().is_some(), "new.source is set");
        let mut old = old.borrow_mut();
        assert!(old.destination_layout().is_some(), "old.destination is set");
        let last = old.final_item_attributes(IndexPath::new(0, 4)).cloned();
        assert_eq!(last.map(|a| a.frame.x0), Some(60.0));

        old.finalize_transition();
        assert_eq!(old.transient_len(), 0);
        assert!(
            old.destination_layout().is_some(),
            "links survive finalize until the next transition"
        );
    }

    #[test]
    fn sibling_answers_only_for_its_sections_and_kinds() {
        let old = rows_at(100.0, &[3]);
        let mut old = old.borrow_mut();
        let header = ElementKind::from(HEADER);
        let background = ElementKind::from(BACKGROUND);

        let resting = old.resting_supplementary_attributes(&header, IndexPath::new(0, 0));
        assert_eq!(resting.map(|a| a.frame.x0), Some(100.0));
        assert!(
            old.resting_decoration_attributes(&background, IndexPath::new(0, 0))
                .is_some()
        );
        assert!(
            old.resting_supplementary_attributes(&header, IndexPath::new(1, 0))
                .is_none(),
            "the old layout has a single section"
        );
        assert!(
            old.resting_decoration_attributes(&background, IndexPath::new(2, 0))
                .is_none()
        );
        assert!(
            old.resting_supplementary_attributes(&"footer".into(), IndexPath::new(0, 0))
                .is_none()
        );
        assert_eq!(old.strategy().supplementary_calls.get(), 1);
        assert_eq!(old.strategy().decoration_calls.get(), 1);
    }

    #[test]
    fn cell_only_sibling_reports_no_views() {
        let mut plain = MetaLayout::new(Plain {
            row_height: 40.0,
            x_offset: 200.0,
        });
        plain.attach_host(Rc::new(TestHost::new(&[3], VIEWPORT)));

        let header = ElementKind::from(HEADER);
        assert!(
            plain
                .resting_supplementary_attributes(&header, IndexPath::new(0, 0))
                .is_none()
        );
        assert!(
            plain
                .resting_decoration_attributes(&BACKGROUND.into(), IndexPath::new(0, 0))
                .is_none()
        );
        let cell = Attributes::for_cell(IndexPath::new(0, 1));
        assert_eq!(
            plain.resting_attributes_matching(&cell).map(|a| a.frame.x0),
            Some(200.0)
        );
    }

    #[test]
    fn non_linking_sibling_is_accepted() {
        let new = rows_at(0.0, &[3]);
        let blank: LayoutHandle<Attributes> = Rc::new(RefCell::new(Blank));

        prepare_for_transition_from(&new, &blank);

        let mut new = new.borrow_mut();
        assert_eq!(new.transient_len(), 3);
        assert!(new.initial_item_attributes(IndexPath::new(0, 2)).is_some());
    }

    #[test]
    #[should_panic(expected = "cannot transition to or from itself")]
    fn self_transition_panics() {
        let layout = rows_at(0.0, &[3]);
        let handle: LayoutHandle<Attributes> = layout.clone();
        prepare_for_transition_from(&layout, &handle);
    }

    #[test]
    #[should_panic(expected = "no CollectionHost attached")]
    fn transition_without_host_panics() {
        let layout = Rc::new(RefCell::new(MetaLayout::new(Rows::new(40.0))));
        let blank: LayoutHandle<Attributes> = Rc::new(RefCell::new(Blank));
        prepare_for_transition_to(&layout, &blank);
    }
}
