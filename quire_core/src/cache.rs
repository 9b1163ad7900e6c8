// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute caches.
//!
//! Two caches back every [`MetaLayout`](crate::engine::MetaLayout):
//!
//! - [`AttributeCache`]: a point store keyed by `(Usage, kind, IndexPath)`.
//!   The engine keeps one per element category (cells, supplementary views,
//!   decoration views), so kinds never collide across categories.
//! - [`RectAttributeCache`]: memoized results of rectangle queries, keyed by
//!   the exact rectangle.
//!
//! # Usages
//!
//! [`Usage::Layout`] entries are *permanent*: they stay until an invalidation
//! evicts them. [`Usage::InitialForAppearing`] and
//! [`Usage::FinalForDisappearing`] entries are *transient*: they are seeded at
//! the start of an update or transition batch and purged at its end.

use alloc::collections::BTreeMap;
use alloc::collections::btree_map::Entry;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::index_path::{ElementKind, IndexPath};

/// Which phase of an element's life an attribute record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Usage {
    /// Resting attributes. Permanent until invalidated.
    Layout,
    /// Where an appearing element starts its animation. Transient.
    InitialForAppearing,
    /// Where a disappearing element ends its animation. Transient.
    FinalForDisappearing,
}

impl Usage {
    /// Returns `true` for the two batch-scoped usages.
    #[inline]
    #[must_use]
    pub const fn is_transient(self) -> bool {
        !matches!(self, Self::Layout)
    }
}

type KindBuckets<A> = BTreeMap<Option<ElementKind>, BTreeMap<IndexPath, A>>;

/// Point cache of attribute records keyed by `(Usage, kind, IndexPath)`.
///
/// Each usage owns a two-level map: kind, then index path. A kind bucket is
/// dropped as soon as its last entry is cleared.
#[derive(Clone, Debug)]
pub struct AttributeCache<A> {
    permanent: KindBuckets<A>,
    initial_for_appearing: KindBuckets<A>,
    final_for_disappearing: KindBuckets<A>,
}

impl<A> Default for AttributeCache<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> AttributeCache<A> {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            permanent: BTreeMap::new(),
            initial_for_appearing: BTreeMap::new(),
            final_for_disappearing: BTreeMap::new(),
        }
    }

    fn buckets(&self, usage: Usage) -> &KindBuckets<A> {
        match usage {
            Usage::Layout => &self.permanent,
            Usage::InitialForAppearing => &self.initial_for_appearing,
            Usage::FinalForDisappearing => &self.final_for_disappearing,
        }
    }

    fn buckets_mut(&mut self, usage: Usage) -> &mut KindBuckets<A> {
        match usage {
            Usage::Layout => &mut self.permanent,
            Usage::InitialForAppearing => &mut self.initial_for_appearing,
            Usage::FinalForDisappearing => &mut self.final_for_disappearing,
        }
    }

    /// Returns the cached record for the slot, if any.
    #[must_use]
    pub fn get(&self, usage: Usage, kind: Option<&ElementKind>, index_path: IndexPath) -> Option<&A> {
        self.buckets(usage)
            .get(&kind.cloned())
            .and_then(|paths| paths.get(&index_path))
    }

    /// Stores `attributes` in the slot, or clears the slot when `None`.
    ///
    /// Returns the record previously held by the slot.
    pub fn set(
        &mut self,
        usage: Usage,
        kind: Option<&ElementKind>,
        index_path: IndexPath,
        attributes: Option<A>,
    ) -> Option<A> {
        let buckets = self.buckets_mut(usage);
        let key = kind.cloned();
        match attributes {
            Some(attributes) => buckets
                .entry(key)
                .or_default()
                .insert(index_path, attributes),
            None => {
                let paths = buckets.get_mut(&key)?;
                let previous = paths.remove(&index_path);
                if paths.is_empty() {
                    buckets.remove(&key);
                }
                previous
            }
        }
    }

    /// Returns the record in the slot, computing and storing it on a miss.
    ///
    /// The flag is `true` when `compute` ran.
    pub fn get_or_insert_with(
        &mut self,
        usage: Usage,
        kind: Option<&ElementKind>,
        index_path: IndexPath,
        compute: impl FnOnce() -> A,
    ) -> (&A, bool) {
        let paths = self.buckets_mut(usage).entry(kind.cloned()).or_default();
        match paths.entry(index_path) {
            Entry::Occupied(slot) => (slot.into_mut(), false),
            Entry::Vacant(slot) => (slot.insert(compute()), true),
        }
    }

    /// Returns the number of entries stored under `usage`.
    #[must_use]
    pub fn len(&self, usage: Usage) -> usize {
        self.buckets(usage).values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if no usage holds any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permanent.is_empty()
            && self.initial_for_appearing.is_empty()
            && self.final_for_disappearing.is_empty()
    }

    /// Returns `true` if either transient usage holds an entry.
    #[must_use]
    pub fn has_transient(&self) -> bool {
        !self.initial_for_appearing.is_empty() || !self.final_for_disappearing.is_empty()
    }

    /// Drops every initial-for-appearing and final-for-disappearing entry.
    pub fn remove_all_transient(&mut self) {
        self.initial_for_appearing.clear();
        self.final_for_disappearing.clear();
    }

    /// Drops every permanent entry.
    pub fn remove_all_permanent(&mut self) {
        self.permanent.clear();
    }

    /// Drops every entry of every usage.
    pub fn remove_all(&mut self) {
        self.remove_all_transient();
        self.remove_all_permanent();
    }
}

/// Exact lookup key for a rectangle.
///
/// Built from the bit patterns of the four edges, so two rectangles share a
/// key only when they are numerically identical. Signed zeros are folded so
/// `-0.0` and `0.0` edges produce the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RectKey([u64; 4]);

impl RectKey {
    /// Canonicalizes `rect` into a key.
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        Self([
            edge_bits(rect.x0),
            edge_bits(rect.y0),
            edge_bits(rect.x1),
            edge_bits(rect.y1),
        ])
    }
}

impl From<Rect> for RectKey {
    fn from(rect: Rect) -> Self {
        Self::new(rect)
    }
}

fn edge_bits(v: f64) -> u64 {
    // Adding positive zero maps -0.0 to +0.0 and leaves every other value alone.
    (v + 0.0).to_bits()
}

/// Memoized rectangle queries.
#[derive(Clone, Debug)]
pub struct RectAttributeCache<A> {
    cached: BTreeMap<RectKey, Vec<A>>,
}

impl<A> Default for RectAttributeCache<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> RectAttributeCache<A> {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cached: BTreeMap::new(),
        }
    }

    /// Returns the cached result for exactly `rect`.
    #[must_use]
    pub fn get(&self, rect: Rect) -> Option<&[A]> {
        self.cached.get(&RectKey::new(rect)).map(Vec::as_slice)
    }

    /// Returns the result for `rect`, computing and storing it on a miss.
    ///
    /// The flag is `true` when `compute` ran.
    pub fn get_or_insert_with(
        &mut self,
        rect: Rect,
        compute: impl FnOnce() -> Vec<A>,
    ) -> (&[A], bool) {
        match self.cached.entry(RectKey::new(rect)) {
            Entry::Occupied(slot) => (slot.into_mut().as_slice(), false),
            Entry::Vacant(slot) => (slot.insert(compute()).as_slice(), true),
        }
    }

    /// Caches `attributes` as the result for `rect`.
    pub fn set(&mut self, rect: Rect, attributes: Vec<A>) {
        self.cached.insert(RectKey::new(rect), attributes);
    }

    /// Returns the number of cached rectangles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cached.len()
    }

    /// Returns `true` if no rectangle is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cached.is_empty()
    }

    /// Drops every cached result.
    pub fn remove_all(&mut self) {
        self.cached.clear();
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::attributes::{Attributes, LayoutAttributes};

    const USAGES: [Usage; 3] = [
        Usage::Layout,
        Usage::InitialForAppearing,
        Usage::FinalForDisappearing,
    ];

    #[test]
    fn set_then_get_returns_value_for_every_slot() {
        let header = ElementKind::from("header");
        let mut cache = AttributeCache::new();

        for usage in USAGES {
            for kind in [None, Some(&header)] {
                let path = IndexPath::new(1, 2);
                let attrs = Attributes::for_cell(path).with_z_index(usage as i32);
                cache.set(usage, kind, path, Some(attrs.clone()));
                assert_eq!(cache.get(usage, kind, path), Some(&attrs));
            }
        }
        assert_eq!(cache.len(Usage::Layout), 2);
    }

    #[test]
    fn set_none_clears_slot_and_drops_empty_bucket() {
        let kind = ElementKind::from("footer");
        let path = IndexPath::new(0, 0);
        let mut cache = AttributeCache::new();
        cache.set(
            Usage::Layout,
            Some(&kind),
            path,
            Some(Attributes::for_supplementary(kind.clone(), path)),
        );

        let previous = cache.set(Usage::Layout, Some(&kind), path, None);
        assert!(previous.is_some(), "clearing returns the old record");
        assert!(cache.get(Usage::Layout, Some(&kind), path).is_none());
        assert!(cache.is_empty(), "empty kind bucket should be removed");
    }

    #[test]
    fn clearing_missing_slot_is_noop() {
        let mut cache = AttributeCache::<Attributes>::new();
        assert!(
            cache
                .set(Usage::FinalForDisappearing, None, IndexPath::new(3, 3), None)
                .is_none()
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn usages_are_independent() {
        let path = IndexPath::new(0, 1);
        let mut cache = AttributeCache::new();
        cache.set(Usage::Layout, None, path, Some(Attributes::for_cell(path)));
        assert!(cache.get(Usage::InitialForAppearing, None, path).is_none());
        assert!(cache.get(Usage::FinalForDisappearing, None, path).is_none());
    }

    #[test]
    fn kinds_are_independent() {
        let path = IndexPath::new(0, 0);
        let header = ElementKind::from("header");
        let mut cache = AttributeCache::new();
        cache.set(
            Usage::Layout,
            Some(&header),
            path,
            Some(Attributes::for_supplementary(header.clone(), path)),
        );
        assert!(cache.get(Usage::Layout, None, path).is_none());
        assert!(
            cache
                .get(Usage::Layout, Some(&ElementKind::from("footer")), path)
                .is_none()
        );
    }

    #[test]
    fn remove_all_transient_keeps_permanent() {
        let path = IndexPath::new(0, 0);
        let mut cache = AttributeCache::new();
        for usage in USAGES {
            cache.set(usage, None, path, Some(Attributes::for_cell(path)));
        }
        assert!(cache.has_transient());

        cache.remove_all_transient();
        assert!(!cache.has_transient());
        assert!(cache.get(Usage::Layout, None, path).is_some());

        cache.remove_all_permanent();
        assert!(cache.is_empty());
    }

    #[test]
    fn remove_all_clears_everything() {
        let path = IndexPath::new(2, 0);
        let mut cache = AttributeCache::new();
        for usage in USAGES {
            cache.set(usage, None, path, Some(Attributes::for_cell(path)));
        }
        cache.remove_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn rect_cache_matches_exact_rects_only() {
        let rect = Rect::new(0.0, 0.0, 320.0, 480.0);
        let mut cache = RectAttributeCache::new();
        cache.set(rect, vec![Attributes::for_cell(IndexPath::new(0, 0))]);

        assert_eq!(cache.get(rect).map(<[_]>::len), Some(1));
        assert!(cache.get(Rect::new(0.0, 0.0, 320.0, 480.000_001)).is_none());

        cache.remove_all();
        assert!(cache.get(rect).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn get_or_insert_computes_once() {
        let path = IndexPath::new(0, 3);
        let mut cache = AttributeCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            let (attrs, _) = cache.get_or_insert_with(Usage::Layout, None, path, || {
                calls += 1;
                Attributes::for_cell(path)
            });
            assert_eq!(attrs.index_path(), path);
        }
        assert_eq!(calls, 1, "only the first lookup should compute");

        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut rects = RectAttributeCache::<Attributes>::new();
        let (_, computed) = rects.get_or_insert_with(rect, Vec::new);
        assert!(computed, "first rect lookup computes");
        let (_, computed) = rects.get_or_insert_with(rect, || unreachable!());
        assert!(!computed, "second rect lookup hits");
    }

    #[test]
    fn rect_key_folds_signed_zero() {
        let positive = RectKey::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        let negative = RectKey::new(Rect::new(-0.0, -0.0, 10.0, 10.0));
        assert_eq!(positive, negative);
    }
}
