// Copyright 2026 the Quire Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batch update items and their classification.
//!
//! An update batch is the list of insertions, deletions, moves, and reloads a
//! host applies in one animated step. The engine seeds transient attributes
//! for pure insertions and deletions (see
//! [`MetaLayout::prepare_for_updates`](crate::engine::MetaLayout::prepare_for_updates));
//! [`extract_dimension_altering_updates`] tells a layout which items actually
//! change what it has to measure.

use alloc::vec;
use alloc::vec::Vec;

use crate::index_path::IndexPath;

/// What an update item does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdateAction {
    /// An element appears at `after`.
    Insert,
    /// An element at `before` goes away.
    Delete,
    /// An element travels from `before` to `after`.
    Move,
    /// An element is reloaded in place.
    Reload,
}

/// One entry of an update batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UpdateItem {
    /// The action.
    pub action: UpdateAction,
    /// Position before the update, if the element existed.
    pub before: Option<IndexPath>,
    /// Position after the update, if the element survives.
    pub after: Option<IndexPath>,
}

impl UpdateItem {
    /// An insertion at `at`.
    #[must_use]
    pub const fn insert(at: IndexPath) -> Self {
        Self {
            action: UpdateAction::Insert,
            before: None,
            after: Some(at),
        }
    }

    /// A deletion at `at`.
    #[must_use]
    pub const fn delete(at: IndexPath) -> Self {
        Self {
            action: UpdateAction::Delete,
            before: Some(at),
            after: None,
        }
    }

    /// A move from `from` to `to`.
    #[must_use]
    pub const fn move_item(from: IndexPath, to: IndexPath) -> Self {
        Self {
            action: UpdateAction::Move,
            before: Some(from),
            after: Some(to),
        }
    }

    /// A reload in place at `at`.
    #[must_use]
    pub const fn reload(at: IndexPath) -> Self {
        Self {
            action: UpdateAction::Reload,
            before: Some(at),
            after: Some(at),
        }
    }

    /// Returns the destination of a pure insertion (no before, has after).
    #[must_use]
    pub fn pure_insertion(&self) -> Option<IndexPath> {
        match (self.action, self.before, self.after) {
            (UpdateAction::Insert, None, Some(at)) => Some(at),
            _ => None,
        }
    }

    /// Returns the origin of a pure deletion (has before, no after).
    #[must_use]
    pub fn pure_deletion(&self) -> Option<IndexPath> {
        match (self.action, self.before, self.after) {
            (UpdateAction::Delete, Some(at), None) => Some(at),
            _ => None,
        }
    }

    /// Returns `true` if `self` and `other` cancel each other out.
    ///
    /// A pure deletion at `P` and a pure insertion at `P` cancel (in either
    /// order), as do two moves with swapped endpoints (`A → B` and `B → A`).
    #[must_use]
    pub fn is_reverse_of(&self, other: &Self) -> bool {
        if let Some(at) = self.pure_deletion() {
            return other.pure_insertion() == Some(at);
        }
        if let Some(at) = self.pure_insertion() {
            return other.pure_deletion() == Some(at);
        }
        match (self.action, other.action) {
            (UpdateAction::Move, UpdateAction::Move) => {
                self.before.is_some()
                    && self.after.is_some()
                    && self.before == other.after
                    && self.after == other.before
            }
            _ => false,
        }
    }
}

/// Returns the items a layout must treat as structurally significant.
///
/// Every member of a pair of items that cancel each other
/// ([`UpdateItem::is_reverse_of`]) is dropped; such a pair leaves the measured
/// content unchanged. Reloads never cancel, so they always survive: a reloaded
/// element may come back with a different size. Survivors are returned in
/// input order.
#[must_use]
pub fn extract_dimension_altering_updates(items: &[UpdateItem]) -> Vec<UpdateItem> {
    let mut excluded = vec![false; items.len()];

    for (i, a) in items.iter().enumerate() {
        for (j, b) in items.iter().enumerate().skip(i + 1) {
            if a.is_reverse_of(b) {
                excluded[i] = true;
                excluded[j] = true;
            }
        }
    }

    items
        .iter()
        .zip(excluded)
        .filter_map(|(item, excluded)| (!excluded).then_some(*item))
        .collect()
}
